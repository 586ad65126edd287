//! Response envelope and error mapping.

use atelier_error::{AtelierError, AtelierErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Envelope carried by every API response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Payload, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope with payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful envelope without payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Pipeline error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AtelierError);

impl From<AtelierError> for ApiError {
    fn from(error: AtelierError) -> Self {
        Self(error)
    }
}

/// Map an error family to its HTTP status.
pub fn status_for(error: &AtelierError) -> StatusCode {
    match error.kind() {
        AtelierErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
        AtelierErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
        AtelierErrorKind::Permission(_) => StatusCode::FORBIDDEN,
        AtelierErrorKind::Integrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AtelierErrorKind::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "Request rejected");
        }
        let body = serde_json::json!({
            "success": false,
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_error::{
        NotFoundError, NotFoundErrorKind, PermissionError, ValidationError, ValidationErrorKind,
    };

    #[test]
    fn error_families_map_to_their_statuses() {
        let validation: AtelierError =
            ValidationError::new(ValidationErrorKind::MissingFile).into();
        assert_eq!(status_for(&validation), StatusCode::BAD_REQUEST);

        let not_found: AtelierError =
            NotFoundError::new(NotFoundErrorKind::Asset("x".to_string())).into();
        assert_eq!(status_for(&not_found), StatusCode::NOT_FOUND);

        let permission: AtelierError = PermissionError::new("nope").into();
        assert_eq!(status_for(&permission), StatusCode::FORBIDDEN);
    }

    #[test]
    fn envelope_skips_absent_data() {
        let envelope = ApiResponse::ok_empty("Deleted");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
    }
}
