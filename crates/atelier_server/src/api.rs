//! HTTP API for the asset pipeline.

use crate::response::{ApiError, ApiResponse};
use atelier_assets::{AssetService, AssetUpdate, RemoteFetchRequest, UploadRequest};
use atelier_core::{Asset, AssetType, BatchReport};
use atelier_error::{ValidationError, ValidationErrorKind};
use atelier_query::{AssetFilter, ClientRef, SortBy, SortDirection};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    service: Arc<AssetService>,
}

impl AppState {
    /// Creates new API state.
    pub fn new(service: Arc<AssetService>) -> Self {
        Self { service }
    }
}

/// Creates the asset API router.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/assets", post(upload_asset).get(list_assets))
        .route("/api/assets/remote", post(ingest_remote))
        .route(
            "/api/assets/:id",
            get(get_asset).patch(update_asset).delete(delete_asset),
        )
        .route("/api/assets/:id/favourite", post(toggle_favourite))
        .route("/api/assets/:id/usage", post(increment_usage))
        .route("/api/assets/batch/update", post(batch_update))
        .route("/api/assets/batch/delete", post(batch_delete))
        .route("/media/*path", get(serve_media))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

fn invalid_field(field: &str, reason: impl std::fmt::Display) -> ApiError {
    ApiError(ValidationError::field(field, reason.to_string()).into())
}

/// Parse a JSON array of strings, accepting a comma-separated fallback.
fn parse_string_array(field: &str, raw: &str) -> Result<Vec<String>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| invalid_field(field, e));
    }
    Ok(raw.split(',').map(|part| part.trim().to_string()).collect())
}

async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut original_filename = "upload".to_string();
    let mut declared_mime = "application/octet-stream".to_string();
    let mut declared_type = None;
    let mut name = None;
    let mut description = None;
    let mut tags = Vec::new();
    let mut categories = Vec::new();
    let mut client = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid_field("multipart", e))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                if let Some(filename) = field.file_name() {
                    original_filename = filename.to_string();
                }
                if let Some(content_type) = field.content_type() {
                    declared_mime = content_type.to_string();
                }
                bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| invalid_field("file", e))?
                        .to_vec(),
                );
            }
            "name" => name = Some(read_text(field).await?),
            "type" => {
                let raw = read_text(field).await?;
                let parsed: AssetType =
                    raw.parse().map_err(|e: String| invalid_field("type", e))?;
                declared_type = Some(parsed);
            }
            "description" => description = Some(read_text(field).await?),
            "tags" => tags = parse_string_array("tags", &read_text(field).await?)?,
            "categories" => {
                categories = parse_string_array("categories", &read_text(field).await?)?
            }
            "clientId" => {
                let raw = read_text(field).await?;
                let id: Uuid = raw.parse().map_err(|e| invalid_field("clientId", e))?;
                client = Some(ClientRef::Id(id));
            }
            "clientSlug" => client = Some(ClientRef::Slug(read_text(field).await?)),
            _ => {}
        }
    }

    let client = client.ok_or_else(|| {
        ApiError(ValidationError::new(ValidationErrorKind::MissingClient("none supplied".to_string())).into())
    })?;

    let request = UploadRequest {
        bytes: bytes.unwrap_or_default(),
        declared_mime,
        original_filename,
        declared_type,
        name,
        description,
        tags,
        categories,
        client,
    };

    let asset = state.service.ingest(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Asset created", asset)),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    let name = field.name().unwrap_or_default().to_string();
    field.text().await.map_err(|e| invalid_field(&name, e))
}

/// JSON body for remote media ingestion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteIngestBody {
    url: String,
    client_id: Option<Uuid>,
    client_slug: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    declared_type: Option<AssetType>,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
}

async fn ingest_remote(
    State(state): State<AppState>,
    Json(body): Json<RemoteIngestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let client = client_ref_from(body.client_id, body.client_slug)?;
    let request = RemoteFetchRequest {
        url: body.url,
        client,
        name: body.name,
        declared_type: body.declared_type,
        description: body.description,
        tags: body.tags,
        categories: body.categories,
    };
    let asset = state.service.ingest_remote(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Asset created", asset)),
    ))
}

fn client_ref_from(id: Option<Uuid>, slug: Option<String>) -> Result<ClientRef, ApiError> {
    match (id, slug) {
        (Some(id), _) => Ok(ClientRef::Id(id)),
        (None, Some(slug)) => Ok(ClientRef::Slug(slug)),
        (None, None) => Err(ApiError(
            ValidationError::new(ValidationErrorKind::MissingClient("none supplied".to_string()))
                .into(),
        )),
    }
}

/// Query parameters of the list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    client_id: Option<Uuid>,
    client_slug: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
    tags: Option<String>,
    categories: Option<String>,
    search_term: Option<String>,
    favourites_only: Option<bool>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    sort_by: Option<String>,
    sort_direction: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct Pagination {
    limit: usize,
    offset: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    assets: Vec<Asset>,
    total: usize,
    pagination: Pagination,
}

async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let client = client_ref_from(params.client_id, params.client_slug)?;

    let asset_type = match params.asset_type.as_deref() {
        Some(raw) => Some(
            raw.parse::<AssetType>()
                .map_err(|e| invalid_field("type", e))?,
        ),
        None => None,
    };

    let mut filter = AssetFilter {
        asset_type,
        search_term: params.search_term,
        favourites_only: params.favourites_only.unwrap_or(false),
        start_date: params.start_date,
        end_date: params.end_date,
        sort_by: params
            .sort_by
            .as_deref()
            .map(SortBy::parse_or_default)
            .unwrap_or_default(),
        sort_direction: params
            .sort_direction
            .as_deref()
            .map(SortDirection::parse_or_default)
            .unwrap_or_default(),
        ..AssetFilter::default()
    };
    if let Some(tags) = params.tags.as_deref() {
        filter.tags = parse_string_array("tags", tags)?;
    }
    if let Some(categories) = params.categories.as_deref() {
        filter.categories = parse_string_array("categories", categories)?;
    }
    if let Some(limit) = params.limit {
        filter.limit = limit;
    }
    if let Some(offset) = params.offset {
        filter.offset = offset;
    }

    let page = state.service.query(client, filter).await?;
    let data = ListData {
        pagination: Pagination {
            limit: page.limit,
            offset: page.offset,
        },
        total: page.total,
        assets: page.assets,
    };
    Ok(Json(ApiResponse::ok("OK", data)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetParams {
    client_id: Uuid,
}

async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<GetParams>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = state.service.get(id, params.client_id).await?;
    Ok(Json(ApiResponse::ok("OK", asset)))
}

async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AssetUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = state.service.update(id, patch).await?;
    Ok(Json(ApiResponse::ok("Asset updated", asset)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavouriteBody {
    is_favourite: Option<bool>,
}

async fn toggle_favourite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<FavouriteBody>>,
) -> Result<impl IntoResponse, ApiError> {
    let desired = body.and_then(|Json(body)| body.is_favourite);
    let asset = state.service.toggle_favourite(id, desired).await?;
    Ok(Json(ApiResponse::ok("Favourite updated", asset)))
}

async fn increment_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = state.service.increment_usage(id).await?;
    Ok(Json(ApiResponse::ok("Usage recorded", asset)))
}

async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.delete(id).await?;
    Ok(Json(ApiResponse::ok_empty("Asset deleted")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateBody {
    ids: Vec<Uuid>,
    #[serde(default)]
    add_tags: Vec<String>,
    #[serde(default)]
    remove_tags: Vec<String>,
    #[serde(default)]
    add_categories: Vec<String>,
    #[serde(default)]
    remove_categories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateData {
    updated: usize,
    failed: usize,
    errors: BTreeMap<Uuid, String>,
}

async fn batch_update(
    State(state): State<AppState>,
    Json(body): Json<BatchUpdateBody>,
) -> Result<impl IntoResponse, ApiError> {
    let changes = atelier_assets::BatchChanges {
        add_tags: body.add_tags,
        remove_tags: body.remove_tags,
        add_categories: body.add_categories,
        remove_categories: body.remove_categories,
    };
    let report = state.service.batch_update(&body.ids, &changes).await;
    let BatchReport {
        succeeded,
        failed,
        errors,
    } = report;
    Ok(Json(ApiResponse::ok(
        "Batch update finished",
        BatchUpdateData {
            updated: succeeded,
            failed,
            errors,
        },
    )))
}

#[derive(Debug, Deserialize)]
struct BatchDeleteBody {
    ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
struct BatchDeleteData {
    deleted: usize,
    failed: usize,
    errors: BTreeMap<Uuid, String>,
}

async fn batch_delete(
    State(state): State<AppState>,
    Json(body): Json<BatchDeleteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.service.batch_delete(&body.ids).await;
    let BatchReport {
        succeeded,
        failed,
        errors,
    } = report;
    Ok(Json(ApiResponse::ok(
        "Batch delete finished",
        BatchDeleteData {
            deleted: succeeded,
            failed,
            errors,
        },
    )))
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or_default() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.service.read_bytes(&path).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(&path))],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_arrays_accept_json_and_comma_forms() {
        assert_eq!(
            parse_string_array("tags", r#"["a","b"]"#).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            parse_string_array("tags", "a, b").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_string_array("tags", "").unwrap().is_empty());
        assert!(parse_string_array("tags", "[not json").is_err());
    }

    #[test]
    fn media_content_types_follow_the_extension() {
        assert_eq!(content_type_for("c/a/thumbnail.jpg"), "image/jpeg");
        assert_eq!(content_type_for("c/a/preview.gif"), "image/gif");
        assert_eq!(content_type_for("c/a/original.bin"), "application/octet-stream");
    }
}
