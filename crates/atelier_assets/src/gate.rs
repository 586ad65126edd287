//! Upload validation gate.
//!
//! Everything here runs before the first byte-store write; a rejected
//! upload has no side effects.

use crate::config::PipelineConfig;
use atelier_core::AssetType;
use atelier_error::{AtelierResult, ValidationError, ValidationErrorKind};
use atelier_interface::ClientDirectory;
use atelier_media::{classify, extension_of, validate_declared};
use atelier_query::ClientRef;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Raw upload input: file content plus caller-supplied descriptive fields.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File content
    pub bytes: Vec<u8>,
    /// MIME type declared by the uploader
    pub declared_mime: String,
    /// Original filename as uploaded
    pub original_filename: String,
    /// Asset type the caller claims, checked against the filename
    pub declared_type: Option<AssetType>,
    /// Display name override
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Initial tags
    pub tags: Vec<String>,
    /// Initial categories
    pub categories: Vec<String>,
    /// Target client
    pub client: ClientRef,
}

/// An upload that passed the gate, with everything ingestion needs.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    /// File content
    pub bytes: Vec<u8>,
    /// Extension used for the canonical original path
    pub extension: String,
    /// Classified asset type
    pub asset_type: AssetType,
    /// Display name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Deduplicated tags
    pub tags: BTreeSet<String>,
    /// Deduplicated categories
    pub categories: BTreeSet<String>,
    /// Resolved client id
    pub client_id: Uuid,
}

/// Validates uploads before any side effect occurs.
pub struct UploadGate {
    clients: Arc<dyn ClientDirectory>,
    config: PipelineConfig,
}

impl UploadGate {
    /// Create a gate over the given client directory.
    pub fn new(clients: Arc<dyn ClientDirectory>, config: PipelineConfig) -> Self {
        Self { clients, config }
    }

    /// Validate an upload request.
    ///
    /// # Errors
    ///
    /// `ValidationError` when the file is empty, exceeds the configured
    /// ceiling, cannot be classified, disagrees with its declared type, or
    /// the client reference does not resolve.
    #[tracing::instrument(skip(self, request), fields(filename = %request.original_filename, size = request.bytes.len()))]
    pub async fn validate(&self, request: UploadRequest) -> AtelierResult<ValidatedUpload> {
        if request.bytes.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::MissingFile).into());
        }
        let size = request.bytes.len() as u64;
        if size > *self.config.max_upload_bytes() {
            return Err(ValidationError::new(ValidationErrorKind::FileTooLarge(
                size,
                *self.config.max_upload_bytes(),
            ))
            .into());
        }

        let derived = classify(&request.original_filename, &request.declared_mime)?;
        if let Some(declared) = request.declared_type {
            validate_declared(declared, derived)?;
        }

        let client_id = self.resolve_client(&request.client).await?;

        let extension = extension_of(&request.original_filename)
            .or_else(|| {
                request
                    .declared_mime
                    .split('/')
                    .nth(1)
                    .map(|sub| sub.to_lowercase())
            })
            .unwrap_or_else(|| "bin".to_string());

        let name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| display_name_from(&request.original_filename));

        Ok(ValidatedUpload {
            bytes: request.bytes,
            extension,
            asset_type: derived,
            name,
            description: request.description.filter(|d| !d.trim().is_empty()),
            tags: crate::patch::normalize_labels(&request.tags),
            categories: crate::patch::normalize_labels(&request.categories),
            client_id,
        })
    }

    async fn resolve_client(&self, client: &ClientRef) -> AtelierResult<Uuid> {
        match client {
            ClientRef::Id(id) => {
                if !self.config.relaxed() && !self.clients.exists(*id).await? {
                    return Err(ValidationError::new(ValidationErrorKind::MissingClient(
                        id.to_string(),
                    ))
                    .into());
                }
                Ok(*id)
            }
            ClientRef::Slug(slug) => {
                self.clients.resolve_slug(slug).await?.ok_or_else(|| {
                    ValidationError::new(ValidationErrorKind::MissingClient(slug.clone())).into()
                })
            }
        }
    }
}

/// Derive a display name from the uploaded filename (stem, or the whole
/// name when there is no extension).
fn display_name_from(filename: &str) -> String {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
