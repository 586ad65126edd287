//! Remote media ingestion.
//!
//! Externally generated media (video/image providers) arrives as a URL;
//! the download joins the normal gate path, so the same ceilings and
//! classification rules apply before any byte-store write.

use crate::gate::UploadRequest;
use atelier_core::AssetType;
use atelier_error::{AtelierResult, HttpError, ValidationError, ValidationErrorKind};
use atelier_query::ClientRef;

/// Request to ingest externally generated media by URL.
#[derive(Debug, Clone)]
pub struct RemoteFetchRequest {
    /// Source URL
    pub url: String,
    /// Target client
    pub client: ClientRef,
    /// Display name override
    pub name: Option<String>,
    /// Asset type the caller claims
    pub declared_type: Option<AssetType>,
    /// Description
    pub description: Option<String>,
    /// Initial tags
    pub tags: Vec<String>,
    /// Initial categories
    pub categories: Vec<String>,
}

/// Downloads remote media into an [`UploadRequest`].
pub struct RemoteFetcher {
    http: reqwest::Client,
    max_bytes: u64,
}

impl RemoteFetcher {
    /// Create a fetcher enforcing the given size ceiling.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            max_bytes,
        }
    }

    /// Download the media and shape it as an upload request.
    ///
    /// # Errors
    ///
    /// `HttpError` when the download fails; `ValidationError` when the
    /// payload exceeds the ceiling. Neither has side effects.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn fetch(&self, request: RemoteFetchRequest) -> AtelierResult<UploadRequest> {
        let response = self
            .http
            .get(&request.url)
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HttpError::new(format!(
                "{} fetching {}",
                response.status(),
                request.url
            ))
            .into());
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(ValidationError::new(ValidationErrorKind::FileTooLarge(
                length,
                self.max_bytes,
            ))
            .into());
        }

        let declared_mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(ValidationError::new(ValidationErrorKind::FileTooLarge(
                bytes.len() as u64,
                self.max_bytes,
            ))
            .into());
        }

        let original_filename = filename_from_url(&request.url);
        tracing::info!(
            url = %request.url,
            size = bytes.len(),
            mime = %declared_mime,
            "Fetched remote media"
        );

        Ok(UploadRequest {
            bytes: bytes.to_vec(),
            declared_mime,
            original_filename,
            declared_type: request.declared_type,
            name: request.name,
            description: request.description,
            tags: request.tags,
            categories: request.categories,
            client: request.client,
        })
    }
}

/// Last path segment of a URL, stripped of query and fragment.
fn filename_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let after_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);
    match after_scheme.split_once('/') {
        Some((_, path)) => path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("download")
            .to_string(),
        None => "download".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_comes_from_the_last_path_segment() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/renders/clip.mp4?token=abc"),
            "clip.mp4"
        );
        assert_eq!(filename_from_url("https://example.com/"), "download");
        assert_eq!(filename_from_url("https://example.com"), "download");
    }
}
