//! Canonical byte-store path conventions.
//!
//! The pipeline owns path naming: every artifact of an asset lives under
//! `{client_id}/{asset_id}/`, so cleanup and cache scoping can operate on
//! the asset prefix.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Canonical store-relative paths for one asset's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetPaths {
    client_id: Uuid,
    asset_id: Uuid,
}

impl AssetPaths {
    /// Paths for the given asset under the given client.
    pub fn new(client_id: Uuid, asset_id: Uuid) -> Self {
        Self {
            client_id,
            asset_id,
        }
    }

    /// Directory prefix holding every artifact of this asset.
    pub fn prefix(&self) -> String {
        format!("{}/{}", self.client_id, self.asset_id)
    }

    /// Path of the original upload.
    pub fn original(&self, extension: &str) -> String {
        format!("{}/original.{}", self.prefix(), extension)
    }

    /// Path of the thumbnail derivative.
    pub fn thumbnail(&self, extension: &str) -> String {
        format!("{}/thumbnail.{}", self.prefix(), extension)
    }

    /// Path of the preview/waveform derivative.
    pub fn preview(&self, extension: &str) -> String {
        format!("{}/preview.{}", self.prefix(), extension)
    }
}

/// Compute the SHA-256 hex digest of uploaded content.
///
/// Recorded in asset metadata for provenance and dedup audits.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifacts_share_the_asset_prefix() {
        let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
        let prefix = paths.prefix();
        assert!(paths.original("png").starts_with(&prefix));
        assert!(paths.thumbnail("jpg").starts_with(&prefix));
        assert!(paths.preview("gif").starts_with(&prefix));
    }

    #[test]
    fn content_hash_is_stable_hex() {
        let a = content_hash(b"same bytes");
        let b = content_hash(b"same bytes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_hash(b"other bytes"));
    }
}
