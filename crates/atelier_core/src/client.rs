//! Client and owner lookup records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant/organisation that assets belong to.
///
/// Read-only lookup data from the pipeline's point of view; addressable by
/// id or by human-readable slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Canonical identifier
    pub id: Uuid,
    /// Unique slug, matched case-insensitively
    pub slug: String,
    /// Display name
    pub name: String,
}

impl Client {
    /// Create a client record, normalizing the slug to lowercase.
    pub fn new(id: Uuid, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into().to_lowercase(),
            name: name.into(),
        }
    }
}

/// A user able to own assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Canonical identifier
    pub id: Uuid,
    /// Display name
    pub display_name: String,
}

/// Role of the current caller, as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May mutate any asset
    #[display("admin")]
    Admin,
    /// May mutate only owned assets
    #[display("member")]
    Member,
}

/// Resolved identity of the current caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user id
    pub user_id: Uuid,
    /// Caller role
    pub role: Role,
}

impl Identity {
    /// Whether this caller may mutate an asset owned by `owner_id`.
    pub fn may_mutate(&self, owner_id: Uuid) -> bool {
        self.role == Role::Admin || self.user_id == owner_id
    }
}
