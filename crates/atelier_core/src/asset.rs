//! The central asset record.

use crate::AssetType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// First-class field names that the open metadata map may never shadow.
pub const RESERVED_METADATA_KEYS: &[&str] = &[
    "id",
    "name",
    "description",
    "type",
    "url",
    "thumbnailUrl",
    "previewUrl",
    "sizeBytes",
    "width",
    "height",
    "durationSeconds",
    "tags",
    "categories",
    "isFavourite",
    "usageCount",
    "ownerId",
    "clientId",
    "createdAt",
    "updatedAt",
];

/// Stage of derivative generation a warning originated from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeStage {
    /// Thumbnail rendering
    #[display("thumbnail")]
    Thumbnail,
    /// Preview or waveform rendering
    #[display("preview")]
    Preview,
    /// Technical metadata probe
    #[display("metadata")]
    Metadata,
}

/// A recorded, queryable degradation during derivative generation.
///
/// Replaces the catch-and-default-thumbnail pattern: clients and tests can
/// assert on degraded state instead of grepping logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingWarning {
    /// Which sub-task degraded
    pub stage: DerivativeStage,
    /// Human-readable failure detail
    pub message: String,
}

impl ProcessingWarning {
    /// Create a warning for the given stage.
    pub fn new(stage: DerivativeStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// A managed media or document record with a byte-store location and
/// derived artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Opaque unique identifier, generated at ingestion, immutable
    pub id: Uuid,
    /// Display name, mutable
    pub name: String,
    /// Optional long-form description, mutable
    #[serde(default)]
    pub description: Option<String>,
    /// Closed type classification, set once at ingestion
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Byte-store location of the original; never empty once persisted
    pub url: String,
    /// Byte-store location of the thumbnail derivative
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Byte-store location of the preview/waveform derivative
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Original size in bytes
    #[serde(default)]
    pub size_bytes: Option<i64>,
    /// Pixel width (image/video only)
    #[serde(default)]
    pub width: Option<i32>,
    /// Pixel height (image/video only)
    #[serde(default)]
    pub height: Option<i32>,
    /// Playback duration in seconds (video/audio only)
    #[serde(default)]
    pub duration_seconds: Option<f32>,
    /// Unordered, deduplicated tag set
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Unordered, deduplicated category set
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Favourite flag, mutable independently of other fields
    #[serde(default)]
    pub is_favourite: bool,
    /// Monotonically non-decreasing usage counter
    #[serde(default)]
    pub usage_count: i64,
    /// Owning user
    pub owner_id: Uuid,
    /// Owning client, stored canonically as an id
    pub client_id: Uuid,
    /// Open extension map for technical detail and provider extras
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Degradations recorded during derivative generation
    #[serde(default)]
    pub processing_warnings: Vec<ProcessingWarning>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Changes on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Create a fresh asset record at the start of ingestion.
    ///
    /// Derivative fields start unset and are merged in once generation
    /// settles.
    pub fn new(
        name: impl Into<String>,
        asset_type: AssetType,
        url: impl Into<String>,
        owner_id: Uuid,
        client_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            asset_type,
            url: url.into(),
            thumbnail_url: None,
            preview_url: None,
            size_bytes: None,
            width: None,
            height: None,
            duration_seconds: None,
            tags: BTreeSet::new(),
            categories: BTreeSet::new(),
            is_favourite: false,
            usage_count: 0,
            owner_id,
            client_id,
            metadata: BTreeMap::new(),
            processing_warnings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a mutation by advancing `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Merge an open metadata map, dropping reserved first-class keys.
    ///
    /// Existing entries are overwritten by the incoming map; reserved keys
    /// are filtered so normalized probe output can never shadow struct
    /// fields.
    pub fn merge_metadata(&mut self, incoming: BTreeMap<String, String>) {
        for (key, value) in incoming {
            if RESERVED_METADATA_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "Dropping reserved metadata key");
                continue;
            }
            self.metadata.insert(key, value);
        }
    }
}
