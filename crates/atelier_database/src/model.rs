//! Row types and conversions between database rows and domain records.

use crate::schema::{assets, clients, owners};
use atelier_core::{Asset, Client, Owner};
use atelier_error::{DatabaseError, DatabaseErrorKind};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Database row for an asset.
///
/// Set- and map-valued fields are stored as `jsonb`; the typed domain
/// record is the source of truth for their shapes.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
// Updates replace the whole record; a None clears its column.
#[diesel(treat_none_as_null = true)]
pub struct AssetRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub asset_type: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    pub size_bytes: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<f32>,
    pub tags: JsonValue,
    pub categories: JsonValue,
    pub is_favourite: bool,
    pub usage_count: i64,
    pub owner_id: Uuid,
    pub client_id: Uuid,
    pub metadata: JsonValue,
    pub processing_warnings: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Asset> for AssetRow {
    type Error = DatabaseError;

    fn try_from(asset: &Asset) -> Result<Self, Self::Error> {
        Ok(Self {
            id: asset.id,
            name: asset.name.clone(),
            description: asset.description.clone(),
            asset_type: asset.asset_type.as_str().to_string(),
            url: asset.url.clone(),
            thumbnail_url: asset.thumbnail_url.clone(),
            preview_url: asset.preview_url.clone(),
            size_bytes: asset.size_bytes,
            width: asset.width,
            height: asset.height,
            duration_seconds: asset.duration_seconds,
            tags: serde_json::to_value(&asset.tags)?,
            categories: serde_json::to_value(&asset.categories)?,
            is_favourite: asset.is_favourite,
            usage_count: asset.usage_count,
            owner_id: asset.owner_id,
            client_id: asset.client_id,
            metadata: serde_json::to_value(&asset.metadata)?,
            processing_warnings: serde_json::to_value(&asset.processing_warnings)?,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        })
    }
}

impl TryFrom<AssetRow> for Asset {
    type Error = DatabaseError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let asset_type = row
            .asset_type
            .parse()
            .map_err(|e: String| DatabaseError::new(DatabaseErrorKind::Serialization(e)))?;
        let tags: BTreeSet<String> = serde_json::from_value(row.tags)?;
        let categories: BTreeSet<String> = serde_json::from_value(row.categories)?;
        let metadata: BTreeMap<String, String> = serde_json::from_value(row.metadata)?;
        let processing_warnings = serde_json::from_value(row.processing_warnings)?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            asset_type,
            url: row.url,
            thumbnail_url: row.thumbnail_url,
            preview_url: row.preview_url,
            size_bytes: row.size_bytes,
            width: row.width,
            height: row.height,
            duration_seconds: row.duration_seconds,
            tags,
            categories,
            is_favourite: row.is_favourite,
            usage_count: row.usage_count,
            owner_id: row.owner_id,
            client_id: row.client_id,
            metadata,
            processing_warnings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Database row for a client.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client::new(row.id, row.slug, row.name)
    }
}

/// Database row for an owner.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = owners)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OwnerRow {
    pub id: Uuid,
    pub display_name: String,
}

impl From<OwnerRow> for Owner {
    fn from(row: OwnerRow) -> Self {
        Owner {
            id: row.id,
            display_name: row.display_name,
        }
    }
}
