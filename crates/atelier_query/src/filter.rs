//! Filter model for asset queries.

use atelier_core::AssetType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the caller addressed the client scope of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientRef {
    /// Canonical client id
    Id(Uuid),
    /// Human-readable slug, resolved case-insensitively
    Slug(String),
}

/// Sort key for asset listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Creation time (the default)
    #[default]
    #[display("createdAt")]
    CreatedAt,
    /// Last mutation time
    #[display("updatedAt")]
    UpdatedAt,
    /// Display name, case-insensitive
    #[display("name")]
    Name,
    /// Original size in bytes
    #[display("size")]
    Size,
    /// Usage counter
    #[display("usageCount")]
    UsageCount,
}

impl SortBy {
    /// Parse a caller-supplied sort key.
    ///
    /// Unrecognized values fall back to the default rather than erroring.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "createdAt" => SortBy::CreatedAt,
            "updatedAt" => SortBy::UpdatedAt,
            "name" => SortBy::Name,
            "size" => SortBy::Size,
            "usageCount" => SortBy::UsageCount,
            _ => SortBy::default(),
        }
    }
}

/// Sort direction for asset listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    #[display("asc")]
    Asc,
    /// Descending (the default; newest first under the default key)
    #[default]
    #[display("desc")]
    Desc,
}

impl SortDirection {
    /// Parse a caller-supplied direction, falling back to descending.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "asc" => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

fn default_limit() -> usize {
    20
}

/// Composable filter over one client's assets.
///
/// All predicate fields combine as a conjunction; empty collections and
/// `None` fields do not constrain the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into), default)]
pub struct AssetFilter {
    /// Restrict to one asset type
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    /// Required tags (set containment)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Required categories (set containment)
    #[serde(default)]
    pub categories: Vec<String>,
    /// Case-insensitive search over name and description
    #[serde(default)]
    pub search_term: Option<String>,
    /// Restrict to favourites
    #[serde(default)]
    pub favourites_only: bool,
    /// Inclusive lower bound on creation time
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Sort key
    #[serde(default)]
    pub sort_by: SortBy,
    /// Sort direction
    #[serde(default)]
    pub sort_direction: SortDirection,
    /// Page size
    #[serde(default = "default_limit")]
    #[builder(default = "default_limit()")]
    pub limit: usize,
    /// Page start
    #[serde(default)]
    pub offset: usize,
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self {
            asset_type: None,
            tags: Vec::new(),
            categories: Vec::new(),
            search_term: None,
            favourites_only: false,
            start_date: None,
            end_date: None,
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl AssetFilter {
    /// Canonical serialization of every filter field, used as the list
    /// cache key suffix.
    ///
    /// Sets are sorted and deduplicated so logically equal filters share a
    /// signature regardless of argument order.
    pub fn signature(&self) -> String {
        let mut tags: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        tags.sort();
        tags.dedup();
        let mut categories: Vec<String> =
            self.categories.iter().map(|c| c.to_lowercase()).collect();
        categories.sort();
        categories.dedup();

        format!(
            "type={}&tags={}&categories={}&search={}&fav={}&from={}&to={}&sort={}:{}&limit={}&offset={}",
            self.asset_type.map(|t| t.as_str()).unwrap_or(""),
            tags.join(","),
            categories.join(","),
            self.search_term
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default(),
            self.favourites_only,
            self.start_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            self.end_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            self.sort_by,
            self.sort_direction,
            self.limit,
            self.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_sort_key_falls_back_to_default() {
        assert_eq!(SortBy::parse_or_default("fileSize"), SortBy::CreatedAt);
        assert_eq!(SortBy::parse_or_default("usageCount"), SortBy::UsageCount);
    }

    #[test]
    fn equal_filters_share_a_signature_regardless_of_set_order() {
        let a = AssetFilterBuilder::default()
            .tags(vec!["b".to_string(), "a".to_string()])
            .build()
            .unwrap();
        let b = AssetFilterBuilder::default()
            .tags(vec!["a".to_string(), "B".to_string()])
            .build()
            .unwrap();
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn any_field_change_changes_the_signature() {
        let base = AssetFilter::default();
        let mut favourites = base.clone();
        favourites.favourites_only = true;
        let mut paged = base.clone();
        paged.offset = 20;

        assert_ne!(base.signature(), favourites.signature());
        assert_ne!(base.signature(), paged.signature());
        assert_ne!(favourites.signature(), paged.signature());
    }
}
