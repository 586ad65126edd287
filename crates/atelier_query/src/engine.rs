//! Predicate evaluation, deterministic sort, and pagination.
//!
//! These functions are pure and shared by every repository implementation,
//! so a Postgres-backed and an in-memory deployment paginate identically.

use crate::{AssetFilter, SortBy, SortDirection};
use atelier_core::Asset;
use serde::{Deserialize, Serialize};

/// One page of query results plus the full predicate match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    /// Assets on this page
    pub assets: Vec<Asset>,
    /// Total matches independent of pagination
    pub total: usize,
    /// Page size applied
    pub limit: usize,
    /// Page start applied
    pub offset: usize,
}

impl QueryPage {
    /// An empty page for the given pagination window.
    pub fn empty(limit: usize, offset: usize) -> Self {
        Self {
            assets: Vec::new(),
            total: 0,
            limit,
            offset,
        }
    }
}

/// Whether an asset satisfies every predicate in the filter.
pub fn matches(asset: &Asset, filter: &AssetFilter) -> bool {
    if let Some(required) = filter.asset_type
        && asset.asset_type != required
    {
        return false;
    }
    if !filter.tags.iter().all(|t| asset.tags.contains(t)) {
        return false;
    }
    if !filter.categories.iter().all(|c| asset.categories.contains(c)) {
        return false;
    }
    if filter.favourites_only && !asset.is_favourite {
        return false;
    }
    if let Some(start) = filter.start_date
        && asset.created_at < start
    {
        return false;
    }
    if let Some(end) = filter.end_date
        && asset.created_at > end
    {
        return false;
    }
    if let Some(term) = filter.search_term.as_deref()
        && !matches_search(asset, term)
    {
        return false;
    }
    true
}

/// Case-insensitive search over name and description.
///
/// A single term uses substring matching; a multi-word term is tokenized
/// and every token must match, which gives better precision on longer
/// queries.
fn matches_search(asset: &Asset, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let haystack = match asset.description.as_deref() {
        Some(description) => format!("{}\n{}", asset.name.to_lowercase(), description.to_lowercase()),
        None => asset.name.to_lowercase(),
    };

    let mut tokens = term.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(single), None) => haystack.contains(single),
        _ => term.split_whitespace().all(|token| haystack.contains(token)),
    }
}

/// Sort assets deterministically.
///
/// Ties on the sort key break by id so pagination never duplicates or
/// drops items across pages.
pub fn sort_assets(assets: &mut [Asset], sort_by: SortBy, direction: SortDirection) {
    assets.sort_by(|a, b| {
        let ordering = match sort_by {
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Size => a.size_bytes.unwrap_or(0).cmp(&b.size_bytes.unwrap_or(0)),
            SortBy::UsageCount => a.usage_count.cmp(&b.usage_count),
        };
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });
}

/// Evaluate a filter over a client's assets: predicate conjunction, total
/// count, deterministic sort, then pagination.
pub fn execute(assets: Vec<Asset>, filter: &AssetFilter) -> QueryPage {
    let mut matched: Vec<Asset> = assets
        .into_iter()
        .filter(|asset| matches(asset, filter))
        .collect();
    let total = matched.len();

    sort_assets(&mut matched, filter.sort_by, filter.sort_direction);

    let assets: Vec<Asset> = matched
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit)
        .collect();

    QueryPage {
        assets,
        total,
        limit: filter.limit,
        offset: filter.offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetFilterBuilder;
    use atelier_core::AssetType;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn asset(name: &str, asset_type: AssetType) -> Asset {
        Asset::new(
            name,
            asset_type,
            format!("c/{}/original.bin", name),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
    }

    fn fixture() -> Vec<Asset> {
        let mut hero = asset("Hero Banner", AssetType::Image);
        hero.tags.insert("summer".to_string());
        hero.tags.insert("hero".to_string());
        hero.description = Some("Primary summer campaign banner".to_string());

        let mut clip = asset("Launch Clip", AssetType::Video);
        clip.tags.insert("summer".to_string());
        clip.is_favourite = true;
        clip.size_bytes = Some(5_000_000);

        let mut voice = asset("Voiceover", AssetType::Audio);
        voice.categories.insert("radio".to_string());

        vec![hero, clip, voice]
    }

    #[test]
    fn type_predicate_restricts_matches() {
        let filter = AssetFilterBuilder::default()
            .asset_type(Some(AssetType::Image))
            .build()
            .unwrap();
        let page = execute(fixture(), &filter);
        assert_eq!(page.total, 1);
        assert_eq!(page.assets[0].name, "Hero Banner");
    }

    #[test]
    fn tag_containment_requires_every_requested_tag() {
        let filter = AssetFilterBuilder::default()
            .tags(vec!["summer".to_string(), "hero".to_string()])
            .build()
            .unwrap();
        let page = execute(fixture(), &filter);
        assert_eq!(page.total, 1);
        assert_eq!(page.assets[0].name, "Hero Banner");
    }

    #[test]
    fn favourites_only_matches_flagged_assets() {
        let filter = AssetFilterBuilder::default()
            .favourites_only(true)
            .build()
            .unwrap();
        let page = execute(fixture(), &filter);
        assert_eq!(page.total, 1);
        assert_eq!(page.assets[0].name, "Launch Clip");
    }

    #[test]
    fn single_term_search_is_substring_and_case_insensitive() {
        let filter = AssetFilterBuilder::default()
            .search_term(Some("BANNER".to_string()))
            .build()
            .unwrap();
        let page = execute(fixture(), &filter);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn multi_word_search_requires_every_token() {
        let all = AssetFilterBuilder::default()
            .search_term(Some("summer banner".to_string()))
            .build()
            .unwrap();
        assert_eq!(execute(fixture(), &all).total, 1);

        let none = AssetFilterBuilder::default()
            .search_term(Some("summer clip".to_string()))
            .build()
            .unwrap();
        // "Launch Clip" has no description containing "summer" in its text
        // fields combined with "clip", but tags are not searched.
        assert_eq!(execute(fixture(), &none).total, 0);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let assets = fixture();
        let created = assets[0].created_at;
        let filter = AssetFilterBuilder::default()
            .start_date(Some(created))
            .end_date(Some(created))
            .build()
            .unwrap();
        let page = execute(assets, &filter);
        assert!(page.total >= 1);

        let filter = AssetFilterBuilder::default()
            .end_date(Some(created - Duration::days(1)))
            .build()
            .unwrap();
        assert_eq!(execute(fixture(), &filter).total, 0);
    }

    #[test]
    fn default_sort_is_creation_time_descending() {
        let mut older = asset("older", AssetType::Image);
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = asset("newer", AssetType::Image);

        let page = execute(vec![older, newer], &AssetFilter::default());
        assert_eq!(page.assets[0].name, "newer");
        assert_eq!(page.assets[1].name, "older");
    }

    #[test]
    fn sort_ties_break_by_id_for_stable_pagination() {
        let shared = Utc::now();
        let mut assets: Vec<Asset> = (0..5)
            .map(|i| {
                let mut a = asset(&format!("a{}", i), AssetType::Image);
                a.created_at = shared;
                a
            })
            .collect();
        let mut expected: Vec<Uuid> = assets.iter().map(|a| a.id).collect();
        expected.sort();

        sort_assets(&mut assets, SortBy::CreatedAt, SortDirection::Desc);
        let actual: Vec<Uuid> = assets.iter().map(|a| a.id).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn pagination_totality_covers_every_item_exactly_once() {
        let assets: Vec<Asset> = (0..23)
            .map(|i| asset(&format!("a{:02}", i), AssetType::Image))
            .collect();
        let total_expected = assets.len();

        let mut seen = std::collections::BTreeSet::new();
        let mut offset: usize = 0;
        let limit: usize = 7;
        loop {
            let filter = AssetFilterBuilder::default()
                .limit(limit)
                .offset(offset)
                .build()
                .unwrap();
            let page = execute(assets.clone(), &filter);
            assert_eq!(page.total, total_expected);
            if page.assets.is_empty() {
                break;
            }
            for item in &page.assets {
                assert!(seen.insert(item.id), "item appeared on two pages");
            }
            offset += limit;
        }
        assert_eq!(seen.len(), total_expected);
    }
}
