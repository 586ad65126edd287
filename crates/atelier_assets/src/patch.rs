//! Mutation payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Partial update of an asset's mutable descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    /// Replace the display name
    #[serde(default)]
    pub name: Option<String>,
    /// Replace the description
    #[serde(default)]
    pub description: Option<String>,
    /// Replace the tag set
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Replace the category set
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl AssetUpdate {
    /// Whether this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.categories.is_none()
    }
}

/// Set-level changes applied to every member of a batch update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChanges {
    /// Tags added to each asset
    #[serde(default)]
    pub add_tags: Vec<String>,
    /// Tags removed from each asset
    #[serde(default)]
    pub remove_tags: Vec<String>,
    /// Categories added to each asset
    #[serde(default)]
    pub add_categories: Vec<String>,
    /// Categories removed from each asset
    #[serde(default)]
    pub remove_categories: Vec<String>,
}

/// Normalize caller-supplied labels: trim and drop empties, deduplicating
/// by construction.
pub(crate) fn normalize_labels(labels: &[String]) -> BTreeSet<String> {
    labels
        .iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_trimmed_and_deduplicated() {
        let labels = vec![
            " summer ".to_string(),
            "summer".to_string(),
            "".to_string(),
            "  ".to_string(),
            "hero".to_string(),
        ];
        let set = normalize_labels(&labels);
        assert_eq!(set.len(), 2);
        assert!(set.contains("summer"));
        assert!(set.contains("hero"));
    }
}
