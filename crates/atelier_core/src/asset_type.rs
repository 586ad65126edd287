//! Asset type enumeration.

use serde::{Deserialize, Serialize};

/// Type of a managed asset.
///
/// Closed enum, assigned once at ingestion and immutable thereafter.
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
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Image content (PNG, JPEG, WebP, etc.)
    #[display("image")]
    Image,
    /// Video content (MP4, WebM, MOV, etc.)
    #[display("video")]
    Video,
    /// Audio content (MP3, WAV, FLAC, etc.)
    #[display("audio")]
    Audio,
    /// Document content (PDF, DOCX, plain text, etc.)
    #[display("document")]
    Document,
    /// Anything that does not fit the other categories
    #[display("other")]
    Other,
}

impl AssetType {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Image => "image",
            AssetType::Video => "video",
            AssetType::Audio => "audio",
            AssetType::Document => "document",
            AssetType::Other => "other",
        }
    }

    /// Whether assets of this type carry a playback duration.
    pub fn has_duration(&self) -> bool {
        matches!(self, AssetType::Video | AssetType::Audio)
    }

    /// Whether assets of this type carry pixel dimensions.
    pub fn has_dimensions(&self) -> bool {
        matches!(self, AssetType::Image | AssetType::Video)
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(AssetType::Image),
            "video" => Ok(AssetType::Video),
            "audio" => Ok(AssetType::Audio),
            "document" => Ok(AssetType::Document),
            "other" => Ok(AssetType::Other),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trips_through_str() {
        for t in AssetType::iter() {
            assert_eq!(t.as_str().parse::<AssetType>().unwrap(), t);
        }
    }

    #[test]
    fn duration_only_for_playable_types() {
        assert!(AssetType::Video.has_duration());
        assert!(AssetType::Audio.has_duration());
        assert!(!AssetType::Image.has_duration());
        assert!(!AssetType::Document.has_duration());
        assert!(!AssetType::Other.has_duration());
    }
}
