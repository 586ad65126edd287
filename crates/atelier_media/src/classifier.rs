//! Asset type classification from filename and MIME type.

use atelier_core::AssetType;
use atelier_error::{ValidationError, ValidationErrorKind};

/// Extensions accepted as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "tiff"];
/// Extensions accepted as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm", "mkv", "m4v"];
/// Extensions accepted as audio.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "aac", "m4a"];
/// Extensions accepted as documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf", "md"];

/// Lowercased extension of a filename, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

fn classify_extension(ext: &str) -> AssetType {
    if IMAGE_EXTENSIONS.contains(&ext) {
        AssetType::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        AssetType::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        AssetType::Audio
    } else if DOCUMENT_EXTENSIONS.contains(&ext) {
        AssetType::Document
    } else {
        AssetType::Other
    }
}

fn classify_mime(mime: &str) -> Option<AssetType> {
    let mime = mime.to_lowercase();
    if mime.starts_with("image/") {
        Some(AssetType::Image)
    } else if mime.starts_with("video/") {
        Some(AssetType::Video)
    } else if mime.starts_with("audio/") {
        Some(AssetType::Audio)
    } else if mime == "application/pdf" || mime.starts_with("text/") {
        Some(AssetType::Document)
    } else {
        None
    }
}

/// Derive the asset type from filename extension, consulting the MIME type
/// only when the filename carries no extension.
///
/// Unknown extensions map to [`AssetType::Other`]; an extensionless file
/// with an unrecognizable MIME type is rejected.
pub fn classify(filename: &str, mime: &str) -> Result<AssetType, ValidationError> {
    match extension_of(filename) {
        Some(ext) => Ok(classify_extension(&ext)),
        None => classify_mime(mime).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownExtension(filename.to_string()))
        }),
    }
}

/// Reject a caller-declared type that disagrees with the derived type.
///
/// Mismatches are rejected rather than silently corrected.
pub fn validate_declared(
    declared: AssetType,
    derived: AssetType,
) -> Result<(), ValidationError> {
    if declared != derived {
        return Err(ValidationError::new(ValidationErrorKind::TypeMismatch {
            declared: declared.as_str().to_string(),
            derived: derived.as_str().to_string(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_extension_maps_to_its_type() {
        for ext in IMAGE_EXTENSIONS {
            assert_eq!(classify(&format!("f.{ext}"), "").unwrap(), AssetType::Image);
        }
        for ext in VIDEO_EXTENSIONS {
            assert_eq!(classify(&format!("f.{ext}"), "").unwrap(), AssetType::Video);
        }
        for ext in AUDIO_EXTENSIONS {
            assert_eq!(classify(&format!("f.{ext}"), "").unwrap(), AssetType::Audio);
        }
        for ext in DOCUMENT_EXTENSIONS {
            assert_eq!(
                classify(&format!("f.{ext}"), "").unwrap(),
                AssetType::Document
            );
        }
    }

    #[test]
    fn unknown_extensions_map_to_other() {
        assert_eq!(classify("data.bin", "").unwrap(), AssetType::Other);
        assert_eq!(classify("scene.blend", "").unwrap(), AssetType::Other);
    }

    #[test]
    fn mime_prefix_rescues_extensionless_uploads() {
        assert_eq!(classify("upload", "image/png").unwrap(), AssetType::Image);
        assert_eq!(classify("upload", "video/mp4").unwrap(), AssetType::Video);
        assert!(classify("upload", "application/octet-stream").is_err());
    }

    #[test]
    fn extension_beats_mime_when_both_present() {
        assert_eq!(classify("clip.mp4", "image/png").unwrap(), AssetType::Video);
    }

    #[test]
    fn declared_type_mismatch_is_rejected() {
        let derived = classify("video.mp4", "").unwrap();
        assert!(validate_declared(AssetType::Image, derived).is_err());

        let derived = classify("photo.jpg", "").unwrap();
        assert!(validate_declared(AssetType::Image, derived).is_ok());
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(classify("PHOTO.JPG", "").unwrap(), AssetType::Image);
    }

    #[test]
    fn hidden_files_have_no_extension() {
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
    }
}
