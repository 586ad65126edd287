//! Tests for per-type derivative generation.

use atelier_core::{AssetType, DerivativeStage};
use atelier_media::DerivativeGenerator;
use atelier_storage::{AssetPaths, ByteStore, FileSystemStore};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tempfile::TempDir;
use uuid::Uuid;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([10, 90, 200])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn fixture() -> (TempDir, FileSystemStore, AssetPaths) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();
    let paths = AssetPaths::new(Uuid::new_v4(), Uuid::new_v4());
    (temp_dir, store, paths)
}

#[tokio::test]
async fn image_ingestion_produces_bounded_derivatives() {
    let (_guard, store, paths) = fixture();
    let generator = DerivativeGenerator::new();

    let outcome = generator
        .generate(AssetType::Image, &png_bytes(1920, 1080), "png", &paths, &store)
        .await;

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.width, Some(1920));
    assert_eq!(outcome.height, Some(1080));
    assert_eq!(outcome.metadata.get("format").map(String::as_str), Some("png"));

    let thumb_bytes = store.read(outcome.thumbnail_url.as_deref().unwrap()).await.unwrap();
    let thumb = image::load_from_memory(&thumb_bytes).unwrap();
    assert!(thumb.width() <= 320 && thumb.height() <= 240);

    let preview_bytes = store.read(outcome.preview_url.as_deref().unwrap()).await.unwrap();
    let preview = image::load_from_memory(&preview_bytes).unwrap();
    assert!(preview.width() <= 1024 && preview.height() <= 768);
}

#[tokio::test]
async fn tiny_image_is_not_upscaled() {
    let (_guard, store, paths) = fixture();
    let generator = DerivativeGenerator::new();

    let outcome = generator
        .generate(AssetType::Image, &png_bytes(100, 50), "png", &paths, &store)
        .await;

    let thumb_bytes = store.read(outcome.thumbnail_url.as_deref().unwrap()).await.unwrap();
    let thumb = image::load_from_memory(&thumb_bytes).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (100, 50));
}

#[tokio::test]
async fn undecodable_image_degrades_to_placeholder_with_warnings() {
    let (_guard, store, paths) = fixture();
    let generator = DerivativeGenerator::new();

    let outcome = generator
        .generate(AssetType::Image, b"not an image at all", "png", &paths, &store)
        .await;

    // Thumbnail falls back to the generated placeholder; the failure is
    // recorded, not swallowed.
    assert!(outcome.thumbnail_url.is_some());
    assert!(outcome.preview_url.is_none());
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.stage == DerivativeStage::Thumbnail));
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.stage == DerivativeStage::Metadata));

    let placeholder = store.read(outcome.thumbnail_url.as_deref().unwrap()).await.unwrap();
    assert!(image::load_from_memory(&placeholder).is_ok());
}

#[tokio::test]
async fn garbage_video_persists_with_placeholder_and_warnings() {
    let (_guard, store, paths) = fixture();
    let generator = DerivativeGenerator::new();

    // Whether or not ffmpeg is installed, garbage bytes cannot produce a
    // real frame; the asset must still come out with a thumbnail.
    let outcome = generator
        .generate(AssetType::Video, b"\x00\x01garbage\x02", "mp4", &paths, &store)
        .await;

    assert!(outcome.thumbnail_url.is_some());
    assert!(!outcome.warnings.is_empty());
}

#[tokio::test]
async fn document_gets_a_placeholder_thumbnail_only() {
    let (_guard, store, paths) = fixture();
    let generator = DerivativeGenerator::new();

    let outcome = generator
        .generate(AssetType::Document, b"%PDF-1.4 ...", "pdf", &paths, &store)
        .await;

    assert!(outcome.thumbnail_url.is_some());
    assert!(outcome.preview_url.is_none());
    assert!(outcome.width.is_none());
    assert!(outcome.duration_seconds.is_none());
    assert!(outcome.warnings.is_empty());
}
