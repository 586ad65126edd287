//! Raster derivative rendering for image assets.

use atelier_error::{ProcessingError, ProcessingErrorKind};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Maximum thumbnail dimensions (width, height).
pub const THUMBNAIL_MAX: (u32, u32) = (320, 240);
/// Maximum preview dimensions (width, height).
pub const PREVIEW_MAX: (u32, u32) = (1024, 768);

/// Target dimensions that fit `(width, height)` within `(max_w, max_h)`,
/// preserving aspect ratio and never upscaling.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = f64::min(max_w as f64 / width as f64, max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w.min(max_w), h.min(max_h))
}

/// Decode raster bytes.
pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    image::load_from_memory(data)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Decode(e.to_string())))
}

/// Pixel dimensions and container format of raster bytes.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32, String), ProcessingError> {
    let format = image::guess_format(data)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Decode(e.to_string())))?;
    let img = decode(data)?;
    let name = format!("{:?}", format).to_lowercase();
    Ok((img.width(), img.height(), name))
}

/// Scale an image to fit within the given bounds and encode it as JPEG.
///
/// Alpha is flattened since JPEG carries no alpha channel.
pub fn scale_to_jpeg(
    img: &DynamicImage,
    max_w: u32,
    max_h: u32,
) -> Result<Vec<u8>, ProcessingError> {
    let (target_w, target_h) = fit_within(img.width(), img.height(), max_w, max_h);
    let scaled = if (target_w, target_h) == (img.width(), img.height()) {
        img.clone()
    } else {
        img.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());
    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Encode(e.to_string())))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn thumbnail_of_full_hd_fits_bounds_and_keeps_aspect() {
        let img = decode(&png_bytes(1920, 1080)).unwrap();
        let jpeg = scale_to_jpeg(&img, THUMBNAIL_MAX.0, THUMBNAIL_MAX.1).unwrap();
        let thumb = decode(&jpeg).unwrap();

        assert!(thumb.width() <= 320);
        assert!(thumb.height() <= 240);
        let original_ratio = 1920.0 / 1080.0;
        let thumb_ratio = thumb.width() as f64 / thumb.height() as f64;
        assert!((original_ratio - thumb_ratio).abs() < 0.02);
    }

    #[test]
    fn small_images_are_never_upscaled() {
        let img = decode(&png_bytes(100, 50)).unwrap();
        let jpeg = scale_to_jpeg(&img, THUMBNAIL_MAX.0, THUMBNAIL_MAX.1).unwrap();
        let thumb = decode(&jpeg).unwrap();

        assert_eq!(thumb.width(), 100);
        assert_eq!(thumb.height(), 50);
    }

    #[test]
    fn fit_within_handles_extreme_aspect_ratios() {
        let (w, h) = fit_within(4000, 10, 320, 240);
        assert!(w <= 320 && h >= 1);
        let (w, h) = fit_within(10, 4000, 320, 240);
        assert!(h <= 240 && w >= 1);
    }

    #[test]
    fn probe_reports_dimensions_and_format() {
        let (w, h, format) = probe_dimensions(&png_bytes(64, 32)).unwrap();
        assert_eq!((w, h), (64, 32));
        assert_eq!(format, "png");
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode(b"definitely not an image").is_err());
    }
}
