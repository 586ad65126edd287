//! Generated placeholder thumbnails.
//!
//! Document and `other` assets, and any asset whose derivative generation
//! degraded, get a synthesized PNG so `thumbnail_url` is always populated.

use atelier_core::AssetType;
use atelier_error::{ProcessingError, ProcessingErrorKind};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

const PLACEHOLDER_WIDTH: u32 = 320;
const PLACEHOLDER_HEIGHT: u32 = 240;

fn tint_for(asset_type: AssetType) -> Rgb<u8> {
    match asset_type {
        AssetType::Image => Rgb([86, 120, 176]),
        AssetType::Video => Rgb([150, 86, 176]),
        AssetType::Audio => Rgb([86, 176, 130]),
        AssetType::Document => Rgb([176, 150, 86]),
        AssetType::Other => Rgb([120, 120, 128]),
    }
}

/// Render the placeholder thumbnail PNG for an asset type.
pub fn render(asset_type: AssetType) -> Result<Vec<u8>, ProcessingError> {
    let tint = tint_for(asset_type);
    let mut img = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, tint);

    // Darker band across the lower third, a minimal visual cue that this is
    // a generated stand-in rather than real content.
    let band = Rgb([
        tint.0[0].saturating_sub(40),
        tint.0[1].saturating_sub(40),
        tint.0[2].saturating_sub(40),
    ]);
    for y in (PLACEHOLDER_HEIGHT * 2 / 3)..PLACEHOLDER_HEIGHT {
        for x in 0..PLACEHOLDER_WIDTH {
            img.put_pixel(x, y, band);
        }
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Encode(e.to_string())))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_decodable_png_within_thumbnail_bounds() {
        let bytes = render(AssetType::Document).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert!(img.width() <= 320);
        assert!(img.height() <= 240);
    }

    #[test]
    fn each_type_gets_a_distinct_tint() {
        let doc = render(AssetType::Document).unwrap();
        let audio = render(AssetType::Audio).unwrap();
        assert_ne!(doc, audio);
    }
}
