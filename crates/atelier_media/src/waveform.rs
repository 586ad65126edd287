//! Waveform preview rendering for audio assets.

use crate::tools::{run_tool, ScratchFile};
use atelier_error::{ProcessingError, ProcessingErrorKind};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Waveform image width in pixels.
pub const WAVEFORM_WIDTH: u32 = 800;
/// Waveform image height in pixels.
pub const WAVEFORM_HEIGHT: u32 = 160;

const BACKGROUND: Rgb<u8> = Rgb([24, 26, 32]);
const TRACE: Rgb<u8> = Rgb([96, 196, 150]);

/// Interpret little-endian signed 16-bit mono PCM.
pub fn parse_pcm16le(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Render a waveform PNG from mono PCM samples.
///
/// Each column shows the peak amplitude of its sample bucket, mirrored
/// around the vertical midline.
pub fn render_waveform(
    samples: &[i16],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ProcessingError> {
    if samples.is_empty() {
        return Err(ProcessingError::new(ProcessingErrorKind::Decode(
            "no audio samples".to_string(),
        )));
    }

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let mid = height / 2;
    let bucket_size = (samples.len() / width as usize).max(1);

    for x in 0..width {
        let start = x as usize * bucket_size;
        if start >= samples.len() {
            break;
        }
        let end = (start + bucket_size).min(samples.len());
        let peak = samples[start..end]
            .iter()
            .map(|s| s.unsigned_abs() as u32)
            .max()
            .unwrap_or(0);

        let half = (peak * (mid.saturating_sub(2)) / i16::MAX as u32).max(1);
        let top = mid.saturating_sub(half);
        let bottom = (mid + half).min(height - 1);
        for y in top..=bottom {
            img.put_pixel(x, y, TRACE);
        }
    }

    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Encode(e.to_string())))?;
    Ok(buffer)
}

/// Extract mono PCM from an audio file via ffmpeg and render its waveform.
pub async fn waveform_from_file(scratch: &ScratchFile) -> Result<Vec<u8>, ProcessingError> {
    let path = scratch.path_str()?;
    let pcm = run_tool(
        "ffmpeg",
        &[
            "-v", "error", "-i", path, "-f", "s16le", "-ac", "1", "-ar", "8000", "pipe:1",
        ],
    )
    .await?;

    let samples = parse_pcm16le(&pcm);
    render_waveform(&samples, WAVEFORM_WIDTH, WAVEFORM_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_decodable_png_of_the_requested_size() {
        let samples: Vec<i16> = (0..16000)
            .map(|i| ((i as f32 * 0.05).sin() * 12000.0) as i16)
            .collect();
        let png = render_waveform(&samples, WAVEFORM_WIDTH, WAVEFORM_HEIGHT).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), WAVEFORM_WIDTH);
        assert_eq!(img.height(), WAVEFORM_HEIGHT);
    }

    #[test]
    fn silence_still_produces_a_trace() {
        let samples = vec![0i16; 8000];
        let png = render_waveform(&samples, 100, 40).unwrap();
        assert!(image::load_from_memory(&png).is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(render_waveform(&[], 100, 40).is_err());
    }

    #[test]
    fn pcm_parsing_is_little_endian() {
        let samples = parse_pcm16le(&[0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80]);
        assert_eq!(samples, vec![0, i16::MAX, i16::MIN]);
    }
}
