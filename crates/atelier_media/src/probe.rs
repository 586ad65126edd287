//! Technical metadata probing via ffprobe.

use crate::tools::{run_tool, ScratchFile};
use atelier_error::{ProcessingError, ProcessingErrorKind};
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalized probe output: dimensions and duration for first-class asset
/// fields, everything else flattened into string metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    /// Pixel width of the primary video stream
    pub width: Option<i32>,
    /// Pixel height of the primary video stream
    pub height: Option<i32>,
    /// Container duration in seconds
    pub duration_seconds: Option<f32>,
    /// Flat technical metadata (codec, bitrate, frameRate, ...)
    pub metadata: BTreeMap<String, String>,
}

/// Probe a media file with ffprobe.
pub async fn probe_file(scratch: &ScratchFile) -> Result<ProbeReport, ProcessingError> {
    let path = scratch.path_str()?;
    let stdout = run_tool(
        "ffprobe",
        &[
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            path,
        ],
    )
    .await?;

    let value: Value = serde_json::from_slice(&stdout)
        .map_err(|e| ProcessingError::new(ProcessingErrorKind::Probe(e.to_string())))?;
    Ok(normalize(&value))
}

/// Probe only the container duration, in seconds.
pub async fn probe_duration(scratch: &ScratchFile) -> Result<f32, ProcessingError> {
    let report = probe_file(scratch).await?;
    report
        .duration_seconds
        .ok_or_else(|| ProcessingError::new(ProcessingErrorKind::Probe("no duration".to_string())))
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    match &value[key] {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Flatten ffprobe JSON into a [`ProbeReport`].
///
/// Keys are normalized to the pipeline's flat metadata vocabulary; the
/// reserved-key filter on the asset guards against collisions with
/// first-class fields.
pub fn normalize(value: &Value) -> ProbeReport {
    let mut report = ProbeReport::default();

    let format = &value["format"];
    if let Some(name) = str_field(format, "format_name") {
        report.metadata.insert("format".to_string(), name);
    }
    if let Some(bitrate) = str_field(format, "bit_rate") {
        report.metadata.insert("bitrate".to_string(), bitrate);
    }
    if let Some(duration) = str_field(format, "duration")
        && let Ok(seconds) = duration.parse::<f32>()
    {
        report.duration_seconds = Some(seconds);
    }

    let streams = value["streams"].as_array().cloned().unwrap_or_default();
    let video = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"));
    let audio = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("audio"));

    if let Some(stream) = video {
        if let Some(codec) = str_field(stream, "codec_name") {
            report.metadata.insert("codec".to_string(), codec);
        }
        if let Some(rate) = str_field(stream, "avg_frame_rate") {
            report.metadata.insert("frameRate".to_string(), rate);
        }
        if let Some(pix_fmt) = str_field(stream, "pix_fmt") {
            report.metadata.insert("colorSpace".to_string(), pix_fmt);
        }
        report.width = stream["width"].as_i64().map(|w| w as i32);
        report.height = stream["height"].as_i64().map(|h| h as i32);
    }

    if let Some(stream) = audio {
        if let Some(codec) = str_field(stream, "codec_name") {
            // Audio-only files report their codec as the primary codec.
            if video.is_none() {
                report.metadata.insert("codec".to_string(), codec.clone());
            }
            report.metadata.insert("audioCodec".to_string(), codec);
        }
        if let Some(channels) = str_field(stream, "channels") {
            report.metadata.insert("audioChannels".to_string(), channels);
        }
        if let Some(rate) = str_field(stream, "sample_rate") {
            report.metadata.insert("sampleRate".to_string(), rate);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_a_video_probe() {
        let probe = json!({
            "format": {
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "duration": "12.48",
                "bit_rate": "1205000"
            },
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1920,
                    "height": 1080,
                    "avg_frame_rate": "30000/1001",
                    "pix_fmt": "yuv420p"
                },
                {
                    "codec_type": "audio",
                    "codec_name": "aac",
                    "channels": 2,
                    "sample_rate": "48000"
                }
            ]
        });

        let report = normalize(&probe);
        assert_eq!(report.width, Some(1920));
        assert_eq!(report.height, Some(1080));
        assert_eq!(report.duration_seconds, Some(12.48));
        assert_eq!(report.metadata.get("codec").map(String::as_str), Some("h264"));
        assert_eq!(
            report.metadata.get("audioCodec").map(String::as_str),
            Some("aac")
        );
        assert_eq!(
            report.metadata.get("audioChannels").map(String::as_str),
            Some("2")
        );
        assert_eq!(
            report.metadata.get("sampleRate").map(String::as_str),
            Some("48000")
        );
        assert_eq!(
            report.metadata.get("frameRate").map(String::as_str),
            Some("30000/1001")
        );
    }

    #[test]
    fn audio_only_files_report_a_primary_codec() {
        let probe = json!({
            "format": { "format_name": "mp3", "duration": "180.2", "bit_rate": "320000" },
            "streams": [
                { "codec_type": "audio", "codec_name": "mp3", "channels": 2, "sample_rate": "44100" }
            ]
        });

        let report = normalize(&probe);
        assert_eq!(report.metadata.get("codec").map(String::as_str), Some("mp3"));
        assert_eq!(report.width, None);
        assert_eq!(report.duration_seconds, Some(180.2));
    }

    #[test]
    fn empty_probe_output_yields_an_empty_report() {
        let report = normalize(&json!({}));
        assert_eq!(report, ProbeReport::default());
    }
}
