//! Video derivative extraction via ffmpeg.

use crate::tools::{run_tool, ScratchFile};
use atelier_error::ProcessingError;

/// Length of the looping animated preview, in seconds.
pub const PREVIEW_SECONDS: f32 = 3.0;
/// Fraction of playback at which the representative frame is taken.
pub const THUMBNAIL_POSITION: f32 = 0.1;

/// Extract a single representative frame as JPEG bytes.
pub async fn extract_frame(
    scratch: &ScratchFile,
    at_seconds: f32,
) -> Result<Vec<u8>, ProcessingError> {
    let path = scratch.path_str()?;
    let at = format!("{:.3}", at_seconds.max(0.0));
    run_tool(
        "ffmpeg",
        &[
            "-v", "error", "-ss", &at, "-i", path, "-frames:v", "1", "-f", "image2", "-c:v",
            "mjpeg", "pipe:1",
        ],
    )
    .await
}

/// Render a short looping low-resolution GIF preview.
pub async fn render_gif_preview(
    scratch: &ScratchFile,
    start_seconds: f32,
) -> Result<Vec<u8>, ProcessingError> {
    let path = scratch.path_str()?;
    let start = format!("{:.3}", start_seconds.max(0.0));
    let length = format!("{:.1}", PREVIEW_SECONDS);
    run_tool(
        "ffmpeg",
        &[
            "-v",
            "error",
            "-ss",
            &start,
            "-t",
            &length,
            "-i",
            path,
            "-vf",
            "fps=10,scale=320:-2:flags=lanczos",
            "-loop",
            "0",
            "-f",
            "gif",
            "pipe:1",
        ],
    )
    .await
}
