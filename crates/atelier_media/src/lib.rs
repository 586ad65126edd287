//! Type classification and derivative generation for Atelier assets.
//!
//! One strategy per asset type: images are decoded, scaled, and re-encoded
//! in process; video and audio lean on ffmpeg/ffprobe subprocesses and
//! degrade to generated placeholders when the tools are unavailable;
//! documents get a placeholder thumbnail only. Every degradation is
//! recorded as a typed [`atelier_core::ProcessingWarning`] on the outcome
//! rather than only a log line.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod generator;
mod placeholder;
mod probe;
mod raster;
mod tools;
mod video;
mod waveform;

pub use classifier::{
    classify, extension_of, validate_declared, AUDIO_EXTENSIONS, DOCUMENT_EXTENSIONS,
    IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use generator::{DerivativeGenerator, DerivativeOutcome};
pub use placeholder::render as render_placeholder;
pub use probe::{normalize as normalize_probe, ProbeReport};
pub use raster::{fit_within, PREVIEW_MAX, THUMBNAIL_MAX};
pub use waveform::{parse_pcm16le, render_waveform, WAVEFORM_HEIGHT, WAVEFORM_WIDTH};
