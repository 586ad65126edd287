//! Derivative processing error types.

/// Kinds of derivative generation failures.
///
/// Processing errors are absorbed at the generator boundary and recorded as
/// warnings on the asset; they never fail an ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProcessingErrorKind {
    /// Could not decode the source media
    #[display("Failed to decode media: {}", _0)]
    Decode(String),
    /// Could not encode a derivative artifact
    #[display("Failed to encode derivative: {}", _0)]
    Encode(String),
    /// External tool (ffmpeg/ffprobe) missing or failed
    #[display("External tool '{}' failed: {}", tool, reason)]
    Tool {
        /// Name of the binary invoked
        tool: String,
        /// Failure detail
        reason: String,
    },
    /// Metadata probe produced unusable output
    #[display("Metadata probe failed: {}", _0)]
    Probe(String),
    /// Scratch file for subprocess input could not be written
    #[display("Scratch file error: {}", _0)]
    Scratch(String),
}

/// Processing error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Processing Error: {} at line {} in {}", kind, line, file)]
pub struct ProcessingError {
    /// The kind of error that occurred
    pub kind: ProcessingErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProcessingError {
    /// Create a new processing error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProcessingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
