//! Permission error types.

/// Permission error with source location tracking.
///
/// Raised before any mutation is attempted when the caller is not the asset
/// owner (outside relaxed mode).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Permission Error: {} at line {} in {}", message, line, file)]
pub struct PermissionError {
    /// Why the caller was rejected
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl PermissionError {
    /// Create a new PermissionError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
