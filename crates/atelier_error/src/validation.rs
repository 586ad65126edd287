//! Validation error types.

/// Kinds of input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// No file content was supplied
    #[display("No file provided")]
    MissingFile,
    /// Upload exceeds the configured size ceiling
    #[display("File of {} bytes exceeds the {} byte limit", _0, _1)]
    FileTooLarge(u64, u64),
    /// Filename carries no usable extension
    #[display("Cannot determine file type for '{}'", _0)]
    UnknownExtension(String),
    /// Caller-declared type disagrees with the extension-derived type
    #[display("Type mismatch: declared '{}' but file is '{}'", declared, derived)]
    TypeMismatch {
        /// Type the caller claimed
        declared: String,
        /// Type derived from the filename
        derived: String,
    },
    /// Client reference absent or unresolvable
    #[display("Missing or unresolvable client: {}", _0)]
    MissingClient(String),
    /// A required field was empty or malformed
    #[display("Invalid field '{}': {}", field, reason)]
    InvalidField {
        /// Name of the offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use atelier_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingFile);
/// assert!(format!("{}", err).contains("No file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a malformed-field rejection.
    #[track_caller]
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InvalidField {
            field: field.into(),
            reason: reason.into(),
        })
    }
}
