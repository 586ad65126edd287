//! Persistence error types.

/// Kinds of record store failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersistenceErrorKind {
    /// Insert failed after the file was already placed in the byte store
    #[display("Failed to write record: {}", _0)]
    Write(String),
    /// Record read failed
    #[display("Failed to read record: {}", _0)]
    Read(String),
    /// Delete failed
    #[display("Failed to delete record: {}", _0)]
    Delete(String),
}

/// Persistence error with source location tracking.
///
/// The only error class that triggers compensating cleanup of bytes already
/// written to the store.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persistence Error: {} at line {} in {}", kind, line, file)]
pub struct PersistenceError {
    /// The kind of error that occurred
    pub kind: PersistenceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PersistenceError {
    /// Create a new persistence error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
