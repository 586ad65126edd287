//! Referential integrity error types.

/// Kinds of referential integrity violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum IntegrityErrorKind {
    /// Owner reference failed to resolve after the bounded fallback
    #[display("Owner '{}' unresolvable after fallback: {}", owner, reason)]
    OwnerUnresolvable {
        /// Owner id that failed to resolve
        owner: String,
        /// Terminal failure reason
        reason: String,
    },
    /// Client reference failed to resolve
    #[display("Client '{}' unresolvable: {}", client, reason)]
    ClientUnresolvable {
        /// Client id that failed to resolve
        client: String,
        /// Terminal failure reason
        reason: String,
    },
}

/// Referential integrity error with source location tracking.
///
/// Raised only after the single bounded corrective action has been
/// attempted; callers never observe a silently downgraded reference.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Referential Integrity Error: {} at line {} in {}", kind, line, file)]
pub struct IntegrityError {
    /// The kind of error that occurred
    pub kind: IntegrityErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl IntegrityError {
    /// Create a new integrity error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: IntegrityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
