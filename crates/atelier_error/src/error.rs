//! Top-level error wrapper types.

use crate::{
    CacheError, ConfigError, HttpError, IntegrityError, NotFoundError, PermissionError,
    PersistenceError, ProcessingError, StorageError, ValidationError,
};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// The foundation error enum covering every pipeline error family.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierError, ValidationError, ValidationErrorKind};
///
/// let v = ValidationError::new(ValidationErrorKind::MissingFile);
/// let err: AtelierError = v.into();
/// assert!(format!("{}", err).contains("Validation"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AtelierErrorKind {
    /// Malformed or missing input; no retry, no side effects
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Asset/client/owner absent
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Foreign reference invalid after the bounded fallback
    #[from(IntegrityError)]
    Integrity(IntegrityError),
    /// Derivative generation failure, absorbed as warnings
    #[from(ProcessingError)]
    Processing(ProcessingError),
    /// Record store failure; triggers byte cleanup
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Caller is not permitted to mutate
    #[from(PermissionError)]
    Permission(PermissionError),
    /// Byte store error
    #[from(StorageError)]
    Storage(StorageError),
    /// Cache error
    #[from(CacheError)]
    Cache(CacheError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Remote fetch error
    #[from(HttpError)]
    Http(HttpError),
}

/// Atelier error with kind discrimination.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, ConfigError};
///
/// fn might_fail() -> AtelierResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Atelier Error: {}", _0)]
pub struct AtelierError(Box<AtelierErrorKind>);

impl AtelierError {
    /// Create a new error from a kind.
    pub fn new(kind: AtelierErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AtelierErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AtelierErrorKind
impl<T> From<T> for AtelierError
where
    T: Into<AtelierErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Atelier operations.
///
/// # Examples
///
/// ```
/// use atelier_error::{AtelierResult, HttpError};
///
/// fn fetch_media() -> AtelierResult<Vec<u8>> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type AtelierResult<T> = std::result::Result<T, AtelierError>;
