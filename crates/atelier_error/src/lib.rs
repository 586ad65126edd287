//! Error types for the Atelier asset pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Atelier workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, HttpError};
//!
//! fn fetch_media() -> AtelierResult<Vec<u8>> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_media() {
//!     Ok(bytes) => println!("Got {} bytes", bytes.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod http;
mod integrity;
mod not_found;
mod permission;
mod persistence;
mod processing;
mod storage;
mod validation;

pub use cache::CacheError;
pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use http::HttpError;
pub use integrity::{IntegrityError, IntegrityErrorKind};
pub use not_found::{NotFoundError, NotFoundErrorKind};
pub use permission::PermissionError;
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use processing::{ProcessingError, ProcessingErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
