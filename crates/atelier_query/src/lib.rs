//! Filter, sort, and pagination engine for the Atelier asset pipeline.
//!
//! The predicate functions here are pure over [`atelier_core::Asset`] and
//! are shared by every repository implementation, so the total count and
//! page contents agree exactly regardless of the backing store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod filter;

pub use engine::{execute, matches, sort_assets, QueryPage};
pub use filter::{AssetFilter, AssetFilterBuilder, ClientRef, SortBy, SortDirection};
