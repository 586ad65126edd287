//! HTTP API server for the Atelier asset pipeline.

#![forbid(unsafe_code)]

mod api;
mod config;
mod response;
mod wiring;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use response::{status_for, ApiError, ApiResponse};
pub use wiring::build_service;
