//! Server binary entry point.

use atelier_server::{build_service, create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    atelier_core::init_telemetry()?;

    let config = ServerConfig::load()?;
    let service = build_service(&config)?;

    // Multipart framing overhead on top of the file ceiling.
    let max_body = *config.pipeline.max_upload_bytes() as usize + 1024 * 1024;
    let router = create_router(AppState::new(service), max_body);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Atelier server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
