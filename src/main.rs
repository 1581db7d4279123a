use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use breedlens::config::CONFIG;
use breedlens::handlers::{build_router, AppState};
use breedlens::llm::{GeminiClient, GeminiSettings};
use breedlens::utils::logging::init_logging;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _logging_guards = init_logging();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if CONFIG.gemini_api_key.trim().is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; analysis requests will be rejected");
    }

    let model = Arc::new(GeminiClient::new(GeminiSettings::from_config(&CONFIG)));
    let app = build_router(AppState::new(model), CONFIG.max_upload_bytes);

    let addr = format!("{}:{}", CONFIG.host, CONFIG.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
