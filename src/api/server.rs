use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers::{self, DATA_SOURCE_HEADER, FALLBACK_REASON_HEADER};
use super::state::AppState;
use crate::config::Config;

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard-data", get(handlers::dashboard_data))
        .route("/api/models", get(handlers::models))
        .route("/api/predict", post(handlers::predict))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([DATA_SOURCE_HEADER, FALLBACK_REASON_HEADER]),
        )
        .with_state(state)
}

pub async fn run_server(config: &Config, state: Arc<AppState>) -> Result<()> {
    info!("🌐 Starting Quantum ML API server...");

    let app = router(state, &config.server.static_dir);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind API server to {}", addr))?;
    info!("🌐 Dashboard available at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    info!("👋 API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ Could not listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received");
}
