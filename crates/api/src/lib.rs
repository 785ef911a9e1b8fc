//! HTTP surface for the scripture chat service.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use verse_core::{AppError, AppResult};

use routes::{chat::chat, liveness::live, readiness::ready, root::root};

pub mod error;
mod routes;
pub mod state;

pub use error::ApiError;
pub use state::ApiState;

/// Build the application router.
pub fn router(state: ApiState) -> Router {
    // Browser front-end calls cross-origin; no credentials involved
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/live", get(live))
        .route("/ready", get(ready))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: ApiState, host: &str, port: u16) -> AppResult<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {}:{}: {}", host, port, e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Other(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
