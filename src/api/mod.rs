pub mod handlers;

use crate::core::engine::CreditScorer;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub fn router(scorer: Arc<CreditScorer>) -> Router {
    Router::new()
        .route("/", get(handlers::read_root))
        .route("/model-info", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .layer(CorsLayer::permissive())
        .with_state(scorer)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(app: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
