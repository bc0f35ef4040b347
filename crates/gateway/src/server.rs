//! Router construction and server startup.

use std::sync::Arc;

use {
    axum::{Json, Router, routing::get},
    tower_http::cors::{Any, CorsLayer},
};

use logctl_control::LogControlService;

use crate::log_routes;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LogControlService>,
}

/// Build the router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/log",
            get(log_routes::get_log).patch(log_routes::patch_log),
        )
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Serve requests on `listener` until the task is shut down.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "log control gateway listening");
    axum::serve(listener, build_app(state)).await
}
