//! HTTP surface of the QnA bot.
//!
//! `POST /api/messages` runs one conversational turn and returns the reply
//! messages in send order; `GET /health` is a liveness probe.

use std::sync::Arc;

pub mod bot;
pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::json_error_mapper,
    routes::{health_route::health, messages::message_route::post_message},
};

/// Builds the router over a ready [`AppState`].
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/messages", post(post_message))
        .fallback(|| async { AppError::NotFound })
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Loads config from the environment, binds `API_ADDRESS` and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let state = Arc::new(AppState::from_env()?);
    let address = state.api_address.clone();

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;

    info!(%address, "qna-bot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("qna-bot stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
