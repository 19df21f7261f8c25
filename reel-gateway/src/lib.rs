//! Reel Gateway - HTTP service for short-form drama script diagnostics.
//!
//! This crate provides:
//! - The `/api/analyze` endpoint with input validation
//! - Health and configuration diagnosis endpoints
//! - The Qwen LLM engine with automatic rule-engine fallback
//!
//! ## Architecture
//!
//! ```text
//! Client → Gateway (validate → score) → LLM engine ─┐
//!                                  ↘ rule engine ←──┘ on any failure
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod fallback;
pub mod llm;
pub mod routes;

pub use fallback::FallbackScorer;
pub use llm::{LlmError, QwenScorer, LLM_ENGINE};
pub use routes::AppState;

use axum::Router;
use reel_common::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Upper bound on request bodies; far above the largest accepted script.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the gateway router with all routes and middleware.
pub fn build_router(config: &Config) -> Router {
    build_router_with_state(AppState::new(config))
}

/// Build the router around an existing state.
pub fn build_router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::build_all_routes(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Start the gateway server.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let router = build_router(config);

    tracing::info!(engine = %config.engine(), "Starting Reel Gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
