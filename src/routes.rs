//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_id}`               - Device-aware redirect (public)
//! - `GET  /health`                   - Store and cache health (public)
//! - `GET  /api/links/data/{short_id}` - Record lookup (public)
//! - `/api/links*`                    - Record management (Bearer token required)

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes(state.clone()).merge(api::routes::public_routes());

    let router = Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
