//! API route configuration.

use crate::api::handlers::{
    create_link_handler, create_text_handler, link_data_handler, list_links_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// API routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET  /links`       - List the caller's records, newest first
/// - `POST /links`       - Create a smart link
/// - `POST /links/text`  - Create a text-QR record
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/text", post(create_text_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// API routes available without authentication.
///
/// # Endpoints
///
/// - `GET /links/data/{short_id}` - Full record for a short id
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/links/data/{short_id}", get(link_data_handler))
}
