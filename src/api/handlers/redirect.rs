//! Handler for device-aware short link redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to the destination for the visitor's device.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Request Flow
///
/// 1. Classify the `User-Agent` header (missing or non-UTF-8 counts as `other`)
/// 2. Look up the routing profile (cache, then store)
/// 3. Pick the iOS / Android / web URL, falling back to the web URL
/// 4. Increment the click counter
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// - 404 Not Found if the short id doesn't exist
/// - 500 with code `no_destination` if no URL applies to the device
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let resolution = state
        .redirect_service
        .resolve(&short_id, user_agent)
        .await?;

    debug!(
        short_id,
        category = %resolution.category(),
        "Redirecting to {}",
        resolution.url()
    );

    Ok(Redirect::temporary(resolution.url()))
}
