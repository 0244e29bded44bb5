//! Handlers for smart link and text-QR management.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    CreateSmartLinkRequest, CreateTextQrRequest, LinkListResponse, SmartLinkResponse,
};
use crate::application::services::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a smart link owned by the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Spring launch",
///   "description": "App store campaign",
///   "iosUrl": "https://apps.apple.com/app/id123",
///   "androidUrl": "https://play.google.com/store/apps/details?id=x",
///   "webUrl": "https://example.com"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request on validation failure
/// - 500 with code `creation_failed` if no unique short id could be generated
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<CreateSmartLinkRequest>,
) -> Result<(StatusCode, Json<SmartLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_smart_link(payload.into(), Some(owner.id))
        .await?;

    let short_url = state.link_service.short_url_for(&link);

    Ok((
        StatusCode::CREATED,
        Json(SmartLinkResponse::new(link, short_url)),
    ))
}

/// Creates a text-QR record owned by the authenticated caller.
///
/// # Endpoint
///
/// `POST /api/links/text`
pub async fn create_text_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<CreateTextQrRequest>,
) -> Result<(StatusCode, Json<SmartLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_text_qr(payload.plain_text, Some(owner.id))
        .await?;

    Ok((StatusCode::CREATED, Json(SmartLinkResponse::new(link, None))))
}

/// Lists the caller's records, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_for_owner(&owner.id).await?;

    let items: Vec<SmartLinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url_for(&link);
            SmartLinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Returns the full record for a short id, including the QR artifact and click count.
///
/// # Endpoint
///
/// `GET /api/links/data/{short_id}` (public)
///
/// # Errors
///
/// Returns 404 Not Found if the short id doesn't exist.
pub async fn link_data_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<SmartLinkResponse>, AppError> {
    let link = state.link_service.get_by_short_id(&short_id).await?;
    let short_url = state.link_service.short_url_for(&link);

    Ok(Json(SmartLinkResponse::new(link, short_url)))
}
