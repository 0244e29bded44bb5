//! Smart link and text-QR creation and retrieval service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::entities::{Destinations, NewSmartLink, SmartLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::qr::QrRenderer;
use crate::utils::code_generator::{CodeGenerator, is_reserved};

/// Default number of short id candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Maximum number of characters of plain text kept as the title of a text-QR record.
const TEXT_TITLE_PREVIEW: usize = 40;

/// Input for a new smart link.
#[derive(Debug, Clone, Default)]
pub struct SmartLinkDraft {
    pub title: String,
    pub description: Option<String>,
    pub destinations: Destinations,
}

/// Service for creating and retrieving smart-link and text-QR records.
///
/// Short ids are generated by an injected [`CodeGenerator`] and rendered to QR
/// artifacts by an injected [`QrRenderer`]. Uniqueness is enforced by the store:
/// a colliding candidate is rejected on insert and the next candidate is tried.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    qr_renderer: Arc<dyn QrRenderer>,
    code_generator: Arc<dyn CodeGenerator>,
    base_url: String,
    max_attempts: usize,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    ///
    /// # Arguments
    ///
    /// - `base_url` - public origin of the redirect endpoint, e.g. `https://s.example.com`
    pub fn new(
        link_repository: Arc<L>,
        qr_renderer: Arc<dyn QrRenderer>,
        code_generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            qr_renderer,
            code_generator,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of short id candidates tried per creation.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Creates a smart link with a fresh short id and a QR artifact for its public URL.
    ///
    /// Empty destination strings are stored as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - The title is empty
    /// - A destination is not an absolute http(s) URL
    /// - No destination is provided
    ///
    /// Returns [`AppError::CreationFailed`] if every candidate short id collided.
    pub async fn create_smart_link(
        &self,
        draft: SmartLinkDraft,
        owner_id: Option<String>,
    ) -> Result<SmartLink, AppError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::bad_request(
                "Title is required",
                json!({ "field": "title" }),
            ));
        }

        let destinations = Destinations {
            ios_url: normalize_url_field("ios_url", draft.destinations.ios_url)?,
            android_url: normalize_url_field("android_url", draft.destinations.android_url)?,
            web_url: normalize_url_field("web_url", draft.destinations.web_url)?,
        };

        if destinations.is_empty() {
            return Err(AppError::bad_request(
                "At least one destination URL is required",
                json!({ "fields": ["ios_url", "android_url", "web_url"] }),
            ));
        }

        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        for attempt in 1..=self.max_attempts {
            let short_id = self.code_generator.generate();

            if short_id.is_empty() || is_reserved(&short_id) {
                debug!(attempt, short_id, "Skipping unusable short id candidate");
                continue;
            }

            let public_url = self.public_url(&short_id);
            let qr_artifact_ref = self.qr_renderer.render(&public_url)?;

            let new_link = NewSmartLink {
                short_id: Some(short_id.clone()),
                title: title.clone(),
                description: description.clone(),
                destinations: destinations.clone(),
                plain_text: None,
                qr_artifact_ref,
                owner_id: owner_id.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(short_id, id = link.id, "Smart link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, short_id, "Short id collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Failed to generate a unique short id"
        );

        Err(AppError::creation_failed(
            "Failed to generate unique short id",
            json!({ "reason": "duplicate_key", "attempts": self.max_attempts }),
        ))
    }

    /// Creates a text-mode record whose QR artifact encodes `plain_text` directly.
    ///
    /// Text-mode records have no short id and are never redirected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the text is empty or too long for a QR code.
    pub async fn create_text_qr(
        &self,
        plain_text: String,
        owner_id: Option<String>,
    ) -> Result<SmartLink, AppError> {
        if plain_text.trim().is_empty() {
            return Err(AppError::bad_request(
                "Plain text is required",
                json!({ "field": "plain_text" }),
            ));
        }

        let qr_artifact_ref = self.qr_renderer.render(&plain_text)?;

        let new_link = NewSmartLink {
            short_id: None,
            title: text_title(&plain_text),
            description: None,
            destinations: Destinations::default(),
            plain_text: Some(plain_text),
            qr_artifact_ref,
            owner_id,
        };

        let link = self.link_repository.create(new_link).await?;
        info!(id = link.id, "Text QR created");

        Ok(link)
    }

    /// Retrieves a record by its short id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn get_by_short_id(&self, short_id: &str) -> Result<SmartLink, AppError> {
        self.link_repository
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "short_id": short_id })))
    }

    /// Lists an owner's records, newest first.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SmartLink>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Builds the public redirect URL for a short id.
    pub fn public_url(&self, short_id: &str) -> String {
        format!("{}/{}", self.base_url, short_id)
    }

    /// Public redirect URL of a record, if it is link-mode.
    pub fn short_url_for(&self, link: &SmartLink) -> Option<String> {
        link.short_id.as_deref().map(|id| self.public_url(id))
    }
}

/// Trims a destination, maps empty to `None` and checks it is an absolute http(s) URL.
///
/// The serialized form of the parsed URL is stored, so the value is always a
/// valid `Location` header.
fn normalize_url_field(field: &str, value: Option<String>) -> Result<Option<String>, AppError> {
    let Some(raw) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let parsed = Url::parse(&raw).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": field, "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Only http and https URLs are allowed",
            json!({ "field": field, "scheme": parsed.scheme() }),
        ));
    }

    Ok(Some(parsed.to_string()))
}

fn text_title(plain_text: &str) -> String {
    let trimmed = plain_text.trim();
    let mut title: String = trimmed.chars().take(TEXT_TITLE_PREVIEW).collect();
    if trimmed.chars().count() > TEXT_TITLE_PREVIEW {
        title.push('…');
    }
    title
}
