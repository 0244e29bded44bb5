//! DTOs for smart link and text-QR endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::application::services::SmartLinkDraft;
use crate::domain::entities::{Destinations, SmartLink};

/// Request to create a smart link.
///
/// Destination URLs are checked by the link service; empty strings are
/// treated as absent.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSmartLinkRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub web_url: Option<String>,
}

impl From<CreateSmartLinkRequest> for SmartLinkDraft {
    fn from(req: CreateSmartLinkRequest) -> Self {
        SmartLinkDraft {
            title: req.title,
            description: req.description,
            destinations: Destinations {
                ios_url: req.ios_url,
                android_url: req.android_url,
                web_url: req.web_url,
            },
        }
    }
}

/// Request to create a text-QR record.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTextQrRequest {
    #[validate(length(min = 1, max = 2000, message = "Text must be 1-2000 characters"))]
    pub plain_text: String,
}

/// Public representation of a stored record.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartLinkResponse {
    pub id: i64,
    pub short_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub web_url: Option<String>,
    pub plain_text: Option<String>,
    pub qr_artifact_ref: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<String>,
    pub short_url: Option<String>,
}

impl SmartLinkResponse {
    /// Builds the response; `short_url` is the public redirect URL for link-mode records.
    pub fn new(link: SmartLink, short_url: Option<String>) -> Self {
        Self {
            id: link.id,
            short_id: link.short_id,
            title: link.title,
            description: link.description,
            ios_url: link.destinations.ios_url,
            android_url: link.destinations.android_url,
            web_url: link.destinations.web_url,
            plain_text: link.plain_text,
            qr_artifact_ref: link.qr_artifact_ref,
            click_count: link.click_count,
            created_at: link.created_at,
            owner_id: link.owner_id,
            short_url,
        }
    }
}

/// Owner's records, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<SmartLinkResponse>,
    pub total: usize,
}
