//! Smart link entity: one short identifier, three device destinations and a QR artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::device::DeviceCategory;

/// Per-platform redirect targets.
///
/// Any field may be absent. Empty strings are treated the same as absent when
/// a destination is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destinations {
    pub ios_url: Option<String>,
    pub android_url: Option<String>,
    pub web_url: Option<String>,
}

/// Outcome of picking a destination for a device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationChoice<'a> {
    /// The URL configured for the detected category.
    Direct(&'a str),
    /// The category URL was empty, the web URL is used instead.
    Fallthrough(&'a str),
}

impl Destinations {
    /// Returns the URL configured for `category`, ignoring empty values.
    pub fn for_category(&self, category: DeviceCategory) -> Option<&str> {
        let url = match category {
            DeviceCategory::Ios => &self.ios_url,
            DeviceCategory::Android => &self.android_url,
            DeviceCategory::Other => &self.web_url,
        };
        non_empty(url)
    }

    /// Selects the redirect target: category URL, else web URL, else nothing.
    ///
    /// No other fallback chain exists (an iOS visitor never lands on the
    /// Android URL).
    pub fn select(&self, category: DeviceCategory) -> Option<DestinationChoice<'_>> {
        if let Some(url) = self.for_category(category) {
            return Some(DestinationChoice::Direct(url));
        }

        non_empty(&self.web_url).map(DestinationChoice::Fallthrough)
    }

    /// Returns true if no destination holds a usable URL.
    pub fn is_empty(&self) -> bool {
        non_empty(&self.ios_url).is_none()
            && non_empty(&self.android_url).is_none()
            && non_empty(&self.web_url).is_none()
    }
}

fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().map(str::trim).filter(|u| !u.is_empty())
}

/// Whether a record is reachable through the redirect endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Has a short identifier and redirect semantics.
    Link,
    /// Holds plain text encoded in its QR artifact, never redirected.
    Text,
}

/// A stored smart-link or text-QR record.
#[derive(Debug, Clone, PartialEq)]
pub struct SmartLink {
    pub id: i64,
    pub short_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub destinations: Destinations,
    pub plain_text: Option<String>,
    pub qr_artifact_ref: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<String>,
}

impl SmartLink {
    pub fn mode(&self) -> LinkMode {
        if self.short_id.is_some() {
            LinkMode::Link
        } else {
            LinkMode::Text
        }
    }
}

/// Input data for persisting a new record.
///
/// `id`, `click_count` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSmartLink {
    pub short_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub destinations: Destinations,
    pub plain_text: Option<String>,
    pub qr_artifact_ref: String,
    pub owner_id: Option<String>,
}

impl NewSmartLink {
    /// Materializes the record as the store would on insert.
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> SmartLink {
        SmartLink {
            id,
            short_id: self.short_id,
            title: self.title,
            description: self.description,
            destinations: self.destinations,
            plain_text: self.plain_text,
            qr_artifact_ref: self.qr_artifact_ref,
            click_count: 0,
            created_at,
            owner_id: self.owner_id,
        }
    }
}
