//! Device-aware redirect resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::device::{DeviceCategory, classify};
use crate::domain::entities::{DestinationChoice, LinkMode};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedRoute};

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The URL configured for the detected category was used.
    Direct {
        url: String,
        category: DeviceCategory,
    },
    /// The category URL was empty and the web URL was used instead.
    Fallthrough {
        url: String,
        category: DeviceCategory,
    },
}

impl Resolution {
    pub fn url(&self) -> &str {
        match self {
            Resolution::Direct { url, .. } | Resolution::Fallthrough { url, .. } => url,
        }
    }

    pub fn category(&self) -> DeviceCategory {
        match self {
            Resolution::Direct { category, .. } | Resolution::Fallthrough { category, .. } => {
                *category
            }
        }
    }

    pub fn is_fallthrough(&self) -> bool {
        matches!(self, Resolution::Fallthrough { .. })
    }
}

/// Resolves short identifiers to device-specific destinations and counts clicks.
///
/// # Resolution Rules
///
/// 1. Classify the `User-Agent` ([`classify`])
/// 2. Look up the routing profile (cache first, then the store)
/// 3. Pick the category URL, else the web URL, else fail with
///    [`AppError::NoDestination`]
/// 4. Increment the click counter, then return the chosen URL
///
/// Unknown short ids fail with [`AppError::NotFound`]. Neither failure
/// increments a counter.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
}

impl<L: LinkRepository + ?Sized + 'static> RedirectService<L> {
    /// Creates a new redirect service.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Resolves `short_id` for a visitor identified by `user_agent`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link-mode record has this short id
    /// - [`AppError::NoDestination`] if neither the category URL nor the web URL is set
    /// - [`AppError::StoreUnavailable`] / [`AppError::Internal`] if the lookup fails
    ///
    /// Click accounting failures are logged and never returned.
    pub async fn resolve(
        &self,
        short_id: &str,
        user_agent: Option<&str>,
    ) -> Result<Resolution, AppError> {
        let category = classify(user_agent);

        let route = self.lookup_route(short_id).await?.ok_or_else(|| {
            AppError::not_found("Link not found", json!({ "short_id": short_id }))
        })?;

        let resolution = match route.destinations.select(category) {
            Some(DestinationChoice::Direct(url)) => Resolution::Direct {
                url: url.to_string(),
                category,
            },
            Some(DestinationChoice::Fallthrough(url)) => Resolution::Fallthrough {
                url: url.to_string(),
                category,
            },
            None => {
                warn!(short_id, %category, "Link has no usable destination");
                return Err(AppError::no_destination(
                    "Link has no destination for this device",
                    json!({ "short_id": short_id, "category": category }),
                ));
            }
        };

        self.record_click(route.id, short_id).await;

        debug!(
            short_id,
            %category,
            fallthrough = resolution.is_fallthrough(),
            "Resolved redirect"
        );

        Ok(resolution)
    }

    /// Fetches the routing profile, populating the cache on a miss.
    async fn lookup_route(&self, short_id: &str) -> Result<Option<CachedRoute>, AppError> {
        match self.cache.get_route(short_id).await {
            Ok(Some(route)) => return Ok(Some(route)),
            Ok(None) => {}
            Err(e) => error!("Cache error: {}", e),
        }

        let Some(link) = self.link_repository.find_by_short_id(short_id).await? else {
            return Ok(None);
        };

        if link.mode() != LinkMode::Link {
            debug!(short_id, id = link.id, "Ignoring text-mode record");
            return Ok(None);
        }

        let route = CachedRoute::from(&link);

        let cache = self.cache.clone();
        let key = short_id.to_string();
        let cached = route.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_route(&key, &cached, None).await {
                error!("Failed to cache route: {}", e);
            }
        });

        Ok(Some(route))
    }

    /// Increments the click counter before the redirect is answered.
    ///
    /// The increment runs on its own task so it completes even if the client
    /// disconnects and the request future is dropped.
    async fn record_click(&self, id: i64, short_id: &str) {
        let repository = self.link_repository.clone();

        match tokio::spawn(async move { repository.increment_clicks(id).await }).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(short_id, id, error = %e, "Failed to record click"),
            Err(e) => error!(short_id, id, error = %e, "Click task failed"),
        }
    }
}
