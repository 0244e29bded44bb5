//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::{Destinations, SmartLink};

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Immutable routing profile of a link-mode record.
///
/// Click counts are deliberately absent: they change on every visit and are
/// always read from and written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRoute {
    pub id: i64,
    pub destinations: Destinations,
}

impl From<&SmartLink> for CachedRoute {
    fn from(link: &SmartLink) -> Self {
        Self {
            id: link.id,
            destinations: link.destinations.clone(),
        }
    }
}

/// Trait for caching short id to routing profile mappings.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures should degrade to store lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the routing profile for a short id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(route))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_route(&self, short_id: &str) -> CacheResult<Option<CachedRoute>>;

    /// Stores a routing profile with optional TTL.
    ///
    /// `ttl_seconds = None` uses the implementation default.
    async fn set_route(
        &self,
        short_id: &str,
        route: &CachedRoute,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes a cached routing profile.
    async fn invalidate(&self, short_id: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
