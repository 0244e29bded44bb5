//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService, CachedRoute};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or its connection fails at startup.
/// Every lookup is a miss.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_route(&self, _short_id: &str) -> CacheResult<Option<CachedRoute>> {
        Ok(None)
    }

    async fn set_route(
        &self,
        _short_id: &str,
        _route: &CachedRoute,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_id: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
