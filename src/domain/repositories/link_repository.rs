//! Repository trait for smart link records.

use crate::domain::entities::{NewSmartLink, SmartLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for smart-link and text-QR records.
///
/// All methods are safe to call concurrently. Implementations must apply
/// [`LinkRepository::increment_clicks`] atomically in the store itself, so
/// concurrent redirects of the same record never lose an update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new record and returns it with store-assigned fields.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `short_id` is present and already taken.
    /// Records without a short id never collide.
    ///
    /// Returns [`AppError::StoreUnavailable`] or [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewSmartLink) -> Result<SmartLink, AppError>;

    /// Finds a record by its public short identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SmartLink))` if found
    /// - `Ok(None)` if not found
    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<SmartLink>, AppError>;

    /// Finds a record by its storage id.
    async fn find_by_id(&self, id: i64) -> Result<Option<SmartLink>, AppError>;

    /// Lists every record owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<SmartLink>, AppError>;

    /// Atomically adds one to the record's click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Verifies that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
