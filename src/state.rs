//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService, RedirectService};
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::qr::QrRenderer;
use crate::utils::code_generator::CodeGenerator;

/// Services and backends shared across requests.
///
/// Repositories are trait objects so the same router serves the PostgreSQL
/// and in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
}

/// Everything needed to assemble an [`AppState`].
pub struct StateParts {
    pub link_repository: Arc<dyn LinkRepository>,
    pub token_repository: Arc<dyn TokenRepository>,
    pub cache: Arc<dyn CacheService>,
    pub qr_renderer: Arc<dyn QrRenderer>,
    pub code_generator: Arc<dyn CodeGenerator>,
    pub base_url: String,
    pub token_signing_secret: String,
    pub short_id_max_attempts: usize,
}

impl AppState {
    pub fn new(parts: StateParts) -> Self {
        let redirect_service = Arc::new(RedirectService::new(
            parts.link_repository.clone(),
            parts.cache.clone(),
        ));

        let link_service = Arc::new(
            LinkService::new(
                parts.link_repository.clone(),
                parts.qr_renderer,
                parts.code_generator,
                parts.base_url,
            )
            .with_max_attempts(parts.short_id_max_attempts),
        );

        let auth_service = Arc::new(AuthService::new(
            parts.token_repository,
            parts.token_signing_secret,
        ));

        Self {
            redirect_service,
            link_service,
            auth_service,
            link_repository: parts.link_repository,
            cache: parts.cache,
        }
    }
}
