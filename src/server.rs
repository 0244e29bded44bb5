//! HTTP server initialization and runtime setup.
//!
//! Handles storage backend selection, cache setup, and Axum server lifecycle.

use crate::application::services::hash_token;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    MemoryLinkRepository, MemoryTokenRepository, PgLinkRepository, PgTokenRepository,
};
use crate::infrastructure::qr::SvgQrRenderer;
use crate::routes::app_router;
use crate::state::{AppState, StateParts};
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

type Repositories = (Arc<dyn LinkRepository>, Arc<dyn TokenRepository>);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (link_repository, token_repository) = connect_storage(&config).await?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let state = AppState::new(StateParts {
        link_repository,
        token_repository,
        cache,
        qr_renderer: Arc::new(SvgQrRenderer::default()),
        code_generator: Arc::new(RandomCodeGenerator),
        base_url: config.base_url.clone(),
        token_signing_secret: config.token_signing_secret.clone(),
        short_id_max_attempts: config.short_id_max_attempts,
    });

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn connect_storage(config: &Config) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            let pool = Arc::new(pool);
            let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
            let tokens: Arc<dyn TokenRepository> = Arc::new(PgTokenRepository::new(pool));

            Ok((links, tokens))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");

            let tokens: Arc<dyn TokenRepository> = Arc::new(MemoryTokenRepository::new());

            if let Some(token) = &config.bootstrap_token {
                let token_hash = hash_token(&config.token_signing_secret, token);
                tokens
                    .create_token(&config.bootstrap_owner, "bootstrap", &token_hash)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to register bootstrap token: {}", e))?;
                tracing::info!(owner = %config.bootstrap_owner, "Bootstrap API token registered");
            }

            let links: Arc<dyn LinkRepository> = Arc::new(MemoryLinkRepository::new());

            Ok((links, tokens))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
