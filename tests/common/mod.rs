#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use smart_link::api::handlers::{health_handler, redirect_handler};
use smart_link::api::routes::{protected_routes, public_routes};
use smart_link::application::services::hash_token;
use smart_link::domain::entities::{Destinations, NewSmartLink, SmartLink};
use smart_link::domain::repositories::{LinkRepository, TokenRepository};
use smart_link::infrastructure::cache::NullCache;
use smart_link::infrastructure::persistence::{MemoryLinkRepository, MemoryTokenRepository};
use smart_link::infrastructure::qr::SvgQrRenderer;
use smart_link::state::{AppState, StateParts};
use smart_link::utils::code_generator::RandomCodeGenerator;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://s.example.com";

pub const ALICE_TOKEN: &str = "alice-test-token";
pub const BOB_TOKEN: &str = "bob-test-token";

pub const IOS_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
pub const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15";
pub const ANDROID_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/124.0 Mobile Safari/537.36";
pub const DESKTOP_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/124.0 Safari/537.36";

/// In-memory state plus direct handles on the stores for seeding.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
}

pub async fn create_test_context() -> TestContext {
    let links = Arc::new(MemoryLinkRepository::new());
    let tokens = Arc::new(MemoryTokenRepository::new());

    tokens
        .create_token("alice", "alice-ci", &hash_token(SIGNING_SECRET, ALICE_TOKEN))
        .await
        .unwrap();
    tokens
        .create_token("bob", "bob-ci", &hash_token(SIGNING_SECRET, BOB_TOKEN))
        .await
        .unwrap();

    let state = AppState::new(StateParts {
        link_repository: links.clone(),
        token_repository: tokens,
        cache: Arc::new(NullCache::new()),
        qr_renderer: Arc::new(SvgQrRenderer::default()),
        code_generator: Arc::new(RandomCodeGenerator),
        base_url: BASE_URL.to_string(),
        token_signing_secret: SIGNING_SECRET.to_string(),
        short_id_max_attempts: 10,
    });

    TestContext { state, links }
}

/// Full route table without the outer path-normalization wrapper.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest(
            "/api",
            protected_routes(state.clone()).merge(public_routes()),
        )
        .with_state(state)
}

pub async fn create_test_link(
    links: &MemoryLinkRepository,
    short_id: &str,
    ios_url: Option<&str>,
    android_url: Option<&str>,
    web_url: Option<&str>,
) -> SmartLink {
    links
        .create(NewSmartLink {
            short_id: Some(short_id.to_string()),
            title: format!("Link {short_id}"),
            description: None,
            destinations: Destinations {
                ios_url: ios_url.map(str::to_string),
                android_url: android_url.map(str::to_string),
                web_url: web_url.map(str::to_string),
            },
            plain_text: None,
            qr_artifact_ref: "data:image/svg+xml;base64,AAAA".to_string(),
            owner_id: Some("alice".to_string()),
        })
        .await
        .unwrap()
}

pub async fn click_count(links: &MemoryLinkRepository, id: i64) -> i64 {
    links.find_by_id(id).await.unwrap().unwrap().click_count
}
