use smart_link::domain::entities::{Destinations, NewSmartLink};
use smart_link::domain::repositories::LinkRepository;
use smart_link::error::AppError;
use smart_link::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(short_id: Option<&str>, owner_id: &str) -> NewSmartLink {
    NewSmartLink {
        short_id: short_id.map(str::to_string),
        title: "Launch".to_string(),
        description: None,
        destinations: Destinations {
            ios_url: Some("https://apps.apple.com/app/id1".to_string()),
            android_url: None,
            web_url: Some("https://example.com/".to_string()),
        },
        plain_text: None,
        qr_artifact_ref: "data:image/svg+xml;base64,AAAA".to_string(),
        owner_id: Some(owner_id.to_string()),
    }
}

fn new_text(text: &str, owner_id: &str) -> NewSmartLink {
    NewSmartLink {
        short_id: None,
        title: text.to_string(),
        description: None,
        destinations: Destinations::default(),
        plain_text: Some(text.to_string()),
        qr_artifact_ref: "data:image/svg+xml;base64,BBBB".to_string(),
        owner_id: Some(owner_id.to_string()),
    }
}

#[sqlx::test]
async fn test_create_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let mut input = new_link(Some("abc12345"), "alice");
    input.description = Some("App launch".to_string());

    let link = repo.create(input).await.unwrap();

    assert!(link.id > 0);
    assert_eq!(link.short_id.as_deref(), Some("abc12345"));
    assert_eq!(link.title, "Launch");
    assert_eq!(link.description.as_deref(), Some("App launch"));
    assert_eq!(
        link.destinations.ios_url.as_deref(),
        Some("https://apps.apple.com/app/id1")
    );
    assert!(link.destinations.android_url.is_none());
    assert_eq!(link.destinations.web_url.as_deref(), Some("https://example.com/"));
    assert!(link.plain_text.is_none());
    assert_eq!(link.click_count, 0);
    assert_eq!(link.owner_id.as_deref(), Some("alice"));
}

#[sqlx::test]
async fn test_create_duplicate_short_id_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.create(new_link(Some("taken111"), "alice")).await.unwrap();
    let result = repo.create(new_link(Some("taken111"), "bob")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_text_records_never_collide(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let first = repo.create(new_text("hello", "alice")).await.unwrap();
    let second = repo.create(new_text("hello", "alice")).await.unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.short_id.is_none());
    assert!(second.short_id.is_none());
}

#[sqlx::test]
async fn test_text_record_round_trip(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let created = repo.create(new_text("wifi:guest", "alice")).await.unwrap();
    let found = repo.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.plain_text.as_deref(), Some("wifi:guest"));
    assert!(found.destinations.ios_url.is_none());
    assert!(found.destinations.android_url.is_none());
    assert!(found.destinations.web_url.is_none());
}

#[sqlx::test]
async fn test_find_by_short_id(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let created = repo.create(new_link(Some("find1234"), "alice")).await.unwrap();

    let found = repo.find_by_short_id("find1234").await.unwrap();
    assert_eq!(found, Some(created));

    let missing = repo.find_by_short_id("missing1").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test]
async fn test_find_by_id_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.find_by_id(999_999).await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
async fn test_increment_clicks(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link(Some("click123"), "alice")).await.unwrap();

    repo.increment_clicks(link.id).await.unwrap();
    repo.increment_clicks(link.id).await.unwrap();

    let found = repo.find_by_id(link.id).await.unwrap().unwrap();
    assert_eq!(found.click_count, 2);
}

#[sqlx::test]
async fn test_increment_clicks_unknown_id(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo.increment_clicks(999_999).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let link = repo.create(new_link(Some("burst123"), "alice")).await.unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_clicks(link.id).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let found = repo.find_by_id(link.id).await.unwrap().unwrap();
    assert_eq!(found.click_count, 50);
}

#[sqlx::test]
async fn test_list_by_owner_newest_first(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let first = repo.create(new_link(Some("first111"), "alice")).await.unwrap();
    let text = repo.create(new_text("note", "alice")).await.unwrap();
    let last = repo.create(new_link(Some("last1111"), "alice")).await.unwrap();
    repo.create(new_link(Some("bobs1111"), "bob")).await.unwrap();

    let links = repo.list_by_owner("alice").await.unwrap();

    let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![last.id, text.id, first.id]);

    let none = repo.list_by_owner("carol").await.unwrap();
    assert!(none.is_empty());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
