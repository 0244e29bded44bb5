mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use smart_link::application::services::{LinkService, SmartLinkDraft};
use smart_link::domain::entities::Destinations;
use smart_link::domain::repositories::LinkRepository;
use smart_link::infrastructure::persistence::MemoryLinkRepository;
use smart_link::infrastructure::qr::SvgQrRenderer;
use smart_link::utils::code_generator::CodeGenerator;

/// Hands out every candidate twice so concurrent creators keep colliding.
struct RepeatingGenerator {
    next: AtomicUsize,
}

impl CodeGenerator for RepeatingGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("code{:04}", n / 2)
    }
}

fn draft(title: &str) -> SmartLinkDraft {
    SmartLinkDraft {
        title: title.to_string(),
        description: None,
        destinations: Destinations {
            ios_url: Some("https://apps.apple.com/app/id1".to_string()),
            android_url: None,
            web_url: Some("https://example.com".to_string()),
        },
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_never_duplicates_short_ids() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let service = Arc::new(
        LinkService::new(
            repo.clone(),
            Arc::new(SvgQrRenderer::default()),
            Arc::new(RepeatingGenerator {
                next: AtomicUsize::new(0),
            }),
            common::BASE_URL,
        )
        .with_max_attempts(100),
    );

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_smart_link(draft(&format!("link {i}")), Some("alice".to_string()))
                    .await
            })
        })
        .collect();

    let mut short_ids = HashSet::new();
    for handle in handles {
        let link = handle.await.unwrap().unwrap();
        assert!(short_ids.insert(link.short_id.unwrap()));
    }

    assert_eq!(short_ids.len(), 20);
    assert_eq!(repo.list_by_owner("alice").await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_created_record_round_trips_through_store() {
    let repo = Arc::new(MemoryLinkRepository::new());
    let service = LinkService::new(
        repo.clone(),
        Arc::new(SvgQrRenderer::default()),
        Arc::new(RepeatingGenerator {
            next: AtomicUsize::new(0),
        }),
        common::BASE_URL,
    );

    let created = service
        .create_smart_link(draft("round trip"), None)
        .await
        .unwrap();

    let short_id = created.short_id.clone().unwrap();
    let found = repo.find_by_short_id(&short_id).await.unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.click_count, 0);
    assert_eq!(service.public_url(&short_id), format!("{}/{}", common::BASE_URL, short_id));
}
