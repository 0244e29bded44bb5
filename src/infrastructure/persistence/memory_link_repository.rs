//! In-process implementation of link repository.
//!
//! Used with `STORAGE_BACKEND=memory` and by integration tests. Records live
//! for the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewSmartLink, SmartLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

struct StoredLink {
    record: SmartLink,
    clicks: AtomicI64,
}

impl StoredLink {
    fn snapshot(&self) -> SmartLink {
        SmartLink {
            click_count: self.clicks.load(Ordering::SeqCst),
            ..self.record.clone()
        }
    }
}

/// DashMap-backed link store.
///
/// - Short id uniqueness is claimed through a vacant entry of the index map,
///   which holds the shard lock for the duration of the insert.
/// - Click counters are `AtomicI64` bumped with `fetch_add`.
pub struct MemoryLinkRepository {
    next_id: AtomicI64,
    records: DashMap<i64, StoredLink>,
    short_ids: DashMap<String, i64>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            records: DashMap::new(),
            short_ids: DashMap::new(),
        }
    }

    fn insert(&self, new_link: NewSmartLink) -> SmartLink {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = new_link.into_record(id, Utc::now());

        self.records.insert(
            id,
            StoredLink {
                record: record.clone(),
                clicks: AtomicI64::new(0),
            },
        );

        record
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewSmartLink) -> Result<SmartLink, AppError> {
        let Some(short_id) = new_link.short_id.clone() else {
            return Ok(self.insert(new_link));
        };

        match self.short_ids.entry(short_id) {
            Entry::Occupied(occupied) => Err(AppError::conflict(
                "Short id already exists",
                json!({ "short_id": occupied.key() }),
            )),
            Entry::Vacant(vacant) => {
                // Record is visible before the index entry so lookups never dangle.
                let record = self.insert(new_link);
                vacant.insert(record.id);
                Ok(record)
            }
        }
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<SmartLink>, AppError> {
        let Some(id) = self.short_ids.get(short_id).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        Ok(self.records.get(&id).map(|stored| stored.snapshot()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SmartLink>, AppError> {
        Ok(self.records.get(&id).map(|stored| stored.snapshot()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<SmartLink>, AppError> {
        let mut links: Vec<SmartLink> = self
            .records
            .iter()
            .filter(|stored| stored.record.owner_id.as_deref() == Some(owner_id))
            .map(|stored| stored.snapshot())
            .collect();

        links.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(links)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        match self.records.get(&id) {
            Some(stored) => {
                stored.clicks.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(AppError::not_found("Link not found", json!({ "id": id }))),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Destinations;
    use std::sync::Arc;

    fn new_link(short_id: Option<&str>, owner: Option<&str>) -> NewSmartLink {
        NewSmartLink {
            short_id: short_id.map(str::to_string),
            title: "Launch".to_string(),
            description: Some("App launch".to_string()),
            destinations: Destinations {
                ios_url: Some("https://apps.apple.com/x".to_string()),
                android_url: Some("https://play.google.com/x".to_string()),
                web_url: Some("https://x.com".to_string()),
            },
            plain_text: None,
            qr_artifact_ref: "data:image/svg+xml;base64,AAAA".to_string(),
            owner_id: owner.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_zero_clicks() {
        let repo = MemoryLinkRepository::new();

        let link = repo.create(new_link(Some("abc"), None)).await.unwrap();

        assert_eq!(link.id, 1);
        assert_eq!(link.click_count, 0);
        assert_eq!(link.short_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_create_duplicate_short_id_conflicts() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link(Some("dup"), None)).await.unwrap();

        let result = repo.create(new_link(Some("dup"), None)).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_records_without_short_id_never_collide() {
        let repo = MemoryLinkRepository::new();

        let a = repo.create(new_link(None, None)).await.unwrap();
        let b = repo.create(new_link(None, None)).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_find_by_short_id_and_id() {
        let repo = MemoryLinkRepository::new();
        let created = repo.create(new_link(Some("find"), None)).await.unwrap();

        let by_short = repo.find_by_short_id("find").await.unwrap().unwrap();
        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_short, created);
        assert_eq!(by_id, created);
        assert!(repo.find_by_short_id("missing").await.unwrap().is_none());
        assert!(repo.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let repo = MemoryLinkRepository::new();
        let first = repo.create(new_link(Some("a"), Some("alice"))).await.unwrap();
        repo.create(new_link(Some("b"), Some("bob"))).await.unwrap();
        let third = repo.create(new_link(None, Some("alice"))).await.unwrap();

        let links = repo.list_by_owner("alice").await.unwrap();

        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);
    }

    #[tokio::test]
    async fn test_increment_clicks() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link(Some("clk"), None)).await.unwrap();

        repo.increment_clicks(link.id).await.unwrap();
        repo.increment_clicks(link.id).await.unwrap();

        let found = repo.find_by_id(link.id).await.unwrap().unwrap();
        assert_eq!(found.click_count, 2);
    }

    #[tokio::test]
    async fn test_increment_clicks_unknown_id() {
        let repo = MemoryLinkRepository::new();

        let result = repo.increment_clicks(42).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(MemoryLinkRepository::new());
        let link = repo.create(new_link(Some("hot"), None)).await.unwrap();

        let handles: Vec<_> = (0..200)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_clicks(link.id).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let found = repo.find_by_id(link.id).await.unwrap().unwrap();
        assert_eq!(found.click_count, 200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_same_short_id_has_one_winner() {
        let repo = Arc::new(MemoryLinkRepository::new());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(new_link(Some("race"), None)).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }
}
