//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Destinations, NewSmartLink, SmartLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const SELECT_COLUMNS: &str = r#"
    id, short_id, title, description, ios_url, android_url, web_url,
    plain_text, qr_artifact_ref, click_count, created_at, owner_id
"#;

#[derive(sqlx::FromRow)]
struct SmartLinkRow {
    id: i64,
    short_id: Option<String>,
    title: String,
    description: Option<String>,
    ios_url: Option<String>,
    android_url: Option<String>,
    web_url: Option<String>,
    plain_text: Option<String>,
    qr_artifact_ref: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    owner_id: Option<String>,
}

impl From<SmartLinkRow> for SmartLink {
    fn from(r: SmartLinkRow) -> Self {
        SmartLink {
            id: r.id,
            short_id: r.short_id,
            title: r.title,
            description: r.description,
            destinations: Destinations {
                ios_url: r.ios_url,
                android_url: r.android_url,
                web_url: r.web_url,
            },
            plain_text: r.plain_text,
            qr_artifact_ref: r.qr_artifact_ref,
            click_count: r.click_count,
            created_at: r.created_at,
            owner_id: r.owner_id,
        }
    }
}

/// PostgreSQL repository for smart link records.
///
/// Click increments are a single `UPDATE ... SET click_count = click_count + 1`
/// so concurrent redirects are serialized by the row lock, not by the application.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewSmartLink) -> Result<SmartLink, AppError> {
        let short_id = new_link.short_id.clone();

        let query = format!(
            r#"
            INSERT INTO smart_links
                (short_id, title, description, ios_url, android_url, web_url,
                 plain_text, qr_artifact_ref, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, SmartLinkRow>(&query)
            .bind(new_link.short_id)
            .bind(new_link.title)
            .bind(new_link.description)
            .bind(new_link.destinations.ios_url)
            .bind(new_link.destinations.android_url)
            .bind(new_link.destinations.web_url)
            .bind(new_link.plain_text)
            .bind(new_link.qr_artifact_ref)
            .bind(new_link.owner_id)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict { .. } => AppError::conflict(
                    "Short id already exists",
                    json!({ "short_id": short_id }),
                ),
                other => other,
            })?;

        Ok(row.into())
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<SmartLink>, AppError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM smart_links WHERE short_id = $1");

        let row = sqlx::query_as::<_, SmartLinkRow>(&query)
            .bind(short_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SmartLink>, AppError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM smart_links WHERE id = $1");

        let row = sqlx::query_as::<_, SmartLinkRow>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<SmartLink>, AppError> {
        let query = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM smart_links
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        );

        let rows = sqlx::query_as::<_, SmartLinkRow>(&query)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE smart_links SET click_count = click_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
