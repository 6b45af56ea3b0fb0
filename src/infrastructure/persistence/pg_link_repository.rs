//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "l.id, l.long_url, l.code, l.alias, l.title, l.clicks, l.user_id, l.qr_code, l.created_at";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    long_url: String,
    code: Option<String>,
    alias: Option<String>,
    title: Option<String>,
    clicks: i64,
    user_id: Option<Uuid>,
    qr_code: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            long_url: r.long_url,
            code: r.code,
            alias: r.alias,
            title: r.title,
            clicks: r.clicks,
            user_id: r.user_id,
            qr_code: r.qr_code,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Handles live in `link_handles`, whose primary key is the authoritative
/// uniqueness guard. A link and its handles are written in one transaction.
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
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let handles = new_link.handles();
        let mut tx = self.pool.begin().await?;

        let row: LinkRow = sqlx::query_as(
            r#"
            INSERT INTO links (long_url, code, alias, title, user_id, qr_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, long_url, code, alias, title, clicks, user_id, qr_code, created_at
            "#,
        )
        .bind(&new_link.long_url)
        .bind(&new_link.code)
        .bind(&new_link.alias)
        .bind(&new_link.title)
        .bind(new_link.user_id)
        .bind(&new_link.qr_code)
        .fetch_one(&mut *tx)
        .await?;

        for handle in &handles {
            sqlx::query("INSERT INTO link_handles (handle, link_id) VALUES ($1, $2)")
                .bind(handle)
                .bind(row.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM link_handles h
            JOIN links l ON l.id = h.link_id
            WHERE h.handle = lower($1)
            "#
        ))
        .bind(handle)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn handle_exists(&self, handle: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM link_handles WHERE handle = lower($1))",
        )
        .bind(handle)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> =
            sqlx::query_as(&format!("SELECT {LINK_COLUMNS} FROM links l WHERE l.id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Link::from))
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links l
            WHERE ($1::uuid IS NULL OR l.user_id = $1)
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self, user_id: Option<Uuid>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            DELETE FROM links
            WHERE id = $1
            RETURNING id, long_url, code, alias, title, clicks, user_id, qr_code, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
