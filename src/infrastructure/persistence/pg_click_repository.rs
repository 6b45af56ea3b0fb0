//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

const CLICK_COLUMNS: &str =
    "id, link_id, clicked_at, user_agent, referer, ip, city, country, device, browser, os";

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    user_agent: Option<String>,
    referer: Option<String>,
    ip: Option<String>,
    city: Option<String>,
    country: Option<String>,
    device: String,
    browser: String,
    os: String,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            link_id: r.link_id,
            clicked_at: r.clicked_at,
            user_agent: r.user_agent,
            referer: r.referer,
            ip: r.ip,
            city: r.city,
            country: r.country,
            device: r.device,
            browser: r.browser,
            os: r.os,
        }
    }
}

/// PostgreSQL repository for click events.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row: ClickRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO link_clicks
                (link_id, user_agent, referer, ip, city, country, device, browser, os)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CLICK_COLUMNS}
            "#
        ))
        .bind(new_click.link_id)
        .bind(&new_click.user_agent)
        .bind(&new_click.referer)
        .bind(&new_click.ip)
        .bind(&new_click.city)
        .bind(&new_click.country)
        .bind(&new_click.device)
        .bind(&new_click.browser)
        .bind(&new_click.os)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        let rows: Vec<ClickRow> = sqlx::query_as(&format!(
            "SELECT {CLICK_COLUMNS} FROM link_clicks WHERE link_id = $1 ORDER BY clicked_at DESC, id DESC"
        ))
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn find_by_links(&self, link_ids: &[i64]) -> Result<Vec<Click>, AppError> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<ClickRow> = sqlx::query_as(&format!(
            "SELECT {CLICK_COLUMNS} FROM link_clicks WHERE link_id = ANY($1) ORDER BY clicked_at DESC, id DESC"
        ))
        .bind(link_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
