//! In-process store implementing both repositories.
//!
//! Backs the HTTP integration tests and local runs without PostgreSQL. It
//! enforces the constraints of the `links` and `link_handles` tables: an
//! http(s) target, at least one handle, one case-insensitive handle
//! namespace, cascading deletes and atomic counter increments.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entities::{Click, Link, NewClick, NewLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::{AppError, map_check_violation};

#[derive(Default)]
struct Inner {
    links: HashMap<i64, Link>,
    handles: HashMap<String, i64>,
    clicks: Vec<Click>,
    next_link_id: i64,
    next_click_id: i64,
}

/// Thread-safe in-memory link and click store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::internal("Memory store lock poisoned", json!({})))
    }
}

fn sorted_newest_first(mut links: Vec<Link>) -> Vec<Link> {
    links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    links
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let scheme = new_link.long_url.get(..8).unwrap_or(&new_link.long_url);
        let scheme = scheme.to_ascii_lowercase();
        if !(scheme.starts_with("http://") || scheme.starts_with("https://")) {
            return Err(map_check_violation(Some("links_long_url_scheme")));
        }
        if new_link.code.is_none() && new_link.alias.is_none() {
            return Err(map_check_violation(Some("links_has_handle")));
        }

        let mut inner = self.lock()?;
        let handles = new_link.handles();

        if let Some(taken) = handles.iter().find(|h| inner.handles.contains_key(*h)) {
            return Err(AppError::alias_taken(
                "Short code or alias is already in use",
                json!({ "handle": taken }),
            ));
        }

        inner.next_link_id += 1;
        let link = Link {
            id: inner.next_link_id,
            long_url: new_link.long_url,
            code: new_link.code,
            alias: new_link.alias,
            title: new_link.title,
            clicks: 0,
            user_id: new_link.user_id,
            qr_code: new_link.qr_code,
            created_at: Utc::now(),
        };

        for handle in handles {
            inner.handles.insert(handle, link.id);
        }
        inner.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Link>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .handles
            .get(&handle.to_lowercase())
            .and_then(|id| inner.links.get(id))
            .cloned())
    }

    async fn handle_exists(&self, handle: &str) -> Result<bool, AppError> {
        Ok(self.lock()?.handles.contains_key(&handle.to_lowercase()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.lock()?.links.get(&id).cloned())
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError> {
        let inner = self.lock()?;
        let links = inner
            .links
            .values()
            .filter(|l| user_id.is_none() || l.user_id == user_id)
            .cloned()
            .collect();

        Ok(sorted_newest_first(links)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, user_id: Option<Uuid>) -> Result<i64, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .links
            .values()
            .filter(|l| user_id.is_none() || l.user_id == user_id)
            .count() as i64)
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let mut inner = self.lock()?;
        let Some(link) = inner.links.remove(&id) else {
            return Ok(None);
        };

        inner.handles.retain(|_, link_id| *link_id != id);
        inner.clicks.retain(|c| c.link_id != id);

        Ok(Some(link))
    }

    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        match inner.links.get_mut(&id) {
            Some(link) => {
                link.clicks += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut inner = self.lock()?;

        if !inner.links.contains_key(&new_click.link_id) {
            return Err(AppError::internal(
                "Click references a missing link",
                json!({ "link_id": new_click.link_id }),
            ));
        }

        inner.next_click_id += 1;
        let click = Click {
            id: inner.next_click_id,
            link_id: new_click.link_id,
            clicked_at: Utc::now(),
            user_agent: new_click.user_agent,
            referer: new_click.referer,
            ip: new_click.ip,
            city: new_click.city,
            country: new_click.country,
            device: new_click.device,
            browser: new_click.browser,
            os: new_click.os,
        };
        inner.clicks.push(click.clone());

        Ok(click)
    }

    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        self.find_by_links(&[link_id]).await
    }

    async fn find_by_links(&self, link_ids: &[i64]) -> Result<Vec<Click>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .clicks
            .iter()
            .rev()
            .filter(|c| link_ids.contains(&c.link_id))
            .cloned()
            .collect())
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        let inner = self.lock()?;
        Ok(inner.clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }
}
