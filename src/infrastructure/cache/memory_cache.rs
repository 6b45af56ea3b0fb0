//! In-process TTL cache backed by moka.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached link together with its own time-to-live.
#[derive(Clone)]
struct Entry {
    link: Link,
    ttl: Duration,
}

struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Per-process cache for resolved links.
///
/// Each instance owns its storage, so tests and services never share state
/// through it. Capacity-bounded; least recently used entries are evicted first.
pub struct MemoryCache {
    cache: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl_seconds: u64, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryExpiry)
            .build();

        Self {
            cache,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_link(&self, handle: &str) -> CacheResult<Option<Link>> {
        let hit = self.cache.get(handle).await.map(|entry| entry.link);
        debug!(
            "Cache {}: {}",
            if hit.is_some() { "HIT" } else { "MISS" },
            handle
        );
        Ok(hit)
    }

    async fn set_link(
        &self,
        handle: &str,
        link: &Link,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        self.cache
            .insert(
                handle.to_string(),
                Entry {
                    link: link.clone(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate(&self, handle: &str) -> CacheResult<()> {
        self.cache.invalidate(handle).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(id: i64, code: &str) -> Link {
        Link::new(
            id,
            "https://example.com".to_string(),
            Some(code.to_string()),
            None,
            0,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(300, 100);
        cache.set_link("abc123", &link(1, "abc123"), None).await.unwrap();

        let hit = cache.get_link("abc123").await.unwrap();
        assert_eq!(hit.map(|l| l.id), Some(1));
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = MemoryCache::new(300, 100);
        assert!(cache.get_link("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = MemoryCache::new(300, 100);
        cache.set_link("abc123", &link(1, "abc123"), None).await.unwrap();
        cache.invalidate("abc123").await.unwrap();

        assert!(cache.get_link("abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache = MemoryCache::new(300, 100);
        cache
            .set_link("short", &link(1, "short"), Some(0))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.get_link("short").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_instances_do_not_share_entries() {
        let first = MemoryCache::new(300, 100);
        let second = MemoryCache::new(300, 100);
        first.set_link("abc123", &link(1, "abc123"), None).await.unwrap();

        assert!(second.get_link("abc123").await.unwrap().is_none());
    }
}
