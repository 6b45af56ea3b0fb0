//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for resolved links, shared between service instances.
///
/// Links are stored as JSON. All operations are fail-open: errors are logged
/// and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }

    fn build_key(&self, handle: &str) -> String {
        format!("{}{}", self.key_prefix, handle)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, handle: &str) -> CacheResult<Option<Link>> {
        let key = self.build_key(handle);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Link>(&raw) {
                Ok(link) => {
                    debug!("Cache HIT: {}", handle);
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {}: {}", handle, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", handle);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", handle, e);
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        handle: &str,
        link: &Link,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(handle);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(format!("Failed to encode link: {}", e)))?;

        match conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", handle, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", handle, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, handle: &str) -> CacheResult<()> {
        let key = self.build_key(handle);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", handle);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", handle, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
