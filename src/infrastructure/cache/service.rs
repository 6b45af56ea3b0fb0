//! Cache service trait and error types.

use crate::domain::entities::Link;
use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Short-lived read cache for resolved links.
///
/// Keys are lower-cased handles, so a code and its alias are cached
/// separately. Implementations must be thread-safe and fail open: a broken
/// cache degrades to store lookups, never to request failures.
///
/// Cached records carry the click counter as of caching time.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process TTL cache (moka)
/// - [`crate::infrastructure::cache::RedisCache`] - shared Redis-backed cache
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached link for a handle.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_link(&self, handle: &str) -> CacheResult<Option<Link>>;

    /// Stores a link under a handle with an optional TTL.
    ///
    /// `ttl_seconds = None` uses the implementation's default TTL.
    async fn set_link(&self, handle: &str, link: &Link, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes the cached entry for a handle.
    ///
    /// Called after registration and deletion.
    async fn invalidate(&self, handle: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Backend name for logs and health output.
    fn name(&self) -> &'static str;
}
