//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for managing short links.
///
/// Handles (generated codes and custom aliases) share one case-insensitive
/// namespace. Implementations must enforce its uniqueness themselves; the
/// service-level pre-check only produces a friendlier error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link with a zero click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] if any handle of the new link is
    /// already used by another link, compared case-insensitively.
    /// Returns [`AppError::Transient`] if the store is unreachable.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds the link owning a code or alias, case-insensitively.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if no link has this handle
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Link>, AppError>;

    /// Returns true if a code or alias equal to `handle` exists, case-insensitively.
    async fn handle_exists(&self, handle: &str) -> Result<bool, AppError>;

    /// Finds a link by its primary key.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Lists links newest first, optionally restricted to one owner.
    async fn list(
        &self,
        user_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts links, optionally restricted to one owner.
    async fn count(&self, user_id: Option<Uuid>) -> Result<i64, AppError>;

    /// Deletes a link together with its handles.
    ///
    /// Returns the deleted link, or `Ok(None)` if it did not exist.
    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Atomically adds one to the click counter.
    ///
    /// Returns `Ok(false)` if the link no longer exists.
    async fn increment_clicks(&self, id: i64) -> Result<bool, AppError>;
}
