//! Repository trait for click events.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of click events.
///
/// There is deliberately no update or delete operation: click rows are
/// immutable and retention is handled outside the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends one click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the referenced link does not exist.
    /// Returns [`AppError::Transient`] if the store is unreachable.
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Returns all clicks of a link, newest first.
    async fn find_by_link(&self, link_id: i64) -> Result<Vec<Click>, AppError>;

    /// Returns all clicks of several links, newest first.
    async fn find_by_links(&self, link_ids: &[i64]) -> Result<Vec<Click>, AppError>;

    /// Counts clicks of a link.
    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError>;
}
