//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{ClickService, LinkService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::cache::CacheService;

/// Services and channels shared across requests.
///
/// Cheap to clone: every field is reference-counted or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub click_service: Arc<ClickService>,
    pub cache: Arc<dyn CacheService>,
    /// Producer side of the click queue drained by the click worker.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust forwarding headers when collecting the client IP.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        click_service: Arc<ClickService>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service,
            click_service,
            cache,
            click_sender,
            behind_proxy,
        }
    }
}
