//! Background consumer for click events.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;

/// Drains the click channel until every sender is dropped.
///
/// Up to `concurrency` events are recorded at once. Each event is handed to
/// [`ClickService::record_click`], which never fails from the caller's point
/// of view. Pending recordings are awaited before the worker returns.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    click_service: Arc<ClickService>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let service = click_service.clone();
        tasks.spawn(async move {
            debug!(link_id = event.link_id, "Recording click");
            service.record_click(event.link_id, event.context).await;
            drop(permit);
        });

        // Reap finished tasks so the set does not grow without bound.
        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Click worker stopped");
}
