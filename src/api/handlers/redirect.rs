//! Handler for short URL redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tokio::sync::mpsc::{Sender, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_context::click_context_from_headers;

/// Page shown for unknown short codes.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub code: String,
}

/// Redirects a short code or alias to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code case-insensitively (cache first, then store)
/// 2. Queue a click event for the background worker without waiting
/// 3. Return 301 Moved Permanently
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for async processing.
/// If the queue is full, the click is dropped (fire-and-forget).
///
/// # Errors
///
/// - 404 with an HTML page naming the code if it does not exist
/// - 400 if the code is empty
/// - 503 if the store is unavailable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let link = match state.link_service.resolve(&code).await {
        Ok(link) => link,
        Err(AppError::NotFound { .. }) => {
            return Ok((StatusCode::NOT_FOUND, NotFoundTemplate { code }).into_response());
        }
        Err(e) => return Err(e),
    };

    let context = click_context_from_headers(&headers, addr, state.behind_proxy);
    dispatch_click(&state.click_sender, ClickEvent::new(link.id, context));

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, link.long_url)],
    )
        .into_response())
}

/// Queues a click without blocking the request.
fn dispatch_click(sender: &Sender<ClickEvent>, event: ClickEvent) {
    match sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(link_id = event.link_id, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!(link_id = event.link_id, "Click queue closed, dropping click");
        }
    }
}
