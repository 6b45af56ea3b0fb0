//! Handler for per-link click listings.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::clicks::{ClickItem, ClicksResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the recorded clicks of a link, newest first.
///
/// # Endpoint
///
/// `GET /api/links/{id}/clicks`
///
/// Click recording is asynchronous, so a click may show up here shortly
/// after the redirect that caused it.
pub async fn link_clicks_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClicksResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;
    let clicks = state.click_service.clicks_for_link(link.id).await?;
    let recorded_clicks = state.click_service.count_clicks(link.id).await?;

    Ok(Json(ClicksResponse {
        link_id: link.id,
        total_clicks: link.clicks,
        recorded_clicks,
        items: clicks.into_iter().map(ClickItem::from).collect(),
    }))
}
