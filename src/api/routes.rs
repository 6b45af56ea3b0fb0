//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, link_clicks_handler,
    list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /links`              - Register a short link
/// - `GET    /links`              - List links (paginated, optional owner filter)
/// - `GET    /links/{id}`         - Fetch one link
/// - `DELETE /links/{id}`         - Delete a link with its clicks
/// - `GET    /links/{id}/clicks`  - Recorded clicks of a link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/links/{id}/clicks", get(link_clicks_handler))
}
