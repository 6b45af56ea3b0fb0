//! Handlers for link registration and management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::ListLinksParams;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com", "custom_alias": "promo", "title": "Spring sale" }
/// ```
///
/// # Errors
///
/// - 400 `validation_error` for a bad URL or alias (`details.field` names it)
/// - 409 `alias_taken` if the alias is already used
/// - 503 `generation_exhausted` if no free code was found; the call may be retried
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists links newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&page_size=25&user_id=<uuid>`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params
        .validated()
        .map_err(|(field, message)| AppError::invalid_field(field, message))?;

    let links = state
        .link_service
        .list_links(params.user_id, page as i64, page_size as i64)
        .await?;
    let total = state.link_service.count_links(params.user_id).await?;

    Ok(Json(LinkListResponse {
        items: links.into_iter().map(LinkResponse::from).collect(),
        page,
        page_size,
        total,
    }))
}

/// Returns one link.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;
    Ok(Json(link.into()))
}

/// Deletes a link with its click history.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// Returns 204 on success and 404 if the link does not exist.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if id <= 0 {
        return Err(AppError::bad_request(
            "Link id must be positive",
            json!({ "field": "id" }),
        ));
    }

    state.link_service.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
