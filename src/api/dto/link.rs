//! DTOs for link registration and management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Link, RegisterLink};

/// Request body for `POST /api/links`.
///
/// URL and alias rules are enforced by the registrar; this layer only caps
/// sizes.
///
/// # Example
///
/// ```json
/// {
///   "url": "example.com/docs",
///   "custom_alias": "docs",
///   "title": "Documentation"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(alias = "long_url")]
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters"))]
    pub url: String,

    #[serde(default)]
    pub custom_alias: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    #[serde(default)]
    pub user_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(max = 2048))]
    pub qr_code: Option<String>,
}

impl From<CreateLinkRequest> for RegisterLink {
    fn from(req: CreateLinkRequest) -> Self {
        RegisterLink {
            long_url: req.url,
            custom_alias: req.custom_alias,
            title: req.title,
            user_id: req.user_id,
            qr_code: req.qr_code,
        }
    }
}

/// A link as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    /// Handle to share: the alias when present, otherwise the generated code.
    pub short_code: String,
    pub code: Option<String>,
    pub alias: Option<String>,
    pub long_url: String,
    pub title: Option<String>,
    pub clicks: i64,
    pub user_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.public_code().to_string(),
            code: link.code,
            alias: link.alias,
            long_url: link.long_url,
            title: link.title,
            clicks: link.clicks,
            user_id: link.user_id,
            qr_code: link.qr_code,
            created_at: link.created_at,
        }
    }
}

/// Paginated link listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}
