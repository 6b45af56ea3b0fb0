//! DTOs for click listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Click;

/// One recorded click.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickItem {
    pub clicked_at: DateTime<Utc>,
    pub referer: Option<String>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device: String,
    pub browser: String,
    pub os: String,
}

impl From<Click> for ClickItem {
    fn from(click: Click) -> Self {
        Self {
            clicked_at: click.clicked_at,
            referer: click.referer,
            ip: click.ip,
            country: click.country,
            city: click.city,
            device: click.device,
            browser: click.browser,
            os: click.os,
        }
    }
}

/// Response of `GET /api/links/{id}/clicks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClicksResponse {
    pub link_id: i64,
    /// Counter stored on the link.
    pub total_clicks: i64,
    /// Click records in the log; lower than `total_clicks` when appends failed.
    pub recorded_clicks: i64,
    pub items: Vec<ClickItem>,
}
