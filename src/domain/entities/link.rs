//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shortened URL record.
///
/// A link is addressable through its generated `code`, its custom `alias`, or
/// both. At least one of the two is always present. Both live in one
/// case-insensitive namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub long_url: String,
    pub code: Option<String>,
    pub alias: Option<String>,
    pub title: Option<String>,
    pub clicks: i64,
    pub user_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a link with no owner and no QR artifact.
    pub fn new(
        id: i64,
        long_url: String,
        code: Option<String>,
        alias: Option<String>,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            long_url,
            code,
            alias,
            title: None,
            clicks,
            user_id: None,
            qr_code: None,
            created_at,
        }
    }

    /// The handle shown to users: the alias when present, otherwise the code.
    pub fn public_code(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or_default()
    }

    /// All lookup keys for this link, lower-cased.
    pub fn handles(&self) -> Vec<String> {
        self.code
            .iter()
            .chain(self.alias.iter())
            .map(|h| h.to_lowercase())
            .collect()
    }
}

/// Input data for persisting a new link.
///
/// The click counter always starts at zero.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub long_url: String,
    pub code: Option<String>,
    pub alias: Option<String>,
    pub title: Option<String>,
    pub user_id: Option<Uuid>,
    pub qr_code: Option<String>,
}

impl NewLink {
    /// Lower-cased handles that must be unique in the store.
    pub fn handles(&self) -> Vec<String> {
        self.code
            .iter()
            .chain(self.alias.iter())
            .map(|h| h.to_lowercase())
            .collect()
    }
}

/// Caller input for [`crate::application::services::LinkService::register`].
#[derive(Debug, Clone, Default)]
pub struct RegisterLink {
    pub long_url: String,
    pub custom_alias: Option<String>,
    pub title: Option<String>,
    pub user_id: Option<Uuid>,
    pub qr_code: Option<String>,
}

impl RegisterLink {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_owner(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            Some("abc123".to_string()),
            None,
            0,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code.as_deref(), Some("abc123"));
        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.clicks, 0);
        assert_eq!(link.created_at, now);
        assert!(link.user_id.is_none());
    }

    #[test]
    fn test_public_code_prefers_alias() {
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            Some("abc123".to_string()),
            Some("Promo".to_string()),
            0,
            Utc::now(),
        );

        assert_eq!(link.public_code(), "Promo");
    }

    #[test]
    fn test_handles_are_lowercased() {
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            Some("AbC123".to_string()),
            Some("My_Link".to_string()),
            0,
            Utc::now(),
        );

        assert_eq!(link.handles(), vec!["abc123", "my_link"]);
    }

    #[test]
    fn test_register_link_builder() {
        let owner = Uuid::new_v4();
        let request = RegisterLink::new("example.com")
            .with_alias("promo")
            .with_title("Promo page")
            .with_owner(owner);

        assert_eq!(request.long_url, "example.com");
        assert_eq!(request.custom_alias.as_deref(), Some("promo"));
        assert_eq!(request.title.as_deref(), Some("Promo page"));
        assert_eq!(request.user_id, Some(owner));
        assert!(request.qr_code.is_none());
    }
}
