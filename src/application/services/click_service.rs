//! Click recording and click queries.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::click_event::ClickContext;
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::geo::{GeoInfo, GeoIpLookup};
use crate::utils::user_agent::classify_user_agent;

/// Service for recording redirect clicks and reading them back.
///
/// Recording is best-effort: it runs off the request path, and nothing it
/// does can fail a redirect.
pub struct ClickService {
    click_repository: Arc<dyn ClickRepository>,
    link_repository: Arc<dyn LinkRepository>,
    geo: Arc<dyn GeoIpLookup>,
}

impl ClickService {
    pub fn new(
        click_repository: Arc<dyn ClickRepository>,
        link_repository: Arc<dyn LinkRepository>,
        geo: Arc<dyn GeoIpLookup>,
    ) -> Self {
        Self {
            click_repository,
            link_repository,
            geo,
        }
    }

    /// Records one click for a link.
    ///
    /// Classifies the user agent, locates the client, appends a click event
    /// and then increments the link's counter by exactly one. Errors are
    /// logged and counted, never returned.
    pub async fn record_click(&self, link_id: i64, context: ClickContext) {
        match self.try_record_click(link_id, context).await {
            Ok(()) => metrics::counter!("clicks_recorded_total").increment(1),
            Err(e) => {
                metrics::counter!("clicks_failed_total").increment(1);
                warn!(link_id, "Failed to record click: {}", e);
            }
        }
    }

    async fn try_record_click(&self, link_id: i64, context: ClickContext) -> Result<(), AppError> {
        let agent = classify_user_agent(context.user_agent.as_deref());
        let location = self.locate(&context).await;

        let new_click = NewClick {
            link_id,
            user_agent: context.user_agent,
            referer: context.referer,
            ip: context.ip,
            city: location.city,
            country: location.country,
            device: agent.device.to_string(),
            browser: agent.browser.to_string(),
            os: agent.os.to_string(),
        };

        self.click_repository.record_click(new_click).await?;

        if !self.link_repository.increment_clicks(link_id).await? {
            debug!(link_id, "Link disappeared before its counter was incremented");
        }

        Ok(())
    }

    /// An edge-provided country wins over an IP lookup.
    async fn locate(&self, context: &ClickContext) -> GeoInfo {
        if let Some(country) = &context.country_hint {
            return GeoInfo {
                country: Some(country.to_ascii_uppercase()),
                city: None,
            };
        }

        match context.ip.as_deref() {
            Some(ip) if is_routable(ip) => self.geo.lookup(ip).await.unwrap_or_default(),
            _ => GeoInfo::default(),
        }
    }

    /// Returns all clicks of a link, newest first.
    pub async fn clicks_for_link(&self, link_id: i64) -> Result<Vec<Click>, AppError> {
        self.click_repository.find_by_link(link_id).await
    }

    /// Number of click records appended for a link.
    ///
    /// Can trail the link's counter when an append failed after the redirect.
    pub async fn count_clicks(&self, link_id: i64) -> Result<i64, AppError> {
        self.click_repository.count_by_link(link_id).await
    }

    /// Returns all clicks of several links, newest first.
    pub async fn clicks_for_links(&self, link_ids: &[i64]) -> Result<Vec<Click>, AppError> {
        self.click_repository.find_by_links(link_ids).await
    }
}

/// Loopback, private and unparsable addresses have no useful location.
fn is_routable(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        Ok(IpAddr::V6(v6)) => !(v6.is_loopback() || v6.is_unspecified()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::infrastructure::geo::{MockGeoIpLookup, NoopGeoLookup};
    use chrono::Utc;
    use serde_json::json;

    fn stored(new_click: NewClick) -> Click {
        Click {
            id: 1,
            link_id: new_click.link_id,
            clicked_at: Utc::now(),
            user_agent: new_click.user_agent,
            referer: new_click.referer,
            ip: new_click.ip,
            city: new_click.city,
            country: new_click.country,
            device: new_click.device,
            browser: new_click.browser,
            os: new_click.os,
        }
    }

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
         AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

    #[tokio::test]
    async fn test_record_click_classifies_and_increments() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|c| {
                c.link_id == 7
                    && c.device == "mobile"
                    && c.browser == "Safari"
                    && c.os == "iOS"
                    && c.country.as_deref() == Some("DE")
                    && c.referer.as_deref() == Some("https://news.example")
            })
            .times(1)
            .returning(|c| Ok(stored(c)));

        let mut links = MockLinkRepository::new();
        links
            .expect_increment_clicks()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(true));

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(NoopGeoLookup));
        let context = ClickContext::new(
            Some(IPHONE_SAFARI),
            Some("https://news.example"),
            Some("10.1.2.3".to_string()),
            Some("de"),
        );

        service.record_click(7, context).await;
    }

    #[tokio::test]
    async fn test_geo_lookup_used_without_hint() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|c| c.country.as_deref() == Some("US") && c.city.as_deref() == Some("Austin"))
            .times(1)
            .returning(|c| Ok(stored(c)));

        let mut links = MockLinkRepository::new();
        links.expect_increment_clicks().returning(|_| Ok(true));

        let mut geo = MockGeoIpLookup::new();
        geo.expect_lookup()
            .withf(|ip| ip == "8.8.8.8")
            .times(1)
            .returning(|_| {
                Some(GeoInfo {
                    country: Some("US".to_string()),
                    city: Some("Austin".to_string()),
                })
            });

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(geo));
        let context = ClickContext::new(None, None, Some("8.8.8.8".to_string()), None);

        service.record_click(1, context).await;
    }

    #[tokio::test]
    async fn test_private_ip_skips_geo_lookup() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|c| c.country.is_none() && c.city.is_none())
            .times(1)
            .returning(|c| Ok(stored(c)));

        let mut links = MockLinkRepository::new();
        links.expect_increment_clicks().returning(|_| Ok(true));

        let mut geo = MockGeoIpLookup::new();
        geo.expect_lookup().times(0);

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(geo));
        let context = ClickContext::new(None, None, Some("192.168.1.20".to_string()), None);

        service.record_click(1, context).await;
    }

    #[tokio::test]
    async fn test_missing_user_agent_defaults() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .withf(|c| c.device == "desktop" && c.browser == "Unknown" && c.os == "Unknown")
            .times(1)
            .returning(|c| Ok(stored(c)));

        let mut links = MockLinkRepository::new();
        links.expect_increment_clicks().returning(|_| Ok(true));

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(NoopGeoLookup));
        service.record_click(1, ClickContext::default()).await;
    }

    #[tokio::test]
    async fn test_append_failure_is_swallowed_and_counter_untouched() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record_click()
            .times(1)
            .returning(|_| Err(AppError::transient("down", json!({}))));

        let mut links = MockLinkRepository::new();
        links.expect_increment_clicks().times(0);

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(NoopGeoLookup));
        service.record_click(1, ClickContext::default()).await;
    }

    #[tokio::test]
    async fn test_increment_failure_is_swallowed() {
        let mut clicks = MockClickRepository::new();
        clicks.expect_record_click().returning(|c| Ok(stored(c)));

        let mut links = MockLinkRepository::new();
        links
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Err(AppError::internal("boom", json!({}))));

        let service = ClickService::new(Arc::new(clicks), Arc::new(links), Arc::new(NoopGeoLookup));
        service.record_click(1, ClickContext::default()).await;
    }

    #[tokio::test]
    async fn test_clicks_for_links() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_find_by_links()
            .withf(|ids| ids.to_vec() == vec![1, 2])
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = ClickService::new(
            Arc::new(clicks),
            Arc::new(MockLinkRepository::new()),
            Arc::new(NoopGeoLookup),
        );

        assert!(service.clicks_for_links(&[1, 2]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_clicks_reads_click_log() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_count_by_link()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(3));

        let service = ClickService::new(
            Arc::new(clicks),
            Arc::new(MockLinkRepository::new()),
            Arc::new(NoopGeoLookup),
        );

        assert_eq!(service.count_clicks(7).await.unwrap(), 3);
    }

    #[test]
    fn test_is_routable() {
        assert!(is_routable("8.8.8.8"));
        assert!(is_routable("2001:4860:4860::8888"));
        assert!(!is_routable("127.0.0.1"));
        assert!(!is_routable("10.0.0.1"));
        assert!(!is_routable("::1"));
        assert!(!is_routable("not-an-ip"));
    }
}
