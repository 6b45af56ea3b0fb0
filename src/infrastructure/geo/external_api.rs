//! GeoIP lookups against an HTTP JSON API such as ip-api.com.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tracing::{trace, warn};

use super::provider::{GeoInfo, GeoIpLookup};

const LOOKUP_CACHE_TTL_SECS: u64 = 15 * 60;
const LOOKUP_CACHE_MAX_CAPACITY: u64 = 10_000;
const HTTP_TIMEOUT_SECS: u64 = 2;

/// Queries an external API, caching answers per IP (negative results included).
///
/// The URL template uses `{ip}` as placeholder, for example
/// `http://ip-api.com/json/{ip}?fields=status,countryCode,city`.
pub struct ExternalApiLookup {
    client: reqwest::Client,
    api_url_template: String,
    cache: Cache<String, Option<GeoInfo>>,
}

impl ExternalApiLookup {
    pub fn new(api_url_template: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(LOOKUP_CACHE_TTL_SECS))
            .max_capacity(LOOKUP_CACHE_MAX_CAPACITY)
            .build();

        Ok(Self {
            client,
            api_url_template: api_url_template.to_string(),
            cache,
        })
    }

    async fn fetch(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.api_url_template.replace("{ip}", ip);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("GeoIP response from \"{}\" could not be parsed: {}", url, e);
                return None;
            }
        };

        parse_geo_response(&body)
    }
}

/// Extracts country and city from a provider response.
///
/// Accepts the common field names `countryCode`, `country_code` and
/// `country`. A `"status": "fail"` body means the provider has no answer.
pub fn parse_geo_response(body: &Value) -> Option<GeoInfo> {
    if body["status"].as_str() == Some("fail") {
        trace!("GeoIP provider returned fail status");
        return None;
    }

    let country = body["countryCode"]
        .as_str()
        .or_else(|| body["country_code"].as_str())
        .or_else(|| body["country"].as_str())
        .filter(|c| !c.is_empty())
        .map(String::from);

    let city = body["city"]
        .as_str()
        .filter(|c| !c.is_empty())
        .map(String::from);

    if country.is_none() && city.is_none() {
        return None;
    }

    Some(GeoInfo { country, city })
}

#[async_trait]
impl GeoIpLookup for ExternalApiLookup {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        self.cache
            .get_with(ip.to_string(), self.fetch(ip))
            .await
    }

    fn name(&self) -> &'static str {
        "external_api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_api_format() {
        let info = parse_geo_response(&json!({
            "status": "success",
            "countryCode": "DE",
            "city": "Berlin"
        }))
        .unwrap();

        assert_eq!(info.country.as_deref(), Some("DE"));
        assert_eq!(info.city.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_parse_alternative_field_names() {
        let info = parse_geo_response(&json!({ "country_code": "US" })).unwrap();
        assert_eq!(info.country.as_deref(), Some("US"));
        assert!(info.city.is_none());

        let info = parse_geo_response(&json!({ "country": "FR" })).unwrap();
        assert_eq!(info.country.as_deref(), Some("FR"));
    }

    #[test]
    fn test_parse_fail_status() {
        let body = json!({ "status": "fail", "message": "private range" });
        assert!(parse_geo_response(&body).is_none());
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_geo_response(&json!({})).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_none() {
        // Port 9 (discard) on localhost refuses connections.
        let lookup = ExternalApiLookup::new("http://127.0.0.1:9/json/{ip}").unwrap();
        assert!(lookup.lookup("8.8.8.8").await.is_none());
    }
}
