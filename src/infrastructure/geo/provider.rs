//! Geolocation lookup abstraction.

use async_trait::async_trait;

/// Best-effort location of a client address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 country code (e.g. "DE", "US").
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Resolves an IP address to a location.
///
/// Lookups never fail: an unknown address, a timeout or a broken provider all
/// yield `None`, and the click is stored without geography.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

/// Lookup used when no provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGeoLookup;

#[async_trait]
impl GeoIpLookup for NoopGeoLookup {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
