//! Client geolocation for click analytics.
//!
//! - [`ExternalApiLookup`] - HTTP JSON provider, enabled by `GEOIP_API_URL`
//! - [`NoopGeoLookup`] - no provider configured

mod external_api;
mod provider;

pub use external_api::{ExternalApiLookup, parse_geo_response};
pub use provider::{GeoInfo, GeoIpLookup, NoopGeoLookup};

#[cfg(test)]
pub use provider::MockGeoIpLookup;
