//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer: data persistence,
//! caching and client geolocation.
//!
//! # Modules
//!
//! - [`cache`] - Link cache (moka, Redis and no-op implementations)
//! - [`geo`] - GeoIP lookups for click analytics
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod cache;
pub mod geo;
pub mod persistence;
