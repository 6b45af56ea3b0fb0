//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, caching and business rules. Services consume repository traits
//! and provide a clean API for HTTP handlers and the click worker.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code resolution, registration and link management
//! - [`services::click_service::ClickService`] - Click recording and click queries
//! - [`retry::RetryPolicy`] - Bounded retries of transient store errors

pub mod retry;
pub mod services;
