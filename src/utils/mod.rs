//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_normalizer`] - Destination URL normalization
//! - [`user_agent`] - Device, browser and OS classification
//! - [`request_context`] - Click context extraction from HTTP headers

pub mod code_generator;
pub mod request_context;
pub mod url_normalizer;
pub mod user_agent;
