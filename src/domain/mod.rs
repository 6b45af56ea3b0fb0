//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces, and the click event pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a code
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] drains the channel
//! 4. [`crate::application::services::ClickService`] classifies, geolocates and persists the click

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
