//! Click event model for asynchronous click tracking.

/// Request metadata collected by the presentation layer for one redirect.
///
/// All fields are optional: missing headers are normal traffic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickContext {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
    /// Country reported by a trusted edge (e.g. `CF-IPCountry`).
    pub country_hint: Option<String>,
}

impl ClickContext {
    /// Creates a context from borrowed header values.
    pub fn new(
        user_agent: Option<&str>,
        referer: Option<&str>,
        ip: Option<String>,
        country_hint: Option<&str>,
    ) -> Self {
        Self {
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            ip,
            country_hint: country_hint.map(|s| s.to_string()),
        }
    }
}

/// An in-memory click event passed from handlers to the click worker.
///
/// One event is dispatched per successful resolve. The handler never waits
/// for it to be processed.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler after the link is resolved
/// 2. Sent to the bounded channel with `try_send` (dropped when full)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Handed to [`crate::application::services::ClickService::record_click`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub context: ClickContext,
}

impl ClickEvent {
    pub fn new(link_id: i64, context: ClickContext) -> Self {
        Self { link_id, context }
    }
}
