//! Best-effort User-Agent classification.
//!
//! Substring matching against a handful of well-known markers. Order matters:
//! Edge and Chrome user agents also mention Safari, and Android and iOS user
//! agents also mention Linux and Mac.

pub const UNKNOWN: &str = "Unknown";

/// Device, browser and OS labels derived from a User-Agent header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device: &'static str,
    pub browser: &'static str,
    pub os: &'static str,
}

impl Default for UserAgentInfo {
    fn default() -> Self {
        Self {
            device: "desktop",
            browser: UNKNOWN,
            os: UNKNOWN,
        }
    }
}

const BROWSER_MARKERS: &[(&[&str], &str)] = &[
    (&["Edg/", "Edge/", "EdgA/", "EdgiOS/"], "Edge"),
    (&["Firefox/", "FxiOS/"], "Firefox"),
    (&["Chrome/", "CriOS/"], "Chrome"),
    (&["Safari/"], "Safari"),
];

const OS_MARKERS: &[(&[&str], &str)] = &[
    (&["Windows"], "Windows"),
    (&["Android"], "Android"),
    (&["iPhone", "iPad", "iOS"], "iOS"),
    (&["Mac"], "macOS"),
    (&["Linux"], "Linux"),
];

/// Classifies a User-Agent string.
///
/// A missing or unrecognized header yields `desktop` / `Unknown` / `Unknown`.
pub fn classify_user_agent(user_agent: Option<&str>) -> UserAgentInfo {
    let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) else {
        return UserAgentInfo::default();
    };

    UserAgentInfo {
        device: classify_device(ua),
        browser: first_match(ua, BROWSER_MARKERS),
        os: first_match(ua, OS_MARKERS),
    }
}

fn classify_device(ua: &str) -> &'static str {
    let lower = ua.to_ascii_lowercase();

    if lower.contains("tablet") || lower.contains("ipad") {
        "tablet"
    } else if lower.contains("mobile") || lower.contains("android") || lower.contains("iphone") {
        "mobile"
    } else {
        "desktop"
    }
}

fn first_match(ua: &str, markers: &[(&[&str], &'static str)]) -> &'static str {
    markers
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| ua.contains(needle)))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN)
}
