//! Click context extraction from HTTP request headers.

use crate::domain::click_event::ClickContext;
use axum::http::{HeaderMap, header};
use std::net::SocketAddr;

/// Edge headers carrying the client's country, in order of preference.
const COUNTRY_HEADERS: &[&str] = &["x-vercel-ip-country", "cf-ipcountry"];

/// Builds a [`ClickContext`] from request headers and the peer address.
///
/// Forwarding headers are only trusted when `behind_proxy` is set; otherwise
/// the socket peer address is used.
pub fn click_context_from_headers(
    headers: &HeaderMap,
    peer: SocketAddr,
    behind_proxy: bool,
) -> ClickContext {
    ClickContext::new(
        header_str(headers, header::USER_AGENT.as_str()),
        header_str(headers, header::REFERER.as_str()),
        Some(client_ip(headers, peer, behind_proxy)),
        country_hint(headers),
    )
}

/// Resolves the client IP address.
///
/// Behind a proxy: first entry of `X-Forwarded-For`, then `X-Real-IP`, then
/// the peer address.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or_else(|| header_str(headers, "x-real-ip")) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Returns the country code reported by a trusted edge, if any.
///
/// `XX` (unknown) and `T1` (Tor) are treated as absent.
pub fn country_hint(headers: &HeaderMap) -> Option<&str> {
    COUNTRY_HEADERS
        .iter()
        .filter_map(|name| header_str(headers, name))
        .map(str::trim)
        .find(|v| !v.is_empty() && *v != "XX" && *v != "T1")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
