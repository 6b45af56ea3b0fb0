//! Destination URL normalization.
//!
//! Destinations are stored exactly as the caller wrote them, with two
//! adjustments: surrounding whitespace is trimmed and a missing scheme is
//! replaced by `https://`. The result must parse as an absolute HTTP(S) URL
//! with a host.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):(?P<rest>.*)$")
        .expect("scheme pattern is valid")
});

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Normalizes a destination URL.
///
/// # Rules
///
/// 1. Whitespace around the input is removed; an empty input is rejected
/// 2. Input without a scheme gets `https://` prepended (`host:port` is not a scheme)
/// 3. Only HTTP and HTTPS are allowed; the scheme is lower-cased and must be
///    followed by `//` (`https:example.com` is rejected)
/// 4. The result must parse as a URL with a host
///
/// Path, query and fragment are preserved verbatim.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
/// assert_eq!(normalize_url("HTTP://example.com/a").unwrap(), "http://example.com/a");
/// assert!(normalize_url("javascript:alert(1)").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let candidate = match SCHEME_REGEX.captures(trimmed) {
        Some(caps) if has_explicit_scheme(&caps["rest"]) => {
            let scheme = caps["scheme"].to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(UrlNormalizationError::UnsupportedProtocol);
            }
            if !caps["rest"].starts_with("//") {
                return Err(UrlNormalizationError::InvalidFormat(format!(
                    "expected '{}://' before the host",
                    scheme
                )));
            }
            format!("{}:{}", scheme, &caps["rest"])
        }
        _ => format!("https://{}", trimmed),
    };

    let parsed =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL must contain a host".to_string(),
        ));
    }

    Ok(candidate)
}

/// `example.com:8080/path` looks like a scheme but is a host with a port.
fn has_explicit_scheme(rest: &str) -> bool {
    !rest.starts_with(|c: char| c.is_ascii_digit())
}
