//! URL shape validation
//!
//! A syntactic sanity check only; nothing here touches the network.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Host label followed by a dot and at least two more non-space characters
static HOST_AND_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9][a-z0-9-]+[a-z0-9]|[a-z0-9]+)\.\S{2,}$").unwrap()
});

/// Errors raised while validating user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing left after trimming whitespace
    #[error("Please enter a link.")]
    EmptyUrl,

    /// Input does not look like a web address
    #[error("Please enter a valid URL (e.g., https://example.com). Got: '{0}'")]
    InvalidUrlFormat(String),

    /// Platform label outside the fixed set
    #[error("Unknown platform '{0}'. Valid platforms: Twitter, Instagram, Facebook, LinkedIn, YouTube, TikTok, Other")]
    UnknownPlatform(String),
}

/// Validate a URL and return its trimmed form
pub fn validate_url(raw: &str) -> Result<String, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if !looks_like_url(url) {
        return Err(ValidationError::InvalidUrlFormat(url.to_string()));
    }
    Ok(url.to_string())
}

/// Accepts `http(s)://[www.]host.tld...` or `www.host.tld...`
///
/// With a scheme and no `www.` prefix, the host may not itself start with
/// `www` (so `https://wwwexample.com` is rejected).
fn looks_like_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();

    let after_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));

    match after_scheme {
        Some(rest) => match rest.strip_prefix("www.") {
            Some(host) => HOST_AND_TAIL.is_match(host),
            None => !rest.starts_with("www") && HOST_AND_TAIL.is_match(rest),
        },
        None => lower
            .strip_prefix("www.")
            .is_some_and(|host| HOST_AND_TAIL.is_match(host)),
    }
}
