//! Data models for Sclicky
//!
//! Defines the single persisted entity, `LinkRecord`, together with its
//! identifier and platform label. Field names match the stored JSON blob
//! (`id`, `url`, `platform`, `clicks`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Opaque link identifier
///
/// Ids generated by the registry are numbers. Stored blobs may also carry
/// string ids or numbers outside `u64` (negative, fractional), which are
/// kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkId {
    Number(u64),
    Numeric(serde_json::Number),
    Text(String),
}

impl LinkId {
    /// Numeric value, if this id is a number
    pub fn as_number(&self) -> Option<u64> {
        match self {
            LinkId::Number(n) => Some(*n),
            LinkId::Numeric(_) | LinkId::Text(_) => None,
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkId::Number(n) => write!(f, "{}", n),
            LinkId::Numeric(n) => write!(f, "{}", n),
            LinkId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for LinkId {
    fn from(n: u64) -> Self {
        LinkId::Number(n)
    }
}

impl From<&str> for LinkId {
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => LinkId::Number(n),
            Err(_) => LinkId::Text(s.to_string()),
        }
    }
}

impl FromStr for LinkId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LinkId::from(s.trim()))
    }
}

/// Platform label attached to a link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    Twitter,
    Instagram,
    Facebook,
    LinkedIn,
    YouTube,
    TikTok,
    #[default]
    Other,
}

impl Platform {
    /// Every label, in display order
    pub const ALL: [Platform; 7] = [
        Platform::Twitter,
        Platform::Instagram,
        Platform::Facebook,
        Platform::LinkedIn,
        Platform::YouTube,
        Platform::TikTok,
        Platform::Other,
    ];

    /// The label as stored and displayed
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    /// Case-insensitive label lookup
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownPlatform(wanted.to_string()))
    }
}

impl TryFrom<String> for Platform {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.label().to_string()
    }
}

/// A saved link with its platform label and click counter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    /// Unique identifier, assigned at creation
    pub id: LinkId,
    /// The validated URL
    pub url: String,
    /// Platform label
    #[serde(default)]
    pub platform: Platform,
    /// Number of times the link was opened through the app
    #[serde(default)]
    pub clicks: u64,
}

impl LinkRecord {
    /// Create a fresh record with zero clicks
    ///
    /// The URL is taken as given; validation happens in the registry.
    pub fn new(id: LinkId, url: impl Into<String>, platform: Platform) -> Self {
        Self {
            id,
            url: url.into(),
            platform,
            clicks: 0,
        }
    }

    /// Case-insensitive match against url or platform label
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.url.to_lowercase().contains(needle)
            || self.platform.label().to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = LinkRecord::new(LinkId::Number(7), "https://example.com", Platform::Twitter);
        assert_eq!(record.id, LinkId::Number(7));
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.platform, Platform::Twitter);
        assert_eq!(record.clicks, 0);
    }

    #[test]
    fn test_platform_default_is_other() {
        assert_eq!(Platform::default(), Platform::Other);
    }

    #[test]
    fn test_platform_parse_case_insensitive() {
        assert_eq!("youtube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("LINKEDIN".parse::<Platform>().unwrap(), Platform::LinkedIn);
        assert_eq!(" TikTok ".parse::<Platform>().unwrap(), Platform::TikTok);
    }

    #[test]
    fn test_platform_parse_unknown() {
        let err = "Myspace".parse::<Platform>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownPlatform("Myspace".to_string()));
    }

    #[test]
    fn test_link_id_from_text() {
        assert_eq!(LinkId::from("1700000000000"), LinkId::Number(1_700_000_000_000));
        assert_eq!(LinkId::from("abc"), LinkId::Text("abc".to_string()));
        assert_eq!(LinkId::Number(42).to_string(), "42");
    }

    #[test]
    fn test_link_id_keeps_numbers_outside_u64() {
        let negative: LinkId = serde_json::from_str("-1").unwrap();
        let fractional: LinkId = serde_json::from_str("1718000000000.5").unwrap();

        assert!(matches!(negative, LinkId::Numeric(_)));
        assert_eq!(negative.to_string(), "-1");
        assert_eq!(negative.as_number(), None);
        assert!(matches!(fractional, LinkId::Numeric(_)));
        assert!(serde_json::to_value(&fractional).unwrap().is_f64());
        assert_ne!(negative, fractional);
    }

    #[test]
    fn test_record_json_shape() {
        let record = LinkRecord::new(LinkId::Number(1), "https://example.com", Platform::YouTube);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "url": "https://example.com",
                "platform": "YouTube",
                "clicks": 0
            })
        );
    }

    #[test]
    fn test_record_loads_string_id_and_missing_fields() {
        let record: LinkRecord =
            serde_json::from_str(r#"{"id": "a1", "url": "www.example.com/x"}"#).unwrap();
        assert_eq!(record.id, LinkId::Text("a1".to_string()));
        assert_eq!(record.platform, Platform::Other);
        assert_eq!(record.clicks, 0);
    }

    #[test]
    fn test_record_rejects_unknown_platform() {
        let result: Result<LinkRecord, _> = serde_json::from_str(
            r#"{"id": 1, "url": "https://example.com", "platform": "Myspace", "clicks": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_rejects_negative_clicks() {
        let result: Result<LinkRecord, _> = serde_json::from_str(
            r#"{"id": 1, "url": "https://example.com", "platform": "Other", "clicks": -1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_matches() {
        let record = LinkRecord::new(LinkId::Number(1), "https://Twitter.com/alice", Platform::Other);
        assert!(record.matches("twitter"));
        assert!(record.matches("other"));
        assert!(!record.matches("youtube"));
    }
}
