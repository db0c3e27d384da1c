//! Latest version reported by a registry

use crate::version::coerce;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The newest published version of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestVersion {
    /// The version string (e.g., "1.2.3")
    pub version: String,
    /// When this version was published, if the registry reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

impl LatestVersion {
    /// Create a LatestVersion without a release date
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
        }
    }

    /// Attach the publish time
    pub fn with_release_date(mut self, released_at: Option<DateTime<Utc>>) -> Self {
        self.released_at = released_at;
        self
    }

    /// Returns true if the version carries a pre-release suffix
    pub fn is_prerelease(&self) -> bool {
        coerce(&self.version).is_some_and(|v| v.is_prerelease())
    }
}

/// Parse an RFC 3339 timestamp as reported by registries
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_latest_version_new() {
        let latest = LatestVersion::new("1.2.3");
        assert_eq!(latest.version, "1.2.3");
        assert!(latest.released_at.is_none());
    }

    #[test]
    fn test_latest_version_with_release_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let latest = LatestVersion::new("1.2.3").with_release_date(Some(date));
        assert_eq!(latest.released_at, Some(date));
    }

    #[test]
    fn test_is_prerelease() {
        assert!(LatestVersion::new("2.0.0-beta.1").is_prerelease());
        assert!(LatestVersion::new("3.13.0rc2").is_prerelease());
        assert!(!LatestVersion::new("2.0.0").is_prerelease());
        assert!(!LatestVersion::new("not a version").is_prerelease());
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T13:30:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_serialize_skips_missing_date() {
        let json = serde_json::to_string(&LatestVersion::new("1.0.0")).unwrap();
        assert_eq!(json, r#"{"version":"1.0.0"}"#);
    }
}
