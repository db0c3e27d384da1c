//! Update decision result types

use super::{Dependency, UpdateType, VersionSpecifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a dependency has no reported update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Latest version is not newer than the current specifier
    UpToDate,
    /// Pseudo-version or a specifier that cannot be compared
    NotComparable,
    /// Package was ignored via --ignore or config
    Ignored,
    /// Package not in --only list
    NotInOnlyList,
    /// Ecosystem filter excluded this package
    EcosystemFiltered,
    /// Update kind not selected by --target
    UpdateTypeFiltered(UpdateType),
    /// Latest version is a pre-release and pre-releases are not allowed
    PrereleaseOnly(String),
    /// Failed to fetch version info from registry
    FetchFailed(String),
    /// Registries were not queried
    Offline,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UpToDate => write!(f, "up to date"),
            SkipReason::NotComparable => write!(f, "not comparable"),
            SkipReason::Ignored => write!(f, "ignored"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::EcosystemFiltered => write!(f, "ecosystem filtered"),
            SkipReason::UpdateTypeFiltered(kind) => write!(f, "{} update not targeted", kind),
            SkipReason::PrereleaseOnly(version) => write!(f, "latest is pre-release {}", version),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::Offline => write!(f, "offline"),
        }
    }
}

/// Result of an update decision for a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// A newer version is available
    Update {
        /// The dependency being updated
        dependency: Dependency,
        /// Latest version published in the registry
        latest_version: String,
        /// Semantic distance from the current specifier
        update_type: UpdateType,
        /// Specifier pointing at the latest version, operator preserved
        new_specifier: VersionSpecifier,
        /// Whether the current constraint already admits the latest version
        satisfied: bool,
    },
    /// No update reported
    Skip {
        /// The dependency that was skipped
        dependency: Dependency,
        /// The reason for skipping
        reason: SkipReason,
        /// Latest version, when it was fetched
        #[serde(skip_serializing_if = "Option::is_none")]
        latest_version: Option<String>,
    },
}

impl UpdateResult {
    /// Creates an Update result, rewriting the specifier to `latest_version`
    pub fn update(
        dependency: Dependency,
        latest_version: impl Into<String>,
        update_type: UpdateType,
        satisfied: bool,
    ) -> Self {
        let latest_version = latest_version.into();
        let new_specifier = dependency.specifier.rewrite(&latest_version);
        UpdateResult::Update {
            dependency,
            latest_version,
            update_type,
            new_specifier,
            satisfied,
        }
    }

    /// Creates a Skip result
    pub fn skip(dependency: Dependency, reason: SkipReason) -> Self {
        UpdateResult::Skip {
            dependency,
            reason,
            latest_version: None,
        }
    }

    /// Creates a Skip result that still records the fetched latest version
    pub fn skip_with_latest(
        dependency: Dependency,
        reason: SkipReason,
        latest_version: impl Into<String>,
    ) -> Self {
        UpdateResult::Skip {
            dependency,
            reason,
            latest_version: Some(latest_version.into()),
        }
    }

    /// Creates a Skip result for fetch failure
    pub fn skip_fetch_failed(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::skip(dependency, SkipReason::FetchFailed(message.into()))
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns true if the registry lookup failed
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            UpdateResult::Skip {
                reason: SkipReason::FetchFailed(_),
                ..
            }
        )
    }

    /// Returns the dependency reference
    pub fn dependency(&self) -> &Dependency {
        match self {
            UpdateResult::Update { dependency, .. } => dependency,
            UpdateResult::Skip { dependency, .. } => dependency,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.dependency().name
    }

    /// Returns the update type, `None` for skips
    pub fn update_type(&self) -> UpdateType {
        match self {
            UpdateResult::Update { update_type, .. } => *update_type,
            UpdateResult::Skip { .. } => UpdateType::None,
        }
    }

    /// Returns the latest registry version if known
    pub fn latest_version(&self) -> Option<&str> {
        match self {
            UpdateResult::Update { latest_version, .. } => Some(latest_version),
            UpdateResult::Skip { latest_version, .. } => latest_version.as_deref(),
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update {
                dependency,
                new_specifier,
                update_type,
                ..
            } => {
                write!(
                    f,
                    "{}: {} → {} ({})",
                    dependency.name, dependency.specifier, new_specifier, update_type
                )
            }
            UpdateResult::Skip {
                dependency, reason, ..
            } => {
                write!(f, "{}: skipped ({})", dependency.name, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ecosystem;

    fn sample_dependency() -> Dependency {
        Dependency::production(
            "lodash",
            VersionSpecifier::parse("^1.2.3"),
            "dependencies",
            Ecosystem::Npm,
        )
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(format!("{}", SkipReason::UpToDate), "up to date");
        assert_eq!(format!("{}", SkipReason::NotComparable), "not comparable");
        assert_eq!(
            format!("{}", SkipReason::NotInOnlyList),
            "not in --only list"
        );
        assert_eq!(
            format!("{}", SkipReason::UpdateTypeFiltered(UpdateType::Patch)),
            "patch update not targeted"
        );
        assert_eq!(
            format!("{}", SkipReason::FetchFailed("timeout".to_string())),
            "fetch failed: timeout"
        );
        assert_eq!(
            format!("{}", SkipReason::PrereleaseOnly("2.0.0-rc.1".to_string())),
            "latest is pre-release 2.0.0-rc.1"
        );
    }

    #[test]
    fn test_update_rewrites_specifier() {
        let result = UpdateResult::update(sample_dependency(), "2.0.0", UpdateType::Major, false);

        assert!(result.is_update());
        assert!(!result.is_skip());
        assert_eq!(result.package_name(), "lodash");
        assert_eq!(result.update_type(), UpdateType::Major);
        assert_eq!(result.latest_version(), Some("2.0.0"));

        let UpdateResult::Update { new_specifier, .. } = result else {
            panic!("Expected Update variant");
        };
        assert_eq!(new_specifier, VersionSpecifier::Plain("^2.0.0".to_string()));
    }

    #[test]
    fn test_skip_result() {
        let result = UpdateResult::skip(sample_dependency(), SkipReason::Ignored);
        assert!(result.is_skip());
        assert!(!result.is_failure());
        assert_eq!(result.update_type(), UpdateType::None);
        assert_eq!(result.latest_version(), None);
    }

    #[test]
    fn test_skip_with_latest() {
        let result =
            UpdateResult::skip_with_latest(sample_dependency(), SkipReason::UpToDate, "1.2.3");
        assert_eq!(result.latest_version(), Some("1.2.3"));
    }

    #[test]
    fn test_fetch_failure() {
        let result = UpdateResult::skip_fetch_failed(sample_dependency(), "HTTP 500");
        assert!(result.is_failure());
        assert_eq!(format!("{}", result), "lodash: skipped (fetch failed: HTTP 500)");
    }

    #[test]
    fn test_update_display() {
        let result = UpdateResult::update(sample_dependency(), "1.3.0", UpdateType::Minor, true);
        assert_eq!(format!("{}", result), "lodash: ^1.2.3 → ^1.3.0 (minor)");
    }

    #[test]
    fn test_serde_tagged() {
        let result = UpdateResult::skip(sample_dependency(), SkipReason::UpToDate);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "skip");
        assert_eq!(json["reason"], "up_to_date");
        assert!(json.get("latest_version").is_none());
    }
}
