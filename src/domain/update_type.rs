//! Semantic distance between a current specifier and the latest version

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of update available for a dependency
///
/// `None` covers both "up to date" and "could not determine"; callers that need
/// to tell them apart look at the skip reason recorded by the update judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// No update, or not comparable
    None,
    /// Only the pre-release tag differs
    Prerelease,
    /// Patch component differs
    Patch,
    /// Minor component differs
    Minor,
    /// Major component differs
    Major,
}

impl UpdateType {
    /// Returns the lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            UpdateType::None => "none",
            UpdateType::Prerelease => "prerelease",
            UpdateType::Patch => "patch",
            UpdateType::Minor => "minor",
            UpdateType::Major => "major",
        }
    }

    /// Returns true if an update is available
    pub fn is_update(&self) -> bool {
        *self != UpdateType::None
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for UpdateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(UpdateType::None),
            "prerelease" | "pre" => Ok(UpdateType::Prerelease),
            "patch" => Ok(UpdateType::Patch),
            "minor" => Ok(UpdateType::Minor),
            "major" => Ok(UpdateType::Major),
            other => Err(format!(
                "invalid update type '{}': expected major, minor, patch or prerelease",
                other
            )),
        }
    }
}
