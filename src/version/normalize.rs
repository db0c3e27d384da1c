//! Best-effort coercion of version strings into comparable triples
//!
//! Coercion rules:
//! - the first `N`, `N.N` or `N.N.N` run wins; wildcard components (`x`, `*`) count as 0
//! - missing trailing components default to 0
//! - a pre-release suffix directly after the run is carried over
//!   (`-alpha.1`, `-beta1`, `a1`, `rc2`, `.dev3`); PEP 440 `.postN` is not a pre-release
//! - build metadata and anything after the suffix is dropped
//!
//! Input that contains no numeric run yields `None`.

use regex::Regex;
use semver::{Prerelease, Version};
use std::fmt;
use std::sync::LazyLock;

/// Characters that may form a leading constraint operator
pub const OPERATOR_CHARS: [char; 5] = ['~', '^', '>', '=', '<'];

static NUMERIC_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?").unwrap());

/// A version reduced to `major.minor.patch` plus an optional pre-release tag
///
/// Field order gives the derived ordering: numeric components first, then the
/// pre-release, where an empty pre-release sorts above any non-empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
}

impl NormalizedVersion {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
        }
    }

    /// Attach a pre-release tag, ignoring tags semver would reject
    pub fn with_pre(mut self, pre: &str) -> Self {
        self.pre = Prerelease::new(pre).unwrap_or(Prerelease::EMPTY);
        self
    }

    /// Returns true if this version carries a pre-release tag
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Returns the release triple without pre-release tag
    pub fn release(&self) -> NormalizedVersion {
        NormalizedVersion::new(self.major, self.minor, self.patch)
    }

    /// Convert to a `semver::Version`
    pub fn to_semver(&self) -> Version {
        let mut version = Version::new(self.major, self.minor, self.patch);
        version.pre = self.pre.clone();
        version
    }
}

impl From<Version> for NormalizedVersion {
    fn from(version: Version) -> Self {
        Self {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            pre: version.pre,
        }
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_prerelease() {
            write!(f, "-{}", self.pre)?;
        }
        Ok(())
    }
}

/// Split a specifier into its leading operator run and the remainder
///
/// The operator is the longest prefix made only of `~ ^ > = <`.
pub fn split_operator(spec: &str) -> (&str, &str) {
    let rest = spec.trim_start_matches(OPERATOR_CHARS);
    spec.split_at(spec.len() - rest.len())
}

/// Coerce an arbitrary version or specifier string into a [`NormalizedVersion`]
pub fn coerce(input: &str) -> Option<NormalizedVersion> {
    let (_, payload) = split_operator(input.trim());
    let caps = NUMERIC_RUN_RE.captures(payload)?;
    let whole = caps.get(0)?;

    let major = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let minor = component(caps.get(2).map(|m| m.as_str()))?;
    let patch = component(caps.get(3).map(|m| m.as_str()))?;

    let mut version = NormalizedVersion::new(major, minor, patch);
    if let Some(pre) = prerelease_suffix(&payload[whole.end()..]) {
        version = version.with_pre(&pre);
    }
    Some(version)
}

/// Parse an optional dotted component; wildcards and absence become 0
fn component(raw: Option<&str>) -> Option<u64> {
    match raw {
        None | Some("x") | Some("X") | Some("*") => Some(0),
        Some(digits) => digits.parse().ok(),
    }
}

/// Extract a pre-release tag that immediately follows the numeric run
fn prerelease_suffix(rest: &str) -> Option<String> {
    let body = if let Some(stripped) = rest.strip_prefix('-') {
        stripped
    } else if let Some(stripped) = rest.strip_prefix('.') {
        if !stripped.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        stripped
    } else if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        rest
    } else {
        return None;
    };

    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        .unwrap_or(body.len());
    let tag = body[..end].trim_matches(|c| c == '.' || c == '-');
    if tag.is_empty() || tag.to_ascii_lowercase().starts_with("post") {
        return None;
    }

    let identifiers: Vec<String> = tag
        .to_ascii_lowercase()
        .split('.')
        .filter(|id| !id.is_empty())
        .map(|id| {
            if id.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = id.trim_start_matches('0');
                if trimmed.is_empty() {
                    "0".to_string()
                } else {
                    trimmed.to_string()
                }
            } else {
                id.to_string()
            }
        })
        .collect();

    if identifiers.is_empty() {
        None
    } else {
        Some(identifiers.join("."))
    }
}
