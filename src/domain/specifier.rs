//! Version specifier shapes across ecosystems
//!
//! A specifier is the version constraint exactly as written in a manifest:
//! - Flat strings: `^1.2.3`, `~1.2`, `>=1.0.0`, `==2.0`, `1.0.0`
//! - Ranges: `>=1.0,<2.0`, `>=1.0.0 <2.0.0`, `^1.0 || ^2.0`
//! - Pseudo-versions: `any`, `*`, `{sdk: flutter}`, `{path: ../x}`, `{git: ...}`
//! - Composite maps carrying a `version` key: `{version: ^1.0.0, hosted: ...}`

use crate::version::{is_range, rewrite_str};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Key holding the comparable version inside a composite specifier
pub const VERSION_KEY: &str = "version";

/// Kind of non-registry dependency source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PseudoKind {
    /// No constraint at all (`any`, `*`, empty)
    Any,
    /// SDK-provided package (`sdk: flutter`)
    Sdk,
    /// Local path dependency
    Path,
    /// VCS dependency
    Git,
    /// Custom hosted source without a version constraint
    Hosted,
    /// Tarball or direct URL
    Url,
    /// Workspace/monorepo reference (`workspace:*`, `self.version`)
    Workspace,
    /// Named tag or branch (`latest`, `next`, `dev-main`)
    Tag,
    /// Package alias pointing at another name (`npm:other@^1.0`)
    Alias,
}

impl PseudoKind {
    /// Returns a short label for display
    pub fn label(&self) -> &'static str {
        match self {
            PseudoKind::Any => "any",
            PseudoKind::Sdk => "sdk",
            PseudoKind::Path => "path",
            PseudoKind::Git => "git",
            PseudoKind::Hosted => "hosted",
            PseudoKind::Url => "url",
            PseudoKind::Workspace => "workspace",
            PseudoKind::Tag => "tag",
            PseudoKind::Alias => "alias",
        }
    }
}

impl fmt::Display for PseudoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An object-shaped specifier, key order preserved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeSpec {
    fields: Map<String, Value>,
}

impl CompositeSpec {
    /// Wrap an existing map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the `version` field if it is a string
    pub fn version(&self) -> Option<&str> {
        self.fields.get(VERSION_KEY).and_then(Value::as_str)
    }

    /// Returns an arbitrary field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns true if the given key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the underlying map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a copy with the `version` field replaced, leaving other keys untouched
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        let mut fields = self.fields.clone();
        if let Some(slot) = fields.get_mut(VERSION_KEY) {
            *slot = Value::String(version.into());
        }
        Self { fields }
    }
}

/// A version specifier as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum VersionSpecifier {
    /// Optional operator followed by a single version payload
    Plain(String),
    /// Several comparator clauses
    Range(String),
    /// Not subject to registry comparison
    Pseudo(PseudoKind),
    /// Object-shaped specifier
    Composite(CompositeSpec),
}

impl VersionSpecifier {
    /// Classify a flat specifier string without ecosystem-specific knowledge
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case("any") {
            return VersionSpecifier::Pseudo(PseudoKind::Any);
        }
        if is_range(trimmed) {
            VersionSpecifier::Range(trimmed.to_string())
        } else {
            VersionSpecifier::Plain(trimmed.to_string())
        }
    }

    /// Build a specifier from a structured manifest value
    ///
    /// Strings go through [`VersionSpecifier::parse`], `null` means any version,
    /// and maps become either a composite (when they carry a `version`) or the
    /// pseudo-version matching their source key.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Null => VersionSpecifier::Pseudo(PseudoKind::Any),
            Value::Number(n) => Self::parse(&n.to_string()),
            Value::Object(map) => {
                if map.contains_key(VERSION_KEY) {
                    return VersionSpecifier::Composite(CompositeSpec::new(map.clone()));
                }
                let kind = if map.contains_key("sdk") {
                    PseudoKind::Sdk
                } else if map.contains_key("path") {
                    PseudoKind::Path
                } else if map.contains_key("git") {
                    PseudoKind::Git
                } else if map.contains_key("hosted") {
                    PseudoKind::Hosted
                } else if map.contains_key("url") {
                    PseudoKind::Url
                } else {
                    return VersionSpecifier::Composite(CompositeSpec::new(map.clone()));
                };
                VersionSpecifier::Pseudo(kind)
            }
            Value::Bool(_) | Value::Array(_) => VersionSpecifier::Pseudo(PseudoKind::Any),
        }
    }

    /// Returns the string that takes part in version comparison, if any
    pub fn comparable(&self) -> Option<&str> {
        match self {
            VersionSpecifier::Plain(s) | VersionSpecifier::Range(s) => Some(s),
            VersionSpecifier::Composite(composite) => composite.version(),
            VersionSpecifier::Pseudo(_) => None,
        }
    }

    /// Returns true if rewriting this specifier can change it
    pub fn is_updatable(&self) -> bool {
        self.comparable().is_some()
    }

    /// Returns the pseudo kind for pseudo-versions
    pub fn pseudo_kind(&self) -> Option<PseudoKind> {
        match self {
            VersionSpecifier::Pseudo(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns a short label describing the shape
    pub fn shape_label(&self) -> String {
        match self {
            VersionSpecifier::Plain(_) => "plain".to_string(),
            VersionSpecifier::Range(_) => "range".to_string(),
            VersionSpecifier::Pseudo(kind) => format!("pseudo:{}", kind),
            VersionSpecifier::Composite(_) => "composite".to_string(),
        }
    }

    /// Point this specifier at `new_version`, preserving its operator and shape
    pub fn rewrite(&self, new_version: &str) -> VersionSpecifier {
        crate::version::rewrite(self, new_version)
    }

    /// Text to substitute into a flat manifest slot
    pub fn rewritten_text(&self, new_version: &str) -> Option<String> {
        self.comparable().map(|s| rewrite_str(s, new_version))
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpecifier::Plain(s) | VersionSpecifier::Range(s) => write!(f, "{}", s),
            VersionSpecifier::Pseudo(kind) => write!(f, "<{}>", kind),
            VersionSpecifier::Composite(composite) => {
                let rendered = serde_json::to_string(composite.fields()).map_err(|_| fmt::Error)?;
                write!(f, "{}", rendered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain() {
        assert_eq!(
            VersionSpecifier::parse("^1.2.3"),
            VersionSpecifier::Plain("^1.2.3".to_string())
        );
        assert_eq!(
            VersionSpecifier::parse(" 1.0 "),
            VersionSpecifier::Plain("1.0".to_string())
        );
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            VersionSpecifier::parse(">=1.0,<2.0"),
            VersionSpecifier::Range(">=1.0,<2.0".to_string())
        );
        assert_eq!(
            VersionSpecifier::parse(">=1.0.0 <2.0.0"),
            VersionSpecifier::Range(">=1.0.0 <2.0.0".to_string())
        );
    }

    #[test]
    fn test_parse_any() {
        assert_eq!(
            VersionSpecifier::parse("any"),
            VersionSpecifier::Pseudo(PseudoKind::Any)
        );
        assert_eq!(
            VersionSpecifier::parse("ANY"),
            VersionSpecifier::Pseudo(PseudoKind::Any)
        );
        assert_eq!(
            VersionSpecifier::parse("*"),
            VersionSpecifier::Pseudo(PseudoKind::Any)
        );
        assert_eq!(
            VersionSpecifier::parse(""),
            VersionSpecifier::Pseudo(PseudoKind::Any)
        );
    }

    #[test]
    fn test_from_value_pseudo_maps() {
        assert_eq!(
            VersionSpecifier::from_value(&json!({"sdk": "flutter"})),
            VersionSpecifier::Pseudo(PseudoKind::Sdk)
        );
        assert_eq!(
            VersionSpecifier::from_value(&json!({"path": "../shared"})),
            VersionSpecifier::Pseudo(PseudoKind::Path)
        );
        assert_eq!(
            VersionSpecifier::from_value(&json!({"git": {"url": "https://x/y.git"}})),
            VersionSpecifier::Pseudo(PseudoKind::Git)
        );
        assert_eq!(
            VersionSpecifier::from_value(&json!({"hosted": "https://pub.example.com"})),
            VersionSpecifier::Pseudo(PseudoKind::Hosted)
        );
        assert_eq!(
            VersionSpecifier::from_value(&Value::Null),
            VersionSpecifier::Pseudo(PseudoKind::Any)
        );
    }

    #[test]
    fn test_from_value_composite() {
        let spec = VersionSpecifier::from_value(&json!({
            "hosted": {"url": "x"},
            "version": "^1.0.0"
        }));
        match &spec {
            VersionSpecifier::Composite(composite) => {
                assert_eq!(composite.version(), Some("^1.0.0"));
                assert!(composite.contains_key("hosted"));
            }
            other => panic!("expected composite, got {:?}", other),
        }
        assert_eq!(spec.comparable(), Some("^1.0.0"));
    }

    #[test]
    fn test_from_value_unknown_map_is_composite_without_version() {
        let spec = VersionSpecifier::from_value(&json!({"registry": "internal"}));
        assert!(matches!(spec, VersionSpecifier::Composite(_)));
        assert!(!spec.is_updatable());
    }

    #[test]
    fn test_comparable() {
        assert_eq!(VersionSpecifier::parse("~1.2").comparable(), Some("~1.2"));
        assert_eq!(
            VersionSpecifier::Pseudo(PseudoKind::Git).comparable(),
            None
        );
    }

    #[test]
    fn test_composite_with_version_keeps_key_order() {
        let spec = VersionSpecifier::from_value(&json!({
            "hosted": {"name": "x", "url": "https://example.com"},
            "version": "^1.0.0"
        }));
        let VersionSpecifier::Composite(composite) = spec else {
            panic!("expected composite");
        };
        let updated = composite.with_version("^2.0.0");
        let keys: Vec<&String> = updated.fields().keys().collect();
        assert_eq!(keys, vec!["hosted", "version"]);
        assert_eq!(updated.version(), Some("^2.0.0"));
    }

    #[test]
    fn test_rewritten_text() {
        assert_eq!(
            VersionSpecifier::parse("^1.0.0").rewritten_text("2.0.0"),
            Some("^2.0.0".to_string())
        );
        assert_eq!(
            VersionSpecifier::Pseudo(PseudoKind::Path).rewritten_text("2.0.0"),
            None
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", VersionSpecifier::parse("^1.0.0")), "^1.0.0");
        assert_eq!(
            format!("{}", VersionSpecifier::Pseudo(PseudoKind::Sdk)),
            "<sdk>"
        );
        let composite = VersionSpecifier::from_value(&json!({"version": "^1.0.0"}));
        assert_eq!(format!("{}", composite), r#"{"version":"^1.0.0"}"#);
    }

    #[test]
    fn test_shape_label() {
        assert_eq!(VersionSpecifier::parse("1.0").shape_label(), "plain");
        assert_eq!(
            VersionSpecifier::Pseudo(PseudoKind::Workspace).shape_label(),
            "pseudo:workspace"
        );
    }

    #[test]
    fn test_serde_shape_tag() {
        let json = serde_json::to_string(&VersionSpecifier::parse("^1.0.0")).unwrap();
        assert_eq!(json, r#"{"shape":"plain","value":"^1.0.0"}"#);

        let pseudo = serde_json::to_string(&VersionSpecifier::Pseudo(PseudoKind::Git)).unwrap();
        assert_eq!(pseudo, r#"{"shape":"pseudo","value":"git"}"#);
    }
}
