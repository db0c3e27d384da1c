//! Dependency information structures

use super::{Ecosystem, VersionSpecifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name as written in the manifest
    pub name: String,
    /// Version specifier as written in the manifest
    pub specifier: VersionSpecifier,
    /// Manifest section the dependency was declared in (`devDependencies`, `require-dev`, ...)
    pub section: String,
    /// Whether the section holds development-only dependencies
    pub is_dev: bool,
    /// The ecosystem this dependency belongs to
    pub ecosystem: Ecosystem,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        specifier: VersionSpecifier,
        section: impl Into<String>,
        is_dev: bool,
        ecosystem: Ecosystem,
    ) -> Self {
        Self {
            name: name.into(),
            specifier,
            section: section.into(),
            is_dev,
            ecosystem,
        }
    }

    /// Creates a new production dependency
    pub fn production(
        name: impl Into<String>,
        specifier: VersionSpecifier,
        section: impl Into<String>,
        ecosystem: Ecosystem,
    ) -> Self {
        Self::new(name, specifier, section, false, ecosystem)
    }

    /// Creates a new development dependency
    pub fn development(
        name: impl Into<String>,
        specifier: VersionSpecifier,
        section: impl Into<String>,
        ecosystem: Ecosystem,
    ) -> Self {
        Self::new(name, specifier, section, true, ecosystem)
    }

    /// Returns the string compared against the registry, if any
    pub fn current(&self) -> Option<&str> {
        self.specifier.comparable()
    }

    /// Returns true if the registry should be asked about this dependency
    pub fn is_comparable(&self) -> bool {
        self.specifier.is_updatable()
    }

    /// Key used to deduplicate registry lookups
    pub fn lookup_key(&self) -> (Ecosystem, String) {
        (self.ecosystem, self.name.clone())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev { " (dev)" } else { "" };
        write!(
            f,
            "{}@{}{} [{}]",
            self.name, self.specifier, dev_marker, self.ecosystem
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PseudoKind;

    fn caret() -> VersionSpecifier {
        VersionSpecifier::parse("^1.2.3")
    }

    #[test]
    fn test_dependency_production() {
        let dep = Dependency::production("react", caret(), "dependencies", Ecosystem::Npm);
        assert_eq!(dep.name, "react");
        assert_eq!(dep.section, "dependencies");
        assert!(!dep.is_dev);
    }

    #[test]
    fn test_dependency_development() {
        let dep = Dependency::development("jest", caret(), "devDependencies", Ecosystem::Npm);
        assert!(dep.is_dev);
    }

    #[test]
    fn test_dependency_current() {
        let dep = Dependency::production("lodash", caret(), "dependencies", Ecosystem::Npm);
        assert_eq!(dep.current(), Some("^1.2.3"));
        assert!(dep.is_comparable());

        let path = Dependency::production(
            "shared",
            VersionSpecifier::Pseudo(PseudoKind::Path),
            "dependencies",
            Ecosystem::Pub,
        );
        assert_eq!(path.current(), None);
        assert!(!path.is_comparable());
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::production("lodash", caret(), "dependencies", Ecosystem::Npm);
        assert_eq!(format!("{}", dep), "lodash@^1.2.3 [npm]");

        let dev = Dependency::development("pytest", VersionSpecifier::parse(">=7.0"), "dev", Ecosystem::Pypi);
        assert_eq!(format!("{}", dev), "pytest@>=7.0 (dev) [PyPI]");
    }

    #[test]
    fn test_lookup_key_ignores_section() {
        let a = Dependency::production("http", caret(), "dependencies", Ecosystem::Pub);
        let b = Dependency::development("http", caret(), "dev_dependencies", Ecosystem::Pub);
        assert_eq!(a.lookup_key(), b.lookup_key());
    }

    #[test]
    fn test_serde_dependency() {
        let dep = Dependency::production("lodash", caret(), "dependencies", Ecosystem::Npm);
        let json = serde_json::to_string(&dep).unwrap();
        let parsed: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dep);
    }
}
