//! Package ecosystem definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// npm (package.json)
    Npm,
    /// Composer (composer.json)
    Composer,
    /// PyPI (requirements.txt, pyproject.toml)
    Pypi,
    /// Dart/Flutter Pub (pubspec.yaml)
    Pub,
}

impl Ecosystem {
    /// Returns the manifest filenames recognised for this ecosystem
    ///
    /// PyPI additionally matches `requirements-*.txt` variants, see [`Ecosystem::from_filename`].
    pub fn manifest_filenames(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Npm => &["package.json"],
            Ecosystem::Composer => &["composer.json"],
            Ecosystem::Pypi => &["requirements.txt", "pyproject.toml"],
            Ecosystem::Pub => &["pubspec.yaml"],
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Composer => "Composer",
            Ecosystem::Pypi => "PyPI",
            Ecosystem::Pub => "Pub",
        }
    }

    /// Returns the name of the public registry serving this ecosystem
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Composer => "Packagist",
            Ecosystem::Pypi => "PyPI",
            Ecosystem::Pub => "pub.dev",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Npm,
            Ecosystem::Composer,
            Ecosystem::Pypi,
            Ecosystem::Pub,
        ]
    }

    /// Determine the ecosystem of a manifest from its file name
    pub fn from_filename(file_name: &str) -> Option<Ecosystem> {
        if let Some(ecosystem) = Ecosystem::all()
            .iter()
            .find(|e| e.manifest_filenames().contains(&file_name))
        {
            return Some(*ecosystem);
        }

        // requirements-dev.txt, requirements_test.txt, ...
        let is_requirements_variant = file_name.starts_with("requirements")
            && file_name.ends_with(".txt")
            && matches!(file_name.as_bytes().get(12), Some(b'-') | Some(b'_'));
        is_requirements_variant.then_some(Ecosystem::Pypi)
    }

    /// Parse an ecosystem from a CLI/config token
    pub fn from_token(token: &str) -> Option<Ecosystem> {
        match token.to_ascii_lowercase().as_str() {
            "npm" | "node" | "js" => Some(Ecosystem::Npm),
            "composer" | "php" | "packagist" => Some(Ecosystem::Composer),
            "pypi" | "python" | "pip" => Some(Ecosystem::Pypi),
            "pub" | "dart" | "flutter" => Some(Ecosystem::Pub),
            _ => None,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        assert_eq!(Ecosystem::from_filename("package.json"), Some(Ecosystem::Npm));
        assert_eq!(
            Ecosystem::from_filename("composer.json"),
            Some(Ecosystem::Composer)
        );
        assert_eq!(
            Ecosystem::from_filename("requirements.txt"),
            Some(Ecosystem::Pypi)
        );
        assert_eq!(
            Ecosystem::from_filename("pyproject.toml"),
            Some(Ecosystem::Pypi)
        );
        assert_eq!(Ecosystem::from_filename("pubspec.yaml"), Some(Ecosystem::Pub));
    }

    #[test]
    fn test_from_filename_requirements_variants() {
        assert_eq!(
            Ecosystem::from_filename("requirements-dev.txt"),
            Some(Ecosystem::Pypi)
        );
        assert_eq!(
            Ecosystem::from_filename("requirements_test.txt"),
            Some(Ecosystem::Pypi)
        );
        assert_eq!(Ecosystem::from_filename("requirementsfoo.txt"), None);
        assert_eq!(Ecosystem::from_filename("requirements.in"), None);
    }

    #[test]
    fn test_from_filename_unknown() {
        assert_eq!(Ecosystem::from_filename("Cargo.toml"), None);
        assert_eq!(Ecosystem::from_filename("pubspec.lock"), None);
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Ecosystem::from_token("npm"), Some(Ecosystem::Npm));
        assert_eq!(Ecosystem::from_token("PHP"), Some(Ecosystem::Composer));
        assert_eq!(Ecosystem::from_token("python"), Some(Ecosystem::Pypi));
        assert_eq!(Ecosystem::from_token("dart"), Some(Ecosystem::Pub));
        assert_eq!(Ecosystem::from_token("cargo"), None);
    }

    #[test]
    fn test_display_and_registry_names() {
        assert_eq!(format!("{}", Ecosystem::Pypi), "PyPI");
        assert_eq!(Ecosystem::Composer.registry_name(), "Packagist");
        assert_eq!(Ecosystem::Pub.registry_name(), "pub.dev");
    }

    #[test]
    fn test_all_ecosystems() {
        assert_eq!(Ecosystem::all().len(), 4);
    }

    #[test]
    fn test_serde_roundtrip_names() {
        assert_eq!(serde_json::to_string(&Ecosystem::Pub).unwrap(), "\"pub\"");
        let parsed: Ecosystem = serde_json::from_str("\"composer\"").unwrap();
        assert_eq!(parsed, Ecosystem::Composer);
    }
}
