//! Manifest file detection and parsing
//!
//! This module provides functionality to:
//! - Detect manifest files across a workspace tree
//! - Parse dependencies from each supported manifest format
//! - Rewrite a single dependency's specifier in place

mod composer_json;
mod detector;
mod json_text;
mod package_json;
mod pep508;
mod pubspec_yaml;
mod pyproject_toml;
mod requirements_txt;
mod writer;

pub use composer_json::ComposerJsonParser;
pub use detector::{detect_manifests, ManifestInfo, ManifestKind, ScanOptions, DEFAULT_EXCLUDE_PATTERNS};
pub use package_json::PackageJsonParser;
pub use pubspec_yaml::PubspecYamlParser;
pub use pyproject_toml::PyprojectTomlParser;
pub use requirements_txt::RequirementsTxtParser;
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::domain::{Dependency, Ecosystem};
use crate::error::ManifestError;
use std::path::Path;

/// Trait for parsing manifest files
pub trait ManifestParser: Send + Sync {
    /// Parse dependencies from manifest content
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError>;

    /// Returns the manifest format this parser handles
    fn kind(&self) -> ManifestKind;

    /// Returns the ecosystem this parser handles
    fn ecosystem(&self) -> Ecosystem {
        self.kind().ecosystem()
    }

    /// Point `dependency` at `new_version` in the manifest content
    ///
    /// Only the specifier text is replaced; its operator is preserved and the
    /// rest of the content is returned byte-identical.
    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError>;
}

/// Get a manifest parser for the specified format
pub fn get_parser(kind: ManifestKind) -> Box<dyn ManifestParser> {
    match kind {
        ManifestKind::PackageJson => Box::new(PackageJsonParser),
        ManifestKind::ComposerJson => Box::new(ComposerJsonParser),
        ManifestKind::RequirementsTxt => Box::new(RequirementsTxtParser),
        ManifestKind::PyprojectToml => Box::new(PyprojectTomlParser),
        ManifestKind::PubspecYaml => Box::new(PubspecYamlParser),
    }
}

/// Parse dependencies from a manifest file path
pub fn parse_manifest(path: &Path) -> Result<Vec<Dependency>, ManifestError> {
    let kind = ManifestKind::from_path(path).ok_or_else(|| ManifestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = read_manifest(path)?;

    get_parser(kind)
        .parse(&content)
        .map_err(|e| e.with_path(path))
}

/// Text to write in place of the dependency's current specifier
fn rewritten_text(
    dependency: &Dependency,
    new_version: &str,
    file_name: &str,
) -> Result<String, ManifestError> {
    dependency
        .specifier
        .rewritten_text(new_version)
        .ok_or_else(|| ManifestError::dependency_not_found(file_name, &dependency.name))
}
