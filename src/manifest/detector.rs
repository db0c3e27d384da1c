//! Manifest file detection across a workspace tree
//!
//! Features:
//! - Detects package.json, composer.json, requirements*.txt, pyproject.toml, pubspec.yaml
//! - Recursive walk that prunes dependency and build directories
//! - User-supplied glob exclusions matched against workspace-relative paths

use crate::domain::Ecosystem;
use crate::error::ConfigError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Exclusion globs applied unless disabled
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/vendor/**",
    "**/.git/**",
    "**/.dart_tool/**",
    "**/build/**",
    "**/dist/**",
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
];

/// Directory names never descended into when defaults are enabled
const PRUNED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    ".dart_tool",
    "build",
    "dist",
    ".venv",
    "venv",
    "__pycache__",
];

/// Manifest file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// npm package.json
    PackageJson,
    /// Composer composer.json
    ComposerJson,
    /// pip requirements.txt and its variants
    RequirementsTxt,
    /// PEP 621 / Poetry pyproject.toml
    PyprojectToml,
    /// Dart pubspec.yaml
    PubspecYaml,
}

impl ManifestKind {
    /// Determine the manifest format from a file name
    pub fn from_filename(file_name: &str) -> Option<ManifestKind> {
        match file_name {
            "package.json" => Some(ManifestKind::PackageJson),
            "composer.json" => Some(ManifestKind::ComposerJson),
            "pyproject.toml" => Some(ManifestKind::PyprojectToml),
            "pubspec.yaml" => Some(ManifestKind::PubspecYaml),
            other => match Ecosystem::from_filename(other) {
                Some(Ecosystem::Pypi) => Some(ManifestKind::RequirementsTxt),
                _ => None,
            },
        }
    }

    /// Determine the manifest format from a path
    pub fn from_path(path: &Path) -> Option<ManifestKind> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(ManifestKind::from_filename)
    }

    /// Returns the ecosystem of this format
    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            ManifestKind::PackageJson => Ecosystem::Npm,
            ManifestKind::ComposerJson => Ecosystem::Composer,
            ManifestKind::RequirementsTxt | ManifestKind::PyprojectToml => Ecosystem::Pypi,
            ManifestKind::PubspecYaml => Ecosystem::Pub,
        }
    }
}

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Format of the manifest
    pub kind: ManifestKind,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Returns the ecosystem of this manifest
    pub fn ecosystem(&self) -> Ecosystem {
        self.kind.ecosystem()
    }
}

/// Options controlling the workspace walk
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Additional exclusion globs
    pub exclude: Vec<String>,
    /// Whether the default exclusions apply
    pub use_defaults: bool,
    /// Ecosystems to look for; empty means all
    pub ecosystems: Vec<Ecosystem>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            use_defaults: true,
            ecosystems: Vec::new(),
        }
    }
}

impl ScanOptions {
    /// Check that every exclusion glob compiles
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_globset().map(|_| ())
    }

    fn wants(&self, ecosystem: Ecosystem) -> bool {
        self.ecosystems.is_empty() || self.ecosystems.contains(&ecosystem)
    }

    fn build_globset(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        let defaults: &[&str] = if self.use_defaults {
            DEFAULT_EXCLUDE_PATTERNS
        } else {
            &[]
        };

        for pattern in defaults
            .iter()
            .copied()
            .chain(self.exclude.iter().map(String::as_str))
        {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }

        builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: self.exclude.join(", "),
            message: e.to_string(),
        })
    }
}

/// Detect all manifest files under `root`
///
/// `root` may also point directly at a manifest file. Results are sorted by path.
pub fn detect_manifests(root: &Path, options: &ScanOptions) -> Result<Vec<ManifestInfo>, ConfigError> {
    if root.is_file() {
        let manifests = ManifestKind::from_path(root)
            .filter(|kind| options.wants(kind.ecosystem()))
            .map(|kind| ManifestInfo::new(root, kind))
            .into_iter()
            .collect();
        return Ok(manifests);
    }

    let excluded = options.build_globset()?;
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let pruned_by_name = options.use_defaults
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| PRUNED_DIRS.contains(&name));
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !(pruned_by_name || excluded.is_match(relative))
        });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = ManifestKind::from_path(entry.path()) else {
            continue;
        };
        if !options.wants(kind.ecosystem()) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if excluded.is_match(relative) {
            trace!(path = %relative.display(), "manifest excluded");
            continue;
        }

        debug!(path = %entry.path().display(), ecosystem = %kind.ecosystem(), "found manifest");
        manifests.push(ManifestInfo::new(entry.path(), kind));
    }

    Ok(manifests)
}
