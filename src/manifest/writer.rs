//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying accepted updates to manifest files
//! - Dry-run mode support (no actual file modifications)
//! - Per-dependency failures that do not abort the rest of the file

use super::{get_parser, ManifestKind, ManifestParser};
use crate::domain::{ManifestUpdateResult, UpdateResult};
use crate::error::ManifestError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writer for manifest files that applies version updates
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying updates to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Number of updates successfully applied
    pub updates_applied: usize,
    /// Number of updates that failed
    pub updates_failed: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Errors encountered during update
    pub errors: Vec<String>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            updates_applied: 0,
            updates_failed: 0,
            file_modified: false,
            errors: Vec::new(),
        }
    }

    /// Returns true if any updates were successfully applied
    pub fn has_updates(&self) -> bool {
        self.updates_applied > 0
    }

    /// Returns true if any errors occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Apply every `Update` result of one manifest and write the file once
    pub fn apply_updates(
        &self,
        manifest_result: &ManifestUpdateResult,
        parser: &dyn ManifestParser,
    ) -> Result<WriteResult, ManifestError> {
        let path = &manifest_result.path;
        let mut result = WriteResult::new(path);

        let original = read_manifest(path)?;
        let mut current_content = original.clone();

        for update in manifest_result.updates() {
            let UpdateResult::Update {
                dependency,
                latest_version,
                ..
            } = update
            else {
                continue;
            };

            match parser.update_version(&current_content, dependency, latest_version) {
                Ok(updated_content) => {
                    debug!(
                        package = %dependency.name,
                        section = %dependency.section,
                        latest = %latest_version,
                        "rewrote specifier"
                    );
                    current_content = updated_content;
                    result.updates_applied += 1;
                }
                Err(e) => {
                    warn!(package = %dependency.name, error = %e, "could not rewrite specifier");
                    result.updates_failed += 1;
                    result
                        .errors
                        .push(format!("Failed to update {}: {}", dependency.name, e));
                }
            }
        }

        if current_content != original && !self.dry_run {
            write_manifest(path, &current_content)?;
            result.file_modified = true;
        }

        Ok(result)
    }

    /// Apply updates to every manifest that has some, marking the ones written
    pub fn apply_all_updates(&self, manifests: &mut [ManifestUpdateResult]) -> Vec<WriteResult> {
        let mut results = Vec::new();

        for manifest in manifests.iter_mut().filter(|m| m.has_updates()) {
            let Some(kind) = ManifestKind::from_path(&manifest.path) else {
                let mut result = WriteResult::new(&manifest.path);
                result.errors.push(format!(
                    "Failed to process manifest: {}",
                    ManifestError::UnsupportedFormat {
                        path: manifest.path.clone()
                    }
                ));
                results.push(result);
                continue;
            };

            let parser = get_parser(kind);
            match self.apply_updates(manifest, parser.as_ref()) {
                Ok(result) => {
                    if result.file_modified {
                        manifest.mark_modified();
                    }
                    results.push(result);
                }
                Err(e) => {
                    let mut result = WriteResult::new(&manifest.path);
                    result
                        .errors
                        .push(format!("Failed to process manifest: {}", e));
                    results.push(result);
                }
            }
        }

        results
    }
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
