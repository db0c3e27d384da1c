//! Inspection result summary types
//!
//! Provides structures for tracking results at file and overall levels.

use super::{Ecosystem, UpdateResult, UpdateType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Results for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestUpdateResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Ecosystem of this manifest
    pub ecosystem: Ecosystem,
    /// Individual dependency results
    pub results: Vec<UpdateResult>,
    /// Whether the file was rewritten on disk
    pub modified: bool,
}

impl ManifestUpdateResult {
    /// Creates a new ManifestUpdateResult
    pub fn new(path: impl Into<PathBuf>, ecosystem: Ecosystem) -> Self {
        Self {
            path: path.into(),
            ecosystem,
            results: Vec::new(),
            modified: false,
        }
    }

    /// Adds a dependency result
    pub fn add_result(&mut self, result: UpdateResult) {
        self.results.push(result);
    }

    /// Marks the manifest as rewritten
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Returns the number of available updates
    pub fn update_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_update()).count()
    }

    /// Returns the number of skips
    pub fn skip_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Returns all updates
    pub fn updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_update())
    }

    /// Returns all skips
    pub fn skips(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_skip())
    }

    /// Returns true if any update is available
    pub fn has_updates(&self) -> bool {
        self.update_count() > 0
    }
}

/// Overall summary of an inspection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Results for each manifest file processed
    pub manifests: Vec<ManifestUpdateResult>,
    /// Whether manifests were meant to be rewritten
    pub apply: bool,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl UpdateSummary {
    /// Creates a new UpdateSummary
    pub fn new(apply: bool, dry_run: bool) -> Self {
        Self {
            manifests: Vec::new(),
            apply,
            dry_run,
        }
    }

    /// Adds a manifest result
    pub fn add_manifest(&mut self, manifest: ManifestUpdateResult) {
        self.manifests.push(manifest);
    }

    /// Returns the total number of files processed
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the total number of files modified
    pub fn files_modified(&self) -> usize {
        self.manifests.iter().filter(|m| m.modified).count()
    }

    /// Returns the total number of available updates
    pub fn total_updates(&self) -> usize {
        self.manifests.iter().map(|m| m.update_count()).sum()
    }

    /// Returns the total number of dependencies skipped
    pub fn total_skips(&self) -> usize {
        self.manifests.iter().map(|m| m.skip_count()).sum()
    }

    /// Returns the total number of dependencies processed
    pub fn total_dependencies(&self) -> usize {
        self.manifests.iter().map(|m| m.results.len()).sum()
    }

    /// Returns the number of failed registry lookups
    pub fn total_failures(&self) -> usize {
        self.manifests
            .iter()
            .flat_map(|m| m.results.iter())
            .filter(|r| r.is_failure())
            .count()
    }

    /// Returns the number of updates of the given kind
    pub fn count_by_type(&self, update_type: UpdateType) -> usize {
        self.all_updates()
            .filter(|r| r.update_type() == update_type)
            .count()
    }

    /// Returns true if any files were modified
    pub fn has_changes(&self) -> bool {
        self.files_modified() > 0
    }

    /// Returns manifests for a specific ecosystem
    pub fn by_ecosystem(
        &self,
        ecosystem: Ecosystem,
    ) -> impl Iterator<Item = &ManifestUpdateResult> {
        self.manifests
            .iter()
            .filter(move |m| m.ecosystem == ecosystem)
    }

    /// Returns all updates across all manifests
    pub fn all_updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.manifests.iter().flat_map(|m| m.updates())
    }

    /// Returns all skips across all manifests
    pub fn all_skips(&self) -> impl Iterator<Item = &UpdateResult> {
        self.manifests.iter().flat_map(|m| m.skips())
    }
}

impl Default for UpdateSummary {
    fn default() -> Self {
        Self::new(false, false)
    }
}
