//! Update filter configuration
//!
//! This module provides the UpdateFilter struct that encapsulates
//! all filter options for update judgment.

use crate::domain::{Ecosystem, UpdateType};

/// Filter configuration for update judgment
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Ecosystems to process (empty means all)
    pub ecosystems: Vec<Ecosystem>,
    /// Packages never checked
    pub ignore: Vec<String>,
    /// If non-empty, only check these packages
    pub only: Vec<String>,
    /// Update kinds to report (empty means all)
    pub targets: Vec<UpdateType>,
    /// Report a pre-release latest for a stable current version
    pub include_prerelease: bool,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ecosystems to process
    pub fn with_ecosystems(mut self, ecosystems: Vec<Ecosystem>) -> Self {
        self.ecosystems = ecosystems;
        self
    }

    /// Set packages to ignore
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Set packages to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Set the update kinds to report
    pub fn with_targets(mut self, targets: Vec<UpdateType>) -> Self {
        self.targets = targets;
        self
    }

    /// Set whether pre-release latest versions are reported
    pub fn with_prerelease(mut self, include: bool) -> Self {
        self.include_prerelease = include;
        self
    }

    /// Check if an ecosystem should be processed
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        self.ecosystems.is_empty() || self.ecosystems.contains(&ecosystem)
    }

    /// Check if a package is on the ignore list
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    /// Check if a package passes the --only list
    pub fn is_selected(&self, name: &str) -> bool {
        self.only.is_empty() || self.only.iter().any(|p| p.eq_ignore_ascii_case(name))
    }

    /// Check if an update kind should be reported
    pub fn allows(&self, update_type: UpdateType) -> bool {
        update_type.is_update() && (self.targets.is_empty() || self.targets.contains(&update_type))
    }
}
