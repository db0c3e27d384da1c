//! Update judgment logic for dependencies
//!
//! This module provides:
//! - Update filter configuration from CLI args and config
//! - Latest version reported by a registry
//! - Update judgment engine that decides whether to report an update or skip

mod filter;
mod latest;

pub use filter::UpdateFilter;
pub use latest::{parse_timestamp, LatestVersion};

use crate::domain::{Dependency, SkipReason, UpdateResult};
use crate::version::{classify_specifier, coerce, satisfies};
use tracing::trace;

/// Update judgment engine that decides whether to update a dependency
pub struct UpdateJudge {
    filter: UpdateFilter,
}

impl UpdateJudge {
    /// Create a new UpdateJudge with the given filter
    pub fn new(filter: UpdateFilter) -> Self {
        Self { filter }
    }

    /// Returns the filter this judge applies
    pub fn filter(&self) -> &UpdateFilter {
        &self.filter
    }

    /// Check if a dependency should be looked up at all
    /// Returns Some(SkipReason) if it should be skipped, None if it should be processed
    pub fn should_skip(&self, dependency: &Dependency) -> Option<SkipReason> {
        if !self.filter.should_process_ecosystem(dependency.ecosystem) {
            return Some(SkipReason::EcosystemFiltered);
        }
        if self.filter.is_ignored(&dependency.name) {
            return Some(SkipReason::Ignored);
        }
        if !self.filter.is_selected(&dependency.name) {
            return Some(SkipReason::NotInOnlyList);
        }
        if !dependency.is_comparable() {
            return Some(SkipReason::NotComparable);
        }
        None
    }

    /// Judge a dependency against the latest published version
    pub fn judge(&self, dependency: &Dependency, latest: &LatestVersion) -> UpdateResult {
        if let Some(reason) = self.should_skip(dependency) {
            return UpdateResult::skip(dependency.clone(), reason);
        }
        let Some(current) = dependency.current() else {
            return UpdateResult::skip(dependency.clone(), SkipReason::NotComparable);
        };

        let current_is_prerelease = coerce(current).is_some_and(|v| v.is_prerelease());
        if latest.is_prerelease() && !current_is_prerelease && !self.filter.include_prerelease {
            return UpdateResult::skip_with_latest(
                dependency.clone(),
                SkipReason::PrereleaseOnly(latest.version.clone()),
                &latest.version,
            );
        }

        let update_type = classify_specifier(&dependency.specifier, &latest.version);
        trace!(package = %dependency.name, current, latest = %latest.version, %update_type, "classified");

        if !update_type.is_update() {
            return UpdateResult::skip_with_latest(
                dependency.clone(),
                SkipReason::UpToDate,
                &latest.version,
            );
        }
        if !self.filter.allows(update_type) {
            return UpdateResult::skip_with_latest(
                dependency.clone(),
                SkipReason::UpdateTypeFiltered(update_type),
                &latest.version,
            );
        }

        let satisfied = satisfies(current, &latest.version);
        UpdateResult::update(dependency.clone(), &latest.version, update_type, satisfied)
    }
}
