//! Diff output formatter for showing specifier changes
//!
//! Each update becomes a hunk with the old and new specifier rendered the way
//! the manifest format writes them.

use crate::domain::{Dependency, Ecosystem, ManifestUpdateResult, UpdateResult, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use std::io::Write;

/// Diff formatter for showing specifier changes
pub struct DiffFormatter {
    dry_run: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }
}

/// One dependency entry as it reads in its manifest
fn slot_line(dependency: &Dependency, specifier: &str) -> String {
    match dependency.ecosystem {
        Ecosystem::Npm | Ecosystem::Composer => {
            format!("  \"{}\": \"{}\"", dependency.name, specifier)
        }
        Ecosystem::Pypi => format!("{}{}", dependency.name, specifier),
        Ecosystem::Pub => format!("  {}: {}", dependency.name, specifier),
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for manifest in &result.summary.manifests {
            if manifest.has_updates() {
                self.format_manifest(manifest, writer)?;
                writeln!(writer)?;
            }
        }
        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let verb = if summary.apply && !self.dry_run {
            "updated"
        } else {
            "would be updated"
        };
        writeln!(
            writer,
            "{}# {} package(s) {}, {} skipped",
            self.dry_run_prefix(),
            summary.total_updates(),
            verb,
            summary.total_skips()
        )
    }

    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !manifest.has_updates() {
            return Ok(());
        }

        let prefix = self.dry_run_prefix();
        writeln!(writer, "{}--- a/{}", prefix, manifest.path.display())?;
        writeln!(writer, "{}+++ b/{}", prefix, manifest.path.display())?;

        for result in manifest.updates() {
            let UpdateResult::Update {
                dependency,
                latest_version,
                new_specifier,
                ..
            } = result
            else {
                continue;
            };

            let old = dependency.current().unwrap_or_default();
            let new = new_specifier.comparable().unwrap_or(latest_version);
            writeln!(writer, "@@ {} ({}) @@", dependency.name, dependency.section)?;
            writeln!(writer, "-{}", slot_line(dependency, old))?;
            writeln!(writer, "+{}", slot_line(dependency, new))?;
        }

        Ok(())
    }
}
