//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-manifest grouping with colored update-type labels
//! - Production dependencies before development ones
//! - Skipped dependency display with reasons (verbose mode)
//! - Offline listing of dependencies and their specifier shapes
//! - Summary with a breakdown by update type

use crate::domain::{ManifestUpdateResult, UpdateResult, UpdateSummary, UpdateType};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputConfig, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

const MIN_NAME_WIDTH: usize = 20;

/// Update kinds in the order they are summarised
const SUMMARY_ORDER: [UpdateType; 4] = [
    UpdateType::Major,
    UpdateType::Minor,
    UpdateType::Patch,
    UpdateType::Prerelease,
];

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    offline: bool,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            offline: false,
            color: true,
        }
    }

    /// Create a text formatter from output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            verbosity: config.verbosity,
            dry_run: config.dry_run,
            offline: config.offline,
            color: config.color,
        }
    }

    /// Set whether to use colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set offline listing mode
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    fn dry_run_prefix(&self) -> String {
        match (self.dry_run, self.color) {
            (true, true) => format!("{} ", "(dry-run)".cyan()),
            (true, false) => "(dry-run) ".to_string(),
            (false, _) => String::new(),
        }
    }

    fn paint_type(&self, update_type: UpdateType) -> String {
        let label = update_type.label();
        if !self.color {
            return label.to_string();
        }
        match update_type {
            UpdateType::Major => label.red().bold().to_string(),
            UpdateType::Minor => label.yellow().to_string(),
            UpdateType::Patch => label.green().to_string(),
            UpdateType::Prerelease => label.magenta().to_string(),
            UpdateType::None => label.dimmed().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn name_width(results: &[&UpdateResult]) -> usize {
        results
            .iter()
            .map(|r| r.package_name().len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH)
    }

    fn write_header(
        &self,
        manifest: &ManifestUpdateResult,
        detail: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let path = manifest.path.display().to_string();
        let ecosystem = format!("({})", manifest.ecosystem.display_name());
        if self.color {
            writeln!(
                writer,
                "{}{} {} {}",
                self.dry_run_prefix(),
                path.bold(),
                ecosystem.dimmed(),
                detail
            )
        } else {
            writeln!(
                writer,
                "{}{} {} {}",
                self.dry_run_prefix(),
                path,
                ecosystem,
                detail
            )
        }
    }

    fn write_update_line(
        &self,
        result: &UpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Update {
            dependency,
            latest_version,
            update_type,
            new_specifier,
            satisfied,
        } = result
        else {
            return Ok(());
        };

        let current = dependency.current().unwrap_or_default();
        let target = new_specifier.comparable().unwrap_or(latest_version);
        let mut notes = String::new();
        if *satisfied {
            notes.push_str(" in range");
        }
        if dependency.is_dev {
            notes.push_str(" dev");
        }

        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {} [{}]{}",
                dependency.name,
                current.dimmed(),
                "→".dimmed(),
                target.bright_white().bold(),
                self.paint_type(*update_type),
                notes.dimmed(),
                width = width
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                dependency.name,
                current,
                target,
                update_type.label(),
                notes,
                width = width
            )
        }
    }

    fn write_skip_line(
        &self,
        result: &UpdateResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Skip {
            dependency,
            reason,
            latest_version,
        } = result
        else {
            return Ok(());
        };

        let latest = latest_version
            .as_deref()
            .map(|v| format!(", latest {}", v))
            .unwrap_or_default();
        let line = format!(
            "  {:width$} {} ({}{})",
            dependency.name,
            dependency.specifier,
            reason,
            latest,
            width = width
        );
        writeln!(writer, "{}", self.dim(&line))
    }

    /// Offline mode: every dependency with its specifier shape
    fn write_listing(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let count = manifest.results.len();
        let detail = self.dim(&format!(
            "{} {}",
            count,
            if count == 1 { "dependency" } else { "dependencies" }
        ));
        self.write_header(manifest, &detail, writer)?;

        let all: Vec<&UpdateResult> = manifest.results.iter().collect();
        let width = Self::name_width(&all);
        for result in all {
            let dependency = result.dependency();
            let dev = if dependency.is_dev { " dev" } else { "" };
            writeln!(
                writer,
                "  {:width$} {} {}",
                dependency.name,
                dependency.specifier,
                self.dim(&format!("[{}] {}{}", dependency.specifier.shape_label(), dependency.section, dev)),
                width = width
            )?;
        }
        writeln!(writer)
    }

    fn write_errors(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if result.errors.is_empty() {
            return Ok(());
        }
        if self.color {
            writeln!(writer, "{}:", "Errors".red().bold())?;
        } else {
            writeln!(writer, "Errors:")?;
        }
        for error in &result.errors {
            if self.color {
                writeln!(writer, "  {} {}", "✗".red(), error)?;
            } else {
                writeln!(writer, "  - {}", error)?;
            }
        }
        writeln!(writer)
    }

    fn update_breakdown(&self, summary: &UpdateSummary) -> String {
        SUMMARY_ORDER
            .iter()
            .filter_map(|&kind| {
                let count = summary.count_by_type(kind);
                (count > 0).then(|| format!("{} {}", count, self.paint_type(kind)))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        for manifest in &result.summary.manifests {
            self.format_manifest(manifest, writer)?;
        }
        self.write_errors(result, writer)?;
        self.format_summary(&result.summary, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let updates = summary.total_updates();
        let verb = if summary.apply && !self.dry_run {
            "updated"
        } else if summary.apply {
            "would be updated"
        } else {
            "outdated"
        };

        if self.verbosity == Verbosity::Quiet {
            if self.offline {
                return writeln!(
                    writer,
                    "{} dependencies in {} manifest(s)",
                    summary.total_dependencies(),
                    summary.files_processed()
                );
            }
            return if updates > 0 {
                writeln!(writer, "{}{} {}", prefix, updates, verb)
            } else {
                writeln!(writer, "{}{}", prefix, self.dim("No updates"))
            };
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
        }
        writeln!(
            writer,
            "  {} manifest(s), {} dependencies",
            summary.files_processed(),
            summary.total_dependencies()
        )?;

        if self.offline {
            return Ok(());
        }

        if updates > 0 {
            writeln!(
                writer,
                "  {} package(s) {} ({})",
                updates,
                verb,
                self.update_breakdown(summary)
            )?;
        } else {
            writeln!(writer, "  {}", self.dim("Everything is up to date"))?;
        }

        let failures = summary.total_failures();
        if failures > 0 {
            writeln!(writer, "  {} lookup(s) failed", failures)?;
        }
        if summary.apply && !self.dry_run {
            writeln!(writer, "  {} file(s) modified", summary.files_modified())?;
        }
        Ok(())
    }

    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.offline {
            return self.write_listing(manifest, writer);
        }

        let updates: Vec<&UpdateResult> = manifest.updates().collect();
        let skips: Vec<&UpdateResult> = manifest.skips().collect();
        let show_skips = self.verbosity == Verbosity::Verbose && !skips.is_empty();
        if updates.is_empty() && !show_skips {
            return Ok(());
        }

        let detail = format!(
            "{} {}, {} skipped",
            updates.len(),
            if updates.len() == 1 { "update" } else { "updates" },
            skips.len()
        );
        let detail = if self.color {
            detail.dimmed().to_string()
        } else {
            detail
        };
        self.write_header(manifest, &detail, writer)?;

        let (prod, dev): (Vec<&UpdateResult>, Vec<&UpdateResult>) =
            updates.into_iter().partition(|r| !r.dependency().is_dev);
        let ordered: Vec<&UpdateResult> = prod.into_iter().chain(dev).collect();
        let width = Self::name_width(&ordered);
        for result in &ordered {
            self.write_update_line(result, width, writer)?;
        }

        if show_skips {
            writeln!(writer, "  {}", self.dim("Skipped:"))?;
            let width = Self::name_width(&skips);
            for result in &skips {
                self.write_skip_line(result, width, writer)?;
            }
        }

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ecosystem, SkipReason};
    use crate::output::test_support::{npm_dep, sample_result};

    fn render(formatter: &TextFormatter, result: &OrchestratorResult) -> String {
        let mut out = Vec::new();
        formatter.format(result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn plain(verbosity: Verbosity, dry_run: bool) -> TextFormatter {
        TextFormatter::new(verbosity, dry_run).with_color(false)
    }

    #[test]
    fn test_format_updates() {
        let output = render(&plain(Verbosity::Normal, false), &sample_result(false, false));

        assert!(output.contains("web/package.json (npm) 2 updates, 1 skipped"));
        assert!(output.contains("react"));
        assert!(output.contains("^17.0.2 -> ^18.3.1 [major]"));
        assert!(output.contains("~5.3.0 -> ~5.6.2 [minor] dev"));
        assert!(!output.contains("Skipped:"));
        assert!(output.contains("2 package(s) outdated (1 major, 1 minor)"));
    }

    #[test]
    fn test_format_production_before_dev() {
        let output = render(&plain(Verbosity::Normal, false), &sample_result(false, false));
        let react = output.find("react").unwrap();
        let typescript = output.find("typescript").unwrap();
        assert!(react < typescript);
    }

    #[test]
    fn test_format_verbose_shows_skips() {
        let output = render(&plain(Verbosity::Verbose, false), &sample_result(false, false));
        assert!(output.contains("Skipped:"));
        assert!(output.contains("(up to date, latest 4.17.21)"));
    }

    #[test]
    fn test_format_quiet() {
        let output = render(&plain(Verbosity::Quiet, false), &sample_result(false, false));
        assert_eq!(output, "2 outdated\n");
    }

    #[test]
    fn test_format_dry_run_prefix() {
        let output = render(&plain(Verbosity::Normal, true), &sample_result(true, true));
        assert!(output.contains("(dry-run) web/package.json"));
        assert!(output.contains("2 package(s) would be updated"));
    }

    #[test]
    fn test_format_apply_reports_modified_files() {
        let output = render(&plain(Verbosity::Normal, false), &sample_result(true, false));
        assert!(output.contains("2 package(s) updated"));
        assert!(output.contains("0 file(s) modified"));
    }

    #[test]
    fn test_format_no_updates() {
        let mut manifest = ManifestUpdateResult::new("package.json", Ecosystem::Npm);
        manifest.add_result(UpdateResult::skip(
            npm_dep("lodash", "4.17.21", false),
            SkipReason::UpToDate,
        ));
        let mut summary = UpdateSummary::new(false, false);
        summary.add_manifest(manifest);
        let result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };

        let output = render(&plain(Verbosity::Normal, false), &result);
        assert!(!output.contains("package.json (npm)"));
        assert!(output.contains("Everything is up to date"));
    }

    #[test]
    fn test_format_offline_listing() {
        let mut manifest = ManifestUpdateResult::new("package.json", Ecosystem::Npm);
        manifest.add_result(UpdateResult::skip(
            npm_dep("lodash", "^4.17.0", false),
            SkipReason::Offline,
        ));
        manifest.add_result(UpdateResult::skip(
            npm_dep("shared", "workspace:*", true),
            SkipReason::NotComparable,
        ));
        let mut summary = UpdateSummary::new(false, false);
        summary.add_manifest(manifest);
        let result = OrchestratorResult {
            summary,
            write_results: Vec::new(),
            errors: Vec::new(),
        };

        let formatter = plain(Verbosity::Normal, false).with_offline(true);
        let output = render(&formatter, &result);
        assert!(output.contains("package.json (npm) 2 dependencies"));
        assert!(output.contains("^4.17.0 [plain] dependencies"));
        assert!(output.contains("[pseudo:workspace] devDependencies dev"));
        assert!(output.contains("1 manifest(s), 2 dependencies"));
        assert!(!output.contains("up to date"));
    }

    #[test]
    fn test_format_errors() {
        let mut result = sample_result(false, false);
        result.errors.push(crate::orchestrator::OrchestratorError::RegistryError {
            package: "left-pad".to_string(),
            message: "timeout".to_string(),
        });

        let output = render(&plain(Verbosity::Normal, false), &result);
        assert!(output.contains("Errors:"));
        assert!(output.contains("  - Failed to fetch left-pad: timeout"));
    }
}
