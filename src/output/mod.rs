//! Output formatting for inspection results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - Diff output for showing specifier changes

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::cli::CliArgs;
use crate::domain::{ManifestUpdateResult, UpdateSummary};
use crate::orchestrator::OrchestratorResult;
use std::io::{self, IsTerminal, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
    /// Unified diff format
    Diff,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output including skipped dependencies
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether this is a dry-run
    pub dry_run: bool,
    /// Whether registries were skipped
    pub offline: bool,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            dry_run: false,
            offline: false,
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            format,
            verbosity,
            dry_run,
            ..Self::default()
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        let format = if args.json {
            OutputFormat::Json
        } else if args.diff {
            OutputFormat::Diff
        } else {
            OutputFormat::Text
        };

        let verbosity = if args.quiet {
            Verbosity::Quiet
        } else if args.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            dry_run: args.dry_run,
            offline: args.offline,
            color: io::stdout().is_terminal(),
        }
    }

    /// Whether a progress display may be drawn alongside this output
    pub fn shows_progress(&self) -> bool {
        self.format == OutputFormat::Text && self.verbosity != Verbosity::Quiet
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write just the summary
    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Format and write a single manifest result
    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::from_config(&config)),
        OutputFormat::Json => {
            Box::new(JsonFormatter::new(config.verbosity).with_offline(config.offline))
        }
        OutputFormat::Diff => Box::new(DiffFormatter::new(config.dry_run)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(!config.dry_run);
        assert!(!config.offline);
        assert!(config.color);
    }

    #[test]
    fn test_output_config_new() {
        let config = OutputConfig::new(OutputFormat::Json, Verbosity::Quiet, true);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert!(config.dry_run);
    }

    #[test]
    fn test_output_config_from_cli() {
        let args = CliArgs::try_parse_from(["depinspect", "--json"]).unwrap();
        let config = OutputConfig::from_cli(&args);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.shows_progress());

        let args = CliArgs::try_parse_from(["depinspect", "--diff", "--verbose"]).unwrap();
        let config = OutputConfig::from_cli(&args);
        assert_eq!(config.format, OutputFormat::Diff);
        assert_eq!(config.verbosity, Verbosity::Verbose);

        let args = CliArgs::try_parse_from(["depinspect", "-q", "--offline", "-n"]).unwrap();
        let config = OutputConfig::from_cli(&args);
        assert_eq!(config.verbosity, Verbosity::Quiet);
        assert!(config.offline);
        assert!(config.dry_run);
        assert!(!config.shows_progress());
    }

    #[test]
    fn test_text_shows_progress() {
        assert!(OutputConfig::default().shows_progress());
    }
}
