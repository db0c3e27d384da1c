//! CLI argument parsing module for depinspect

use crate::domain::{Ecosystem, UpdateType};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a `--target` value; `none` is not a selectable update kind
fn parse_target(s: &str) -> Result<UpdateType, String> {
    match s.parse::<UpdateType>()? {
        UpdateType::None => Err(format!(
            "invalid update type '{}': expected major, minor, patch or prerelease",
            s
        )),
        update_type => Ok(update_type),
    }
}

/// Workspace dependency inspector
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depinspect",
    version,
    about = "Workspace dependency inspector for npm, Composer, PyPI and Pub"
)]
pub struct CliArgs {
    /// Workspace root or a single manifest file (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Modes
    /// Rewrite manifests to the latest versions
    #[arg(long)]
    pub update: bool,

    /// Show what --update would change without writing files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Do not query registries; list dependencies and their specifier shapes
    #[arg(long)]
    pub offline: bool,

    /// Enable verbose output and debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Ecosystem filters
    /// Check only npm (package.json) dependencies
    #[arg(long)]
    pub npm: bool,

    /// Check only Composer (composer.json) dependencies
    #[arg(long)]
    pub composer: bool,

    /// Check only PyPI (requirements*.txt, pyproject.toml) dependencies
    #[arg(long)]
    pub pypi: bool,

    /// Check only Pub (pubspec.yaml) dependencies
    #[arg(long = "pub")]
    pub pub_dev: bool,

    // Package filters
    /// Check only these packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Never check these packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Skip paths matching this glob, relative to the root (repeatable)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Report only these update kinds: major, minor, patch, prerelease (repeatable)
    #[arg(long, value_parser = parse_target, action = ArgAction::Append)]
    pub target: Vec<UpdateType>,

    /// Report pre-release latest versions for stable dependencies
    #[arg(long)]
    pub prerelease: bool,

    /// Maximum concurrent registry requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Config file (default: depinspect.toml in the workspace root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,
}

impl CliArgs {
    /// Check if any ecosystem filter is specified
    pub fn has_ecosystem_filter(&self) -> bool {
        self.npm || self.composer || self.pypi || self.pub_dev
    }

    /// Ecosystems selected by flags (empty means all)
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        [
            (self.npm, Ecosystem::Npm),
            (self.composer, Ecosystem::Composer),
            (self.pypi, Ecosystem::Pypi),
            (self.pub_dev, Ecosystem::Pub),
        ]
        .into_iter()
        .filter_map(|(selected, ecosystem)| selected.then_some(ecosystem))
        .collect()
    }

    /// Whether manifests are rewritten on disk
    pub fn writes_files(&self) -> bool {
        self.update && !self.dry_run
    }
}
