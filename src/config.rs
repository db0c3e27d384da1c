//! Configuration loading and resolution
//!
//! Settings come from two layers:
//! - `depinspect.toml` in the workspace root, or the file given by `--config`
//! - CLI flags, which override scalar settings and extend list settings

use crate::cli::CliArgs;
use crate::domain::Ecosystem;
use crate::error::ConfigError;
use crate::manifest::ScanOptions;
use crate::registry::default_base_url;
use crate::update::UpdateFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = "depinspect.toml";

/// Default number of concurrent registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

fn default_true() -> bool {
    true
}

/// Contents of `depinspect.toml`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Exclusion globs relative to the workspace root
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether the built-in exclusions apply
    #[serde(default = "default_true")]
    pub default_excludes: bool,

    /// Packages never checked
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Maximum concurrent registry requests
    #[serde(default)]
    pub concurrency: Option<usize>,

    #[serde(default)]
    pub registries: RegistrySettings,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            default_excludes: true,
            ignore: Vec::new(),
            concurrency: None,
            registries: RegistrySettings::default(),
        }
    }
}

/// Registry endpoints and credentials
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistrySettings {
    #[serde(default)]
    pub npm: Option<String>,
    #[serde(default)]
    pub packagist: Option<String>,
    #[serde(default)]
    pub pypi: Option<String>,
    #[serde(default, rename = "pub")]
    pub pub_dev: Option<String>,
    /// Bearer token sent to the npm registry
    #[serde(default)]
    pub npm_token: Option<String>,
}

impl RegistrySettings {
    /// Base URL for an ecosystem, falling back to the public registry
    pub fn base_url(&self, ecosystem: Ecosystem) -> &str {
        let configured = match ecosystem {
            Ecosystem::Npm => &self.npm,
            Ecosystem::Composer => &self.packagist,
            Ecosystem::Pypi => &self.pypi,
            Ecosystem::Pub => &self.pub_dev,
        };
        configured
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_base_url(ecosystem))
    }

    /// Bearer token for an ecosystem's registry, if any
    pub fn token(&self, ecosystem: Ecosystem) -> Option<&str> {
        match ecosystem {
            Ecosystem::Npm => self.npm_token.as_deref().filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

impl FileConfig {
    /// Parse config file contents
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Find and load the config for a workspace
    ///
    /// An explicit path must exist. Otherwise `depinspect.toml` in the root
    /// directory is used when present, and defaults when not.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let dir = if root.is_file() {
            root.parent().unwrap_or(root)
        } else {
            root
        };
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root or single manifest
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub filter: UpdateFilter,
    pub registries: RegistrySettings,
    pub concurrency: usize,
    /// Rewrite manifests
    pub apply: bool,
    pub dry_run: bool,
    /// Skip registry access entirely
    pub offline: bool,
}

impl Config {
    /// Merge CLI flags over the config file
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        validate_args(args)?;
        let file = FileConfig::discover(&args.path, args.config.as_deref())?;
        Self::merge(args, file)
    }

    /// Merge CLI flags over an already loaded config file
    pub fn merge(args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let ecosystems = args.ecosystems();

        let mut exclude = file.exclude;
        exclude.extend(args.exclude.iter().cloned());
        let scan = ScanOptions {
            exclude,
            use_defaults: file.default_excludes,
            ecosystems: ecosystems.clone(),
        };
        scan.validate()?;

        let mut ignore = file.ignore;
        ignore.extend(args.ignore.iter().cloned());
        let filter = UpdateFilter::new()
            .with_ecosystems(ecosystems)
            .with_ignore(ignore)
            .with_only(args.only.clone())
            .with_targets(args.target.clone())
            .with_prerelease(args.prerelease);

        let concurrency = args
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::ConflictingOptions {
                message: "concurrency must be at least 1".to_string(),
            });
        }

        Ok(Self {
            root: args.path.clone(),
            scan,
            filter,
            registries: file.registries,
            concurrency,
            apply: args.update,
            dry_run: args.dry_run,
            offline: args.offline,
        })
    }

    /// Whether manifests are rewritten on disk
    pub fn writes_files(&self) -> bool {
        self.apply && !self.dry_run && !self.offline
    }
}

fn validate_args(args: &CliArgs) -> Result<(), ConfigError> {
    if args.json && args.diff {
        return Err(ConfigError::ConflictingOptions {
            message: "--json and --diff cannot be used together".to_string(),
        });
    }
    if args.quiet && args.verbose {
        return Err(ConfigError::ConflictingOptions {
            message: "--quiet and --verbose cannot be used together".to_string(),
        });
    }
    if args.offline && args.update && !args.dry_run {
        return Err(ConfigError::ConflictingOptions {
            message: "--update needs registry access and cannot be combined with --offline"
                .to_string(),
        });
    }
    Ok(())
}
