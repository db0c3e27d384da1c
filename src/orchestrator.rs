//! Inspection orchestrator coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: detect → parse → fetch → judge → write
//! - Parallel registry queries bounded by a semaphore, one lookup per package
//! - Offline mode that lists dependencies without registry access
//! - Dry-run mode support
//! - Error handling with partial continuation

use crate::config::Config;
use crate::domain::{
    Dependency, Ecosystem, ManifestUpdateResult, SkipReason, UpdateResult, UpdateSummary,
};
use crate::manifest::{detect_manifests, parse_manifest, ManifestInfo, ManifestWriter, WriteResult};
use crate::progress::Progress;
use crate::registry::{create_adapter, HttpClient, RegistryAdapter};
use crate::update::{LatestVersion, UpdateJudge};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

type LookupKey = (Ecosystem, String);
type LookupOutcome = Result<LatestVersion, String>;

/// Orchestrator for coordinating the inspection workflow
pub struct Orchestrator {
    config: Config,
    adapters: HashMap<Ecosystem, Arc<dyn RegistryAdapter>>,
    semaphore: Arc<Semaphore>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Update summary with all results
    pub summary: UpdateSummary,
    /// Write results for each manifest
    pub write_results: Vec<WriteResult>,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any per-manifest or per-dependency error occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to detect manifests
    ManifestDetectionError(String),
    /// Failed to parse manifest
    ManifestParseError { path: String, message: String },
    /// Failed to fetch the latest version from a registry
    RegistryError { package: String, message: String },
    /// Failed to write manifest
    WriteError { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::ManifestDetectionError(msg) => {
                write!(f, "Manifest detection error: {}", msg)
            }
            OrchestratorError::ManifestParseError { path, message } => {
                write!(f, "Failed to parse {}: {}", path, message)
            }
            OrchestratorError::RegistryError { package, message } => {
                write!(f, "Failed to fetch {}: {}", package, message)
            }
            OrchestratorError::WriteError { path, message } => {
                write!(f, "Failed to write {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create an orchestrator talking to the configured registries
    pub fn new(config: Config) -> Result<Self, OrchestratorError> {
        let mut adapters: HashMap<Ecosystem, Arc<dyn RegistryAdapter>> = HashMap::new();

        for &ecosystem in Ecosystem::all() {
            let token = config.registries.token(ecosystem).map(str::to_string);
            let client = HttpClient::new()
                .map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?
                .with_bearer_token(token);
            let base_url = config.registries.base_url(ecosystem);
            adapters.insert(ecosystem, Arc::from(create_adapter(ecosystem, client, base_url)));
        }

        Ok(Self::with_adapters(config, adapters))
    }

    /// Create an orchestrator with custom registry adapters
    pub fn with_adapters(
        config: Config,
        adapters: HashMap<Ecosystem, Arc<dyn RegistryAdapter>>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
        Self {
            config,
            adapters,
            semaphore,
        }
    }

    /// Returns the resolved configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the workflow
    pub async fn run(&self) -> OrchestratorResult {
        self.run_with_progress(true).await
    }

    /// Run the workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = UpdateSummary::new(self.config.apply, self.config.dry_run);
        let mut errors = Vec::new();

        // Step 1: Detect manifest files
        progress.spinner("Detecting manifest files...");
        let manifests = match detect_manifests(&self.config.root, &self.config.scan) {
            Ok(manifests) => manifests,
            Err(e) => {
                progress.finish_and_clear();
                errors.push(OrchestratorError::ManifestDetectionError(e.to_string()));
                return OrchestratorResult {
                    summary,
                    write_results: Vec::new(),
                    errors,
                };
            }
        };
        progress.finish_and_clear();
        info!(count = manifests.len(), root = %self.config.root.display(), "detected manifests");

        // Step 2: Parse manifests
        progress.spinner("Parsing manifests...");
        let parsed = self.parse_all(&manifests, &mut errors);
        progress.finish_and_clear();

        let judge = UpdateJudge::new(self.config.filter.clone());

        // Step 3: Fetch the latest version of every package that needs one
        let lookups = if self.config.offline {
            HashMap::new()
        } else {
            let keys: BTreeSet<LookupKey> = parsed
                .iter()
                .flat_map(|(_, deps)| deps.iter())
                .filter(|dep| judge.should_skip(dep).is_none())
                .map(Dependency::lookup_key)
                .collect();
            self.fetch_all(keys, &mut progress).await
        };

        let mut failed: Vec<_> = lookups
            .iter()
            .filter_map(|(key, outcome)| outcome.as_ref().err().map(|message| (key, message)))
            .collect();
        failed.sort();
        for ((ecosystem, package), message) in failed {
            errors.push(OrchestratorError::RegistryError {
                package: format!("{} ({})", package, ecosystem),
                message: message.clone(),
            });
        }

        // Step 4: Judge every dependency
        for (info, dependencies) in parsed {
            let mut manifest_result = ManifestUpdateResult::new(&info.path, info.ecosystem());
            for dep in dependencies {
                let result = self.judge_one(&judge, dep, &lookups);
                manifest_result.add_result(result);
            }
            summary.add_manifest(manifest_result);
        }

        // Step 5: Apply updates
        let write_results = if self.config.apply && !self.config.offline {
            if self.config.writes_files() {
                progress.spinner("Writing updates...");
            }
            let writer = ManifestWriter::new(self.config.dry_run);
            let results = writer.apply_all_updates(&mut summary.manifests);
            progress.finish_and_clear();
            results
        } else {
            Vec::new()
        };

        for result in &write_results {
            for error in &result.errors {
                errors.push(OrchestratorError::WriteError {
                    path: result.path.display().to_string(),
                    message: error.clone(),
                });
            }
        }

        OrchestratorResult {
            summary,
            write_results,
            errors,
        }
    }

    fn parse_all<'a>(
        &self,
        manifests: &'a [ManifestInfo],
        errors: &mut Vec<OrchestratorError>,
    ) -> Vec<(&'a ManifestInfo, Vec<Dependency>)> {
        let mut parsed = Vec::new();

        for info in manifests {
            match parse_manifest(&info.path) {
                Ok(dependencies) => {
                    debug!(path = %info.path.display(), count = dependencies.len(), "parsed manifest");
                    parsed.push((info, dependencies));
                }
                Err(e) => {
                    warn!(path = %info.path.display(), error = %e, "skipping manifest");
                    errors.push(OrchestratorError::ManifestParseError {
                        path: info.path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        parsed
    }

    async fn fetch_all(
        &self,
        keys: BTreeSet<LookupKey>,
        progress: &mut Progress,
    ) -> HashMap<LookupKey, LookupOutcome> {
        let mut lookups = HashMap::new();
        if keys.is_empty() {
            return lookups;
        }

        progress.start(keys.len() as u64, "Checking registries");
        let mut tasks = JoinSet::new();

        for key in keys {
            let Some(adapter) = self.adapters.get(&key.0).cloned() else {
                let message = format!("no registry adapter for {}", key.0);
                lookups.insert(key, Err(message));
                continue;
            };
            let semaphore = Arc::clone(&self.semaphore);

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => adapter
                        .fetch_latest(&key.1)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                (key, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(((ecosystem, package), outcome)) => {
                    progress.set_message(&format!("Checked {}", package));
                    match &outcome {
                        Ok(latest) => {
                            debug!(%ecosystem, %package, latest = %latest.version, "fetched latest")
                        }
                        Err(e) => warn!(%ecosystem, %package, error = %e, "lookup failed"),
                    }
                    lookups.insert((ecosystem, package), outcome);
                }
                Err(e) => warn!(error = %e, "lookup task failed"),
            }
            progress.inc();
        }
        progress.finish_and_clear();

        lookups
    }

    fn judge_one(
        &self,
        judge: &UpdateJudge,
        dependency: Dependency,
        lookups: &HashMap<LookupKey, LookupOutcome>,
    ) -> UpdateResult {
        if let Some(reason) = judge.should_skip(&dependency) {
            return UpdateResult::skip(dependency, reason);
        }
        if self.config.offline {
            return UpdateResult::skip(dependency, SkipReason::Offline);
        }

        match lookups.get(&dependency.lookup_key()) {
            Some(Ok(latest)) => judge.judge(&dependency, latest),
            Some(Err(message)) => UpdateResult::skip_fetch_failed(dependency, message.clone()),
            None => UpdateResult::skip_fetch_failed(dependency, "lookup did not complete"),
        }
    }
}
