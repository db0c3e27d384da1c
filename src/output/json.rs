//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of inspection results
//! - Structured file-by-file update/skip information

use crate::domain::{
    Ecosystem, ManifestUpdateResult, SkipReason, UpdateResult, UpdateSummary, UpdateType,
    VersionSpecifier,
};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    verbosity: Verbosity,
    offline: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            offline: false,
        }
    }

    /// Include every dependency as a skip entry (offline listing)
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

#[derive(Serialize)]
struct JsonOutput {
    apply: bool,
    dry_run: bool,
    offline: bool,
    summary: JsonSummary,
    manifests: Vec<JsonManifest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    manifests: usize,
    dependencies: usize,
    updates: usize,
    skips: usize,
    failures: usize,
    modified: usize,
    /// Update count per kind, omitted kinds have none
    by_type: BTreeMap<&'static str, usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_ecosystem: Vec<JsonEcosystemSummary>,
}

#[derive(Serialize)]
struct JsonEcosystemSummary {
    ecosystem: Ecosystem,
    manifests: usize,
    updates: usize,
    skips: usize,
}

#[derive(Serialize)]
struct JsonManifest {
    path: String,
    ecosystem: Ecosystem,
    modified: bool,
    updates: Vec<JsonUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skips: Vec<JsonSkip>,
}

#[derive(Serialize)]
struct JsonUpdate {
    name: String,
    section: String,
    dev: bool,
    current: Value,
    latest: String,
    update_type: UpdateType,
    new_specifier: Value,
    /// Whether the current constraint already admits the latest version
    satisfied: bool,
}

#[derive(Serialize)]
struct JsonSkip {
    name: String,
    section: String,
    dev: bool,
    specifier: Value,
    shape: String,
    reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
}

/// Strings stay strings; composite specifiers keep their object shape
fn specifier_value(specifier: &VersionSpecifier) -> Value {
    match specifier {
        VersionSpecifier::Composite(composite) => Value::Object(composite.fields().clone()),
        other => Value::String(other.to_string()),
    }
}

fn skip_reason_code(reason: &SkipReason) -> (&'static str, Option<String>) {
    match reason {
        SkipReason::UpToDate => ("up_to_date", None),
        SkipReason::NotComparable => ("not_comparable", None),
        SkipReason::Ignored => ("ignored", None),
        SkipReason::NotInOnlyList => ("not_in_only_list", None),
        SkipReason::EcosystemFiltered => ("ecosystem_filtered", None),
        SkipReason::UpdateTypeFiltered(kind) => ("update_type_filtered", Some(kind.to_string())),
        SkipReason::PrereleaseOnly(version) => ("prerelease_only", Some(version.clone())),
        SkipReason::FetchFailed(message) => ("fetch_failed", Some(message.clone())),
        SkipReason::Offline => ("offline", None),
    }
}

impl JsonFormatter {
    fn include_skips(&self) -> bool {
        self.offline || self.verbosity == Verbosity::Verbose
    }

    fn manifest_to_json(&self, manifest: &ManifestUpdateResult) -> JsonManifest {
        let updates = manifest
            .updates()
            .filter_map(|result| match result {
                UpdateResult::Update {
                    dependency,
                    latest_version,
                    update_type,
                    new_specifier,
                    satisfied,
                } => Some(JsonUpdate {
                    name: dependency.name.clone(),
                    section: dependency.section.clone(),
                    dev: dependency.is_dev,
                    current: specifier_value(&dependency.specifier),
                    latest: latest_version.clone(),
                    update_type: *update_type,
                    new_specifier: specifier_value(new_specifier),
                    satisfied: *satisfied,
                }),
                UpdateResult::Skip { .. } => None,
            })
            .collect();

        let skips = if self.include_skips() {
            manifest
                .skips()
                .filter_map(|result| match result {
                    UpdateResult::Skip {
                        dependency,
                        reason,
                        latest_version,
                    } => {
                        let (code, detail) = skip_reason_code(reason);
                        Some(JsonSkip {
                            name: dependency.name.clone(),
                            section: dependency.section.clone(),
                            dev: dependency.is_dev,
                            specifier: specifier_value(&dependency.specifier),
                            shape: dependency.specifier.shape_label(),
                            reason: code,
                            detail,
                            latest: latest_version.clone(),
                        })
                    }
                    UpdateResult::Update { .. } => None,
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonManifest {
            path: manifest.path.display().to_string(),
            ecosystem: manifest.ecosystem,
            modified: manifest.modified,
            updates,
            skips,
        }
    }

    fn summary_to_json(&self, summary: &UpdateSummary) -> JsonSummary {
        let by_type = [
            UpdateType::Major,
            UpdateType::Minor,
            UpdateType::Patch,
            UpdateType::Prerelease,
        ]
        .into_iter()
        .map(|kind| (kind.label(), summary.count_by_type(kind)))
        .filter(|(_, count)| *count > 0)
        .collect();

        let by_ecosystem = if self.verbosity == Verbosity::Verbose {
            Ecosystem::all()
                .iter()
                .filter_map(|&ecosystem| {
                    let manifests: Vec<_> = summary.by_ecosystem(ecosystem).collect();
                    (!manifests.is_empty()).then(|| JsonEcosystemSummary {
                        ecosystem,
                        manifests: manifests.len(),
                        updates: manifests.iter().map(|m| m.update_count()).sum(),
                        skips: manifests.iter().map(|m| m.skip_count()).sum(),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonSummary {
            manifests: summary.files_processed(),
            dependencies: summary.total_dependencies(),
            updates: summary.total_updates(),
            skips: summary.total_skips(),
            failures: summary.total_failures(),
            modified: summary.files_modified(),
            by_type,
            by_ecosystem,
        }
    }
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            apply: result.summary.apply,
            dry_run: result.summary.dry_run,
            offline: self.offline,
            summary: self.summary_to_json(&result.summary),
            manifests: result
                .summary
                .manifests
                .iter()
                .map(|m| self.manifest_to_json(m))
                .collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &UpdateSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(&self.summary_to_json(summary), writer)
    }

    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(&self.manifest_to_json(manifest), writer)
    }
}
