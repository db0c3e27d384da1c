//! Packagist Registry adapter
//!
//! Fetches package metadata from the Packagist v2 API and picks the highest
//! release. Branch aliases (`dev-main`, `2.x-dev`) are never candidates, and
//! pre-releases only count when a package has no stable release at all.
//! API endpoint: https://repo.packagist.org/p2/{vendor}/{package}.json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use crate::update::{parse_timestamp, LatestVersion};
use crate::version::{coerce, NormalizedVersion};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Packagist repository base URL
pub const PACKAGIST_URL: &str = "https://repo.packagist.org";

const REGISTRY_NAME: &str = "packagist";

/// Packagist Registry adapter
pub struct PackagistAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PackagistResponse {
    #[serde(default)]
    packages: HashMap<String, Vec<PackagistVersion>>,
}

#[derive(Debug, Deserialize)]
struct PackagistVersion {
    version: String,
    #[serde(default)]
    time: Option<String>,
}

impl PackagistAdapter {
    /// Create a new Packagist adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PACKAGIST_URL)
    }

    /// Create an adapter for a mirror or private repository
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    /// Package names are in the format vendor/package
    fn build_url(&self, package: &str) -> String {
        format!("{}/p2/{}.json", self.base_url, package)
    }
}

fn is_branch(version: &str) -> bool {
    version.starts_with("dev-") || version.ends_with("-dev")
}

/// Pick the highest release listed for `package`
fn parse_packagist_response(
    package: &str,
    body: PackagistResponse,
) -> Result<LatestVersion, RegistryError> {
    let key = package.to_ascii_lowercase();
    let entries = body
        .packages
        .into_iter()
        .find(|(name, _)| name.to_ascii_lowercase() == key)
        .map(|(_, entries)| entries)
        .ok_or_else(|| {
            RegistryError::invalid_response(package, REGISTRY_NAME, "package missing from response")
        })?;

    let candidates: Vec<(NormalizedVersion, PackagistVersion)> = entries
        .into_iter()
        .filter(|entry| !is_branch(&entry.version))
        .filter_map(|entry| coerce(&entry.version).map(|normalized| (normalized, entry)))
        .collect();

    let has_stable = candidates.iter().any(|(v, _)| !v.is_prerelease());
    let (_, best) = candidates
        .into_iter()
        .filter(|(v, _)| !has_stable || !v.is_prerelease())
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .ok_or_else(|| RegistryError::no_versions(package, REGISTRY_NAME))?;

    let version = best.version.strip_prefix('v').unwrap_or(&best.version);
    let released_at = best.time.as_deref().and_then(parse_timestamp);
    Ok(LatestVersion::new(version).with_release_date(released_at))
}

#[async_trait]
impl RegistryAdapter for PackagistAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }

    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn fetch_latest(&self, package: &str) -> Result<LatestVersion, RegistryError> {
        let url = self.build_url(package);
        let response: PackagistResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        parse_packagist_response(package, response)
    }
}
