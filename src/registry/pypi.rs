//! PyPI JSON API adapter
//!
//! Reads `info.version`, which PyPI sets to the newest non-yanked release.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use crate::update::{parse_timestamp, LatestVersion};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI base URL
pub const PYPI_URL: &str = "https://pypi.org";

const REGISTRY_NAME: &str = "PyPI";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PyPIInfo,
    /// Release files keyed by version
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct PyPIInfo {
    version: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_URL)
    }

    /// Create an adapter for a mirror or private index
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }
}

fn parse_pypi_response(package: &str, body: PyPIResponse) -> Result<LatestVersion, RegistryError> {
    let version = body.info.version;
    if version.is_empty() {
        return Err(RegistryError::no_versions(package, REGISTRY_NAME));
    }

    // earliest file upload of that release
    let released_at = body
        .releases
        .get(&version)
        .into_iter()
        .flatten()
        .filter_map(|file| file.upload_time_iso_8601.as_deref().and_then(parse_timestamp))
        .min();

    Ok(LatestVersion::new(version).with_release_date(released_at))
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }

    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn fetch_latest(&self, package: &str) -> Result<LatestVersion, RegistryError> {
        let url = self.build_url(package);
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        parse_pypi_response(package, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixture(json: &str) -> PyPIResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_pypi_adapter_identity() {
        let adapter = PyPIAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.ecosystem(), Ecosystem::Pypi);
        assert_eq!(adapter.registry_name(), "PyPI");
    }

    #[test]
    fn test_build_url() {
        let adapter = PyPIAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.build_url("requests"), "https://pypi.org/pypi/requests/json");
    }

    #[test]
    fn test_parse_info_version_with_earliest_upload() {
        let body = fixture(
            r#"{
                "info": { "name": "requests", "version": "2.32.3" },
                "releases": {
                    "2.32.2": [ { "upload_time_iso_8601": "2024-05-21T00:00:00.000000Z" } ],
                    "2.32.3": [
                        { "upload_time_iso_8601": "2024-05-29T15:37:49.536000Z" },
                        { "upload_time_iso_8601": "2024-05-29T15:37:47.613000Z" }
                    ]
                }
            }"#,
        );

        let latest = parse_pypi_response("requests", body).unwrap();
        assert_eq!(latest.version, "2.32.3");
        let released = latest.released_at.unwrap();
        assert_eq!(
            released.date_naive(),
            Utc.with_ymd_and_hms(2024, 5, 29, 0, 0, 0).unwrap().date_naive()
        );
        assert_eq!(released.format("%H:%M:%S").to_string(), "15:37:47");
    }

    #[test]
    fn test_parse_without_releases() {
        let body = fixture(r#"{ "info": { "version": "1.0" } }"#);
        let latest = parse_pypi_response("tiny", body).unwrap();
        assert_eq!(latest.version, "1.0");
        assert!(latest.released_at.is_none());
    }

    #[test]
    fn test_parse_empty_version() {
        let body = fixture(r#"{ "info": { "version": "" }, "releases": {} }"#);
        let err = parse_pypi_response("broken", body).unwrap_err();
        assert!(matches!(err, RegistryError::NoVersions { .. }));
    }
}
