//! npm Registry adapter
//!
//! Fetches the `latest` dist-tag from the npm registry.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use crate::update::{parse_timestamp, LatestVersion};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

const REGISTRY_NAME: &str = "npm";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package document (only the fields we read)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    time: HashMap<String, String>,
}

impl NpmAdapter {
    /// Create a new npm adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create an adapter for a mirror or private registry
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

/// Extract the `latest` dist-tag and its publish time
fn parse_npm_response(package: &str, body: NpmPackageResponse) -> Result<LatestVersion, RegistryError> {
    let version = body
        .dist_tags
        .get("latest")
        .ok_or_else(|| RegistryError::no_versions(package, REGISTRY_NAME))?;

    let released_at = body.time.get(version).and_then(|t| parse_timestamp(t));
    Ok(LatestVersion::new(version.as_str()).with_release_date(released_at))
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn fetch_latest(&self, package: &str) -> Result<LatestVersion, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        parse_npm_response(package, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fixture(json: &str) -> NpmPackageResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_npm_adapter_identity() {
        let adapter = NpmAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.ecosystem(), Ecosystem::Npm);
        assert_eq!(adapter.registry_name(), "npm");
    }

    #[test]
    fn test_build_url() {
        let adapter = NpmAdapter::new(HttpClient::new().unwrap());
        assert_eq!(adapter.build_url("lodash"), "https://registry.npmjs.org/lodash");
        assert_eq!(
            adapter.build_url("@types/node"),
            "https://registry.npmjs.org/@types/node"
        );
    }

    #[test]
    fn test_build_url_custom_base() {
        let adapter = NpmAdapter::with_base_url(HttpClient::new().unwrap(), "http://localhost:4873/");
        assert_eq!(adapter.build_url("left-pad"), "http://localhost:4873/left-pad");
    }

    #[test]
    fn test_parse_latest_dist_tag() {
        let body = fixture(
            r#"{
                "name": "lodash",
                "dist-tags": { "latest": "4.17.21", "next": "5.0.0-beta.1" },
                "time": {
                    "created": "2012-04-23T16:37:11.912Z",
                    "4.17.21": "2021-02-20T15:42:16.891Z",
                    "5.0.0-beta.1": "2023-01-01T00:00:00.000Z"
                }
            }"#,
        );

        let latest = parse_npm_response("lodash", body).unwrap();
        assert_eq!(latest.version, "4.17.21");
        assert_eq!(
            latest.released_at,
            Some(Utc.with_ymd_and_hms(2021, 2, 20, 15, 42, 16).unwrap()
                + chrono::Duration::milliseconds(891))
        );
    }

    #[test]
    fn test_parse_without_time() {
        let body = fixture(r#"{ "dist-tags": { "latest": "1.0.0" } }"#);
        let latest = parse_npm_response("tiny", body).unwrap();
        assert_eq!(latest.version, "1.0.0");
        assert!(latest.released_at.is_none());
    }

    #[test]
    fn test_parse_without_latest_tag() {
        let body = fixture(r#"{ "dist-tags": {}, "time": {} }"#);
        let err = parse_npm_response("unpublished", body).unwrap_err();
        assert!(matches!(err, RegistryError::NoVersions { .. }));
    }
}
