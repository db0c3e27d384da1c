//! pub.dev adapter
//!
//! API endpoint: https://pub.dev/api/packages/{package}

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use crate::update::{parse_timestamp, LatestVersion};
use async_trait::async_trait;
use serde::Deserialize;

/// pub.dev base URL
pub const PUB_DEV_URL: &str = "https://pub.dev";

const REGISTRY_NAME: &str = "pub.dev";

/// pub.dev adapter
pub struct PubDevAdapter {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PubPackageResponse {
    latest: PubVersion,
}

#[derive(Debug, Deserialize)]
struct PubVersion {
    version: String,
    #[serde(default)]
    published: Option<String>,
}

impl PubDevAdapter {
    /// Create a new pub.dev adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PUB_DEV_URL)
    }

    /// Create an adapter for a self-hosted pub server
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, package: &str) -> String {
        format!("{}/api/packages/{}", self.base_url, package)
    }
}

fn parse_pub_response(body: PubPackageResponse) -> LatestVersion {
    let released_at = body.latest.published.as_deref().and_then(parse_timestamp);
    LatestVersion::new(body.latest.version).with_release_date(released_at)
}

#[async_trait]
impl RegistryAdapter for PubDevAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }

    fn registry_name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn fetch_latest(&self, package: &str) -> Result<LatestVersion, RegistryError> {
        let url = self.build_url(package);
        let response: PubPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(parse_pub_response(response))
    }
}
