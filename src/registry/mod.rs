//! Registry adapters for fetching the latest published version of a package
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter
//! - Packagist (Composer) adapter
//! - PyPI JSON API adapter
//! - pub.dev adapter

mod client;
mod npm;
mod packagist;
mod pub_dev;
mod pypi;

pub use client::HttpClient;
pub use npm::{NpmAdapter, NPM_REGISTRY_URL};
pub use packagist::{PackagistAdapter, PACKAGIST_URL};
pub use pub_dev::{PubDevAdapter, PUB_DEV_URL};
pub use pypi::{PyPIAdapter, PYPI_URL};

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::update::LatestVersion;
use async_trait::async_trait;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the ecosystem this adapter serves
    fn ecosystem(&self) -> Ecosystem;

    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the latest published version of a package
    async fn fetch_latest(&self, package: &str) -> Result<LatestVersion, RegistryError>;
}

/// Returns the public registry URL for an ecosystem
pub fn default_base_url(ecosystem: Ecosystem) -> &'static str {
    match ecosystem {
        Ecosystem::Npm => NPM_REGISTRY_URL,
        Ecosystem::Composer => PACKAGIST_URL,
        Ecosystem::Pypi => PYPI_URL,
        Ecosystem::Pub => PUB_DEV_URL,
    }
}

/// Create a registry adapter for the given ecosystem
pub fn create_adapter(
    ecosystem: Ecosystem,
    client: HttpClient,
    base_url: &str,
) -> Box<dyn RegistryAdapter> {
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmAdapter::with_base_url(client, base_url)),
        Ecosystem::Composer => Box::new(PackagistAdapter::with_base_url(client, base_url)),
        Ecosystem::Pypi => Box::new(PyPIAdapter::with_base_url(client, base_url)),
        Ecosystem::Pub => Box::new(PubDevAdapter::with_base_url(client, base_url)),
    }
}
