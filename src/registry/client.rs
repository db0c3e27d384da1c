//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling
//! - Optional bearer token for private registries

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, trace};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("depinspect/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    bearer_token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            bearer_token: None,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Perform a GET request with retry logic and error context
    pub async fn get_with_context(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            trace!(url, attempt, "GET");
            let mut request = self.client.get(url);
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::rate_limit_exceeded(registry));

                        if attempt < self.max_retries {
                            debug!(registry, delay_ms = delay, "rate limited, backing off");
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(RegistryError::package_not_found(package, registry));
                    }

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(RegistryError::AuthenticationError {
                            registry: registry.to_string(),
                            message: format!("HTTP {}", status),
                        });
                    }

                    if !status.is_success() {
                        return Err(RegistryError::network_error(
                            package,
                            registry,
                            format!("HTTP {}", status),
                        ));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        RegistryError::timeout(package, registry)
                    } else {
                        RegistryError::network_error(package, registry, e.to_string())
                    });

                    if attempt < self.max_retries {
                        debug!(registry, package, error = %e, "request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RegistryError::network_error(package, registry, "unknown error")))
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get_with_context(url, package, registry).await?;

        response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(package, registry, format!("failed to parse JSON: {}", e))
        })
    }
}
