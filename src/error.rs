//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with manifest file parsing and rewriting
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with CLI flags and the config file
//! - IoError: File system operation failures
//!
//! Version comparison itself never errors; unusable input degrades to
//! `UpdateType::None`.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error (package.json, composer.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error (pyproject.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// YAML parsing error (pubspec.yaml)
    #[error("failed to parse YAML in {path}: {message}")]
    YamlParseError { path: PathBuf, message: String },

    /// The dependency to rewrite could not be located in the file
    #[error("dependency '{package}' not found in {path}")]
    DependencyNotFound { path: PathBuf, package: String },

    /// Unsupported manifest format
    #[error("unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Package exists but has no usable release
    #[error("no published versions of '{package}' in {registry}")]
    NoVersions { package: String, registry: String },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },

    /// Authentication error
    #[error("authentication failed for {registry}: {message}")]
    AuthenticationError { registry: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the config file
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Invalid exclude glob
    #[error("invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Invalid --target value
    #[error("invalid update type '{value}': expected major, minor, patch or prerelease")]
    InvalidUpdateType { value: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new YamlParseError
    pub fn yaml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::YamlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new DependencyNotFound error
    pub fn dependency_not_found(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        ManifestError::DependencyNotFound {
            path: path.into(),
            package: package.into(),
        }
    }

    /// Returns a copy of this error pointing at `path`
    ///
    /// Parsers work on content only and report a placeholder file name.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match self {
            ManifestError::JsonParseError { message, .. } => {
                ManifestError::JsonParseError { path, message }
            }
            ManifestError::TomlParseError { message, .. } => {
                ManifestError::TomlParseError { path, message }
            }
            ManifestError::YamlParseError { message, .. } => {
                ManifestError::YamlParseError { path, message }
            }
            ManifestError::DependencyNotFound { package, .. } => {
                ManifestError::DependencyNotFound { path, package }
            }
            other => other,
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new NoVersions error
    pub fn no_versions(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::NoVersions {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
