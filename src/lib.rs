//! depinspect - workspace dependency inspector library
//!
//! Finds dependency manifests across a workspace, asks each ecosystem's
//! registry for the latest release, classifies how far behind every
//! specifier is, and rewrites specifiers in place on request:
//! - npm (package.json)
//! - Composer (composer.json)
//! - PyPI (requirements*.txt, pyproject.toml)
//! - Pub (pubspec.yaml)

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;
pub mod update;
pub mod version;
