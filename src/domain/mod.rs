//! Core domain models for depinspect
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystems and their manifest files
//! - Version specifier shapes as written in manifests
//! - Dependency information structures
//! - Update classification and decision results
//! - Summary and result structures

mod dependency;
mod ecosystem;
mod specifier;
mod summary;
mod update_result;
mod update_type;

pub use dependency::Dependency;
pub use ecosystem::Ecosystem;
pub use specifier::{CompositeSpec, PseudoKind, VersionSpecifier, VERSION_KEY};
pub use summary::{ManifestUpdateResult, UpdateSummary};
pub use update_result::{SkipReason, UpdateResult};
pub use update_type::UpdateType;
