//! Dart/Flutter Pub (pubspec.yaml) specifier parser
//!
//! String constraints follow the npm-like syntax (`^1.2.3`, `>=1.0.0 <2.0.0`, `any`).
//! Map-shaped dependencies are either pseudo-versions (`sdk`, `path`, `git`,
//! a bare `hosted` source) or composites with a `version` key.

use super::SpecifierParser;
use crate::domain::{Ecosystem, VersionSpecifier};

/// Pub specifier parser
pub struct PubSpecifierParser;

impl SpecifierParser for PubSpecifierParser {
    fn parse(&self, raw: &str) -> VersionSpecifier {
        VersionSpecifier::parse(raw)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pub
    }
}
