//! Composer (composer.json) specifier parser
//!
//! Handles `^1.2`, `~1.2`, `>=1.0 <2.0`, `^7.4 || ^8.0`, `^1.0|^2.0`, `1.0.*`.
//! Branch constraints (`dev-main`, `1.x-dev`) and `self.version` are pseudo-versions.

use super::SpecifierParser;
use crate::domain::{Ecosystem, PseudoKind, VersionSpecifier};

/// Composer specifier parser
pub struct ComposerSpecifierParser;

impl SpecifierParser for ComposerSpecifierParser {
    fn parse(&self, raw: &str) -> VersionSpecifier {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();

        if lower == "self.version" {
            return VersionSpecifier::Pseudo(PseudoKind::Workspace);
        }
        if lower.starts_with("dev-") || lower.ends_with("-dev") || lower.contains(" as ") {
            return VersionSpecifier::Pseudo(PseudoKind::Tag);
        }
        if lower.starts_with('@') {
            // bare stability flag such as `@dev`
            return VersionSpecifier::Pseudo(PseudoKind::Tag);
        }

        VersionSpecifier::parse(trimmed)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Composer
    }
}
