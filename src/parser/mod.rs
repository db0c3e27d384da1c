//! Version specifier parsers for different package ecosystems
//!
//! Each parser turns the raw value found in a manifest into a
//! [`VersionSpecifier`], recognising the ecosystem's own pseudo-versions:
//! - npm: `workspace:*`, `file:`, `link:`, git URLs, `npm:` aliases, dist-tags
//! - Composer: `dev-*` branches, `self.version`
//! - PyPI: direct references (`pkg @ https://...`), VCS URLs
//! - Pub: `sdk`, `path`, `git` and `hosted` maps

mod composer;
mod dart;
mod npm;
mod pypi;

pub use composer::ComposerSpecifierParser;
pub use dart::PubSpecifierParser;
pub use npm::NpmSpecifierParser;
pub use pypi::PypiSpecifierParser;

use crate::domain::{Ecosystem, PseudoKind, VersionSpecifier};
use serde_json::Value;

/// Trait for parsing version specifiers
pub trait SpecifierParser: Send + Sync {
    /// Parse a flat specifier string; never fails
    fn parse(&self, raw: &str) -> VersionSpecifier;

    /// Parse a structured manifest value
    fn parse_value(&self, value: &Value) -> VersionSpecifier {
        match value {
            Value::String(raw) => self.parse(raw),
            other => VersionSpecifier::from_value(other),
        }
    }

    /// Returns the ecosystem this parser handles
    fn ecosystem(&self) -> Ecosystem;
}

/// Get a specifier parser for the specified ecosystem
pub fn get_parser(ecosystem: Ecosystem) -> Box<dyn SpecifierParser> {
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmSpecifierParser),
        Ecosystem::Composer => Box::new(ComposerSpecifierParser),
        Ecosystem::Pypi => Box::new(PypiSpecifierParser),
        Ecosystem::Pub => Box::new(PubSpecifierParser),
    }
}

/// Returns the pseudo kind for URL-like specifiers shared by several ecosystems
fn url_kind(raw: &str) -> Option<PseudoKind> {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("git+")
        || lower.starts_with("git://")
        || lower.starts_with("git@")
        || lower.ends_with(".git")
    {
        Some(PseudoKind::Git)
    } else if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(PseudoKind::Url)
    } else if lower.starts_with("file:") {
        Some(PseudoKind::Path)
    } else {
        None
    }
}

/// Returns true if the string carries no digit at all (`latest`, `next`, `stable`)
fn is_named_tag(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !raw.chars().any(|c| c.is_ascii_digit())
        && !raw.eq_ignore_ascii_case("any")
        && !raw.eq_ignore_ascii_case("x")
}
