//! PyPI (requirements.txt / pyproject.toml) specifier parser
//!
//! Handles PEP 440 specifiers (`==2.31.0`, `~=1.4`, `>=1.0,<2.0`, `!=1.5`)
//! and Poetry constraints (`^1.2`, `~1.2`, `*`). Direct references
//! (`@ https://...`) and VCS URLs are pseudo-versions.

use super::{url_kind, SpecifierParser};
use crate::domain::{Ecosystem, PseudoKind, VersionSpecifier};

/// PyPI specifier parser
pub struct PypiSpecifierParser;

impl SpecifierParser for PypiSpecifierParser {
    fn parse(&self, raw: &str) -> VersionSpecifier {
        let trimmed = raw.trim();

        if let Some(reference) = trimmed.strip_prefix('@') {
            return VersionSpecifier::Pseudo(url_kind(reference.trim()).unwrap_or(PseudoKind::Url));
        }
        if let Some(kind) = url_kind(trimmed) {
            return VersionSpecifier::Pseudo(kind);
        }

        VersionSpecifier::parse(trimmed)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Pypi
    }
}
