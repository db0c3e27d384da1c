//! npm (package.json) specifier parser
//!
//! Handles version formats:
//! - Exact: `1.2.3`
//! - Caret/tilde: `^1.2.3`, `~1.2.3`
//! - Comparison: `>=1.2.3`, `<2.0.0`
//! - Wildcard: `*`, `1.x`, `1.2.*`
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`, `^1.0 || ^2.0`
//!
//! and the non-registry forms `workspace:`, `file:`, `link:`, git URLs,
//! GitHub shorthands (`user/repo`), tarball URLs, `npm:` aliases and dist-tags.

use super::{is_named_tag, url_kind, SpecifierParser};
use crate::domain::{Ecosystem, PseudoKind, VersionSpecifier};
use regex::Regex;
use std::sync::LazyLock;

static GITHUB_SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:github|gitlab|bitbucket|gist):)?[\w.-]+/[\w.-]+(?:#.*)?$").unwrap()
});

/// npm specifier parser
pub struct NpmSpecifierParser;

impl SpecifierParser for NpmSpecifierParser {
    fn parse(&self, raw: &str) -> VersionSpecifier {
        let trimmed = raw.trim();

        if trimmed.starts_with("workspace:") {
            return VersionSpecifier::Pseudo(PseudoKind::Workspace);
        }
        if trimmed.starts_with("link:") {
            return VersionSpecifier::Pseudo(PseudoKind::Path);
        }
        if trimmed.starts_with("npm:") {
            return VersionSpecifier::Pseudo(PseudoKind::Alias);
        }
        if let Some(kind) = url_kind(trimmed) {
            return VersionSpecifier::Pseudo(kind);
        }
        if trimmed.starts_with('.') || trimmed.starts_with('/') {
            return VersionSpecifier::Pseudo(PseudoKind::Path);
        }
        if GITHUB_SHORTHAND_RE.is_match(trimmed) {
            return VersionSpecifier::Pseudo(PseudoKind::Git);
        }
        if is_named_tag(trimmed) {
            return VersionSpecifier::Pseudo(PseudoKind::Tag);
        }

        VersionSpecifier::parse(trimmed)
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> VersionSpecifier {
        NpmSpecifierParser.parse(s)
    }

    fn plain(s: &str) -> VersionSpecifier {
        VersionSpecifier::Plain(s.to_string())
    }

    #[test]
    fn test_parse_plain_forms() {
        assert_eq!(parse("^1.2.3"), plain("^1.2.3"));
        assert_eq!(parse("~1.2.3"), plain("~1.2.3"));
        assert_eq!(parse(">=1.2.3"), plain(">=1.2.3"));
        assert_eq!(parse("1.2.3"), plain("1.2.3"));
        assert_eq!(parse("1.x"), plain("1.x"));
        assert_eq!(parse("1.0.0-beta.1"), plain("1.0.0-beta.1"));
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(
            parse(">=1.0.0 <2.0.0"),
            VersionSpecifier::Range(">=1.0.0 <2.0.0".to_string())
        );
        assert_eq!(
            parse("1.0.0 - 2.0.0"),
            VersionSpecifier::Range("1.0.0 - 2.0.0".to_string())
        );
        assert_eq!(
            parse("^1.0.0 || ^2.0.0"),
            VersionSpecifier::Range("^1.0.0 || ^2.0.0".to_string())
        );
    }

    #[test]
    fn test_parse_any() {
        assert_eq!(parse("*"), VersionSpecifier::Pseudo(PseudoKind::Any));
        assert_eq!(parse(""), VersionSpecifier::Pseudo(PseudoKind::Any));
    }

    #[test]
    fn test_parse_workspace_and_paths() {
        assert_eq!(
            parse("workspace:*"),
            VersionSpecifier::Pseudo(PseudoKind::Workspace)
        );
        assert_eq!(
            parse("workspace:^1.0.0"),
            VersionSpecifier::Pseudo(PseudoKind::Workspace)
        );
        assert_eq!(parse("file:../lib"), VersionSpecifier::Pseudo(PseudoKind::Path));
        assert_eq!(parse("link:../lib"), VersionSpecifier::Pseudo(PseudoKind::Path));
        assert_eq!(parse("./vendor/pkg"), VersionSpecifier::Pseudo(PseudoKind::Path));
    }

    #[test]
    fn test_parse_git_sources() {
        assert_eq!(
            parse("git+https://github.com/user/repo.git"),
            VersionSpecifier::Pseudo(PseudoKind::Git)
        );
        assert_eq!(parse("user/repo"), VersionSpecifier::Pseudo(PseudoKind::Git));
        assert_eq!(
            parse("github:user/repo#v1.0.0"),
            VersionSpecifier::Pseudo(PseudoKind::Git)
        );
    }

    #[test]
    fn test_parse_url_alias_and_tags() {
        assert_eq!(
            parse("https://example.com/pkg.tgz"),
            VersionSpecifier::Pseudo(PseudoKind::Url)
        );
        assert_eq!(
            parse("npm:string-width@^4.2.0"),
            VersionSpecifier::Pseudo(PseudoKind::Alias)
        );
        assert_eq!(parse("latest"), VersionSpecifier::Pseudo(PseudoKind::Tag));
        assert_eq!(parse("next"), VersionSpecifier::Pseudo(PseudoKind::Tag));
    }

    #[test]
    fn test_ecosystem() {
        assert_eq!(NpmSpecifierParser.ecosystem(), Ecosystem::Npm);
    }
}
