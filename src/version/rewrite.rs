//! Operator-preserving specifier rewriting

use super::normalize::split_operator;
use crate::domain::VersionSpecifier;

/// Replace the version payload of a flat specifier, keeping its leading operator
///
/// `^1.0.0` -> `^2.0.0`, `>=1.0` -> `>=2.0.0`, `1.0.0` -> `2.0.0`.
/// Multi-clause ranges collapse to their first operator followed by the new version.
pub fn rewrite_str(original: &str, new_version: &str) -> String {
    let (operator, _) = split_operator(original.trim());
    format!("{}{}", operator, new_version.trim())
}

/// Point `specifier` at `new_version` without changing its shape
///
/// A range collapses to its first operator and comes back as `Plain`.
/// Pseudo-versions and composites without a `version` key come back unchanged.
pub fn rewrite(specifier: &VersionSpecifier, new_version: &str) -> VersionSpecifier {
    match specifier {
        VersionSpecifier::Plain(original) => {
            VersionSpecifier::Plain(rewrite_str(original, new_version))
        }
        VersionSpecifier::Range(original) => {
            VersionSpecifier::Plain(rewrite_str(original, new_version))
        }
        VersionSpecifier::Pseudo(_) => specifier.clone(),
        VersionSpecifier::Composite(composite) => match composite.version() {
            Some(original) => {
                VersionSpecifier::Composite(composite.with_version(rewrite_str(original, new_version)))
            }
            None => specifier.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PseudoKind;
    use serde_json::json;

    #[test]
    fn test_operator_preservation() {
        assert_eq!(rewrite_str("^1.0.0", "2.0.0"), "^2.0.0");
        assert_eq!(rewrite_str("~1.0.0", "1.2.0"), "~1.2.0");
        assert_eq!(rewrite_str(">=1.0.0", "1.5.0"), ">=1.5.0");
        assert_eq!(rewrite_str("==2.31.0", "2.32.3"), "==2.32.3");
        assert_eq!(rewrite_str("~=1.4", "1.6.0"), "~=1.6.0");
        assert_eq!(rewrite_str("<3", "4.0.0"), "<4.0.0");
    }

    #[test]
    fn test_no_operator_is_not_invented() {
        assert_eq!(rewrite_str("1.0.0", "2.0.0"), "2.0.0");
        assert_eq!(rewrite_str("v1.0.0", "2.0.0"), "2.0.0");
    }

    #[test]
    fn test_non_operator_prefix_is_dropped() {
        assert_eq!(rewrite_str("!=1.0", "2.0.0"), "2.0.0");
    }

    #[test]
    fn test_range_collapses_to_leading_operator() {
        let range = VersionSpecifier::parse(">=1.0,<2.0");
        assert_eq!(
            rewrite(&range, "2.1.0"),
            VersionSpecifier::Plain(">=2.1.0".to_string())
        );
        let caret_or = VersionSpecifier::parse("^1.0 || ^2.0");
        assert_eq!(
            rewrite(&caret_or, "3.0.0"),
            VersionSpecifier::Plain("^3.0.0".to_string())
        );
    }

    #[test]
    fn test_idempotence() {
        for original in ["^1.0.0", "~1.2", ">=1.0,<2.0", "1.0.0", "==3.1", "any"] {
            let spec = VersionSpecifier::parse(original);
            let once = rewrite(&spec, "2.0.0");
            let twice = rewrite(&once, "2.0.0");
            assert_eq!(once, twice, "rewrite of {original} is not idempotent");

            let via_other = rewrite(&rewrite(&spec, "1.5.0"), "2.0.0");
            assert_eq!(via_other, once, "intermediate rewrite leaked into {original}");
        }
    }

    #[test]
    fn test_composite_rewrites_only_version_key() {
        let spec = VersionSpecifier::from_value(&json!({
            "version": "^1.0.0",
            "hosted": {"url": "x"}
        }));
        let expected = VersionSpecifier::from_value(&json!({
            "version": "^2.0.0",
            "hosted": {"url": "x"}
        }));
        assert_eq!(rewrite(&spec, "2.0.0"), expected);
    }

    #[test]
    fn test_pseudo_and_versionless_composite_unchanged() {
        let git = VersionSpecifier::Pseudo(PseudoKind::Git);
        assert_eq!(rewrite(&git, "2.0.0"), git);

        let unknown = VersionSpecifier::from_value(&json!({"registry": "internal"}));
        assert_eq!(rewrite(&unknown, "2.0.0"), unknown);
    }

    #[test]
    fn test_specifier_rewrite_method_delegates() {
        assert_eq!(
            VersionSpecifier::parse("^1.2.3").rewrite("1.3.0"),
            VersionSpecifier::Plain("^1.3.0".to_string())
        );
    }
}
