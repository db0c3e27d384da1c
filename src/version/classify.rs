//! Update classification between a current specifier and the latest version

use super::normalize::{coerce, NormalizedVersion};
use super::range::VersionRange;
use crate::domain::{UpdateType, VersionSpecifier};
use tracing::debug;

/// Classify the update from `current` to `latest`
///
/// Never fails: anything that cannot be compared yields [`UpdateType::None`].
/// A range whose bounds already admit `latest` is still classified against
/// its coerced lower bound, so the absolute latest version is surfaced.
pub fn classify(current: &str, latest: &str) -> UpdateType {
    let current = current.trim();
    let current_version = coerce(current);
    let latest_version = coerce(latest);

    if current == "*" || current.eq_ignore_ascii_case("any") {
        return UpdateType::None;
    }

    // The range only feeds the trace below; the distance is always measured
    // from the coerced lower bound, inside the range or not.
    let range = VersionRange::parse(current).filter(VersionRange::is_compound);
    if let (Some(range), Some(latest_version)) = (&range, &latest_version) {
        if range.satisfies(latest_version) {
            debug!(current, latest, "latest version already satisfies range");
        }
    }

    match (current_version, latest_version) {
        (Some(current_version), Some(latest_version)) if latest_version > current_version => {
            distance(&current_version, &latest_version)
        }
        _ => UpdateType::None,
    }
}

/// Classify a structured specifier against the latest version
pub fn classify_specifier(specifier: &VersionSpecifier, latest: &str) -> UpdateType {
    match specifier {
        VersionSpecifier::Plain(current) | VersionSpecifier::Range(current) => {
            classify(current, latest)
        }
        VersionSpecifier::Composite(composite) => composite
            .version()
            .map_or(UpdateType::None, |current| classify(current, latest)),
        VersionSpecifier::Pseudo(_) => UpdateType::None,
    }
}

fn distance(current: &NormalizedVersion, latest: &NormalizedVersion) -> UpdateType {
    if current.major != latest.major {
        UpdateType::Major
    } else if current.minor != latest.minor {
        UpdateType::Minor
    } else if current.patch != latest.patch {
        UpdateType::Patch
    } else if current.pre != latest.pre {
        UpdateType::Prerelease
    } else {
        UpdateType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PseudoKind;
    use serde_json::json;

    #[test]
    fn test_caret_minor_and_major() {
        assert_eq!(classify("^1.2.3", "1.3.0"), UpdateType::Minor);
        assert_eq!(classify("^1.2.3", "2.0.0"), UpdateType::Major);
    }

    #[test]
    fn test_same_version_is_none() {
        assert_eq!(classify("1.2.3", "1.2.3"), UpdateType::None);
        assert_eq!(classify("^4.17.21", "4.17.21"), UpdateType::None);
    }

    #[test]
    fn test_prerelease_to_release() {
        assert_eq!(classify("1.0.0-alpha", "1.0.0"), UpdateType::Prerelease);
        assert_eq!(classify("1.0.0-alpha", "1.0.0-beta"), UpdateType::Prerelease);
    }

    #[test]
    fn test_component_distance() {
        assert_eq!(classify("1.0.0", "2.0.0"), UpdateType::Major);
        assert_eq!(classify("1.0.0", "1.1.0"), UpdateType::Minor);
        assert_eq!(classify("1.0.0", "1.0.1"), UpdateType::Patch);
        assert_eq!(classify("1.9.9", "2.0.0"), UpdateType::Major);
    }

    #[test]
    fn test_any_and_star_are_none() {
        assert_eq!(classify("any", "9.9.9"), UpdateType::None);
        assert_eq!(classify("ANY", "9.9.9"), UpdateType::None);
        assert_eq!(classify("*", "9.9.9"), UpdateType::None);
    }

    #[test]
    fn test_downgrade_is_none() {
        assert_eq!(classify("2.0.0", "1.0.0"), UpdateType::None);
        assert_eq!(classify("1.0.0", "1.0.0-rc.1"), UpdateType::None);
    }

    #[test]
    fn test_operators_ignored_for_classification() {
        assert_eq!(classify(">=1.0.0", "1.0.5"), UpdateType::Patch);
        assert_eq!(classify("~=1.4", "1.5"), UpdateType::Minor);
        assert_eq!(classify("==2.31.0", "2.32.3"), UpdateType::Minor);
        assert_eq!(classify("~1.2", "1.2.1"), UpdateType::Patch);
    }

    #[test]
    fn test_range_still_surfaces_latest() {
        // 1.9.0 satisfies the range but is still a minor step from its lower bound
        assert_eq!(classify(">=1.0,<2.0", "1.9.0"), UpdateType::Minor);
        assert_eq!(classify(">=1.0,<2.0", "2.1.0"), UpdateType::Major);
        assert_eq!(classify(">=1.0.0 <2.0.0", "1.0.0"), UpdateType::None);
    }

    #[test]
    fn test_unparseable_inputs_are_none() {
        assert_eq!(classify("latest", "1.0.0"), UpdateType::None);
        assert_eq!(classify("dev-main", "1.0.0"), UpdateType::None);
        assert_eq!(classify("1.0.0", "not-a-version"), UpdateType::None);
        assert_eq!(classify("", ""), UpdateType::None);
    }

    #[test]
    fn test_wildcard_coercion() {
        assert_eq!(classify("1.x", "1.5.0"), UpdateType::Minor);
        assert_eq!(classify("1.2.*", "1.2.4"), UpdateType::Patch);
    }

    #[test]
    fn test_truncated_current() {
        assert_eq!(classify("1", "1.0.1"), UpdateType::Patch);
        assert_eq!(classify("^3.0", "3.1"), UpdateType::Minor);
    }

    #[test]
    fn test_pep440_prerelease_latest() {
        assert_eq!(classify("2.0.0", "2.1.0rc1"), UpdateType::Minor);
        assert_eq!(classify("2.1.0a1", "2.1.0"), UpdateType::Prerelease);
    }

    #[test]
    fn test_classify_specifier_shapes() {
        assert_eq!(
            classify_specifier(&VersionSpecifier::parse("^1.0.0"), "2.0.0"),
            UpdateType::Major
        );
        assert_eq!(
            classify_specifier(&VersionSpecifier::parse(">=1.0,<2.0"), "1.1.0"),
            UpdateType::Minor
        );
        assert_eq!(
            classify_specifier(&VersionSpecifier::Pseudo(PseudoKind::Git), "2.0.0"),
            UpdateType::None
        );
        let composite = VersionSpecifier::from_value(&json!({
            "hosted": "https://pub.example.com",
            "version": "^1.0.0"
        }));
        assert_eq!(classify_specifier(&composite, "1.0.3"), UpdateType::Patch);
        let versionless = VersionSpecifier::from_value(&json!({"registry": "x"}));
        assert_eq!(classify_specifier(&versionless, "1.0.3"), UpdateType::None);
    }

    #[test]
    fn test_hostile_inputs_are_total() {
        let inputs = [
            "",
            " ",
            "||",
            "|",
            "- -",
            " - ",
            "1.0.0 - ",
            "^",
            "~",
            "~=",
            ">=",
            "^18446744073709551615",
            "~18446744073709551615",
            "~=1.18446744073709551615.0",
            "^0.18446744073709551615",
            "^0.0.18446744073709551615",
            "18446744073709551615.x",
            "1.18446744073709551615.x",
            "^1.0 || ~18446744073709551615",
            "18446744073709551616",
            "99999999999999999999999.0.0",
            "18446744073709551615.18446744073709551615.18446744073709551615",
            "1.0.0-",
            "1.0.0-+",
            "v",
            "x.x.x",
            "١٢.٣",
            "é1.0",
            ">=1.0,,<2.0",
            "^1.0 ||| ^2.0",
        ];

        for input in inputs {
            // Same coerced value on both sides never reports an update
            assert_eq!(classify(input, input), UpdateType::None, "input {input:?}");
            let _ = classify(input, "1.0.0");
            let _ = classify("1.0.0", input);
            let _ = VersionRange::parse(input);
            let _ = coerce(input);
            let _ = crate::version::is_range(input);
            let _ = crate::version::satisfies(input, "1.0.0");
            let _ = classify_specifier(&VersionSpecifier::parse(input), "1.0.0");
        }
    }

    #[test]
    fn test_numeric_limits() {
        assert_eq!(classify("^18446744073709551615", "1.0.0"), UpdateType::None);
        assert_eq!(classify("~18446744073709551615", "1.0.0"), UpdateType::None);
        assert_eq!(
            classify("1.0.0", "18446744073709551615.0.0"),
            UpdateType::Major
        );
        assert!(VersionRange::parse("^18446744073709551615").is_none());
        assert!(VersionRange::parse("^1.0 || ~18446744073709551615").is_none());
        assert!(VersionRange::parse(">=18446744073709551615.0.0").is_some());
        assert_eq!(coerce("18446744073709551615").map(|v| v.major), Some(u64::MAX));
        assert!(coerce("18446744073709551616").is_none());
    }
}
