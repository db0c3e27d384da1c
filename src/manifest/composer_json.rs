//! composer.json parser for PHP projects
//!
//! Handles `require` and `require-dev`. Platform requirements (`php`,
//! `ext-*`, `lib-*`, `composer-*-api`, `hhvm`) are not Packagist packages and
//! are left out.

use super::json_text::replace_string_value;
use super::{rewritten_text, ManifestKind, ManifestParser};
use crate::domain::{Dependency, Ecosystem};
use crate::error::ManifestError;
use crate::parser::get_parser;
use serde_json::Value;

const SECTIONS: [(&str, bool); 2] = [("require", false), ("require-dev", true)];

/// Parser for composer.json files
pub struct ComposerJsonParser;

/// Returns true for platform packages provided by the PHP runtime
pub fn is_platform_package(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    matches!(
        lower.as_str(),
        "php" | "php-64bit" | "php-ipv6" | "php-zts" | "php-debug" | "hhvm" | "composer"
            | "composer-plugin-api" | "composer-runtime-api"
    ) || lower.starts_with("ext-")
        || lower.starts_with("lib-")
}

impl ManifestParser for ComposerJsonParser {
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("composer.json", e.to_string()))?;

        let parser = get_parser(Ecosystem::Composer);
        let mut dependencies = Vec::new();

        for (section, is_dev) in SECTIONS {
            let Some(deps) = json.get(section).and_then(|v| v.as_object()) else {
                continue;
            };
            for (name, value) in deps {
                if is_platform_package(name) || !value.is_string() {
                    continue;
                }
                dependencies.push(Dependency::new(
                    name.clone(),
                    parser.parse_value(value),
                    section,
                    is_dev,
                    Ecosystem::Composer,
                ));
            }
        }

        Ok(dependencies)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::ComposerJson
    }

    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let new_text = rewritten_text(dependency, new_version, "composer.json")?;
        replace_string_value(content, &dependency.section, &dependency.name, &new_text)
            .ok_or_else(|| ManifestError::dependency_not_found("composer.json", &dependency.name))
    }
}
