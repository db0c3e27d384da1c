//! package.json parser for npm projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use super::json_text::replace_string_value;
use super::{rewritten_text, ManifestKind, ManifestParser};
use crate::domain::{Dependency, Ecosystem};
use crate::error::ManifestError;
use crate::parser::{get_parser, SpecifierParser};
use serde_json::{Map, Value};

/// Dependency sections in declaration order, with their dev flag
const SECTIONS: [(&str, bool); 4] = [
    ("dependencies", false),
    ("devDependencies", true),
    ("peerDependencies", false),
    ("optionalDependencies", false),
];

/// Parser for package.json files
pub struct PackageJsonParser;

impl ManifestParser for PackageJsonParser {
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error("package.json", e.to_string()))?;

        let mut dependencies = Vec::new();
        let parser = get_parser(Ecosystem::Npm);

        for (section, is_dev) in SECTIONS {
            if let Some(deps) = json.get(section).and_then(|v| v.as_object()) {
                parse_dependency_object(deps, section, is_dev, parser.as_ref(), &mut dependencies);
            }
        }

        Ok(dependencies)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::PackageJson
    }

    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let new_text = rewritten_text(dependency, new_version, "package.json")?;
        replace_string_value(content, &dependency.section, &dependency.name, &new_text)
            .ok_or_else(|| ManifestError::dependency_not_found("package.json", &dependency.name))
    }
}

fn parse_dependency_object(
    deps: &Map<String, Value>,
    section: &str,
    is_dev: bool,
    parser: &dyn SpecifierParser,
    output: &mut Vec<Dependency>,
) {
    for (name, value) in deps {
        if value.is_string() {
            let specifier = parser.parse_value(value);
            output.push(Dependency::new(
                name.clone(),
                specifier,
                section,
                is_dev,
                Ecosystem::Npm,
            ));
        }
    }
}
