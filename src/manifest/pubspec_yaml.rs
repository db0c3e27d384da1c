//! pubspec.yaml parser for Dart and Flutter projects
//!
//! Handles:
//! - dependencies
//! - dev_dependencies
//! - dependency_overrides
//!
//! Values may be a constraint string, `null` (any version) or a map with
//! `sdk`, `path`, `git`, `hosted` and `version` keys.

use super::{rewritten_text, ManifestKind, ManifestParser};
use crate::domain::{Dependency, Ecosystem, VERSION_KEY};
use crate::error::ManifestError;
use crate::parser::get_parser;
use serde_json::Value;
use std::ops::Range;

const FILE_NAME: &str = "pubspec.yaml";

const SECTIONS: [(&str, bool); 3] = [
    ("dependencies", false),
    ("dev_dependencies", true),
    ("dependency_overrides", false),
];

/// Parser for pubspec.yaml files
pub struct PubspecYamlParser;

impl ManifestParser for PubspecYamlParser {
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError> {
        let yaml: Value = serde_yaml::from_str(content)
            .map_err(|e| ManifestError::yaml_parse_error(FILE_NAME, e.to_string()))?;

        let parser = get_parser(Ecosystem::Pub);
        let mut dependencies = Vec::new();

        for (section, is_dev) in SECTIONS {
            let Some(deps) = yaml.get(section).and_then(|v| v.as_object()) else {
                continue;
            };
            for (name, value) in deps {
                dependencies.push(Dependency::new(
                    name.clone(),
                    parser.parse_value(value),
                    section,
                    is_dev,
                    Ecosystem::Pub,
                ));
            }
        }

        Ok(dependencies)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::PubspecYaml
    }

    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let new_text = rewritten_text(dependency, new_version, FILE_NAME)?;

        specifier_span(content, &dependency.section, &dependency.name)
            .map(|span| format!("{}{}{}", &content[..span.start], new_text, &content[span.end..]))
            .ok_or_else(|| ManifestError::dependency_not_found(FILE_NAME, &dependency.name))
    }
}

/// A block-mapping entry: indentation, key and the byte index just past its `:`
struct Entry<'a> {
    indent: usize,
    key: &'a str,
    value_start: usize,
}

fn entry(line: &str) -> Option<Entry<'_>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }
    let indent = line.len() - trimmed.len();

    let (key, colon) = match trimmed.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = trimmed[1..].find(quote)? + 1;
            let colon = close + 1 + trimmed[close + 1..].find(':')?;
            (&trimmed[1..close], colon)
        }
        _ => {
            let colon = trimmed.char_indices().find_map(|(i, c)| {
                let next = trimmed[i + 1..].chars().next();
                (c == ':' && next.is_none_or(char::is_whitespace)).then_some(i)
            })?;
            (trimmed[..colon].trim_end(), colon)
        }
    };

    Some(Entry {
        indent,
        key,
        value_start: indent + colon + 1,
    })
}

/// Range of the scalar value starting at or after `start`, without quotes or comment
fn scalar_span(line: &str, start: usize) -> Option<Range<usize>> {
    let rest = &line[start..];
    let value = rest.trim_start();
    let begin = start + (rest.len() - value.len());

    if let Some(quote) = value.chars().next().filter(|&c| matches!(c, '"' | '\'')) {
        let close = value[1..].find(quote)? + 1;
        return Some(begin + 1..begin + close);
    }

    let end = value.find(" #").unwrap_or(value.len());
    let scalar = value[..end].trim_end();
    (!scalar.is_empty() && !scalar.starts_with('#')).then_some(begin..begin + scalar.len())
}

fn specifier_span(content: &str, section: &str, name: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    let mut in_section = false;
    // indentation of the section's entries, then of the dependency's own keys
    let mut entry_indent = None;
    let mut in_dependency: Option<usize> = None;

    for line in content.split_inclusive('\n') {
        let line_offset = offset;
        offset += line.len();

        let Some(entry) = entry(line) else {
            continue;
        };

        if entry.indent == 0 {
            in_section = entry.key == section;
            entry_indent = None;
            in_dependency = None;
            continue;
        }
        if !in_section {
            continue;
        }

        if let Some(parent_indent) = in_dependency {
            if entry.indent > parent_indent {
                if entry.key == VERSION_KEY {
                    let span = scalar_span(line, entry.value_start)?;
                    return Some(line_offset + span.start..line_offset + span.end);
                }
                continue;
            }
            in_dependency = None;
        }

        let indent = *entry_indent.get_or_insert(entry.indent);
        if entry.indent != indent || entry.key != name {
            continue;
        }

        match scalar_span(line, entry.value_start) {
            Some(span) => return Some(line_offset + span.start..line_offset + span.end),
            None => in_dependency = Some(entry.indent),
        }
    }

    None
}
