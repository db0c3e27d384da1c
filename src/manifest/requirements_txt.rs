//! requirements.txt parser for pip projects
//!
//! Handles one PEP 508 requirement per line, comments, environment markers,
//! line continuations and editable VCS installs (`-e git+...#egg=name`).
//! Other pip options (`-r`, `--index-url`, `--hash`, ...) are ignored.

use super::pep508::{normalize_name, parse_requirement};
use super::{rewritten_text, ManifestKind, ManifestParser};
use crate::domain::{Dependency, Ecosystem, PseudoKind, VersionSpecifier};
use crate::error::ManifestError;
use crate::parser::get_parser;

const SECTION: &str = "requirements";

/// Parser for requirements*.txt files
pub struct RequirementsTxtParser;

/// The part of a line before any comment, without a trailing continuation
fn code_of(line: &str) -> &str {
    let code = match line.find('#') {
        Some(0) => "",
        Some(i) if line[..i].ends_with(char::is_whitespace) => &line[..i],
        _ => line,
    };
    code.trim_end().trim_end_matches('\\').trim_end()
}

/// Name declared by an editable install (`#egg=name`)
fn editable_name(line: &str) -> Option<&str> {
    let (_, fragment) = line.split_once("#egg=")?;
    let name = fragment
        .split(|c: char| c == '&' || c == '[' || c.is_whitespace())
        .next()?;
    (!name.is_empty()).then_some(name)
}

impl ManifestParser for RequirementsTxtParser {
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError> {
        let parser = get_parser(Ecosystem::Pypi);
        let mut dependencies = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some(target) = trimmed
                .strip_prefix("-e ")
                .or_else(|| trimmed.strip_prefix("--editable "))
            {
                if let Some(name) = editable_name(target) {
                    let kind = match parser.parse(target.trim()) {
                        VersionSpecifier::Pseudo(kind) => kind,
                        _ => PseudoKind::Path,
                    };
                    dependencies.push(Dependency::production(
                        name,
                        VersionSpecifier::Pseudo(kind),
                        SECTION,
                        Ecosystem::Pypi,
                    ));
                }
                continue;
            }
            if trimmed.starts_with('-') {
                continue;
            }

            let Some(requirement) = parse_requirement(code_of(line)) else {
                continue;
            };
            dependencies.push(Dependency::production(
                requirement.name,
                parser.parse(&requirement.specifier),
                SECTION,
                Ecosystem::Pypi,
            ));
        }

        Ok(dependencies)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::RequirementsTxt
    }

    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let new_text = rewritten_text(dependency, new_version, "requirements.txt")?;
        let wanted = normalize_name(&dependency.name);

        let mut offset = 0;
        for line in content.split_inclusive('\n') {
            if !line.trim_start().starts_with('-') {
                if let Some(requirement) = parse_requirement(code_of(line)) {
                    if normalize_name(&requirement.name) == wanted && !requirement.specifier.is_empty() {
                        let start = offset + requirement.span.start;
                        let end = offset + requirement.span.end;
                        return Ok(format!("{}{}{}", &content[..start], new_text, &content[end..]));
                    }
                }
            }
            offset += line.len();
        }

        Err(ManifestError::dependency_not_found(
            "requirements.txt",
            &dependency.name,
        ))
    }
}
