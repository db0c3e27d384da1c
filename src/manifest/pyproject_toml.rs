//! pyproject.toml parser for Python projects
//!
//! Handles:
//! - PEP 621 `project.dependencies` and `project.optional-dependencies`
//! - PEP 735 `dependency-groups`
//! - Poetry `tool.poetry.dependencies`, `tool.poetry.dev-dependencies` and
//!   `tool.poetry.group.<name>.dependencies`
//!
//! Writing works on the raw text so comments, key order and quoting survive.

use super::pep508::{normalize_name, parse_requirement};
use super::{rewritten_text, ManifestKind, ManifestParser};
use crate::domain::{Dependency, Ecosystem};
use crate::error::ManifestError;
use crate::parser::{get_parser, SpecifierParser};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use toml::Value;

const FILE_NAME: &str = "pyproject.toml";
const POETRY_PREFIX: &str = "tool.poetry.";

static INLINE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[{,\s])version\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Parser for pyproject.toml files
pub struct PyprojectTomlParser;

impl ManifestParser for PyprojectTomlParser {
    fn parse(&self, content: &str) -> Result<Vec<Dependency>, ManifestError> {
        let toml: Value = toml::from_str(content)
            .map_err(|e| ManifestError::toml_parse_error(FILE_NAME, e.to_string()))?;

        let parser = get_parser(Ecosystem::Pypi);
        let mut dependencies = Vec::new();

        let project = toml.get("project");
        if let Some(deps) = project.and_then(|p| p.get("dependencies")) {
            push_requirements(deps, "project.dependencies", false, parser.as_ref(), &mut dependencies);
        }
        if let Some(optional) = project
            .and_then(|p| p.get("optional-dependencies"))
            .and_then(|o| o.as_table())
        {
            for (group, deps) in optional {
                let section = format!("project.optional-dependencies.{}", group);
                push_requirements(deps, &section, false, parser.as_ref(), &mut dependencies);
            }
        }
        if let Some(groups) = toml.get("dependency-groups").and_then(|g| g.as_table()) {
            for (group, deps) in groups {
                let section = format!("dependency-groups.{}", group);
                push_requirements(deps, &section, true, parser.as_ref(), &mut dependencies);
            }
        }

        let poetry = toml.get("tool").and_then(|t| t.get("poetry"));
        if let Some(deps) = poetry.and_then(|p| p.get("dependencies")) {
            push_poetry(deps, "tool.poetry.dependencies", false, parser.as_ref(), &mut dependencies);
        }
        if let Some(deps) = poetry.and_then(|p| p.get("dev-dependencies")) {
            push_poetry(deps, "tool.poetry.dev-dependencies", true, parser.as_ref(), &mut dependencies);
        }
        if let Some(groups) = poetry.and_then(|p| p.get("group")).and_then(|g| g.as_table()) {
            for (group, table) in groups {
                if let Some(deps) = table.get("dependencies") {
                    let section = format!("tool.poetry.group.{}.dependencies", group);
                    push_poetry(deps, &section, group != "main", parser.as_ref(), &mut dependencies);
                }
            }
        }

        Ok(dependencies)
    }

    fn kind(&self) -> ManifestKind {
        ManifestKind::PyprojectToml
    }

    fn update_version(
        &self,
        content: &str,
        dependency: &Dependency,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let new_text = rewritten_text(dependency, new_version, FILE_NAME)?;

        let span = if dependency.section.starts_with(POETRY_PREFIX) {
            poetry_span(content, &dependency.section, &dependency.name)
        } else {
            requirement_span(content, &dependency.section, &dependency.name)
        };

        span.map(|span| format!("{}{}{}", &content[..span.start], new_text, &content[span.end..]))
            .ok_or_else(|| ManifestError::dependency_not_found(FILE_NAME, &dependency.name))
    }
}

fn push_requirements(
    deps: &Value,
    section: &str,
    is_dev: bool,
    parser: &dyn SpecifierParser,
    output: &mut Vec<Dependency>,
) {
    let Some(entries) = deps.as_array() else {
        return;
    };
    // non-string entries are `{include-group = "..."}` references
    for requirement in entries
        .iter()
        .filter_map(|e| e.as_str())
        .filter_map(parse_requirement)
    {
        output.push(Dependency::new(
            requirement.name,
            parser.parse(&requirement.specifier),
            section,
            is_dev,
            Ecosystem::Pypi,
        ));
    }
}

fn push_poetry(
    deps: &Value,
    section: &str,
    is_dev: bool,
    parser: &dyn SpecifierParser,
    output: &mut Vec<Dependency>,
) {
    let Some(table) = deps.as_table() else {
        return;
    };
    for (name, value) in table {
        if name == "python" {
            continue;
        }
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        output.push(Dependency::new(
            name.clone(),
            parser.parse_value(&value),
            section,
            is_dev,
            Ecosystem::Pypi,
        ));
    }
}

/// A physical line together with the table it belongs to
struct TomlLine<'a> {
    offset: usize,
    text: &'a str,
    table: String,
}

fn toml_lines(content: &str) -> Vec<TomlLine<'_>> {
    let mut table = String::new();
    let mut offset = 0;
    let mut lines = Vec::new();

    for text in content.split_inclusive('\n') {
        let trimmed = text.trim_start();
        if trimmed.starts_with('[') {
            if let Some(end) = trimmed.find(']') {
                table = trimmed[..end]
                    .chars()
                    .filter(|c| !matches!(c, '[' | '"' | '\'') && !c.is_whitespace())
                    .collect();
            }
        }
        lines.push(TomlLine {
            offset,
            text,
            table: table.clone(),
        });
        offset += text.len();
    }

    lines
}

/// Key of a `key = value` line and the byte index of its `=`
fn split_key(line: &str) -> Option<(&str, usize)> {
    let trimmed = line.trim_start();
    let lead = line.len() - trimmed.len();

    let quote = trimmed.chars().next()?;
    if quote == '"' || quote == '\'' {
        let close = trimmed[1..].find(quote)? + 1;
        let rest = &trimmed[close + 1..];
        let after = rest.trim_start();
        if !after.starts_with('=') {
            return None;
        }
        return Some((&trimmed[1..close], lead + close + 1 + (rest.len() - after.len())));
    }

    let eq = trimmed.find('=')?;
    let key = trimmed[..eq].trim();
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    bare.then_some((key, lead + eq))
}

/// Inner range of the string literal opening at `start`
fn string_span(text: &str, start: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let quote = *bytes.get(start)?;
    let mut i = start + 1;
    while i < bytes.len() && bytes[i] != quote {
        if quote == b'"' && bytes[i] == b'\\' {
            i += 1;
        }
        i += 1;
    }
    (i < bytes.len()).then_some(start + 1..i)
}

/// Location of the version text for `name = "..."` or `name = { version = "..." }`
fn value_span(line: &str, eq: usize) -> Option<Range<usize>> {
    let after = &line[eq + 1..];
    let value = after.trim_start();
    let start = eq + 1 + (after.len() - value.len());

    match value.chars().next()? {
        '"' | '\'' => string_span(line, start),
        '{' => {
            let caps = INLINE_VERSION_RE.captures(value)?;
            let found = caps.get(1).or_else(|| caps.get(2))?;
            Some(start + found.start()..start + found.end())
        }
        _ => None,
    }
}

fn poetry_span(content: &str, section: &str, name: &str) -> Option<Range<usize>> {
    let wanted = normalize_name(name);
    let subtable_prefix = format!("{}.", section);

    for line in toml_lines(content) {
        let Some((key, eq)) = split_key(line.text) else {
            continue;
        };
        if line.table == section && normalize_name(key) == wanted {
            return value_span(line.text, eq).map(|r| line.offset + r.start..line.offset + r.end);
        }
        // [tool.poetry.dependencies.<name>] with its own version key
        if key == "version" {
            let matches_subtable = line
                .table
                .strip_prefix(&subtable_prefix)
                .is_some_and(|table_name| normalize_name(table_name) == wanted);
            if matches_subtable {
                return value_span(line.text, eq)
                    .map(|r| line.offset + r.start..line.offset + r.end);
            }
        }
    }

    None
}

fn requirement_span(content: &str, section: &str, name: &str) -> Option<Range<usize>> {
    let (table, array_key) = section.rsplit_once('.')?;
    let wanted = normalize_name(name);

    let open = toml_lines(content).into_iter().find_map(|line| {
        let (key, eq) = split_key(line.text)?;
        if line.table != table || key != array_key {
            return None;
        }
        let bracket = line.text[eq + 1..].find('[')?;
        Some(line.offset + eq + 1 + bracket)
    })?;

    array_literals(content, open).into_iter().find_map(|literal| {
        let requirement = parse_requirement(&content[literal.clone()])?;
        if normalize_name(&requirement.name) != wanted || requirement.specifier.is_empty() {
            return None;
        }
        Some(literal.start + requirement.span.start..literal.start + requirement.span.end)
    })
}

/// Inner ranges of the string literals inside the array opening at `open`
fn array_literals(content: &str, open: usize) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let mut literals = Vec::new();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'"' | b'\'' => match string_span(content, i) {
                Some(span) => {
                    i = span.end;
                    literals.push(span);
                }
                None => break,
            },
            _ => {}
        }
        i += 1;
    }

    literals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PseudoKind, VersionSpecifier};

    const PEP621: &str = r#"[project]
name = "service"
version = "0.1.0"
dependencies = [
    "requests>=2.31.0",  # http client
    "django>=4.2,<5.0",
    'pydantic[email]~=2.5 ; python_version >= "3.9"',
    "rich",
]

[project.optional-dependencies]
docs = ["sphinx==7.2.6"]

[dependency-groups]
test = ["pytest>=7.4", { include-group = "docs" }]
"#;

    const POETRY: &str = r#"[tool.poetry]
name = "app"

[tool.poetry.dependencies]
python = "^3.10"
django = "^4.2"
requests = { version = "^2.28", extras = ["socks"] }
mylib = { path = "../mylib" }

[tool.poetry.group.dev.dependencies]
pytest = "^7.4"

[tool.poetry.dependencies.celery]
version = "^5.3"
extras = ["redis"]
"#;

    fn find<'a>(deps: &'a [Dependency], name: &str) -> &'a Dependency {
        deps.iter().find(|d| d.name == name).unwrap()
    }

    #[test]
    fn test_parse_pep621() {
        let deps = PyprojectTomlParser.parse(PEP621).unwrap();
        assert_eq!(deps.len(), 6);

        assert_eq!(
            find(&deps, "django").specifier,
            VersionSpecifier::Range(">=4.2,<5.0".to_string())
        );
        assert_eq!(
            find(&deps, "pydantic").specifier,
            VersionSpecifier::Plain("~=2.5".to_string())
        );
        assert_eq!(find(&deps, "rich").specifier, VersionSpecifier::Pseudo(PseudoKind::Any));

        let sphinx = find(&deps, "sphinx");
        assert_eq!(sphinx.section, "project.optional-dependencies.docs");
        assert!(!sphinx.is_dev);

        let pytest = find(&deps, "pytest");
        assert_eq!(pytest.section, "dependency-groups.test");
        assert!(pytest.is_dev);
    }

    #[test]
    fn test_parse_poetry() {
        let deps = PyprojectTomlParser.parse(POETRY).unwrap();
        assert!(deps.iter().all(|d| d.name != "python"));

        assert_eq!(
            find(&deps, "django").specifier,
            VersionSpecifier::Plain("^4.2".to_string())
        );
        let requests = find(&deps, "requests");
        assert!(matches!(requests.specifier, VersionSpecifier::Composite(_)));
        assert_eq!(requests.current(), Some("^2.28"));
        assert_eq!(find(&deps, "mylib").specifier, VersionSpecifier::Pseudo(PseudoKind::Path));
        assert_eq!(find(&deps, "celery").current(), Some("^5.3"));

        let pytest = find(&deps, "pytest");
        assert!(pytest.is_dev);
        assert_eq!(pytest.section, "tool.poetry.group.dev.dependencies");
    }

    #[test]
    fn test_update_pep621_keeps_comment() {
        let deps = PyprojectTomlParser.parse(PEP621).unwrap();
        let updated = PyprojectTomlParser
            .update_version(PEP621, find(&deps, "requests"), "2.32.3")
            .unwrap();
        assert!(updated.contains("\"requests>=2.32.3\",  # http client\n"));
        assert_eq!(updated.replace("2.32.3", "2.31.0"), PEP621);
    }

    #[test]
    fn test_update_pep621_marker_and_extras() {
        let deps = PyprojectTomlParser.parse(PEP621).unwrap();
        let updated = PyprojectTomlParser
            .update_version(PEP621, find(&deps, "pydantic"), "2.9.2")
            .unwrap();
        assert!(updated.contains(r#"'pydantic[email]~=2.9.2 ; python_version >= "3.9"',"#));
    }

    #[test]
    fn test_update_pep621_range_collapses() {
        let deps = PyprojectTomlParser.parse(PEP621).unwrap();
        let updated = PyprojectTomlParser
            .update_version(PEP621, find(&deps, "django"), "5.1.0")
            .unwrap();
        assert!(updated.contains("\"django>=5.1.0\",\n"));
    }

    #[test]
    fn test_update_targets_group() {
        let deps = PyprojectTomlParser.parse(PEP621).unwrap();
        let updated = PyprojectTomlParser
            .update_version(PEP621, find(&deps, "pytest"), "8.3.3")
            .unwrap();
        assert!(updated.contains(r#"test = ["pytest>=8.3.3", { include-group = "docs" }]"#));
    }

    #[test]
    fn test_update_poetry_string() {
        let deps = PyprojectTomlParser.parse(POETRY).unwrap();
        let updated = PyprojectTomlParser
            .update_version(POETRY, find(&deps, "django"), "5.1.2")
            .unwrap();
        assert!(updated.contains("django = \"^5.1.2\"\n"));
        assert!(updated.contains("python = \"^3.10\"\n"));
    }

    #[test]
    fn test_update_poetry_inline_table() {
        let deps = PyprojectTomlParser.parse(POETRY).unwrap();
        let updated = PyprojectTomlParser
            .update_version(POETRY, find(&deps, "requests"), "2.32.3")
            .unwrap();
        assert!(updated.contains(r#"requests = { version = "^2.32.3", extras = ["socks"] }"#));
    }

    #[test]
    fn test_update_poetry_subtable() {
        let deps = PyprojectTomlParser.parse(POETRY).unwrap();
        let updated = PyprojectTomlParser
            .update_version(POETRY, find(&deps, "celery"), "5.4.0")
            .unwrap();
        assert!(updated.contains("[tool.poetry.dependencies.celery]\nversion = \"^5.4.0\"\n"));
        assert_eq!(updated.replace("^5.4.0", "^5.3"), POETRY);
    }

    #[test]
    fn test_update_poetry_group() {
        let deps = PyprojectTomlParser.parse(POETRY).unwrap();
        let updated = PyprojectTomlParser
            .update_version(POETRY, find(&deps, "pytest"), "8.3.3")
            .unwrap();
        assert!(updated.contains("pytest = \"^8.3.3\"\n"));
    }

    #[test]
    fn test_update_missing_dependency() {
        let ghost = Dependency::production(
            "flask",
            VersionSpecifier::parse(">=3.0"),
            "project.dependencies",
            Ecosystem::Pypi,
        );
        let err = PyprojectTomlParser.update_version(PEP621, &ghost, "3.1.0").unwrap_err();
        assert!(matches!(err, ManifestError::DependencyNotFound { .. }));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = PyprojectTomlParser.parse("[project\n").unwrap_err();
        assert!(matches!(err, ManifestError::TomlParseError { .. }));
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("django = \"^4.2\""), Some(("django", 7)));
        assert_eq!(split_key("\"zope.interface\" = \"5\""), Some(("zope.interface", 17)));
        assert_eq!(split_key("    \"requests>=2\","), None);
        assert_eq!(split_key("[project]"), None);
    }
}
