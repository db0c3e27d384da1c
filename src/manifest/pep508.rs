//! PEP 508 requirement strings (`requests[socks]>=2.0,<3; python_version >= "3.8"`)

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[[^\]]*\])?\s*([^;]*?)\s*(?:;.*)?$",
    )
    .unwrap()
});

static NAME_SEPARATORS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// A requirement split into name and version specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Project name as written
    pub name: String,
    /// Version specifier or direct reference (`@ https://...`), possibly empty
    pub specifier: String,
    /// Byte range of `specifier` within the parsed string
    pub span: Range<usize>,
}

/// Parse a single requirement string
pub fn parse_requirement(input: &str) -> Option<Requirement> {
    let caps = REQUIREMENT_RE.captures(input)?;
    let name = caps.get(1)?;
    let spec = caps.get(2)?;

    let mut span = spec.range();
    let text = spec.as_str();
    // legacy parenthesized form: `requests (>=2.0)`
    if text.len() >= 2 && text.starts_with('(') && text.ends_with(')') {
        let inner = &text[1..text.len() - 1];
        let leading = inner.len() - inner.trim_start().len();
        let trailing = inner.len() - inner.trim_end().len();
        span = (span.start + 1 + leading)..(span.end - 1 - trailing);
    }

    Some(Requirement {
        name: name.as_str().to_string(),
        specifier: input[span.clone()].to_string(),
        span,
    })
}

/// Canonical project name used for comparisons (PEP 503)
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS_RE
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}
