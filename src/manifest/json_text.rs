//! In-place edits of JSON manifests
//!
//! Rewrites go through text substitution at the exact location of the old
//! value so that formatting, key order and everything else stays byte-identical.

use regex::Regex;
use std::ops::Range;

/// Nesting depth of braces/brackets at byte offset `pos`, ignoring string contents
fn depth_at(content: &str, pos: usize) -> usize {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in content.as_bytes()[..pos].iter() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}

/// Offset just past the brace closing the object opened at `open`
fn matching_brace(content: &str, open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in content.as_bytes()[open..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte range of the object held by the top-level key `section`
pub fn object_span(content: &str, section: &str) -> Option<Range<usize>> {
    let pattern = format!(r#""{}"\s*:\s*\{{"#, regex::escape(section));
    let re = Regex::new(&pattern).ok()?;

    let header = re
        .find_iter(content)
        .find(|m| depth_at(content, m.start()) == 1)?;
    let open = header.end() - 1;
    matching_brace(content, open).map(|close| open..close)
}

/// Replace the string value of `name` inside the top-level object `section`
///
/// Returns `None` when the section or the key cannot be found.
pub fn replace_string_value(
    content: &str,
    section: &str,
    name: &str,
    new_value: &str,
) -> Option<String> {
    let span = object_span(content, section)?;
    let object = &content[span.clone()];

    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let caps = re
        .captures_iter(object)
        .find(|caps| caps.get(0).is_some_and(|m| depth_at(object, m.start()) == 1))?;
    let value = caps.get(1)?;

    let start = span.start + value.start();
    let end = span.start + value.end();
    let mut updated = String::with_capacity(content.len() + new_value.len());
    updated.push_str(&content[..start]);
    updated.push_str(new_value);
    updated.push_str(&content[end..]);
    Some(updated)
}
