//! Comparator ranges and containment checks
//!
//! Supported syntax (mixed freely across ecosystems):
//! - primitive comparators: `>=1.0`, `>1.0`, `<=2.0`, `<2.0`, `=1.0`, `==1.0`, `!=1.5`
//! - conjunction by comma or whitespace: `>=1.0,<2.0`, `>=1.0.0 <2.0.0`
//! - disjunction by `||` (or Composer's `|`): `^1.0 || ^2.0`
//! - caret, tilde and PEP 440 compatible-release clauses: `^1.2`, `~1.2.3`, `~=1.4`
//! - hyphen ranges: `1.0.0 - 2.0.0`
//! - x-ranges and wildcards: `1.x`, `1.2.*`, `*`

use super::normalize::{coerce, NormalizedVersion};
use regex::Regex;
use std::sync::LazyLock;

static PAYLOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?\d+(?:\.(?:\d+|[xX*]))*(?:[-.+]?[0-9A-Za-z][0-9A-Za-z.+-]*)?$").unwrap()
});

/// Operators in longest-first order so that `>=` wins over `>`
const OPERATORS: [(&str, ClauseOp); 12] = [
    ("===", ClauseOp::Exact),
    ("~=", ClauseOp::Compatible),
    ("==", ClauseOp::Exact),
    ("!=", ClauseOp::NotEqual),
    (">=", ClauseOp::Primitive(Op::Gte)),
    ("<=", ClauseOp::Primitive(Op::Lte)),
    ("=>", ClauseOp::Primitive(Op::Gte)),
    ("^", ClauseOp::Caret),
    ("~", ClauseOp::Tilde),
    (">", ClauseOp::Primitive(Op::Gt)),
    ("<", ClauseOp::Primitive(Op::Lt)),
    ("=", ClauseOp::Exact),
];

/// Primitive comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A single primitive comparison against a bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub op: Op,
    pub version: NormalizedVersion,
}

impl Comparator {
    fn new(op: Op, version: NormalizedVersion) -> Self {
        Self { op, version }
    }

    /// Returns true if `version` satisfies this comparator
    pub fn matches(&self, version: &NormalizedVersion) -> bool {
        match self.op {
            Op::Eq => version == &self.version,
            Op::Ne => version != &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
        }
    }
}

/// Operator as written in a clause, before expansion to primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseOp {
    Bare,
    Exact,
    NotEqual,
    Caret,
    Tilde,
    Compatible,
    Primitive(Op),
}

/// Parsed version payload of one clause
struct Payload {
    version: NormalizedVersion,
    /// Number of explicit numeric components before any wildcard
    precision: usize,
    wildcard: bool,
}

/// A disjunction of conjunctions of comparators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<Vec<Comparator>>,
    clauses: usize,
}

impl VersionRange {
    /// Parse a range expression; `None` if any clause is not a version constraint
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut alternatives = Vec::new();
        let mut clauses = 0;
        for alternative in input.replace("||", "|").split('|') {
            let (comparators, count) = parse_conjunction(alternative.trim())?;
            alternatives.push(comparators);
            clauses += count;
        }

        Some(Self {
            alternatives,
            clauses,
        })
    }

    /// Number of clauses as written (before caret/tilde expansion)
    pub fn clause_count(&self) -> usize {
        self.clauses
    }

    /// Returns true if the expression has more than one clause
    pub fn is_compound(&self) -> bool {
        self.clauses > 1
    }

    /// Returns true if `version` falls inside any alternative
    pub fn satisfies(&self, version: &NormalizedVersion) -> bool {
        self.alternatives
            .iter()
            .any(|conjunction| conjunction.iter().all(|c| c.matches(version)))
    }
}

/// Returns true if `spec` is a valid range made of several comparator clauses
pub fn is_range(spec: &str) -> bool {
    VersionRange::parse(spec).is_some_and(|range| range.is_compound())
}

/// Returns true if `version` satisfies the constraint `spec`
///
/// Single-clause constraints such as `^1.2.3` count as ranges here. Anything
/// unparseable on either side yields `false`.
pub fn satisfies(spec: &str, version: &str) -> bool {
    match (VersionRange::parse(spec), coerce(version)) {
        (Some(range), Some(version)) => range.satisfies(&version),
        _ => false,
    }
}

fn parse_conjunction(input: &str) -> Option<(Vec<Comparator>, usize)> {
    if input.is_empty() {
        return None;
    }

    if let Some((lower, upper)) = input.split_once(" - ") {
        let lower = parse_payload(lower.trim())?;
        let upper = parse_payload(upper.trim())?;
        let comparators = vec![
            Comparator::new(Op::Gte, lower.version),
            Comparator::new(Op::Lte, upper.version),
        ];
        return Some((comparators, 2));
    }

    let clauses = tokenize(input);
    if clauses.is_empty() {
        return None;
    }

    let mut comparators = Vec::new();
    for clause in &clauses {
        comparators.extend(parse_clause(clause)?);
    }
    Some((comparators, clauses.len()))
}

/// Split on commas and whitespace, re-attaching operators written apart from
/// their version (`>= 1.0`)
fn tokenize(input: &str) -> Vec<String> {
    let mut clauses: Vec<String> = Vec::new();
    let mut pending = String::new();

    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        pending.push_str(token);
        if !token.chars().all(|c| "<>=!~^".contains(c)) {
            clauses.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        clauses.push(pending);
    }
    clauses
}

fn parse_clause(clause: &str) -> Option<Vec<Comparator>> {
    let (op, payload) = OPERATORS
        .iter()
        .find_map(|(token, op)| clause.strip_prefix(token).map(|rest| (*op, rest)))
        .unwrap_or((ClauseOp::Bare, clause));

    let payload = payload.trim();
    if payload == "*" || payload.eq_ignore_ascii_case("x") {
        return match op {
            ClauseOp::Bare | ClauseOp::Exact | ClauseOp::Primitive(Op::Gte) => Some(Vec::new()),
            _ => None,
        };
    }

    let payload = parse_payload(payload)?;
    let version = payload.version.clone();

    let comparators = match op {
        ClauseOp::Bare | ClauseOp::Exact if payload.wildcard || op == ClauseOp::Bare => {
            if payload.precision >= 3 {
                vec![Comparator::new(Op::Eq, version)]
            } else {
                x_range(&payload)?
            }
        }
        ClauseOp::Bare | ClauseOp::Exact => vec![Comparator::new(Op::Eq, version)],
        ClauseOp::NotEqual => vec![Comparator::new(Op::Ne, version)],
        ClauseOp::Primitive(op) => vec![Comparator::new(op, version)],
        ClauseOp::Caret => vec![
            Comparator::new(Op::Gte, version.clone()),
            Comparator::new(Op::Lt, caret_upper(&version, payload.precision)?),
        ],
        ClauseOp::Tilde => vec![
            Comparator::new(Op::Gte, version.clone()),
            Comparator::new(Op::Lt, tilde_upper(&version, payload.precision)?),
        ],
        ClauseOp::Compatible => {
            if payload.precision < 2 {
                return None;
            }
            vec![
                Comparator::new(Op::Gte, version.clone()),
                Comparator::new(Op::Lt, compatible_upper(&version, payload.precision)?),
            ]
        }
    };
    Some(comparators)
}

fn parse_payload(raw: &str) -> Option<Payload> {
    if !PAYLOAD_RE.is_match(raw) {
        return None;
    }
    let version = coerce(raw)?;

    let numeric = raw.trim_start_matches(['v', 'V']);
    let mut precision = 0;
    let mut wildcard = false;
    for part in numeric.split('.').take(3) {
        if matches!(part, "x" | "X" | "*") {
            wildcard = true;
            break;
        }
        if part.is_empty() || !part.starts_with(|c: char| c.is_ascii_digit()) {
            break;
        }
        precision += 1;
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
    }

    Some(Payload {
        version,
        precision,
        wildcard,
    })
}

fn x_range(payload: &Payload) -> Option<Vec<Comparator>> {
    let v = &payload.version;
    let upper = match payload.precision {
        0 => return Some(Vec::new()),
        1 => bump_major(v)?,
        _ => bump_minor(v)?,
    };
    Some(vec![
        Comparator::new(Op::Gte, v.release()),
        Comparator::new(Op::Lt, upper),
    ])
}

// Upper bounds are `None` when the bumped component would overflow u64.

fn bump_major(v: &NormalizedVersion) -> Option<NormalizedVersion> {
    Some(NormalizedVersion::new(v.major.checked_add(1)?, 0, 0))
}

fn bump_minor(v: &NormalizedVersion) -> Option<NormalizedVersion> {
    Some(NormalizedVersion::new(v.major, v.minor.checked_add(1)?, 0))
}

fn caret_upper(v: &NormalizedVersion, precision: usize) -> Option<NormalizedVersion> {
    if v.major > 0 || precision <= 1 {
        bump_major(v)
    } else if v.minor > 0 || precision == 2 {
        bump_minor(v)
    } else {
        Some(NormalizedVersion::new(0, 0, v.patch.checked_add(1)?))
    }
}

fn tilde_upper(v: &NormalizedVersion, precision: usize) -> Option<NormalizedVersion> {
    if precision <= 1 {
        bump_major(v)
    } else {
        bump_minor(v)
    }
}

fn compatible_upper(v: &NormalizedVersion, precision: usize) -> Option<NormalizedVersion> {
    if precision == 2 {
        bump_major(v)
    } else {
        bump_minor(v)
    }
}
