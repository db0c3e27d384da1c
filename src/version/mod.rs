//! Version normalization, classification and rewriting
//!
//! Everything in this module is pure: no I/O and no shared state.

mod classify;
mod normalize;
mod range;
mod rewrite;

pub use classify::{classify, classify_specifier};
pub use normalize::{coerce, split_operator, NormalizedVersion, OPERATOR_CHARS};
pub use range::{is_range, satisfies, Comparator, Op, VersionRange};
pub use rewrite::{rewrite, rewrite_str};
