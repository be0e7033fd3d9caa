//! Sound-change rule engine.
//!
//! Rules are written one per line in a small DSL:
//!
//! ```text
//! s > /_#                               s is deleted word-finally
//! [sz] > t /                            s and z become t
//! {palatal plosive} > {palatal nasal} / positional class mapping
//! ```
//!
//! Each line is parsed, compiled against a [`NamedClassRegistry`] into a
//! dedicated matcher, and applied in order by a [`SoundChangeSet`].
//!
//! # Architecture
//!
//! - [`registry`] -- Named grapheme classes supplied by the caller
//! - [`rule`] -- Typed rules and the rule grammar
//! - [`compiler`] -- Condition-specific matcher synthesis
//! - [`replace`] -- Rewriting a matched tree
//! - [`engine`] -- Applying one compiled rule to text
//! - [`sound_change`] -- Ordered rule sets, compilation options and merging

pub mod compiler;
pub mod engine;
pub mod registry;
pub mod replace;
pub mod rule;
pub mod sound_change;

pub use registry::NamedClassRegistry;
pub use rule::{Condition, ParsedRule, Rule, RuleSource, RuleTarget, Target};
pub use sound_change::{CompileOptions, Compilation, SoundChangeSet};

use soundshift_core::SegmentError;

/// Error type for parsing and compiling one rule line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("empty rule")]
    Empty,
    #[error("cannot parse rule {line:?}")]
    Parse { line: String },
    /// A source pattern with no graphemes.
    #[error("empty source pattern")]
    EmptyPattern,
    #[error("unknown named class {name:?}")]
    UnresolvedNamedClass { name: String },
    /// A class target needs one single-grapheme source pattern per class
    /// member.
    #[error(
        "cannot map {from_count} source pattern(s) onto the {to_count} member(s) of class {class:?}"
    )]
    ClassMappingMismatch {
        class: String,
        from_count: usize,
        to_count: usize,
    },
    #[error(transparent)]
    Malformed(#[from] SegmentError),
}

/// One rule line that failed to compile and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line_number}: {rule:?}: {error}")]
pub struct RuleFailure {
    /// 1-based line number.
    pub line_number: usize,
    pub rule: String,
    pub error: RuleError,
}

/// Error type for compiling and applying sound changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SoundChangeError {
    #[error(transparent)]
    MalformedInput(#[from] SegmentError),
    #[error("rule {rule:?} did not consume the whole input {input:?}")]
    RuleMatchFailure { rule: String, input: String },
    #[error("{} rule line(s) failed to compile", .0.len())]
    Compile(Vec<RuleFailure>),
}
