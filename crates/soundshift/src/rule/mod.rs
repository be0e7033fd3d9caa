//! Typed rules.
//!
//! A rule line is parsed by [`grammar::RuleGrammar`] into a [`ParsedRule`],
//! then compiled against a registry into a [`Rule`] that owns its runtime
//! matcher.

pub mod grammar;

use std::fmt;

use hashbrown::HashMap;
use soundshift_combinator::Node;

use crate::registry::NamedClassRegistry;
use crate::{RuleError, SoundChangeError, compiler, engine};

/// Where a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Everywhere.
    Unconditional,
    /// At the start of a word: `#_`.
    StartOfWord,
    /// At the end of a word: `_#`.
    EndOfWord,
    /// Directly after a member of the class: `{a}_`.
    AfterNamed(String),
    /// Directly before a member of the class: `_{a}`.
    BeforeNamed(String),
    /// Between members of two classes: `{a}_{b}`.
    BetweenNamed(String, String),
}

impl Condition {
    /// Class names the condition refers to.
    pub fn class_names(&self) -> Vec<&str> {
        match self {
            Self::Unconditional | Self::StartOfWord | Self::EndOfWord => Vec::new(),
            Self::AfterNamed(a) | Self::BeforeNamed(a) => vec![a.as_str()],
            Self::BetweenNamed(a, b) => vec![a.as_str(), b.as_str()],
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconditional => Ok(()),
            Self::StartOfWord => f.write_str("#_"),
            Self::EndOfWord => f.write_str("_#"),
            Self::AfterNamed(a) => write!(f, "{{{a}}}_"),
            Self::BeforeNamed(a) => write!(f, "_{{{a}}}"),
            Self::BetweenNamed(a, b) => write!(f, "{{{a}}}_{{{b}}}"),
        }
    }
}

/// The FROM part of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Literal patterns. A bare run is one pattern; a bracket set is one
    /// single-grapheme pattern per member.
    Patterns(Vec<String>),
    /// Every member of a named class.
    Class(String),
}

/// The TO part of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    /// Literal replacement; empty for deletion.
    Literal(String),
    /// Positional mapping onto a named class.
    Class(String),
}

/// One rule line after parsing, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    /// The rule line as written, without surrounding whitespace.
    pub text: String,
    pub source: RuleSource,
    pub target: RuleTarget,
    pub condition: Condition,
}

impl ParsedRule {
    /// Parse one rule line with the default grammar.
    pub fn parse(line: &str) -> Result<Self, RuleError> {
        grammar::RuleGrammar::default().parse(line)
    }
}

/// Renders the canonical DSL form, which parses back to an equal rule
/// (modulo [`text`](ParsedRule::text)).
impl fmt::Display for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            RuleSource::Patterns(patterns) if patterns.len() == 1 => f.write_str(&patterns[0])?,
            RuleSource::Patterns(patterns) => write!(f, "[{}]", patterns.concat())?,
            RuleSource::Class(name) => write!(f, "{{{name}}}")?,
        }
        f.write_str(" >")?;
        match &self.target {
            RuleTarget::Literal(to) if to.is_empty() => {}
            RuleTarget::Literal(to) => write!(f, " {to}")?,
            RuleTarget::Class(name) => write!(f, " {{{name}}}")?,
        }
        write!(f, " /{}", self.condition)
    }
}

/// Compiled replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Emit this text for every match; empty deletes.
    Literal(String),
    /// Emit the target class member at the matched source grapheme's
    /// position.
    Mapped(HashMap<String, String>),
}

impl Target {
    /// The replacement for one matched source span.
    pub fn replacement<'a>(&'a self, matched: &'a str) -> &'a str {
        match self {
            Self::Literal(to) => to,
            Self::Mapped(map) => map.get(matched).map_or(matched, String::as_str),
        }
    }
}

/// A compiled rule: the parsed form, the resolved target and the runtime
/// matcher.
#[derive(Debug, Clone)]
pub struct Rule {
    parsed: ParsedRule,
    target: Target,
    matcher: Node,
}

impl Rule {
    /// Parse and compile one rule line.
    pub fn compile(line: &str, registry: &NamedClassRegistry) -> Result<Self, RuleError> {
        Self::from_parsed(ParsedRule::parse(line)?, registry)
    }

    /// Compile an already parsed rule.
    pub fn from_parsed(parsed: ParsedRule, registry: &NamedClassRegistry) -> Result<Self, RuleError> {
        let (target, matcher) = compiler::compile(&parsed, registry)?;
        Ok(Self {
            parsed,
            target,
            matcher,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_matcher(parsed: ParsedRule, target: Target, matcher: Node) -> Self {
        Self {
            parsed,
            target,
            matcher,
        }
    }

    /// The rule line as written.
    pub fn text(&self) -> &str {
        &self.parsed.text
    }

    pub fn parsed(&self) -> &ParsedRule {
        &self.parsed
    }

    pub fn condition(&self) -> &Condition {
        &self.parsed.condition
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn matcher(&self) -> &Node {
        &self.matcher
    }

    /// Apply this rule to `text`.
    pub fn apply(&self, text: &str) -> Result<String, SoundChangeError> {
        engine::apply_rule(self, text)
    }
}
