// Rule compiler
//
// Turns a parsed rule into one runtime matcher. The matcher always consumes
// the whole text; the spans the rule rewrites are exactly the snapshots named
// `FROM`.
//
//   Letter   := one letter grapheme
//   Boundary := Many(non-letter grapheme)
//
//   unconditional  Many(Choice[from, Letter, Boundary])
//   start of word  Seq[Optional(Boundary), Optional(Many(Choice[
//                      Seq[from, Optional(Many(Letter)), Choice[End, Boundary]],
//                      Seq[Many(Letter), Optional(Boundary)]]))]
//   end of word    as start of word, with the first alternative
//                      ManyEndingWith(Letter, Seq[from, Choice[End, Boundary]])
//   named context  Many(Choice[Seq[class?, from, class?], Letter, Boundary])

use hashbrown::HashMap;
use soundshift_combinator::Node;
use soundshift_core::grapheme;

use crate::RuleError;
use crate::registry::NamedClassRegistry;
use crate::rule::{Condition, ParsedRule, RuleSource, RuleTarget, Target};

/// Capture name of the rewritten spans in a compiled matcher.
pub const FROM: &str = "from";

/// Resolve the rule's classes and build its target and matcher.
pub fn compile(
    parsed: &ParsedRule,
    registry: &NamedClassRegistry,
) -> Result<(Target, Node), RuleError> {
    let patterns = source_patterns(&parsed.source, registry)?;
    let target = compile_target(&parsed.target, &patterns, registry)?;
    let from = from_node(&patterns)?;
    let matcher = match &parsed.condition {
        Condition::Unconditional => unconditional(from),
        Condition::StartOfWord => start_of_word(from),
        Condition::EndOfWord => end_of_word(from),
        Condition::AfterNamed(a) => named_context(Some(class(registry, a)?), from, None),
        Condition::BeforeNamed(b) => named_context(None, from, Some(class(registry, b)?)),
        Condition::BetweenNamed(a, b) => {
            named_context(Some(class(registry, a)?), from, Some(class(registry, b)?))
        }
    };
    tracing::trace!(rule = %parsed.text, matcher = %matcher, "compiled matcher");
    Ok((target, matcher))
}

fn lookup<'r>(registry: &'r NamedClassRegistry, name: &str) -> Result<&'r [String], RuleError> {
    registry
        .get(name)
        .ok_or_else(|| RuleError::UnresolvedNamedClass {
            name: name.to_string(),
        })
}

/// Grapheme-set node over a registry class.
fn class(registry: &NamedClassRegistry, name: &str) -> Result<Node, RuleError> {
    Ok(Node::graphemes(lookup(registry, name)?)?)
}

/// Source patterns in priority order.
fn source_patterns(
    source: &RuleSource,
    registry: &NamedClassRegistry,
) -> Result<Vec<String>, RuleError> {
    match source {
        RuleSource::Patterns(patterns) => Ok(patterns.clone()),
        RuleSource::Class(name) => Ok(lookup(registry, name)?.to_vec()),
    }
}

fn compile_target(
    target: &RuleTarget,
    patterns: &[String],
    registry: &NamedClassRegistry,
) -> Result<Target, RuleError> {
    match target {
        RuleTarget::Literal(to) => Ok(Target::Literal(to.clone())),
        RuleTarget::Class(name) => {
            let members = lookup(registry, name)?;
            let mismatch = || RuleError::ClassMappingMismatch {
                class: name.clone(),
                from_count: patterns.len(),
                to_count: members.len(),
            };
            if patterns.len() != members.len() {
                return Err(mismatch());
            }
            let mut map = HashMap::with_capacity(patterns.len());
            for (from, to) in patterns.iter().zip(members) {
                if grapheme::count(from)? != 1 {
                    return Err(mismatch());
                }
                map.insert(from.clone(), to.clone());
            }
            Ok(Target::Mapped(map))
        }
    }
}

/// The tagged source node. Single-grapheme patterns share one set; longer
/// patterns become literal sequences tried in order.
fn from_node(patterns: &[String]) -> Result<Node, RuleError> {
    let mut split = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        split.push(grapheme::split(pattern)?);
    }
    if split.iter().all(|graphemes| graphemes.len() == 1) {
        return Ok(Node::graphemes(patterns)?.named(FROM));
    }
    let mut alternatives = Vec::with_capacity(split.len());
    for graphemes in split {
        let mut literals = graphemes
            .into_iter()
            .map(|g| Node::graphemes([g]))
            .collect::<Result<Vec<_>, _>>()?;
        alternatives.push(match literals.len() {
            1 => literals.remove(0),
            _ => Node::sequence(literals),
        });
    }
    let node = match alternatives.len() {
        1 => alternatives.remove(0),
        _ => Node::choice(alternatives),
    };
    Ok(node.named(FROM))
}

fn boundary() -> Node {
    Node::many(Node::non_letter())
}

fn word_edge() -> Node {
    Node::choice([Node::end(), boundary()])
}

/// Letters, then optional boundary: a word the rule does not touch.
fn other_word() -> Node {
    Node::sequence([Node::many(Node::letter()), Node::optional(boundary())])
}

fn unconditional(from: Node) -> Node {
    Node::many(Node::choice([from, Node::letter(), boundary()]))
}

/// Leading boundary, then words. Text without letters is all boundary, so
/// the words are optional.
fn words(tagged: Node) -> Node {
    Node::sequence([
        Node::optional(boundary()),
        Node::optional(Node::many(Node::choice([tagged, other_word()]))),
    ])
}

fn start_of_word(from: Node) -> Node {
    words(Node::sequence([
        from,
        Node::optional(Node::many(Node::letter())),
        word_edge(),
    ]))
}

fn end_of_word(from: Node) -> Node {
    words(Node::many_ending_with(
        Node::letter(),
        Node::sequence([from, word_edge()]),
    ))
}

fn named_context(before: Option<Node>, from: Node, after: Option<Node>) -> Node {
    let context = Node::sequence(before.into_iter().chain([from]).chain(after));
    Node::many(Node::choice([context, Node::letter(), boundary()]))
}
