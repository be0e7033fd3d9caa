// Grammar node templates and the backtracking parse driver
//
// A `Node` is an immutable description of what to match. Parsing borrows the
// template and the input and returns a fresh `Snapshot` tree; the template is
// never written to, so one template may be parsed any number of times from any
// number of threads.

use std::fmt;

use soundshift_core::SegmentError;
use soundshift_core::character::{is_line_ending, is_whitespace};
use soundshift_core::grapheme::pop_grapheme;

use crate::config::{SeparatedConfig, WhitespaceConfig};
use crate::set::GraphemeSet;
use crate::snapshot::{Detail, Snapshot};

/// The kind of a grammar node and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// One grapheme from the set.
    Graphemes(GraphemeSet),
    /// All children in order.
    Sequence(Vec<Node>),
    /// The first child that matches, in listed order.
    Choice(Vec<Node>),
    /// The inner node, or nothing.
    Optional(Box<Node>),
    /// One or more repetitions of the inner node.
    Many(Box<Node>),
    /// A maximal, non-empty run of whitespace.
    Whitespace(WhitespaceConfig),
    /// Elements interleaved with a separator.
    Separated {
        separator: Box<Node>,
        elements: Vec<Node>,
        config: SeparatedConfig,
    },
    /// Trailing whitespace and line endings, then the end of input.
    End,
    /// Zero or more repetitions of `body` followed by `tail`, preferring the
    /// longest run of `body` after which `tail` still matches.
    ManyEndingWith { body: Box<Node>, tail: Box<Node> },
}

/// A grammar node template, optionally carrying a capture name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: Option<String>,
    kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { name: None, kind }
    }

    /// Grapheme-set node over explicit members. See [`GraphemeSet::from_strs`].
    pub fn graphemes<I, S>(items: I) -> Result<Self, SegmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::set(GraphemeSet::from_strs(items)?))
    }

    /// Grapheme-set node matching exactly one single-scalar grapheme.
    pub fn literal(c: char) -> Self {
        Self::set(GraphemeSet::single(c))
    }

    pub fn set(set: GraphemeSet) -> Self {
        Self::new(NodeKind::Graphemes(set))
    }

    /// Any letter grapheme.
    pub fn letter() -> Self {
        Self::set(GraphemeSet::Letter)
    }

    /// Any grapheme that is not a letter.
    pub fn non_letter() -> Self {
        Self::set(GraphemeSet::NonLetter)
    }

    pub fn any() -> Self {
        Self::set(GraphemeSet::Any)
    }

    pub fn sequence(children: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Sequence(children.into_iter().collect()))
    }

    pub fn choice(alternatives: impl IntoIterator<Item = Node>) -> Self {
        Self::new(NodeKind::Choice(alternatives.into_iter().collect()))
    }

    pub fn optional(inner: Node) -> Self {
        Self::new(NodeKind::Optional(Box::new(inner)))
    }

    pub fn many(inner: Node) -> Self {
        Self::new(NodeKind::Many(Box::new(inner)))
    }

    pub fn whitespace(config: WhitespaceConfig) -> Self {
        Self::new(NodeKind::Whitespace(config))
    }

    /// `Optional(Whitespace(config))`.
    pub fn optional_whitespace(config: WhitespaceConfig) -> Self {
        Self::optional(Self::whitespace(config))
    }

    pub fn separated(
        separator: Node,
        elements: impl IntoIterator<Item = Node>,
        config: SeparatedConfig,
    ) -> Self {
        Self::new(NodeKind::Separated {
            separator: Box::new(separator),
            elements: elements.into_iter().collect(),
            config,
        })
    }

    pub fn end() -> Self {
        Self::new(NodeKind::End)
    }

    pub fn many_ending_with(body: Node, tail: Node) -> Self {
        Self::new(NodeKind::ManyEndingWith {
            body: Box::new(body),
            tail: Box::new(tail),
        })
    }

    /// Attach a capture name, replacing any previous one.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Match this template against the start of `input`.
    ///
    /// Returns the unconsumed remainder and the snapshot. On failure the
    /// snapshot is `None` and the remainder is `input` itself.
    pub fn parse<'a>(&'a self, input: &'a str) -> (&'a str, Option<Snapshot<'a>>) {
        match self.parse_prefix(input) {
            Some((rest, snapshot)) => (rest, Some(snapshot)),
            None => (input, None),
        }
    }

    /// Like [`parse`](Self::parse), without building a value for the caller.
    pub fn recognize<'a>(&'a self, input: &'a str) -> (&'a str, bool) {
        let (rest, snapshot) = self.parse(input);
        (rest, snapshot.is_some())
    }

    fn parse_prefix<'a>(&'a self, input: &'a str) -> Option<(&'a str, Snapshot<'a>)> {
        let (rest, detail) = match &self.kind {
            NodeKind::Graphemes(set) => {
                // A leading combining scalar is simply not a member.
                let (g, rest) = pop_grapheme(input).ok().flatten()?;
                if !set.contains(g) {
                    return None;
                }
                (rest, Detail::Leaf)
            }
            NodeKind::Sequence(children) => {
                let mut rest = input;
                let mut parsed = Vec::with_capacity(children.len());
                for child in children {
                    let (next, snapshot) = child.parse_prefix(rest)?;
                    parsed.push(snapshot);
                    rest = next;
                }
                (rest, Detail::Children(parsed))
            }
            NodeKind::Choice(alternatives) => alternatives
                .iter()
                .enumerate()
                .find_map(|(index, alt)| {
                    alt.parse_prefix(input).map(|(rest, chosen)| {
                        (
                            rest,
                            Detail::Choice {
                                index,
                                chosen: Box::new(chosen),
                            },
                        )
                    })
                })?,
            NodeKind::Optional(inner) => match inner.parse_prefix(input) {
                Some((rest, chosen)) => (rest, Detail::Optional(Some(Box::new(chosen)))),
                None => (input, Detail::Optional(None)),
            },
            NodeKind::Many(inner) => {
                let (rest, items) = parse_many(inner, input);
                if items.is_empty() {
                    return None;
                }
                (rest, Detail::Children(items))
            }
            NodeKind::Whitespace(config) => {
                let rest = skip_whitespace(input, config.include_line_endings);
                if rest.len() == input.len() {
                    return None;
                }
                (rest, Detail::Leaf)
            }
            NodeKind::Separated {
                separator,
                elements,
                config,
            } => {
                let mut rest = input;
                let mut parsed = Vec::with_capacity(elements.len());
                let mut separators = Vec::with_capacity(elements.len() + 1);
                if config.initial {
                    let (next, sep) = separator.parse_prefix(rest)?;
                    separators.push(sep);
                    rest = next;
                }
                for (i, element) in elements.iter().enumerate() {
                    let (next, snapshot) = element.parse_prefix(rest)?;
                    parsed.push(snapshot);
                    rest = next;
                    if i + 1 < elements.len() || config.trailing {
                        let (next, sep) = separator.parse_prefix(rest)?;
                        separators.push(sep);
                        rest = next;
                    }
                }
                (
                    rest,
                    Detail::Separated {
                        elements: parsed,
                        separators,
                        leading: config.initial,
                    },
                )
            }
            NodeKind::End => {
                let rest = skip_whitespace(input, true);
                if !rest.is_empty() {
                    return None;
                }
                (rest, Detail::Leaf)
            }
            NodeKind::ManyEndingWith { body, tail } => {
                let mut bodies = Vec::new();
                let mut positions = vec![input];
                let mut cursor = input;
                while let Some((next, snapshot)) = body.parse_prefix(cursor) {
                    if next.len() == cursor.len() {
                        break;
                    }
                    bodies.push(snapshot);
                    positions.push(next);
                    cursor = next;
                }
                let (count, rest, tail) = positions
                    .iter()
                    .enumerate()
                    .rev()
                    .find_map(|(count, &at)| {
                        tail.parse_prefix(at).map(|(rest, tail)| (count, rest, tail))
                    })?;
                bodies.truncate(count);
                bodies.push(tail);
                (rest, Detail::Children(bodies))
            }
        };
        let text = &input[..input.len() - rest.len()];
        Some((rest, Snapshot::new(self, text, detail)))
    }
}

/// Repetition loop: stop when `inner` fails, when the input runs out, or when
/// an iteration consumes nothing and a match is already recorded. Empty input
/// gets exactly one attempt.
fn parse_many<'a>(inner: &'a Node, input: &'a str) -> (&'a str, Vec<Snapshot<'a>>) {
    let mut rest = input;
    let mut items = Vec::new();
    while let Some((next, snapshot)) = inner.parse_prefix(rest) {
        let stalled = next.len() == rest.len();
        if stalled && !items.is_empty() {
            break;
        }
        items.push(snapshot);
        rest = next;
        if stalled || rest.is_empty() {
            break;
        }
    }
    (rest, items)
}

/// Skip whole graphemes whose base scalar is whitespace.
fn skip_whitespace(input: &str, include_line_endings: bool) -> &str {
    let mut rest = input;
    while let Ok(Some((g, next))) = pop_grapheme(rest) {
        let accepted = g
            .chars()
            .next()
            .is_some_and(|c| is_whitespace(c) && (include_line_endings || !is_line_ending(c)));
        if !accepted {
            break;
        }
        rest = next;
    }
    rest
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}=")?;
        }
        match &self.kind {
            NodeKind::Graphemes(set) => write!(f, "Graphemes({set})"),
            NodeKind::Sequence(children) => {
                f.write_str("Sequence(")?;
                write_list(f, children)?;
                f.write_str(")")
            }
            NodeKind::Choice(alternatives) => {
                f.write_str("Choice(")?;
                write_list(f, alternatives)?;
                f.write_str(")")
            }
            NodeKind::Optional(inner) => write!(f, "Optional({inner})"),
            NodeKind::Many(inner) => write!(f, "Many({inner})"),
            NodeKind::Whitespace(config) if config.include_line_endings => {
                f.write_str("Whitespace(multiline)")
            }
            NodeKind::Whitespace(_) => f.write_str("Whitespace"),
            NodeKind::Separated {
                separator,
                elements,
                config,
            } => {
                write!(f, "Separated({separator}, ")?;
                write_list(f, elements)?;
                if config.initial {
                    f.write_str(", initial")?;
                }
                if config.trailing {
                    f.write_str(", trailing")?;
                }
                if !config.keep_separators {
                    f.write_str(", drop separators")?;
                }
                f.write_str(")")
            }
            NodeKind::End => f.write_str("End"),
            NodeKind::ManyEndingWith { body, tail } => {
                write!(f, "ManyEndingWith({body}, {tail})")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    f.write_str("[")?;
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{node}")?;
    }
    f.write_str("]")
}
