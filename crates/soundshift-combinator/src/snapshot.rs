// Match results
//
// A snapshot records what one template matched: the consumed text and, for
// composite nodes, the child snapshots. Snapshots borrow the input and the
// template they were produced from and are otherwise independent.

use crate::node::{Node, NodeKind};

/// What a composite snapshot holds beyond its text.
#[derive(Debug, Clone)]
pub(crate) enum Detail<'a> {
    Leaf,
    /// Sequence, repetition and repetition-ending-with children.
    Children(Vec<Snapshot<'a>>),
    Choice {
        index: usize,
        chosen: Box<Snapshot<'a>>,
    },
    Optional(Option<Box<Snapshot<'a>>>),
    /// Separators are always recorded, whether or not the template keeps
    /// them in its value.
    Separated {
        elements: Vec<Snapshot<'a>>,
        separators: Vec<Snapshot<'a>>,
        leading: bool,
    },
}

/// The result of one successful template application.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    template: &'a Node,
    text: &'a str,
    detail: Detail<'a>,
}

/// Generic value projection of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    Nothing,
    Text(&'a str),
    List(Vec<Value<'a>>),
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(template: &'a Node, text: &'a str, detail: Detail<'a>) -> Self {
        Self {
            template,
            text,
            detail,
        }
    }

    /// The template this snapshot was produced from.
    pub fn template(&self) -> &'a Node {
        self.template
    }

    /// The template's capture name.
    pub fn name(&self) -> Option<&'a str> {
        self.template.name()
    }

    /// The exact consumed text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Whether this is an optional that matched nothing.
    pub fn is_nothing(&self) -> bool {
        matches!(self.detail, Detail::Optional(None))
    }

    /// The chosen child of a choice or optional.
    pub fn selected(&self) -> Option<&Snapshot<'a>> {
        match &self.detail {
            Detail::Choice { chosen, .. } => Some(chosen.as_ref()),
            Detail::Optional(chosen) => chosen.as_deref(),
            _ => None,
        }
    }

    /// Index of the alternative a choice took.
    pub fn chosen_index(&self) -> Option<usize> {
        match self.detail {
            Detail::Choice { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Every child snapshot in document order, separators included.
    ///
    /// The texts of the parts concatenate to [`text`](Self::text).
    pub fn parts(&self) -> Vec<&Snapshot<'a>> {
        match &self.detail {
            Detail::Leaf => Vec::new(),
            Detail::Children(children) => children.iter().collect(),
            Detail::Choice { chosen, .. } => vec![chosen.as_ref()],
            Detail::Optional(chosen) => chosen.as_deref().into_iter().collect(),
            Detail::Separated {
                elements,
                separators,
                leading,
            } => weave(elements, separators, *leading),
        }
    }

    /// Children visited by capture search and value projection: like
    /// [`parts`](Self::parts), minus separators the template drops.
    fn retained(&self) -> Vec<&Snapshot<'a>> {
        match (&self.detail, self.template.kind()) {
            (
                Detail::Separated { elements, .. },
                NodeKind::Separated { config, .. },
            ) if !config.keep_separators => elements.iter().collect(),
            _ => self.parts(),
        }
    }

    /// Every matched snapshot named `name`, depth-first in document order.
    /// Includes `self` when its name matches.
    pub fn find_all(&self, name: &str) -> Vec<&Snapshot<'a>> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    /// The first snapshot [`find_all`](Self::find_all) would return.
    pub fn find_first(&self, name: &str) -> Option<&Snapshot<'a>> {
        if self.name() == Some(name) && !self.is_nothing() {
            return Some(self);
        }
        self.retained()
            .into_iter()
            .find_map(|child| child.find_first(name))
    }

    fn collect_named<'s>(&'s self, name: &str, found: &mut Vec<&'s Snapshot<'a>>) {
        if self.name() == Some(name) && !self.is_nothing() {
            found.push(self);
        }
        for child in self.retained() {
            child.collect_named(name, found);
        }
    }

    /// Project into a generic value tree.
    pub fn value(&self) -> Value<'a> {
        match &self.detail {
            Detail::Leaf => Value::Text(self.text),
            Detail::Children(children) => {
                let values = children.iter().map(Snapshot::value);
                match self.template.kind() {
                    NodeKind::Sequence(_) => {
                        Value::List(values.filter(|v| *v != Value::Nothing).collect())
                    }
                    _ => Value::List(values.collect()),
                }
            }
            Detail::Choice { chosen, .. } => chosen.value(),
            Detail::Optional(chosen) => chosen.as_ref().map_or(Value::Nothing, |c| c.value()),
            Detail::Separated { .. } => Value::List(
                self.retained()
                    .into_iter()
                    .map(Snapshot::value)
                    .filter(|v| *v != Value::Nothing)
                    .collect(),
            ),
        }
    }
}

/// Interleave elements and separators in document order.
fn weave<'s, 'a>(
    elements: &'s [Snapshot<'a>],
    separators: &'s [Snapshot<'a>],
    leading: bool,
) -> Vec<&'s Snapshot<'a>> {
    let (mut first, mut second) = if leading {
        (separators.iter(), elements.iter())
    } else {
        (elements.iter(), separators.iter())
    };
    let mut out = Vec::with_capacity(elements.len() + separators.len());
    loop {
        match (first.next(), second.next()) {
            (None, None) => break,
            (a, b) => {
                out.extend(a);
                out.extend(b);
            }
        }
    }
    out
}
