// Grapheme sets: what a single grapheme-set node accepts.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use soundshift_core::SegmentError;
use soundshift_core::character::is_letter_grapheme;
use soundshift_core::grapheme;

/// The set of graphemes accepted by a grapheme-set node.
///
/// Either an explicit, finite member set or one of the open character
/// classes. Member sets are shared, so cloning a template that holds a large
/// class (every vowel of a registry, say) is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphemeSet {
    /// Exactly these graphemes.
    Members(Arc<HashSet<String>>),
    /// Any grapheme whose base scalar is alphabetic.
    Letter,
    /// Any grapheme whose base scalar is not alphabetic.
    NonLetter,
    /// Any grapheme at all.
    Any,
}

impl GraphemeSet {
    /// Build an explicit set from strings.
    ///
    /// Every string is segmented and each of its graphemes becomes a member,
    /// so `["aeiou"]` and `["a", "e", "i", "o", "u"]` describe the same set.
    pub fn from_strs<I, S>(items: I) -> Result<Self, SegmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = HashSet::new();
        for item in items {
            for g in grapheme::graphemes(item.as_ref()) {
                members.insert(g?.to_string());
            }
        }
        Ok(Self::Members(Arc::new(members)))
    }

    /// A set holding one single-scalar grapheme.
    pub fn single(c: char) -> Self {
        let mut members = HashSet::with_capacity(1);
        members.insert(c.to_string());
        Self::Members(Arc::new(members))
    }

    /// Check whether `g` (one whole grapheme) is a member.
    pub fn contains(&self, g: &str) -> bool {
        match self {
            Self::Members(members) => members.contains(g),
            Self::Letter => is_letter_grapheme(g),
            Self::NonLetter => !g.is_empty() && !is_letter_grapheme(g),
            Self::Any => !g.is_empty(),
        }
    }

    /// Number of members, or `None` for an open class.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Members(members) => Some(members.len()),
            _ => None,
        }
    }

    /// Whether this is an explicit set with no members.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Members in sorted order, or `None` for an open class.
    pub fn sorted_members(&self) -> Option<Vec<&str>> {
        match self {
            Self::Members(members) => {
                let mut v: Vec<&str> = members.iter().map(String::as_str).collect();
                v.sort_unstable();
                Some(v)
            }
            _ => None,
        }
    }
}

impl fmt::Display for GraphemeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Members(_) => {
                let members = self.sorted_members().unwrap_or_default();
                write!(f, "{members:?}")
            }
            Self::Letter => f.write_str("Letter"),
            Self::NonLetter => f.write_str("NonLetter"),
            Self::Any => f.write_str("Any"),
        }
    }
}
