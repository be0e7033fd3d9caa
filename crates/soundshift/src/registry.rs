// Named class registry
//
// Maps a class name ("vowel", "palatal plosive") to an ordered list of
// graphemes. The registry is supplied by the caller; the engine only reads
// it. Member order is significant for class-to-class targets.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use soundshift_core::grapheme;

use crate::RuleError;

/// Normalize a class name: trim, and collapse inner whitespace runs to one
/// space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Class members as written in a registry file: one string holding every
/// member (`"aeiou"`) or a list of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMembers {
    Joined(String),
    List(Vec<String>),
}

/// Name -> ordered graphemes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, RawMembers>",
    into = "HashMap<String, Vec<String>>"
)]
pub struct NamedClassRegistry {
    classes: HashMap<String, Vec<String>>,
}

impl NamedClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a class.
    ///
    /// Members are segmented into graphemes, so `["aeiou"]` and
    /// `["a", "e", "i", "o", "u"]` define the same class. Repeated graphemes
    /// keep their first position. Returns the previous definition.
    pub fn insert<I, S>(&mut self, name: &str, members: I) -> Result<Option<Vec<String>>, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graphemes: Vec<String> = Vec::new();
        for member in members {
            for g in grapheme::graphemes(member.as_ref()) {
                let g = g?;
                if !graphemes.iter().any(|existing| existing == g) {
                    graphemes.push(g.to_string());
                }
            }
        }
        Ok(self.classes.insert(normalize_name(name), graphemes))
    }

    /// Look up a class; the name is normalized first.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.classes.get(&normalize_name(name)).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(&normalize_name(name))
    }

    /// Class names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Add every class of `other` not already defined here. Returns the
    /// names defined differently in both, which keep this registry's
    /// definition.
    pub fn union_first_wins(&mut self, other: &NamedClassRegistry) -> Vec<String> {
        let mut collisions = Vec::new();
        for name in other.names() {
            let Some(members) = other.classes.get(name) else {
                continue;
            };
            match self.classes.get(name) {
                Some(existing) if existing == members => {}
                Some(_) => {
                    tracing::warn!(class = name, "class already defined, keeping first definition");
                    collisions.push(name.to_string());
                }
                None => {
                    self.classes.insert(name.to_string(), members.clone());
                }
            }
        }
        collisions
    }
}

impl TryFrom<HashMap<String, RawMembers>> for NamedClassRegistry {
    type Error = RuleError;

    fn try_from(raw: HashMap<String, RawMembers>) -> Result<Self, Self::Error> {
        let mut registry = Self::new();
        for (name, members) in raw {
            match members {
                RawMembers::Joined(joined) => registry.insert(&name, [joined])?,
                RawMembers::List(list) => registry.insert(&name, list)?,
            };
        }
        Ok(registry)
    }
}

impl From<NamedClassRegistry> for HashMap<String, Vec<String>> {
    fn from(registry: NamedClassRegistry) -> Self {
        registry.classes
    }
}
