// Ordered sound-change sets
//
// A set is compiled once from rule lines and is immutable afterwards. Each
// rule's output feeds the next rule.

use serde::{Deserialize, Serialize};
use soundshift_combinator::WhitespaceConfig;

use crate::registry::NamedClassRegistry;
use crate::rule::Rule;
use crate::rule::grammar::RuleGrammar;
use crate::{RuleError, RuleFailure, SoundChangeError};

/// Options for compiling rule lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Report blank lines as [`RuleError::Empty`] failures. When `false`
    /// they are skipped silently.
    pub report_blank_lines: bool,
    /// What counts as optional whitespace between rule tokens.
    pub rule_whitespace: WhitespaceConfig,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            report_blank_lines: true,
            rule_whitespace: WhitespaceConfig::SINGLE_LINE,
        }
    }
}

/// The outcome of compiling rule lines: the rules that compiled, and the
/// lines that did not.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub set: SoundChangeSet,
    pub failures: Vec<RuleFailure>,
}

impl Compilation {
    /// The set, or every failure as [`SoundChangeError::Compile`].
    pub fn into_result(self) -> Result<SoundChangeSet, SoundChangeError> {
        if self.failures.is_empty() {
            Ok(self.set)
        } else {
            Err(SoundChangeError::Compile(self.failures))
        }
    }
}

/// Ordered compiled rules sharing one registry.
#[derive(Debug, Clone, Default)]
pub struct SoundChangeSet {
    rules: Vec<Rule>,
    registry: NamedClassRegistry,
}

impl SoundChangeSet {
    /// Compile rule lines with default options.
    pub fn compile<I, S>(lines: I, registry: &NamedClassRegistry) -> Compilation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile_with(lines, registry, &CompileOptions::default())
    }

    /// Compile rule text, one rule per line.
    pub fn compile_text(text: &str, registry: &NamedClassRegistry) -> Compilation {
        Self::compile(text.lines(), registry)
    }

    /// Compile rule lines. Lines that fail to parse or compile are logged,
    /// reported in [`Compilation::failures`] and skipped.
    pub fn compile_with<I, S>(
        lines: I,
        registry: &NamedClassRegistry,
        options: &CompileOptions,
    ) -> Compilation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let grammar = RuleGrammar::new(options.rule_whitespace);
        let mut rules = Vec::new();
        let mut failures = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_number = index + 1;
            let compiled = grammar
                .parse(line)
                .and_then(|parsed| Rule::from_parsed(parsed, registry));
            match compiled {
                Ok(rule) => {
                    tracing::debug!(line_number, rule = rule.text(), "compiled rule");
                    rules.push(rule);
                }
                Err(RuleError::Empty) if !options.report_blank_lines => {}
                Err(error) => {
                    tracing::warn!(line_number, rule = line, %error, "skipping rule");
                    failures.push(RuleFailure {
                        line_number,
                        rule: line.to_string(),
                        error,
                    });
                }
            }
        }
        Compilation {
            set: Self {
                rules,
                registry: registry.clone(),
            },
            failures,
        }
    }

    /// Apply every rule in order. Returns the original text followed by the
    /// text after each rule.
    pub fn apply(&self, text: &str) -> Result<Vec<String>, SoundChangeError> {
        let mut history = Vec::with_capacity(self.rules.len() + 1);
        history.push(text.to_string());
        for rule in &self.rules {
            let previous = history.last().map_or(text, String::as_str);
            let next = rule.apply(previous)?;
            history.push(next);
        }
        Ok(history)
    }

    /// Apply every rule in order and return only the final text.
    pub fn apply_final(&self, text: &str) -> Result<String, SoundChangeError> {
        let mut current = text.to_string();
        for rule in &self.rules {
            current = rule.apply(&current)?;
        }
        Ok(current)
    }

    /// The rule lines, in order.
    pub fn rule_texts(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::text).collect()
    }

    /// Newline-joined rule lines; compiles back to an equivalent set.
    pub fn to_text(&self) -> String {
        self.rule_texts().join("\n")
    }

    /// Rules of `self` followed by rules of `other`.
    ///
    /// Each rule keeps the matcher it was compiled with. Registries are
    /// united; on a name defined differently in both, `self` wins.
    pub fn merge(&self, other: &SoundChangeSet) -> SoundChangeSet {
        let mut registry = self.registry.clone();
        registry.union_first_wins(&other.registry);
        let rules = self.rules.iter().chain(&other.rules).cloned().collect();
        SoundChangeSet { rules, registry }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn registry(&self) -> &NamedClassRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
