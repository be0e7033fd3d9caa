// Rule grammar
//
//   FROM > TO? (/ CONDITION?)?
//
//   FROM      := letters | '[' letters ']' | '{' class name '}'
//   TO        := letters | '{' class name '}'
//   CONDITION := {a}_{b} | {a}_ | _{a} | _# | #_
//
// Optional whitespace is allowed around every token. The grammar is itself a
// combinator template; captures are lifted into a `ParsedRule` right after
// the parse.

use soundshift_combinator::{Node, SeparatedConfig, Snapshot, WhitespaceConfig};
use soundshift_core::grapheme;

use crate::RuleError;
use crate::registry::normalize_name;
use crate::rule::{Condition, ParsedRule, RuleSource, RuleTarget};

// Capture names.
pub const FROM: &str = "from";
pub const FROM_CLASS: &str = "from_class";
pub const TO: &str = "to";
pub const TO_CLASS: &str = "to_class";
pub const CONDITION: &str = "condition";
pub const CLASS_NAME: &str = "class_name";

// Condition alternatives, in priority order.
pub const BETWEEN_NAMED: &str = "between_named";
pub const AFTER_NAMED: &str = "after_named";
pub const BEFORE_NAMED: &str = "before_named";
pub const END_OF_WORD: &str = "end_of_word";
pub const START_OF_WORD: &str = "start_of_word";

/// The rule DSL as a reusable template.
#[derive(Debug, Clone)]
pub struct RuleGrammar {
    template: Node,
}

impl Default for RuleGrammar {
    fn default() -> Self {
        Self::new(WhitespaceConfig::SINGLE_LINE)
    }
}

impl RuleGrammar {
    /// Build the grammar; `whitespace` decides what counts as optional
    /// whitespace between tokens.
    pub fn new(whitespace: WhitespaceConfig) -> Self {
        let ws = whitespace;
        let from = Node::choice([
            Node::many(Node::letter()).named(FROM),
            tokens(
                ws,
                [
                    Node::literal('['),
                    Node::many(Node::letter().named(FROM)),
                    Node::literal(']'),
                ],
            ),
            braced(ws, FROM_CLASS),
        ]);
        let to = Node::choice([Node::many(Node::letter()).named(TO), braced(ws, TO_CLASS)]);
        let condition = Node::choice([
            tokens(
                ws,
                [braced(ws, CLASS_NAME), Node::literal('_'), braced(ws, CLASS_NAME)],
            )
            .named(BETWEEN_NAMED),
            tokens(ws, [braced(ws, CLASS_NAME), Node::literal('_')]).named(AFTER_NAMED),
            tokens(ws, [Node::literal('_'), braced(ws, CLASS_NAME)]).named(BEFORE_NAMED),
            tokens(ws, [Node::literal('_'), Node::literal('#')]).named(END_OF_WORD),
            tokens(ws, [Node::literal('#'), Node::literal('_')]).named(START_OF_WORD),
        ])
        .named(CONDITION);
        let slash = Node::optional(tokens(ws, [Node::literal('/'), Node::optional(condition)]));
        let template = Node::separated(
            Node::optional_whitespace(ws),
            [from, Node::literal('>'), Node::optional(to), slash, Node::end()],
            SeparatedConfig {
                initial: true,
                trailing: true,
                keep_separators: false,
            },
        );
        Self { template }
    }

    pub fn template(&self) -> &Node {
        &self.template
    }

    /// Parse one rule line.
    pub fn parse(&self, line: &str) -> Result<ParsedRule, RuleError> {
        let text = line.trim();
        if text.is_empty() {
            return Err(RuleError::Empty);
        }
        grapheme::split(text)?;
        match self.template.parse(text) {
            ("", Some(snapshot)) => lift(text, &snapshot),
            _ => Err(parse_error(text)),
        }
    }
}

/// Tokens separated by optional whitespace.
fn tokens<const N: usize>(ws: WhitespaceConfig, parts: [Node; N]) -> Node {
    Node::separated(
        Node::optional_whitespace(ws),
        parts,
        SeparatedConfig {
            keep_separators: false,
            ..SeparatedConfig::default()
        },
    )
}

/// `{ class name }`, the name captured as `capture`.
fn braced(ws: WhitespaceConfig, capture: &str) -> Node {
    let words = Node::sequence([
        Node::many(Node::letter()),
        Node::optional(Node::many(Node::sequence([
            Node::whitespace(ws),
            Node::many(Node::letter()),
        ]))),
    ]);
    tokens(
        ws,
        [Node::literal('{'), words.named(capture), Node::literal('}')],
    )
}

fn parse_error(text: &str) -> RuleError {
    RuleError::Parse {
        line: text.to_string(),
    }
}

fn lift(text: &str, snapshot: &Snapshot<'_>) -> Result<ParsedRule, RuleError> {
    let source = match snapshot.find_first(FROM_CLASS) {
        Some(class) => RuleSource::Class(normalize_name(class.text())),
        None => {
            let mut patterns: Vec<String> = Vec::new();
            for capture in snapshot.find_all(FROM) {
                if !patterns.iter().any(|p| p == capture.text()) {
                    patterns.push(capture.text().to_string());
                }
            }
            if patterns.is_empty() {
                return Err(parse_error(text));
            }
            RuleSource::Patterns(patterns)
        }
    };
    let target = match snapshot.find_first(TO_CLASS) {
        Some(class) => RuleTarget::Class(normalize_name(class.text())),
        None => RuleTarget::Literal(
            snapshot
                .find_first(TO)
                .map_or("", |to| to.text())
                .to_string(),
        ),
    };
    let condition = match snapshot.find_first(CONDITION) {
        Some(condition) => lift_condition(text, condition)?,
        None => Condition::Unconditional,
    };
    Ok(ParsedRule {
        text: text.to_string(),
        source,
        target,
        condition,
    })
}

fn lift_condition(text: &str, condition: &Snapshot<'_>) -> Result<Condition, RuleError> {
    let names: Vec<String> = condition
        .find_all(CLASS_NAME)
        .iter()
        .map(|name| normalize_name(name.text()))
        .collect();
    let kind = condition.selected().and_then(Snapshot::name);
    match (kind, names.as_slice()) {
        (Some(BETWEEN_NAMED), [a, b]) => Ok(Condition::BetweenNamed(a.clone(), b.clone())),
        (Some(AFTER_NAMED), [a]) => Ok(Condition::AfterNamed(a.clone())),
        (Some(BEFORE_NAMED), [a]) => Ok(Condition::BeforeNamed(a.clone())),
        (Some(END_OF_WORD), []) => Ok(Condition::EndOfWord),
        (Some(START_OF_WORD), []) => Ok(Condition::StartOfWord),
        _ => Err(parse_error(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ParsedRule {
        ParsedRule::parse(line).unwrap()
    }

    fn patterns(items: &[&str]) -> RuleSource {
        RuleSource::Patterns(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn simple_substitution() {
        let rule = parse("b > p /");
        assert_eq!(rule.text, "b > p /");
        assert_eq!(rule.source, patterns(&["b"]));
        assert_eq!(rule.target, RuleTarget::Literal("p".into()));
        assert_eq!(rule.condition, Condition::Unconditional);
    }

    #[test]
    fn multi_grapheme_source_is_one_pattern() {
        let rule = parse("se > e /");
        assert_eq!(rule.source, patterns(&["se"]));
        assert_eq!(rule.target, RuleTarget::Literal("e".into()));
    }

    #[test]
    fn bracket_set_is_one_pattern_per_member() {
        let rule = parse("[sz] > t /");
        assert_eq!(rule.source, patterns(&["s", "z"]));
        let rule = parse("[ssz]>t/");
        assert_eq!(rule.source, patterns(&["s", "z"]));
    }

    #[test]
    fn deletion_and_missing_slash() {
        assert_eq!(parse("s > /_#").target, RuleTarget::Literal(String::new()));
        let rule = parse("b > p");
        assert_eq!(rule.condition, Condition::Unconditional);
        assert_eq!(parse("s >").target, RuleTarget::Literal(String::new()));
    }

    #[test]
    fn conditions() {
        assert_eq!(parse("s > /_#").condition, Condition::EndOfWord);
        assert_eq!(parse("s > /#_").condition, Condition::StartOfWord);
        assert_eq!(
            parse("s > /{vowel}_").condition,
            Condition::AfterNamed("vowel".into())
        );
        assert_eq!(
            parse("s > /_{vowel}").condition,
            Condition::BeforeNamed("vowel".into())
        );
        assert_eq!(
            parse("s > /{vowel}_{palatal nasal}").condition,
            Condition::BetweenNamed("vowel".into(), "palatal nasal".into())
        );
    }

    #[test]
    fn whitespace_is_optional_everywhere() {
        let compact = parse("s>/{vowel}_{vowel}");
        let spaced = parse("  s  >  /  {  vowel  }  _  { vowel }  ");
        assert_eq!(compact.source, spaced.source);
        assert_eq!(compact.condition, spaced.condition);
        assert_eq!(spaced.text, "s  >  /  {  vowel  }  _  { vowel }");
    }

    #[test]
    fn class_names_are_normalized() {
        let rule = parse("{palatal   plosive} > {palatal nasal} /");
        assert_eq!(rule.source, RuleSource::Class("palatal plosive".into()));
        assert_eq!(rule.target, RuleTarget::Class("palatal nasal".into()));
        assert_eq!(rule.condition, Condition::Unconditional);
    }

    #[test]
    fn diacritics_in_patterns() {
        let rule = parse("n\u{032A} > \u{0272}\u{0325} /");
        assert_eq!(rule.source, patterns(&["n\u{032A}"]));
        assert_eq!(rule.target, RuleTarget::Literal("\u{0272}\u{0325}".into()));
    }

    #[test]
    fn empty_line() {
        assert_eq!(ParsedRule::parse(""), Err(RuleError::Empty));
        assert_eq!(ParsedRule::parse("  \t "), Err(RuleError::Empty));
    }

    #[test]
    fn malformed_line() {
        let err = ParsedRule::parse("\u{0325}a > b /").unwrap_err();
        assert!(matches!(err, RuleError::Malformed(_)));
    }

    #[test]
    fn unparseable_lines() {
        for line in [
            "b p",
            "> p /",
            "b > p q /",
            "b > p / x",
            "b > p / _",
            "{vowel > a /",
            "[] > a /",
            "b > p /_# extra",
            "b\n> p /",
        ] {
            assert_eq!(
                ParsedRule::parse(line),
                Err(RuleError::Parse {
                    line: line.trim().to_string()
                }),
                "{line:?}"
            );
        }
    }

    #[test]
    fn multiline_whitespace_option() {
        let grammar = RuleGrammar::new(WhitespaceConfig::MULTILINE);
        let rule = grammar.parse("b\n>\np /").unwrap();
        assert_eq!(rule.target, RuleTarget::Literal("p".into()));
    }

    #[test]
    fn canonical_form_parses_back() {
        for line in [
            "b>p",
            "[sz]>t/",
            "s > /_#",
            "s>/#_",
            "{ palatal plosive }>{palatal  nasal}/",
            "s > /{vowel}_{vowel}",
            "s > /_{vowel}",
        ] {
            let rule = parse(line);
            let again = parse(&rule.to_string());
            assert_eq!(rule.source, again.source, "{line:?}");
            assert_eq!(rule.target, again.target, "{line:?}");
            assert_eq!(rule.condition, again.condition, "{line:?}");
        }
    }

    #[test]
    fn grammar_captures_are_named() {
        let grammar = RuleGrammar::default();
        let (rest, snapshot) = grammar.template().parse("s > t /_{vowel}");
        assert_eq!(rest, "");
        let snapshot = snapshot.unwrap();
        let condition = snapshot.find_first(CONDITION).unwrap();
        assert_eq!(condition.selected().and_then(Snapshot::name), Some(BEFORE_NAMED));
        assert_eq!(condition.text(), "_{vowel}");
        assert_eq!(snapshot.find_first(CLASS_NAME).map(|s| s.text()), Some("vowel"));
    }
}
