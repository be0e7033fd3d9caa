// Applying one compiled rule to text.

use soundshift_core::grapheme;

use crate::SoundChangeError;
use crate::replace::replace;
use crate::rule::Rule;

/// Apply `rule` to `text`.
///
/// Empty and all-whitespace text becomes `""`. Any other text must be fully
/// consumed by the rule's matcher.
pub fn apply_rule(rule: &Rule, text: &str) -> Result<String, SoundChangeError> {
    grapheme::split(text)?;
    if text.chars().all(char::is_whitespace) {
        return Ok(String::new());
    }
    let snapshot = match rule.matcher().parse(text) {
        ("", Some(snapshot)) => snapshot,
        _ => {
            return Err(SoundChangeError::RuleMatchFailure {
                rule: rule.text().to_string(),
                input: text.to_string(),
            });
        }
    };
    let output = replace(&snapshot, rule.target());
    tracing::debug!(rule = rule.text(), "applied rule");
    tracing::trace!(input = text, output = %output, "rule output");
    Ok(output)
}
