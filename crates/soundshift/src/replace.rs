// Replacement: rebuild text from a completed match, rewriting every span the
// compiled matcher tagged `FROM`.

use soundshift_combinator::Snapshot;

use crate::compiler::FROM;
use crate::rule::Target;

/// Rewrite the text matched by `snapshot`.
pub fn replace(snapshot: &Snapshot<'_>, target: &Target) -> String {
    let mut out = String::with_capacity(snapshot.text().len());
    write_replaced(snapshot, target, &mut out);
    out
}

fn write_replaced(snapshot: &Snapshot<'_>, target: &Target, out: &mut String) {
    if snapshot.name() == Some(FROM) {
        out.push_str(target.replacement(snapshot.text()));
        return;
    }
    let parts = snapshot.parts();
    if parts.is_empty() {
        out.push_str(snapshot.text());
    } else {
        for part in parts {
            write_replaced(part, target, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundshift_combinator::Node;

    #[test]
    fn rewrites_tagged_spans_only() {
        let matcher = Node::many(Node::choice([
            Node::graphemes(["s"]).unwrap().named(FROM),
            Node::any(),
        ]));
        let snapshot = matcher.parse("asas").1.unwrap();
        assert_eq!(replace(&snapshot, &Target::Literal("t".into())), "atat");
        assert_eq!(replace(&snapshot, &Target::Literal(String::new())), "aa");
    }

    #[test]
    fn untagged_text_is_reproduced() {
        let matcher = Node::sequence([
            Node::optional(Node::literal('x')),
            Node::many(Node::letter()),
            Node::end(),
        ]);
        let snapshot = matcher.parse("abc \n").1.unwrap();
        assert_eq!(replace(&snapshot, &Target::Literal("t".into())), "abc \n");
    }
}
