//! End-to-end rule scenarios.

use rstest::{fixture, rstest};
use soundshift::{NamedClassRegistry, SoundChangeError, SoundChangeSet};

#[fixture]
fn registry() -> NamedClassRegistry {
    serde_json::from_str(
        r#"{
            "vowel": ["a", "e", "i", "o", "u"],
            "palatal plosive": ["c", "ɟ"],
            "palatal nasal": ["ɲ̥", "ɲ"],
            "alveolar fricative": "sz"
        }"#,
    )
    .unwrap()
}

fn apply_one(registry: &NamedClassRegistry, rule: &str, text: &str) -> String {
    let set = SoundChangeSet::compile([rule], registry).into_result().unwrap();
    let history = set.apply(text).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], text);
    history[1].clone()
}

#[rstest]
#[case::substitution("b > p /", "a b c d", "a p c d")]
#[case::lengthening("b > pp /", "a b c d", "a pp c d")]
#[case::cluster("se > e /", "abse abs see seas", "abe abs ee eas")]
#[case::word_final("s > /_#", "abse abs see seas", "abse ab see sea")]
#[case::word_initial("s > /#_", "abse abs see seas", "abse abs ee eas")]
#[case::after_vowel("s > /{vowel}_", "abse as see sase", "abse a see sae")]
#[case::before_vowel("s > /_{vowel}", "abse as see sase", "abe as ee ae")]
#[case::between_vowels("s > /{vowel}_{vowel}", "abse as see sase", "abse as see sae")]
#[case::bracket_set("[sz] > t /", "abse abze", "abte abte")]
#[case::class_source("{alveolar fricative} > t /", "abse abze", "abte abte")]
#[case::voiceless_palatals("{palatal plosive} > {palatal nasal} /", "aca ac ca c", "aɲ̥a aɲ̥ ɲ̥a ɲ̥")]
#[case::voiced_palatals("{palatal plosive} > {palatal nasal} /", "aɟa aɟ ɟa ɟ", "aɲa aɲ ɲa ɲ")]
#[case::no_slash("b > p", "bob", "pop")]
#[case::word_final_class("{alveolar fricative} > /_#", "az zaz sa", "a za sa")]
#[case::word_initial_multi("se > /#_", "sese ese", "se ese")]
#[case::punctuated("s > /_#", "as, as.", "a, a.")]
#[case::adjacent_sources("[ae] > o /_{vowel}", "aae", "oae")]
fn scenario(
    registry: NamedClassRegistry,
    #[case] rule: &str,
    #[case] text: &str,
    #[case] expected: &str,
) {
    assert_eq!(apply_one(&registry, rule, text), expected);
}

#[rstest]
#[case::word_final("s > /_#", "abse ab see sea")]
#[case::word_initial("s > /#_", "abse abs ee eas")]
#[case::after_vowel("s > /{vowel}_", "abse a see sae")]
#[case::substitution("[sz] > t /", "abte abte")]
fn idempotent_on_reduced_text(
    registry: NamedClassRegistry,
    #[case] rule: &str,
    #[case] reduced: &str,
) {
    assert_eq!(apply_one(&registry, rule, reduced), reduced);
}

#[rstest]
fn ordered_pipeline(registry: NamedClassRegistry) {
    let set = SoundChangeSet::compile_text(
        "\
s > /_#
{palatal plosive} > {palatal nasal} /
a > e /_{palatal nasal}
",
        &registry,
    )
    .into_result()
    .unwrap();
    assert_eq!(
        set.apply("acas ɟa").unwrap(),
        ["acas ɟa", "aca ɟa", "aɲ̥a ɲa", "eɲ̥a ɲa"]
    );
    assert_eq!(set.apply_final("acas ɟa").unwrap(), "eɲ̥a ɲa");
}

#[rstest]
#[case::word_final_dots("s > /_#", "...")]
#[case::word_final_digits("s > /_#", "42")]
#[case::word_final_symbols("s > /_#", "\u{2014} !")]
#[case::word_initial_dots("s > /#_", "...")]
#[case::word_initial_digits("s > /#_", "42")]
#[case::word_initial_symbols("s > /#_", "\u{2014} !")]
fn word_rules_keep_letterless_text(
    registry: NamedClassRegistry,
    #[case] rule: &str,
    #[case] text: &str,
) {
    assert_eq!(apply_one(&registry, rule, text), text);
}

#[rstest]
fn deletion_can_leave_letterless_text(registry: NamedClassRegistry) {
    let set = SoundChangeSet::compile(["s > /", "a > b /_#", "a > b /#_"], &registry)
        .into_result()
        .unwrap();
    assert_eq!(set.apply("s.").unwrap(), ["s.", ".", ".", "."]);
    assert_eq!(set.apply_final("ss 12").unwrap(), " 12");
}

#[rstest]
fn blank_and_whitespace_text(registry: NamedClassRegistry) {
    let set = SoundChangeSet::compile(["b > p /", "p > f /"], &registry)
        .into_result()
        .unwrap();
    assert_eq!(set.apply("").unwrap(), ["", "", ""]);
    assert_eq!(set.apply("  \n").unwrap(), ["  \n", "", ""]);
}

#[rstest]
fn malformed_text_is_an_error(registry: NamedClassRegistry) {
    let set = SoundChangeSet::compile(["b > p /"], &registry)
        .into_result()
        .unwrap();
    assert!(matches!(
        set.apply("\u{0325}ab"),
        Err(SoundChangeError::MalformedInput(_))
    ));
}

#[rstest]
fn compile_failures_name_the_line(registry: NamedClassRegistry) {
    let err = SoundChangeSet::compile(["b > p /", "b p", "{velar} > x /"], &registry)
        .into_result()
        .unwrap_err();
    let SoundChangeError::Compile(failures) = &err else {
        panic!("expected compile failures, got {err:?}");
    };
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].line_number, 2);
    assert_eq!(failures[0].rule, "b p");
    assert_eq!(failures[1].line_number, 3);
    assert_eq!(
        failures[1].to_string(),
        r#"line 3: "{velar} > x /": unknown named class "velar""#
    );
}
