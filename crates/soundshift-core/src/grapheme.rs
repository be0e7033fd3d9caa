// Grapheme segmentation
//
// A grapheme is one base scalar followed by every combining scalar that
// trails it. Unlike UAX #29 extended grapheme clusters, modifier letters such
// as ʰ and ː belong to the preceding segment.

use std::iter::FusedIterator;

use crate::SegmentError;
use crate::character::is_combining;

/// Pop the first grapheme off `text`.
///
/// Returns `Ok(None)` on empty input and `Ok(Some((grapheme, remainder)))`
/// otherwise. Fails with [`SegmentError::MalformedInput`] when the first
/// scalar is itself combining: callers must never hand over text that starts
/// in the middle of a grapheme.
pub fn pop_grapheme(text: &str) -> Result<Option<(&str, &str)>, SegmentError> {
    pop_grapheme_at(text, 0)
}

/// `pop_grapheme` with `base_offset` added to the reported error offset.
fn pop_grapheme_at(text: &str, base_offset: usize) -> Result<Option<(&str, &str)>, SegmentError> {
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return Ok(None);
    };
    if is_combining(first) {
        return Err(SegmentError::MalformedInput {
            offset: base_offset,
            scalar: first,
        });
    }
    let end = chars
        .find(|&(_, c)| !is_combining(c))
        .map_or(text.len(), |(i, _)| i);
    Ok(Some(text.split_at(end)))
}

/// Split `text` into its graphemes.
///
/// Joining the result reproduces `text` exactly.
pub fn split(text: &str) -> Result<Vec<&str>, SegmentError> {
    graphemes(text).collect()
}

/// Count the graphemes in `text`.
pub fn count(text: &str) -> Result<usize, SegmentError> {
    graphemes(text).try_fold(0, |n, g| g.map(|_| n + 1))
}

/// Lazily iterate over the graphemes of `text`.
///
/// The iterator is finite and restartable (it is `Clone`). After yielding an
/// error it yields nothing more.
pub fn graphemes(text: &str) -> Graphemes<'_> {
    Graphemes {
        rest: text,
        offset: 0,
        failed: false,
    }
}

/// Iterator returned by [`graphemes`].
#[derive(Debug, Clone)]
pub struct Graphemes<'a> {
    rest: &'a str,
    offset: usize,
    failed: bool,
}

impl<'a> Graphemes<'a> {
    /// The text not yet segmented.
    pub fn as_str(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = Result<&'a str, SegmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match pop_grapheme_at(self.rest, self.offset) {
            Ok(Some((grapheme, rest))) => {
                self.offset += grapheme.len();
                self.rest = rest;
                Some(Ok(grapheme))
            }
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Graphemes<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nasal row of the IPA consonant chart, with its diacritics.
    const NASALS: &str = "m\u{0325}m\u{0271}n\u{032A}n\u{0325}nn\u{0320}\u{0273}\u{0272}\u{0325}\u{0272}\u{014B}\u{030A}\u{014B}\u{0274}";

    #[test]
    fn pop_on_empty_input() {
        assert_eq!(pop_grapheme("").unwrap(), None);
    }

    #[test]
    fn pop_single_scalar() {
        assert_eq!(pop_grapheme("a").unwrap(), Some(("a", "")));
        assert_eq!(pop_grapheme("ab").unwrap(), Some(("a", "b")));
    }

    #[test]
    fn pop_keeps_trailing_marks() {
        assert_eq!(
            pop_grapheme("n\u{032A}a").unwrap(),
            Some(("n\u{032A}", "a"))
        );
        // Several marks and a modifier letter all attach to the same base.
        assert_eq!(
            pop_grapheme("t\u{032A}\u{02B0}\u{02D0}x").unwrap(),
            Some(("t\u{032A}\u{02B0}\u{02D0}", "x"))
        );
    }

    #[test]
    fn pop_rejects_leading_combining() {
        let err = pop_grapheme("\u{0325}a").unwrap_err();
        assert_eq!(
            err,
            SegmentError::MalformedInput {
                offset: 0,
                scalar: '\u{0325}'
            }
        );
    }

    #[test]
    fn split_nasal_row() {
        let graphemes = split(NASALS).unwrap();
        assert_eq!(
            graphemes,
            vec![
                "m\u{0325}",
                "m",
                "\u{0271}",
                "n\u{032A}",
                "n\u{0325}",
                "n",
                "n\u{0320}",
                "\u{0273}",
                "\u{0272}\u{0325}",
                "\u{0272}",
                "\u{014B}\u{030A}",
                "\u{014B}",
                "\u{0274}",
            ]
        );
    }

    #[test]
    fn split_round_trips() {
        for text in [NASALS, "abse abs see seas", "a\u{0272}\u{0325}a a\u{0272}", "", " \t\n"] {
            assert_eq!(split(text).unwrap().concat(), text);
        }
    }

    #[test]
    fn whitespace_is_its_own_grapheme() {
        assert_eq!(split("a b").unwrap(), vec!["a", " ", "b"]);
    }

    #[test]
    fn mark_after_space_attaches_to_space() {
        assert_eq!(split("a \u{0325}").unwrap(), vec!["a", " \u{0325}"]);
    }

    #[test]
    fn split_reports_offset_of_first_error() {
        let err = split("\u{0325}").unwrap_err();
        assert!(matches!(err, SegmentError::MalformedInput { offset: 0, .. }));
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut it = graphemes("\u{02B0}ab");
        assert!(matches!(it.next(), Some(Err(_))));
        assert!(it.next().is_none());
    }

    #[test]
    fn iterator_is_restartable() {
        let it = graphemes("abc");
        let first: Vec<_> = it.clone().collect::<Result<_, _>>().unwrap();
        let second: Vec<_> = it.collect::<Result<_, _>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn iterator_exposes_remainder() {
        let mut it = graphemes("ab");
        it.next();
        assert_eq!(it.as_str(), "b");
    }

    #[test]
    fn count_graphemes() {
        assert_eq!(count(NASALS).unwrap(), 13);
        assert_eq!(count("").unwrap(), 0);
        assert!(count("\u{0303}").is_err());
    }
}
