// Character classification and Unicode utilities
//
// The grapheme segmenter and the rule compiler only need a coarse view of
// the text: which scalars attach to the previous one, which scalars make up
// words, and which scalars separate words.

use unicode_normalization::char::is_combining_mark;

// ---------------------------------------------------------------------------
// Modifier letters and modifier symbols
//
// General categories Lm and Sk (Unicode 14). These attach to the preceding
// base scalar the same way combining marks do: aspiration ʰ, palatalization
// ʲ, length ː, stress ˈ, tone letters ˥˦˧.
// ---------------------------------------------------------------------------

/// Inclusive code point ranges for general categories Lm and Sk, sorted.
const MODIFIER_RANGES: &[(u32, u32)] = &[
    (0x005E, 0x005E), (0x0060, 0x0060), (0x00A8, 0x00A8), (0x00AF, 0x00AF), (0x00B4, 0x00B4),
    (0x00B8, 0x00B8), (0x02B0, 0x02FF), (0x0374, 0x0375), (0x037A, 0x037A), (0x0384, 0x0385),
    (0x0559, 0x0559), (0x0640, 0x0640), (0x06E5, 0x06E6), (0x07F4, 0x07F5), (0x07FA, 0x07FA),
    (0x081A, 0x081A), (0x0824, 0x0824), (0x0828, 0x0828), (0x0888, 0x0888), (0x08C9, 0x08C9),
    (0x0971, 0x0971), (0x0E46, 0x0E46), (0x0EC6, 0x0EC6), (0x10FC, 0x10FC), (0x17D7, 0x17D7),
    (0x1843, 0x1843), (0x1AA7, 0x1AA7), (0x1C78, 0x1C7D), (0x1D2C, 0x1D6A), (0x1D78, 0x1D78),
    (0x1D9B, 0x1DBF), (0x1FBD, 0x1FBD), (0x1FBF, 0x1FC1), (0x1FCD, 0x1FCF), (0x1FDD, 0x1FDF),
    (0x1FED, 0x1FEF), (0x1FFD, 0x1FFE), (0x2071, 0x2071), (0x207F, 0x207F), (0x2090, 0x209C),
    (0x2C7C, 0x2C7D), (0x2D6F, 0x2D6F), (0x2E2F, 0x2E2F), (0x3005, 0x3005), (0x3031, 0x3035),
    (0x303B, 0x303B), (0x309B, 0x309E), (0x30FC, 0x30FE), (0xA015, 0xA015), (0xA4F8, 0xA4FD),
    (0xA60C, 0xA60C), (0xA67F, 0xA67F), (0xA69C, 0xA69D), (0xA700, 0xA721), (0xA770, 0xA770),
    (0xA788, 0xA78A), (0xA7F2, 0xA7F4), (0xA7F8, 0xA7F9), (0xA9CF, 0xA9CF), (0xA9E6, 0xA9E6),
    (0xAA70, 0xAA70), (0xAADD, 0xAADD), (0xAAF3, 0xAAF4), (0xAB5B, 0xAB5F), (0xAB69, 0xAB6B),
    (0xFBB2, 0xFBC2), (0xFF3E, 0xFF3E), (0xFF40, 0xFF40), (0xFF70, 0xFF70), (0xFF9E, 0xFF9F),
    (0xFFE3, 0xFFE3), (0x10780, 0x10785), (0x10787, 0x107B0), (0x107B2, 0x107BA),
    (0x16B40, 0x16B43), (0x16F93, 0x16F9F), (0x16FE0, 0x16FE1), (0x16FE3, 0x16FE3),
    (0x1AFF0, 0x1AFF3), (0x1AFF5, 0x1AFFB), (0x1AFFD, 0x1AFFE), (0x1E137, 0x1E13D),
    (0x1E94B, 0x1E94B), (0x1F3FB, 0x1F3FF),
];

/// Check whether a character is a modifier letter (Lm) or modifier symbol (Sk).
pub fn is_modifier(c: char) -> bool {
    let cp = c as u32;
    MODIFIER_RANGES
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Check whether a character attaches to the preceding scalar.
///
/// True for the general category Mark superclass (Mn, Mc, Me), modifier
/// letters (Lm) and modifier symbols (Sk).
pub fn is_combining(c: char) -> bool {
    is_combining_mark(c) || is_modifier(c)
}

// ---------------------------------------------------------------------------
// Character type classification
// ---------------------------------------------------------------------------

/// Character type classification.
///
/// Only the distinctions segmentation and word matching rely on; digits,
/// punctuation and symbols are all `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharType {
    Letter,
    Whitespace,
    Combining,
    Other,
}

/// Returns the character type for a given character.
///
/// Combining scalars are classified first: a modifier letter such as `ʰ` is
/// alphabetic according to Unicode, but it never begins a grapheme.
pub fn get_char_type(c: char) -> CharType {
    if is_combining(c) {
        CharType::Combining
    } else if c.is_alphabetic() {
        CharType::Letter
    } else if is_whitespace(c) {
        CharType::Whitespace
    } else {
        CharType::Other
    }
}

/// Check whether a character is whitespace (Unicode White_Space).
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Check whether a character ends a line.
pub fn is_line_ending(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Check whether a grapheme is a letter, i.e. whether its base scalar is
/// alphabetic. Letter graphemes make up words; every other grapheme is a
/// word boundary.
pub fn is_letter_grapheme(grapheme: &str) -> bool {
    grapheme
        .chars()
        .next()
        .is_some_and(|c| get_char_type(c) == CharType::Letter)
}
