//! Shared text primitives for the soundshift engine.
//!
//! Everything in the engine consumes text one grapheme at a time. This crate
//! owns the definition of a grapheme and the character classes the rule
//! compiler builds on.
//!
//! # Architecture
//!
//! - [`character`] -- Character classification (letters, whitespace, combining marks)
//! - [`grapheme`] -- Grapheme segmentation (`pop_grapheme`, `split`, lazy iterator)

pub mod character;
pub mod grapheme;

/// Error type for grapheme segmentation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    /// A grapheme was requested at a position whose first scalar is a
    /// combining mark or modifier.
    #[error("malformed input: combining scalar {scalar:?} at byte {offset} cannot start a grapheme")]
    MalformedInput { offset: usize, scalar: char },
}
