//! Grapheme-aware backtracking parser combinators.
//!
//! Templates ([`Node`]) are immutable values built from a small set of node
//! kinds. Parsing a template returns the unconsumed remainder and, on
//! success, a [`Snapshot`] tree that borrows the input. Failure is total
//! backtracking: the remainder is the original input.
//!
//! Any node can carry a capture name; [`Snapshot::find_all`] collects every
//! matched node with a given name from a completed parse.
//!
//! # Architecture
//!
//! - [`set`] -- Grapheme sets (explicit members or character classes)
//! - [`node`] -- Node templates, constructors and the parse driver
//! - [`snapshot`] -- Match results, capture search and value projection
//! - [`config`] -- Per-node configuration (whitespace, separated sequences)

pub mod config;
pub mod node;
pub mod set;
pub mod snapshot;

pub use config::{SeparatedConfig, WhitespaceConfig};
pub use node::{Node, NodeKind};
pub use set::GraphemeSet;
pub use snapshot::{Snapshot, Value};
