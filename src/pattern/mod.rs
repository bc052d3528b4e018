//! Query-Pattern Algebra
//!
//! An immutable tree describing a pattern of tokens in a corpus field. The
//! tree is an abstract layer: it says *what* to match, and a translator turns
//! it into a concrete target representation (an executable index query, a
//! canonical debug string, ...) without the node definitions knowing about
//! any particular target.
//!
//! ## Responsibilities
//! - **Structure**: the closed set of pattern variants and their derived
//!   length/emptiness properties (`node`).
//! - **Optimization**: the `rewrite()` pass, which reshapes a tree for
//!   cheaper execution without changing what it matches (`rewrite`).
//! - **Translation**: the per-variant translator contract and the built-in
//!   string and index-query translators (`translate`).
//!
//! Pattern values are plain data: cloning is deep, equality and hashing are
//! structural over the whole subtree, and nothing in this module holds locks
//! or talks to an index.

pub mod node;
pub mod rewrite;
pub mod translate;

pub use node::{ExpandDirection, FilterOperation, Pattern};
pub use translate::{
    IndexQueryTranslator, PatternTranslator, QueryContext, StringTranslator,
};
