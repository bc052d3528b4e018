//! External Collaborator Boundaries
//!
//! The execution core does not own an inverted index. This module defines
//! the contracts it talks through:
//!
//! - **`query`**: the executable query tree a translated pattern becomes,
//!   which is what the postings engine accepts.
//! - **`engine`**: the async `IndexEngine` trait plus the raw hit and
//!   document types coming back from it.
//! - **`formats`**: the document-format registry, a pure name-to-descriptor
//!   lookup with thread-safe registration.
//! - **`memory`**: a small in-memory `IndexEngine` used by tests and demos;
//!   a production deployment plugs in a real postings engine instead.

pub mod engine;
pub mod formats;
pub mod memory;
pub mod query;

pub use engine::{DocId, DocumentInfo, Hit, IndexEngine};
pub use formats::{FormatRegistry, IndexerDescriptor};
pub use memory::MemoryIndex;
pub use query::IndexQuery;

#[cfg(test)]
mod tests;
