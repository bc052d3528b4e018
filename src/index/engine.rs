//! The index-engine boundary trait and its raw result types.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::query::IndexQuery;

/// Identifier of a document within the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(pub u32);

/// A single matched token span: `[start, end)` positions within a document's
/// content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub doc: DocId,
    pub start: u32,
    pub end: u32,
}

/// Stored document fields, as far as this core needs them: an identifier and
/// flat metadata used for grouping and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocId,
    pub metadata: HashMap<String, String>,
}

impl DocumentInfo {
    /// Metadata field value, empty string when the document lacks the field
    /// (absent values still group, into the empty-identity group).
    pub fn metadata_value(&self, name: &str) -> &str {
        self.metadata.get(name).map(String::as_str).unwrap_or("")
    }
}

/// The postings engine this core executes translated queries against.
///
/// Implementations are expected to return hits ordered by `(doc, start)`;
/// everything downstream (doc collapsing, grouping, windowing) preserves
/// that order. Failures are opaque to the core and end up stored on the job
/// as [`crate::error::SearchError::JobFailed`].
#[async_trait]
pub trait IndexEngine: Send + Sync {
    /// Run an executable query against a content field, returning all hits.
    async fn find_hits(&self, query: &IndexQuery, field: &str) -> anyhow::Result<Vec<Hit>>;

    /// Look up a document's stored fields.
    async fn document(&self, doc: DocId) -> Option<DocumentInfo>;
}
