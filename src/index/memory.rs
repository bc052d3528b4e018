//! In-memory index engine.
//!
//! A reference `IndexEngine` backed by plain token vectors. It evaluates
//! executable queries with a straightforward backtracking matcher over each
//! document's tokens. Suitable for tests and small corpora; a production
//! deployment substitutes a real postings engine behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;

use super::engine::{DocId, DocumentInfo, Hit, IndexEngine};
use super::query::IndexQuery;

struct StoredDocument {
    metadata: HashMap<String, String>,
    fields: HashMap<String, Vec<String>>,
}

/// An index held entirely in memory. Documents are added up front; the
/// engine trait only reads.
pub struct MemoryIndex {
    docs: Vec<StoredDocument>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self { docs: Vec::new() }
    }

    /// Adds a document with its metadata and tokenized content fields,
    /// returning its id.
    pub fn add_document(
        &mut self,
        metadata: HashMap<String, String>,
        fields: HashMap<String, Vec<String>>,
    ) -> DocId {
        let id = DocId(self.docs.len() as u32);
        self.docs.push(StoredDocument { metadata, fields });
        id
    }

    /// Convenience for tests: whitespace-tokenized single-field document.
    pub fn add_text(&mut self, metadata: HashMap<String, String>, field: &str, text: &str) -> DocId {
        let tokens = text.split_whitespace().map(str::to_string).collect();
        let mut fields = HashMap::new();
        fields.insert(field.to_string(), tokens);
        self.add_document(metadata, fields)
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexEngine for MemoryIndex {
    async fn find_hits(&self, query: &IndexQuery, field: &str) -> anyhow::Result<Vec<Hit>> {
        let mut hits = Vec::new();
        for (doc_index, doc) in self.docs.iter().enumerate() {
            let Some(tokens) = doc.fields.get(field) else {
                continue;
            };
            for (start, end) in all_spans(query, tokens) {
                hits.push(Hit {
                    doc: DocId(doc_index as u32),
                    start: start as u32,
                    end: end as u32,
                });
            }
        }
        Ok(hits)
    }

    async fn document(&self, doc: DocId) -> Option<DocumentInfo> {
        self.docs.get(doc.0 as usize).map(|stored| DocumentInfo {
            id: doc,
            metadata: stored.metadata.clone(),
        })
    }
}

/// All `[start, end)` spans in the token sequence matching the query,
/// ordered by start position.
fn all_spans(query: &IndexQuery, tokens: &[String]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for start in 0..=tokens.len() {
        for end in match_ends(query, tokens, start) {
            spans.push((start, end));
        }
    }
    spans.sort_unstable();
    spans.dedup();
    spans
}

/// The possible end positions of a match beginning at `start`.
fn match_ends(query: &IndexQuery, tokens: &[String], start: usize) -> Vec<usize> {
    match query {
        IndexQuery::Term { value, .. } => match tokens.get(start) {
            Some(token) if token == value => vec![start + 1],
            _ => vec![],
        },

        IndexQuery::Sequence(clauses) => {
            let mut ends = vec![start];
            for clause in clauses {
                let mut next = Vec::new();
                for end in ends {
                    next.extend(match_ends(clause, tokens, end));
                }
                next.sort_unstable();
                next.dedup();
                if next.is_empty() {
                    return vec![];
                }
                ends = next;
            }
            ends
        }

        IndexQuery::Repeat { clause, min, max } => {
            let mut ends = Vec::new();
            let mut frontier = vec![start];
            // The repetition count bounds the loop even when the clause can
            // match zero tokens.
            let limit = max
                .map(|m| m as usize)
                .unwrap_or(tokens.len() + 1);
            for count in 0..=limit {
                if count >= *min as usize {
                    ends.extend(frontier.iter().copied());
                }
                if count == limit {
                    break;
                }
                let mut next = Vec::new();
                for end in &frontier {
                    next.extend(match_ends(clause, tokens, *end));
                }
                next.sort_unstable();
                next.dedup();
                if next.is_empty() {
                    break;
                }
                frontier = next;
            }
            ends.sort_unstable();
            ends.dedup();
            ends
        }

        IndexQuery::Expand {
            clause,
            left,
            min_expand,
            max_expand,
        } => {
            let cap = max_expand.map(|m| m as usize).unwrap_or(tokens.len());
            let mut ends = Vec::new();
            for extra in *min_expand as usize..=cap {
                if *left {
                    // Extra tokens before the clause: the clause itself
                    // starts `extra` tokens into the span.
                    let clause_start = start + extra;
                    if clause_start > tokens.len() {
                        break;
                    }
                    ends.extend(match_ends(clause, tokens, clause_start));
                } else {
                    for end in match_ends(clause, tokens, start) {
                        if end + extra <= tokens.len() {
                            ends.push(end + extra);
                        }
                    }
                }
            }
            ends.sort_unstable();
            ends.dedup();
            ends
        }

        IndexQuery::PositionFilter {
            producer,
            filter,
            containing,
            invert,
            left_adjust,
            right_adjust,
        } => {
            let filter_spans = all_spans(filter, tokens);
            match_ends(producer, tokens, start)
                .into_iter()
                .filter(|end| {
                    let span_start = start as i64 + *left_adjust as i64;
                    let span_end = *end as i64 + *right_adjust as i64;
                    let related = filter_spans.iter().any(|(fs, fe)| {
                        let (fs, fe) = (*fs as i64, *fe as i64);
                        if *containing {
                            span_start <= fs && fe <= span_end
                        } else {
                            fs <= span_start && span_end <= fe
                        }
                    });
                    related != *invert
                })
                .collect()
        }

        IndexQuery::NotToken(clause) => {
            if start >= tokens.len() {
                return vec![];
            }
            let clause_matches_token =
                match_ends(clause, tokens, start).contains(&(start + 1));
            if clause_matches_token {
                vec![]
            } else {
                vec![start + 1]
            }
        }

        IndexQuery::And(clauses) => {
            let mut iter = clauses.iter();
            let Some(first) = iter.next() else {
                return vec![];
            };
            let mut ends = match_ends(first, tokens, start);
            for clause in iter {
                let other = match_ends(clause, tokens, start);
                ends.retain(|e| other.contains(e));
                if ends.is_empty() {
                    break;
                }
            }
            ends
        }

        IndexQuery::Or(clauses) => {
            let mut ends = Vec::new();
            for clause in clauses {
                ends.extend(match_ends(clause, tokens, start));
            }
            ends.sort_unstable();
            ends.dedup();
            ends
        }
    }
}
