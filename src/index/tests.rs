//! Index Boundary Tests
//!
//! Validates the in-memory engine's evaluation of each executable query
//! variant and the document-format registry.
//!
//! ## Test Scopes
//! - **Matching**: every `IndexQuery` variant against token vectors.
//! - **Documents**: metadata retrieval through the engine trait.
//! - **Formats**: registration, case-insensitive lookup and listing.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::index::engine::{DocId, IndexEngine};
    use crate::index::formats::{FormatRegistry, IndexerDescriptor};
    use crate::index::memory::MemoryIndex;
    use crate::index::query::IndexQuery;

    fn term(value: &str) -> IndexQuery {
        IndexQuery::Term {
            annotation: "word".to_string(),
            value: value.to_string(),
        }
    }

    fn single_doc(text: &str) -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_text(HashMap::new(), "contents", text);
        index
    }

    async fn spans(index: &MemoryIndex, query: &IndexQuery) -> Vec<(u32, u32)> {
        index
            .find_hits(query, "contents")
            .await
            .unwrap()
            .into_iter()
            .map(|h| (h.start, h.end))
            .collect()
    }

    // ============================================================
    // QUERY MATCHING
    // ============================================================

    #[tokio::test]
    async fn test_term_matches_every_occurrence() {
        let index = single_doc("a b a c a");
        assert_eq!(spans(&index, &term("a")).await, vec![(0, 1), (2, 3), (4, 5)]);
        assert_eq!(spans(&index, &term("z")).await, vec![]);
    }

    #[tokio::test]
    async fn test_sequence_matches_adjacent_tokens() {
        let index = single_doc("the cat and the cat sat");
        let query = IndexQuery::Sequence(vec![term("the"), term("cat")]);
        assert_eq!(spans(&index, &query).await, vec![(0, 2), (3, 5)]);
    }

    #[tokio::test]
    async fn test_repeat_yields_all_counts_in_range() {
        let index = single_doc("x a a a y");
        let query = IndexQuery::Repeat {
            clause: Box::new(term("a")),
            min: 1,
            max: Some(2),
        };
        assert_eq!(
            spans(&index, &query).await,
            vec![(1, 2), (1, 3), (2, 3), (2, 4), (3, 4)]
        );
    }

    #[tokio::test]
    async fn test_unbounded_repeat_terminates() {
        let index = single_doc("a a a");
        let query = IndexQuery::Repeat {
            clause: Box::new(term("a")),
            min: 1,
            max: None,
        };
        assert_eq!(
            spans(&index, &query).await,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[tokio::test]
    async fn test_zero_min_repeat_matches_empty_span() {
        let index = single_doc("b");
        let query = IndexQuery::Repeat {
            clause: Box::new(term("a")),
            min: 0,
            max: Some(2),
        };
        assert_eq!(spans(&index, &query).await, vec![(0, 0), (1, 1)]);
    }

    #[tokio::test]
    async fn test_expand_right_adds_trailing_tokens() {
        let index = single_doc("cat x y");
        let query = IndexQuery::Expand {
            clause: Box::new(term("cat")),
            left: false,
            min_expand: 1,
            max_expand: Some(2),
        };
        assert_eq!(spans(&index, &query).await, vec![(0, 2), (0, 3)]);
    }

    #[tokio::test]
    async fn test_expand_left_adds_leading_tokens() {
        let index = single_doc("x y cat");
        let query = IndexQuery::Expand {
            clause: Box::new(term("cat")),
            left: true,
            min_expand: 1,
            max_expand: Some(2),
        };
        assert_eq!(spans(&index, &query).await, vec![(0, 3), (1, 3)]);
    }

    #[tokio::test]
    async fn test_position_filter_containing() {
        let index = single_doc("the cat sat the dog sat");
        // Three-token spans starting at "the" that contain "cat".
        let producer = IndexQuery::Sequence(vec![
            term("the"),
            IndexQuery::Repeat {
                clause: Box::new(IndexQuery::Or(vec![
                    term("cat"),
                    term("dog"),
                    term("sat"),
                ])),
                min: 2,
                max: Some(2),
            },
        ]);
        let query = IndexQuery::PositionFilter {
            producer: Box::new(producer),
            filter: Box::new(term("cat")),
            containing: true,
            invert: false,
            left_adjust: 0,
            right_adjust: 0,
        };
        assert_eq!(spans(&index, &query).await, vec![(0, 3)]);
    }

    #[tokio::test]
    async fn test_position_filter_inverted() {
        let index = single_doc("the cat sat the dog sat");
        let producer = IndexQuery::Sequence(vec![
            term("the"),
            IndexQuery::Repeat {
                clause: Box::new(IndexQuery::Or(vec![
                    term("cat"),
                    term("dog"),
                    term("sat"),
                ])),
                min: 2,
                max: Some(2),
            },
        ]);
        let query = IndexQuery::PositionFilter {
            producer: Box::new(producer),
            filter: Box::new(term("cat")),
            containing: true,
            invert: true,
            left_adjust: 0,
            right_adjust: 0,
        };
        assert_eq!(spans(&index, &query).await, vec![(3, 6)]);
    }

    #[tokio::test]
    async fn test_position_filter_within() {
        let index = single_doc("a b c");
        // Single tokens within the span "a b".
        let filter = IndexQuery::Sequence(vec![term("a"), term("b")]);
        let query = IndexQuery::PositionFilter {
            producer: Box::new(IndexQuery::Or(vec![term("a"), term("b"), term("c")])),
            filter: Box::new(filter),
            containing: false,
            invert: false,
            left_adjust: 0,
            right_adjust: 0,
        };
        assert_eq!(spans(&index, &query).await, vec![(0, 1), (1, 2)]);
    }

    #[tokio::test]
    async fn test_not_token_matches_everything_else() {
        let index = single_doc("a b a");
        let query = IndexQuery::NotToken(Box::new(term("a")));
        assert_eq!(spans(&index, &query).await, vec![(1, 2)]);
    }

    #[tokio::test]
    async fn test_and_intersects_spans() {
        let index = single_doc("a b");
        let both = IndexQuery::And(vec![
            term("a"),
            IndexQuery::Or(vec![term("a"), term("b")]),
        ]);
        assert_eq!(spans(&index, &both).await, vec![(0, 1)]);
    }

    #[tokio::test]
    async fn test_or_unions_spans() {
        let index = single_doc("a b c");
        let query = IndexQuery::Or(vec![term("a"), term("c")]);
        assert_eq!(spans(&index, &query).await, vec![(0, 1), (2, 3)]);
    }

    #[tokio::test]
    async fn test_hits_span_multiple_documents() {
        let mut index = MemoryIndex::new();
        index.add_text(HashMap::new(), "contents", "cat");
        index.add_text(HashMap::new(), "contents", "dog cat");
        let hits = index.find_hits(&term("cat"), "contents").await.unwrap();
        let docs: Vec<u32> = hits.iter().map(|h| h.doc.0).collect();
        assert_eq!(docs, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_missing_field_yields_no_hits() {
        let index = single_doc("cat");
        let hits = index.find_hits(&term("cat"), "title").await.unwrap();
        assert!(hits.is_empty());
    }

    // ============================================================
    // DOCUMENT RETRIEVAL
    // ============================================================

    #[tokio::test]
    async fn test_document_returns_metadata() {
        let mut index = MemoryIndex::new();
        let mut metadata = HashMap::new();
        metadata.insert("author".to_string(), "austen".to_string());
        let id = index.add_text(metadata, "contents", "some text");

        let info = index.document(id).await.unwrap();
        assert_eq!(info.id, id);
        assert_eq!(info.metadata_value("author"), "austen");
        assert_eq!(info.metadata_value("missing"), "");

        assert!(index.document(DocId(99)).await.is_none());
    }

    // ============================================================
    // FORMAT REGISTRY
    // ============================================================

    fn descriptor(name: &str) -> IndexerDescriptor {
        IndexerDescriptor {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            description: format!("{} input", name),
        }
    }

    #[test]
    fn test_register_and_lookup_is_case_insensitive() {
        let registry = FormatRegistry::new();
        registry.register(descriptor("tei"));

        assert!(registry.exists("TEI"));
        let found = registry.lookup("Tei").unwrap();
        assert_eq!(found.name, "tei");
        assert!(registry.lookup("folia").is_none());
    }

    #[test]
    fn test_reregistration_replaces_descriptor() {
        let registry = FormatRegistry::new();
        registry.register(descriptor("tei"));
        let mut updated = descriptor("TEI");
        updated.description = "updated".to_string();
        registry.register(updated);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("tei").unwrap().description, "updated");
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = FormatRegistry::new();
        registry.register(descriptor("tei"));
        registry.register(descriptor("folia"));
        registry.register(descriptor("chat"));

        assert_eq!(registry.list(), vec!["chat", "folia", "tei"]);
    }
}
