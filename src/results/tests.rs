//! Result Model Tests
//!
//! Validates group-identity values, their wire format, windowing clamps and
//! the grouping pipeline.
//!
//! ## Test Scopes
//! - **Ordering**: the PropertyValue total order, composite prefix rules.
//! - **Wire format**: serialize/deserialize round trips, escaping.
//! - **Windowing**: parameter clamping and window stats.
//! - **Grouping**: first-seen order, sizes, member caps, identity sort.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::engine::config::SearchConfig;
    use crate::index::engine::{DocId, DocumentInfo, Hit};
    use crate::pattern::QueryContext;
    use crate::results::group::{DocResults, GroupProperty, Groups};
    use crate::results::property::PropertyValue;
    use crate::results::window::{clamp_page, window, window_stats};

    fn ctx() -> QueryContext {
        QueryContext::simple("contents")
    }

    fn doc_info(id: u32, fields: &[(&str, &str)]) -> DocumentInfo {
        DocumentInfo {
            id: DocId(id),
            metadata: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    // ============================================================
    // PROPERTY VALUE ORDERING
    // ============================================================

    #[test]
    fn test_atomic_ordering() {
        assert!(PropertyValue::Int(1) < PropertyValue::Int(2));
        assert!(
            PropertyValue::Str("apple".to_string()) < PropertyValue::Str("Banana".to_string())
        );
    }

    #[test]
    fn test_string_ordering_is_case_insensitive_first() {
        // Case only decides between otherwise equal strings.
        assert!(
            PropertyValue::Str("ALPHA".to_string()) < PropertyValue::Str("beta".to_string())
        );
        assert_ne!(
            PropertyValue::Str("Alpha".to_string()).cmp(&PropertyValue::Str("alpha".to_string())),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_composite_prefix_sorts_first() {
        let a = PropertyValue::Multiple(vec![PropertyValue::Str("a".to_string())]);
        let ab = PropertyValue::Multiple(vec![
            PropertyValue::Str("a".to_string()),
            PropertyValue::Str("b".to_string()),
        ]);
        assert!(a < ab);
    }

    #[test]
    fn test_composite_first_difference_decides() {
        let ab = PropertyValue::Multiple(vec![
            PropertyValue::Str("a".to_string()),
            PropertyValue::Str("b".to_string()),
        ]);
        let ac = PropertyValue::Multiple(vec![
            PropertyValue::Str("a".to_string()),
            PropertyValue::Str("c".to_string()),
        ]);
        assert_eq!(
            ab.cmp(&ac),
            PropertyValue::Str("b".to_string()).cmp(&PropertyValue::Str("c".to_string()))
        );
    }

    // ============================================================
    // WIRE FORMAT
    // ============================================================

    #[test]
    fn test_atomic_round_trips() {
        let values = vec![
            PropertyValue::Int(-42),
            PropertyValue::Str("swift".to_string()),
            PropertyValue::Token {
                field: "contents".to_string(),
                value: "cat".to_string(),
            },
        ];
        for value in values {
            let serialized = value.serialize();
            let parsed = PropertyValue::deserialize(&ctx(), &serialized).unwrap();
            assert_eq!(parsed, value, "round trip failed for {}", serialized);
        }
    }

    #[test]
    fn test_multiple_round_trip() {
        let value = PropertyValue::Multiple(vec![
            PropertyValue::Str("austen".to_string()),
            PropertyValue::Int(1813),
        ]);
        let serialized = value.serialize();
        assert_eq!(serialized, "str:austen,int:1813");
        let parsed = PropertyValue::deserialize(&ctx(), &serialized).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_round_trip_with_separator_payloads() {
        // Values containing the separators and the escape character itself.
        let value = PropertyValue::Multiple(vec![
            PropertyValue::Str("a,b".to_string()),
            PropertyValue::Str("c:d".to_string()),
            PropertyValue::Str("$CM$".to_string()),
            PropertyValue::Str("price: $1,000".to_string()),
        ]);
        let serialized = value.serialize();
        let parsed = PropertyValue::deserialize(&ctx(), &serialized).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_deserialize_multiple_of_single_component() {
        let value = PropertyValue::Multiple(vec![PropertyValue::Str("solo".to_string())]);
        let serialized = value.serialize();
        let parsed = PropertyValue::deserialize_multiple(&ctx(), &serialized).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_token_without_field_takes_context() {
        let parsed = PropertyValue::deserialize(&ctx(), "cwt:cat").unwrap();
        assert_eq!(
            parsed,
            PropertyValue::Token {
                field: "contents".to_string(),
                value: "cat".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_identity_is_invalid_query() {
        assert!(PropertyValue::deserialize(&ctx(), "nonsense").is_err());
        assert!(PropertyValue::deserialize(&ctx(), "int:notanumber").is_err());
    }

    // ============================================================
    // WINDOWING
    // ============================================================

    #[test]
    fn test_clamp_negative_first_and_oversized_number() {
        // Requested count exceeds the maximum: clamps to max, not default.
        let config = SearchConfig::default();
        assert_eq!(clamp_page(-5, 1000, &config), (0, 100));
    }

    #[test]
    fn test_clamp_negative_number_takes_default() {
        let config = SearchConfig::default();
        assert_eq!(clamp_page(0, -1, &config), (0, 20));
    }

    #[test]
    fn test_window_stats_against_true_total() {
        let stats = window_stats(0, 100, 250);
        assert_eq!(stats.actual, 100);
        assert!(stats.has_next);

        let last = window_stats(240, 100, 250);
        assert_eq!(last.actual, 10);
        assert!(!last.has_next);

        let beyond = window_stats(300, 100, 250);
        assert_eq!(beyond.actual, 0);
        assert!(!beyond.has_next);
    }

    #[test]
    fn test_window_slices_items() {
        let config = SearchConfig::default();
        let items: Vec<u32> = (0..10).collect();
        let (page, stats) = window(&items, 4, 3, &config);
        assert_eq!(page, vec![4, 5, 6]);
        assert_eq!(stats.first, 4);
        assert_eq!(stats.requested, 3);
        assert_eq!(stats.actual, 3);
        assert!(stats.has_next);
    }

    // ============================================================
    // DOC COLLAPSE & GROUPING
    // ============================================================

    fn hit(doc: u32, start: u32) -> Hit {
        Hit {
            doc: DocId(doc),
            start,
            end: start + 1,
        }
    }

    #[test]
    fn test_doc_collapse_preserves_first_hit_order() {
        let hits = vec![hit(2, 0), hit(2, 5), hit(0, 1), hit(2, 9), hit(1, 3)];
        let docs = DocResults::from_hits(&hits);
        let ids: Vec<u32> = docs.docs.iter().map(|d| d.doc.0).collect();
        assert_eq!(ids, vec![2, 0, 1]);
        assert_eq!(docs.docs[0].hit_count, 3);
        assert_eq!(docs.docs[1].hit_count, 1);
    }

    #[test]
    fn test_grouping_first_seen_order_and_sizes() {
        let hits = vec![hit(0, 0), hit(1, 0), hit(2, 0), hit(3, 0)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> = [
            (DocId(0), doc_info(0, &[("author", "austen")])),
            (DocId(1), doc_info(1, &[("author", "dickens")])),
            (DocId(2), doc_info(2, &[("author", "austen")])),
            (DocId(3), doc_info(3, &[("author", "dickens")])),
        ]
        .into_iter()
        .collect();

        let groups = Groups::from_docs(
            &docs,
            &infos,
            &GroupProperty::MetadataField("author".to_string()),
            None,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.total_results, 4);
        assert_eq!(groups.groups[0].identity_display, "austen");
        assert_eq!(groups.groups[0].size, 2);
        assert_eq!(groups.groups[1].identity_display, "dickens");
        assert_eq!(groups.groups[1].size, 2);
        assert!(groups.groups[0].members.is_none());
    }

    #[test]
    fn test_grouping_caps_members() {
        let hits = vec![hit(0, 0), hit(1, 0), hit(2, 0)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> = (0..3)
            .map(|i| (DocId(i), doc_info(i, &[("lang", "en")])))
            .collect();

        let groups = Groups::from_docs(
            &docs,
            &infos,
            &GroupProperty::MetadataField("lang".to_string()),
            Some(2),
        );
        assert_eq!(groups.groups[0].size, 3);
        assert_eq!(groups.groups[0].members.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_composite_grouping_identity() {
        let hits = vec![hit(0, 0), hit(0, 1)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> =
            [(DocId(0), doc_info(0, &[("author", "austen")]))]
                .into_iter()
                .collect();

        let property = GroupProperty::Multiple(vec![
            GroupProperty::MetadataField("author".to_string()),
            GroupProperty::HitCount,
        ]);
        let groups = Groups::from_docs(&docs, &infos, &property, None);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups.groups[0].identity,
            PropertyValue::Multiple(vec![
                PropertyValue::Str("austen".to_string()),
                PropertyValue::Int(2),
            ])
        );
        assert_eq!(groups.groups[0].identity_serialized, "str:austen,int:2");
    }

    #[test]
    fn test_missing_metadata_groups_under_empty_value() {
        let hits = vec![hit(0, 0)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> =
            [(DocId(0), doc_info(0, &[]))].into_iter().collect();

        let groups = Groups::from_docs(
            &docs,
            &infos,
            &GroupProperty::MetadataField("author".to_string()),
            None,
        );
        assert_eq!(groups.groups[0].identity, PropertyValue::Str(String::new()));
    }

    #[test]
    fn test_group_json_shape() {
        // The response layer streams groups as-is; the in-memory identity
        // stays internal, only its wire and display forms go out.
        let hits = vec![hit(0, 0)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> =
            [(DocId(0), doc_info(0, &[("author", "austen")]))]
                .into_iter()
                .collect();
        let groups = Groups::from_docs(
            &docs,
            &infos,
            &GroupProperty::MetadataField("author".to_string()),
            None,
        );

        let json = serde_json::to_value(&groups.groups[0]).unwrap();
        assert_eq!(json["identity_serialized"], "str:austen");
        assert_eq!(json["identity_display"], "austen");
        assert_eq!(json["size"], 1);
        assert!(json.get("identity").is_none());
    }

    #[test]
    fn test_window_stats_json_round_trip() {
        let stats = window_stats(40, 20, 45);
        let json = serde_json::to_string(&stats).unwrap();
        let back: crate::results::WindowStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_sort_by_identity() {
        let hits = vec![hit(0, 0), hit(1, 0), hit(2, 0)];
        let docs = DocResults::from_hits(&hits);
        let infos: HashMap<DocId, DocumentInfo> = [
            (DocId(0), doc_info(0, &[("author", "woolf")])),
            (DocId(1), doc_info(1, &[("author", "austen")])),
            (DocId(2), doc_info(2, &[("author", "Dickens")])),
        ]
        .into_iter()
        .collect();

        let groups = Groups::from_docs(
            &docs,
            &infos,
            &GroupProperty::MetadataField("author".to_string()),
            None,
        );
        let sorted = groups.sorted_by_identity();
        let names: Vec<&str> = sorted
            .groups
            .iter()
            .map(|g| g.identity_display.as_str())
            .collect();
        assert_eq!(names, vec!["austen", "Dickens", "woolf"]);
    }
}
