//! Hit/doc result collections and grouping.
//!
//! Raw hits collapse into per-document results, and those partition into
//! groups by a group identity derived from document metadata and hit counts.
//! Grouping preserves first-seen order; an explicit sort by identity is a
//! separate operation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::engine::{DocId, DocumentInfo, Hit};

use super::property::PropertyValue;

/// Ordered hits as returned by the index engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResults {
    pub hits: Vec<Hit>,
}

impl HitResults {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// One document's share of a hit set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    pub doc: DocId,
    pub hit_count: usize,
}

/// Per-document results, in first-hit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResults {
    pub docs: Vec<DocResult>,
}

impl DocResults {
    /// Collapses an ordered hit list into per-document results, preserving
    /// the order in which documents first appear.
    pub fn from_hits(hits: &[Hit]) -> Self {
        let mut order: Vec<DocId> = Vec::new();
        let mut counts: HashMap<DocId, usize> = HashMap::new();
        for hit in hits {
            if !counts.contains_key(&hit.doc) {
                order.push(hit.doc);
            }
            *counts.entry(hit.doc).or_insert(0) += 1;
        }
        let docs = order
            .into_iter()
            .map(|doc| DocResult {
                doc,
                hit_count: counts[&doc],
            })
            .collect();
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// What to group per-document results by.
///
/// Part of a plan's structural identity, so it derives structural equality
/// and hashing like the plan variants themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupProperty {
    /// A document metadata field; documents without it group under the
    /// empty value.
    MetadataField(String),
    /// The number of hits in the document.
    HitCount,
    /// Several criteria at once, producing a composite identity.
    Multiple(Vec<GroupProperty>),
}

impl GroupProperty {
    /// Evaluates the identity of one document result.
    pub fn identity(&self, result: &DocResult, info: &DocumentInfo) -> PropertyValue {
        match self {
            GroupProperty::MetadataField(name) => {
                PropertyValue::Str(info.metadata_value(name).to_string())
            }
            GroupProperty::HitCount => PropertyValue::Int(result.hit_count as i64),
            GroupProperty::Multiple(properties) => PropertyValue::Multiple(
                properties
                    .iter()
                    .map(|p| p.identity(result, info))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for GroupProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupProperty::MetadataField(name) => write!(f, "field:{}", name),
            GroupProperty::HitCount => f.write_str("numhits"),
            GroupProperty::Multiple(properties) => {
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", property)?;
                }
                Ok(())
            }
        }
    }
}

/// One group of results: its identity, total size and optionally the member
/// documents (capped at collection time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    #[serde(skip)]
    pub identity: PropertyValue,
    /// Wire form of the identity, stable across serialization contexts.
    pub identity_serialized: String,
    /// Display form of the identity.
    pub identity_display: String,
    pub size: usize,
    pub members: Option<Vec<DocId>>,
}

/// All groups of a result set, in first-seen order until sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Groups {
    pub groups: Vec<Group>,
    /// Size of the grouped collection (sum of group sizes).
    pub total_results: usize,
}

impl Groups {
    /// Partitions per-document results by identity, preserving the order in
    /// which identities first appear. `max_members` bounds how many member
    /// ids each group retains; `None` keeps none (size only).
    pub fn from_docs(
        docs: &DocResults,
        infos: &HashMap<DocId, DocumentInfo>,
        property: &GroupProperty,
        max_members: Option<usize>,
    ) -> Self {
        let mut order: Vec<PropertyValue> = Vec::new();
        let mut grouped: HashMap<PropertyValue, Group> = HashMap::new();

        for result in &docs.docs {
            let info = match infos.get(&result.doc) {
                Some(info) => info.clone(),
                None => DocumentInfo {
                    id: result.doc,
                    metadata: HashMap::new(),
                },
            };
            let identity = property.identity(result, &info);
            let group = grouped.entry(identity.clone()).or_insert_with(|| {
                order.push(identity.clone());
                Group {
                    identity_serialized: identity.serialize(),
                    identity_display: identity.to_string(),
                    identity,
                    size: 0,
                    members: max_members.map(|_| Vec::new()),
                }
            });
            group.size += 1;
            if let (Some(members), Some(cap)) = (group.members.as_mut(), max_members) {
                if members.len() < cap {
                    members.push(result.doc);
                }
            }
        }

        let groups: Vec<Group> = order
            .into_iter()
            .map(|identity| grouped.remove(&identity).unwrap())
            .collect();
        let total_results = groups.iter().map(|g| g.size).sum();
        Self {
            groups,
            total_results,
        }
    }

    /// Orders groups by identity using the `PropertyValue` total order.
    pub fn sorted_by_identity(&self) -> Groups {
        let mut groups = self.groups.clone();
        groups.sort_by(|a, b| a.identity.cmp(&b.identity));
        Groups {
            groups,
            total_results: self.total_results,
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
