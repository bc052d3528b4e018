//! Search plan variants, builders and canonical rendering.

use std::fmt;

use crate::pattern::{Pattern, QueryContext};
use crate::results::GroupProperty;

/// A lazily-evaluated, structurally comparable search description.
///
/// Everything a plan needs is inside the value; evaluation happens only when
/// the job engine executes it. The derived `Eq`/`Hash` cover the full tree
/// and serve as the job cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchPlan {
    /// Root: find all hits for a (rewritten) pattern in a field.
    Hits {
        context: QueryContext,
        pattern: Pattern,
    },
    /// Collapse hits into per-document results.
    Docs { source: Box<SearchPlan> },
    /// A bounded page of the source's ordered results. Parameters are raw
    /// request values; clamping happens at execution time.
    Window {
        source: Box<SearchPlan>,
        first: i64,
        number: i64,
    },
    /// Partition the source's per-document results by a group identity.
    Group {
        source: Box<SearchPlan>,
        property: GroupProperty,
        max_members: Option<usize>,
    },
    /// Order the source's groups by identity.
    Sort { source: Box<SearchPlan> },
    /// Total size of the source's result collection.
    Count { source: Box<SearchPlan> },
}

impl SearchPlan {
    /// Root plan: all hits for `pattern` in the context's field.
    pub fn hits(context: QueryContext, pattern: Pattern) -> SearchPlan {
        SearchPlan::Hits { context, pattern }
    }

    /// Per-document results of this plan's hits.
    pub fn docs(self) -> SearchPlan {
        SearchPlan::Docs {
            source: Box::new(self),
        }
    }

    /// A page of this plan's results.
    pub fn window(self, first: i64, number: i64) -> SearchPlan {
        SearchPlan::Window {
            source: Box::new(self),
            first,
            number,
        }
    }

    /// This plan's per-document results grouped by `property`.
    pub fn group(self, property: GroupProperty, max_members: Option<usize>) -> SearchPlan {
        SearchPlan::Group {
            source: Box::new(self),
            property,
            max_members,
        }
    }

    /// This plan's groups ordered by identity.
    pub fn sort(self) -> SearchPlan {
        SearchPlan::Sort {
            source: Box::new(self),
        }
    }

    /// The total size of this plan's result collection.
    pub fn count(self) -> SearchPlan {
        SearchPlan::Count {
            source: Box::new(self),
        }
    }
}

impl fmt::Display for SearchPlan {
    /// Canonical `"<op>(<source>, <params...>)"` form, used in cache
    /// diagnostics and audit logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPlan::Hits { context, pattern } => {
                write!(f, "hits({}, {})", context.field, pattern)
            }
            SearchPlan::Docs { source } => write!(f, "docs({})", source),
            SearchPlan::Window {
                source,
                first,
                number,
            } => write!(f, "window({}, {}, {})", source, first, number),
            SearchPlan::Group {
                source,
                property,
                max_members,
            } => match max_members {
                Some(cap) => write!(f, "group({}, {}, {})", source, property, cap),
                None => write!(f, "group({}, {})", source, property),
            },
            SearchPlan::Sort { source } => write!(f, "sort({})", source),
            SearchPlan::Count { source } => write!(f, "count({})", source),
        }
    }
}
