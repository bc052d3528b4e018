//! Plan evaluation.
//!
//! Executes a plan tree against the index boundary: the source plan is
//! evaluated first, then the node's own operation is applied to its outcome.
//! This runs inside a job on the shared worker pool; nothing here is called
//! at plan construction time.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::engine::config::SearchConfig;
use crate::error::SearchError;
use crate::index::engine::{DocId, DocumentInfo, IndexEngine};
use crate::pattern::{IndexQueryTranslator, QueryContext};
use crate::results::window::window;
use crate::results::{DocResults, Groups, HitResults, WindowStats};

use super::plan::SearchPlan;

/// What a plan evaluates to. Stored on the finished job behind an `Arc` and
/// shared by every holder.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Hits(HitResults),
    Docs(DocResults),
    /// A page of per-document results together with its window stats.
    DocWindow {
        docs: DocResults,
        stats: WindowStats,
    },
    Groups(Groups),
    Count(u64),
}

impl SearchOutcome {
    /// Size of the underlying collection, whatever its shape.
    pub fn size(&self) -> usize {
        match self {
            SearchOutcome::Hits(hits) => hits.len(),
            SearchOutcome::Docs(docs) => docs.len(),
            SearchOutcome::DocWindow { docs, .. } => docs.len(),
            SearchOutcome::Groups(groups) => groups.len(),
            SearchOutcome::Count(n) => *n as usize,
        }
    }
}

type ExecuteFuture<'a> = Pin<Box<dyn Future<Output = Result<SearchOutcome, SearchError>> + Send + 'a>>;

/// Evaluates a plan bottom-up. Boxed future because the recursion depth
/// follows the plan tree.
pub fn execute<'a>(
    plan: &'a SearchPlan,
    index: &'a Arc<dyn IndexEngine>,
    config: &'a SearchConfig,
) -> ExecuteFuture<'a> {
    Box::pin(async move {
        match plan {
            SearchPlan::Hits { context, pattern } => {
                execute_hits(context, pattern, index).await
            }

            SearchPlan::Docs { source } => {
                let hits = expect_hits(execute(source, index, config).await?)?;
                Ok(SearchOutcome::Docs(DocResults::from_hits(&hits.hits)))
            }

            SearchPlan::Window {
                source,
                first,
                number,
            } => {
                let docs = expect_docs(execute(source, index, config).await?)?;
                let (page, stats) = window(&docs.docs, *first, *number, config);
                Ok(SearchOutcome::DocWindow {
                    docs: DocResults { docs: page },
                    stats,
                })
            }

            SearchPlan::Group {
                source,
                property,
                max_members,
            } => {
                let docs = expect_docs(execute(source, index, config).await?)?;
                let infos = fetch_documents(&docs, index).await;
                Ok(SearchOutcome::Groups(Groups::from_docs(
                    &docs,
                    &infos,
                    property,
                    *max_members,
                )))
            }

            SearchPlan::Sort { source } => {
                let outcome = execute(source, index, config).await?;
                match outcome {
                    SearchOutcome::Groups(groups) => {
                        Ok(SearchOutcome::Groups(groups.sorted_by_identity()))
                    }
                    other => Err(SearchError::InvalidQuery(format!(
                        "sort expects grouped results, got {}",
                        outcome_kind(&other)
                    ))),
                }
            }

            SearchPlan::Count { source } => {
                let outcome = execute(source, index, config).await?;
                Ok(SearchOutcome::Count(outcome.size() as u64))
            }
        }
    })
}

async fn execute_hits(
    context: &QueryContext,
    pattern: &crate::pattern::Pattern,
    index: &Arc<dyn IndexEngine>,
) -> Result<SearchOutcome, SearchError> {
    let rewritten = pattern.rewrite();
    if rewritten.is_negative_only() {
        return Err(SearchError::InvalidQuery(
            "query must contain at least one positive clause".to_string(),
        ));
    }
    tracing::debug!("Executing pattern: {}", rewritten);
    let query = rewritten.translate(&IndexQueryTranslator, context)?;
    let hits = index
        .find_hits(&query, &context.field)
        .await
        .map_err(|e| SearchError::JobFailed(e.to_string()))?;
    Ok(SearchOutcome::Hits(HitResults { hits }))
}

/// Fetches document info for every distinct doc in the results. Missing
/// documents simply yield empty metadata downstream.
async fn fetch_documents(
    docs: &DocResults,
    index: &Arc<dyn IndexEngine>,
) -> HashMap<DocId, DocumentInfo> {
    let mut infos = HashMap::with_capacity(docs.len());
    for result in &docs.docs {
        if infos.contains_key(&result.doc) {
            continue;
        }
        if let Some(info) = index.document(result.doc).await {
            infos.insert(result.doc, info);
        }
    }
    infos
}

/// Doc-shaped outcomes; hits collapse on the fly so `hits.group(...)` and
/// `hits.window(...)` work without an explicit docs step.
fn expect_docs(outcome: SearchOutcome) -> Result<DocResults, SearchError> {
    match outcome {
        SearchOutcome::Docs(docs) => Ok(docs),
        SearchOutcome::DocWindow { docs, .. } => Ok(docs),
        SearchOutcome::Hits(hits) => Ok(DocResults::from_hits(&hits.hits)),
        other => Err(SearchError::InvalidQuery(format!(
            "operation expects per-document results, got {}",
            outcome_kind(&other)
        ))),
    }
}

fn expect_hits(outcome: SearchOutcome) -> Result<HitResults, SearchError> {
    match outcome {
        SearchOutcome::Hits(hits) => Ok(hits),
        other => Err(SearchError::InvalidQuery(format!(
            "operation expects hits, got {}",
            outcome_kind(&other)
        ))),
    }
}

fn outcome_kind(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Hits(_) => "hits",
        SearchOutcome::Docs(_) => "docs",
        SearchOutcome::DocWindow { .. } => "window",
        SearchOutcome::Groups(_) => "groups",
        SearchOutcome::Count(_) => "count",
    }
}
