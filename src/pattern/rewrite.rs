//! Structural rewrite pass.
//!
//! `rewrite()` reshapes a pattern tree so it executes more cheaply, without
//! changing which token spans it matches. It is a pure function over the
//! tree and idempotent: rewriting an already-rewritten tree returns an
//! equal tree.

use super::node::Pattern;

impl Pattern {
    /// Returns an optimized version of this pattern.
    ///
    /// Children are rewritten first, then variant-specific reshaping runs on
    /// the rewritten children: sequences flatten and fuse adjacent clauses,
    /// trivial repetitions and double negations collapse, and same-variant
    /// boolean children merge into their parent.
    pub fn rewrite(&self) -> Pattern {
        match self {
            Pattern::Term(_) => self.clone(),

            Pattern::Sequence(clauses) => rewrite_sequence(clauses),

            Pattern::Repetition { clause, min, max } => {
                let clause = clause.rewrite();
                if *min == 1 && *max == Some(1) {
                    return clause;
                }
                Pattern::Repetition {
                    clause: Box::new(clause),
                    min: *min,
                    max: *max,
                }
            }

            Pattern::Expansion {
                clause,
                direction,
                min_expand,
                max_expand,
            } => {
                let clause = clause.rewrite();
                if *min_expand == 0 && *max_expand == Some(0) {
                    return clause;
                }
                Pattern::Expansion {
                    clause: Box::new(clause),
                    direction: *direction,
                    min_expand: *min_expand,
                    max_expand: *max_expand,
                }
            }

            Pattern::PositionFilter {
                producer,
                filter,
                operation,
                invert,
                left_adjust,
                right_adjust,
            } => Pattern::PositionFilter {
                producer: Box::new(producer.rewrite()),
                filter: Box::new(filter.rewrite()),
                operation: *operation,
                invert: *invert,
                left_adjust: *left_adjust,
                right_adjust: *right_adjust,
            },

            Pattern::Not(clause) => match clause.rewrite() {
                // Token-level double negation.
                Pattern::Not(inner) => (*inner).clone(),
                rewritten => Pattern::Not(Box::new(rewritten)),
            },

            Pattern::And(clauses) => {
                let merged = flatten(clauses, |p| match p {
                    Pattern::And(inner) => Ok(inner),
                    other => Err(other),
                });
                if merged.len() == 1 {
                    return merged.into_iter().next().unwrap();
                }
                Pattern::And(merged)
            }

            Pattern::Or(clauses) => {
                let merged = flatten(clauses, |p| match p {
                    Pattern::Or(inner) => Ok(inner),
                    other => Err(other),
                });
                if merged.len() == 1 {
                    return merged.into_iter().next().unwrap();
                }
                Pattern::Or(merged)
            }
        }
    }
}

/// Rewrites children, then merges any that are themselves the same variant
/// (`unwrap` returns `Ok` with the child's clauses when it is).
fn flatten(
    clauses: &[Pattern],
    unwrap: impl Fn(Pattern) -> Result<Vec<Pattern>, Pattern>,
) -> Vec<Pattern> {
    let mut merged = Vec::with_capacity(clauses.len());
    for clause in clauses {
        match unwrap(clause.rewrite()) {
            Ok(inner) => merged.extend(inner),
            Err(other) => merged.push(other),
        }
    }
    merged
}

/// Sequence rewrite: flatten nested sequences, then fold neighbouring
/// clauses left to right through `combine_with_preceding_part`.
fn rewrite_sequence(clauses: &[Pattern]) -> Pattern {
    let mut flat = Vec::with_capacity(clauses.len());
    for clause in clauses {
        match clause.rewrite() {
            Pattern::Sequence(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut fused: Vec<Pattern> = Vec::with_capacity(flat.len());
    for clause in flat {
        let combined = fused
            .last()
            .and_then(|previous| clause.combine_with_preceding_part(previous));
        match combined {
            Some(pattern) => {
                fused.pop();
                fused.push(pattern);
            }
            None => fused.push(clause),
        }
    }

    if fused.len() == 1 {
        return fused.into_iter().next().unwrap();
    }
    Pattern::Sequence(fused)
}
