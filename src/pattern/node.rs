//! Pattern node definitions and their derived properties.
//!
//! Every variant is immutable once built; operations that "modify" a pattern
//! return a new tree. Equality and hashing are structural, which is what the
//! rewrite pass and the job cache rely on.

/// Direction of an expansion: extra tokens are matched before (left) or
/// after (right) the clause's own match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpandDirection {
    Left,
    Right,
}

/// How a position filter relates producer spans to filter spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperation {
    /// Producer span must contain a filter match.
    Containing,
    /// Producer span must lie within a filter match.
    Within,
}

/// A pattern of tokens in a corpus field.
///
/// `max`-style bounds use `Option<u32>`, where `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Matches a single token with the given value.
    Term(String),
    /// Matches the clauses one after another.
    Sequence(Vec<Pattern>),
    /// Matches the clause repeated `min` through `max` times.
    Repetition {
        clause: Box<Pattern>,
        min: u32,
        max: Option<u32>,
    },
    /// Matches the clause with `min_expand` through `max_expand` arbitrary
    /// extra tokens on one side. Used to turn "token at a known offset"
    /// constraints into contiguous spans.
    Expansion {
        clause: Box<Pattern>,
        direction: ExpandDirection,
        min_expand: u32,
        max_expand: Option<u32>,
    },
    /// Produces the matches of `producer` whose span (adjusted by
    /// `left_adjust`/`right_adjust`) stands in `operation` relation to a
    /// match of `filter`. `invert` negates the relation.
    PositionFilter {
        producer: Box<Pattern>,
        filter: Box<Pattern>,
        operation: FilterOperation,
        invert: bool,
        left_adjust: i32,
        right_adjust: i32,
    },
    /// Matches a single token that does *not* match the clause.
    Not(Box<Pattern>),
    /// Matches where every clause matches (same span).
    And(Vec<Pattern>),
    /// Matches where any clause matches.
    Or(Vec<Pattern>),
}

impl Pattern {
    pub fn term(value: impl Into<String>) -> Pattern {
        Pattern::Term(value.into())
    }

    pub fn sequence(clauses: Vec<Pattern>) -> Pattern {
        Pattern::Sequence(clauses)
    }

    pub fn repetition(clause: Pattern, min: u32, max: Option<u32>) -> Pattern {
        Pattern::Repetition {
            clause: Box::new(clause),
            min,
            max,
        }
    }

    pub fn expansion(
        clause: Pattern,
        direction: ExpandDirection,
        min_expand: u32,
        max_expand: Option<u32>,
    ) -> Pattern {
        Pattern::Expansion {
            clause: Box::new(clause),
            direction,
            min_expand,
            max_expand,
        }
    }

    pub fn position_filter(
        producer: Pattern,
        filter: Pattern,
        operation: FilterOperation,
        invert: bool,
    ) -> Pattern {
        Pattern::PositionFilter {
            producer: Box::new(producer),
            filter: Box::new(filter),
            operation,
            invert,
            left_adjust: 0,
            right_adjust: 0,
        }
    }

    /// Logical negation. `Not` nodes unwrap instead of double-wrapping.
    pub fn inverted(&self) -> Pattern {
        match self {
            Pattern::Not(clause) => (**clause).clone(),
            other => Pattern::Not(Box::new(other.clone())),
        }
    }

    /// Whether this pattern can match zero tokens.
    ///
    /// A translator needs this to generate alternative queries for clauses
    /// like `A B*`, since empty matches are not practical to execute
    /// directly.
    pub fn matches_empty_sequence(&self) -> bool {
        match self {
            Pattern::Term(_) | Pattern::Not(_) => false,
            Pattern::Sequence(clauses) => {
                clauses.iter().all(Pattern::matches_empty_sequence)
            }
            Pattern::Repetition { clause, min, .. } => {
                *min == 0 || clause.matches_empty_sequence()
            }
            Pattern::Expansion {
                clause, min_expand, ..
            } => *min_expand == 0 && clause.matches_empty_sequence(),
            Pattern::PositionFilter { producer, .. } => producer.matches_empty_sequence(),
            Pattern::And(clauses) => clauses.iter().all(Pattern::matches_empty_sequence),
            Pattern::Or(clauses) => clauses.iter().any(Pattern::matches_empty_sequence),
        }
    }

    /// Whether every match of this pattern has the same token length.
    pub fn has_constant_length(&self) -> bool {
        self.max_length() == Some(self.min_length())
    }

    /// Smallest possible match length in tokens.
    pub fn min_length(&self) -> u32 {
        match self {
            Pattern::Term(_) | Pattern::Not(_) => 1,
            Pattern::Sequence(clauses) => clauses.iter().map(Pattern::min_length).sum(),
            Pattern::Repetition { clause, min, .. } => clause.min_length() * min,
            Pattern::Expansion {
                clause, min_expand, ..
            } => clause.min_length() + min_expand,
            Pattern::PositionFilter { producer, .. } => producer.min_length(),
            Pattern::And(clauses) => {
                clauses.iter().map(Pattern::min_length).max().unwrap_or(0)
            }
            Pattern::Or(clauses) => {
                clauses.iter().map(Pattern::min_length).min().unwrap_or(0)
            }
        }
    }

    /// Largest possible match length in tokens, `None` if unbounded.
    pub fn max_length(&self) -> Option<u32> {
        match self {
            Pattern::Term(_) | Pattern::Not(_) => Some(1),
            Pattern::Sequence(clauses) => {
                clauses.iter().try_fold(0u32, |acc, c| c.max_length().map(|m| acc + m))
            }
            Pattern::Repetition { clause, max, .. } => match (clause.max_length(), max) {
                (Some(len), Some(times)) => Some(len * times),
                _ => None,
            },
            Pattern::Expansion {
                clause, max_expand, ..
            } => match (clause.max_length(), max_expand) {
                (Some(len), Some(expand)) => Some(len + expand),
                _ => None,
            },
            Pattern::PositionFilter { producer, .. } => producer.max_length(),
            Pattern::And(clauses) => clauses
                .iter()
                .map(Pattern::max_length)
                .min()
                .unwrap_or(Some(0)),
            Pattern::Or(clauses) => clauses
                .iter()
                .try_fold(0u32, |acc, c| c.max_length().map(|m| acc.max(m))),
        }
    }

    /// Whether this (sub)pattern only excludes things. Purely negative
    /// patterns cannot be executed on their own and steer several rewrite
    /// decisions.
    pub fn is_negative_only(&self) -> bool {
        match self {
            Pattern::Not(_) => true,
            Pattern::Or(clauses) => {
                !clauses.is_empty() && clauses.iter().all(Pattern::is_negative_only)
            }
            _ => false,
        }
    }

    /// Heuristic: is inverting this pattern likely to help the optimizer?
    pub fn okay_to_invert_for_optimization(&self) -> bool {
        self.is_negative_only()
    }

    /// Try to fuse this clause with the part preceding it in a sequence.
    ///
    /// Returns the fused pattern, or `None` when no fusion applies. All
    /// fusions preserve match semantics exactly; declining to fuse is never
    /// an error, only a missed optimization. Tried in priority order:
    ///
    /// 1. `previous` is a repetition of a clause equal to this one: widen
    ///    the repetition by one.
    /// 2. `previous` equals this clause: fold both into a `{2,2}` repetition.
    /// 3. `previous` is a left expansion over a non-degenerate range: pull
    ///    this clause inside the expansion, so fewer candidate matches need
    ///    expanding.
    /// 4. This clause has constant length and `previous` is a position
    ///    filter: splice this clause onto the filter's producer and pull the
    ///    filtered right edge inward, so fewer matches need filtering.
    /// 5. This clause is constant-length and negative-only after a
    ///    constant-length part: turn the pair into a not-containing position
    ///    filter over an expansion of the previous part.
    pub fn combine_with_preceding_part(&self, previous: &Pattern) -> Option<Pattern> {
        match previous {
            Pattern::Repetition { clause, min, max } => {
                if **clause == *self {
                    return Some(Pattern::Repetition {
                        clause: Box::new(self.clone()),
                        min: min + 1,
                        max: max.map(|m| m + 1),
                    });
                }
            }
            _ if previous == self => {
                return Some(Pattern::Repetition {
                    clause: Box::new(self.clone()),
                    min: 2,
                    max: Some(2),
                });
            }
            Pattern::Expansion {
                clause,
                direction: ExpandDirection::Left,
                min_expand,
                max_expand,
            } if *max_expand != Some(*min_expand) => {
                let seq =
                    Pattern::Sequence(vec![(**clause).clone(), self.clone()]).rewrite();
                return Some(Pattern::Expansion {
                    clause: Box::new(seq),
                    direction: ExpandDirection::Left,
                    min_expand: *min_expand,
                    max_expand: *max_expand,
                });
            }
            Pattern::PositionFilter {
                producer,
                filter,
                operation,
                invert,
                left_adjust,
                right_adjust,
            } if self.has_constant_length() => {
                // Get gobbled up by the filter: append ourselves to its
                // producer and move the right matching edge inward.
                let spliced =
                    Pattern::Sequence(vec![(**producer).clone(), self.clone()]).rewrite();
                return Some(Pattern::PositionFilter {
                    producer: Box::new(spliced),
                    filter: filter.clone(),
                    operation: *operation,
                    invert: *invert,
                    left_adjust: *left_adjust,
                    right_adjust: right_adjust - self.min_length() as i32,
                });
            }
            _ if self.has_constant_length()
                && self.is_negative_only()
                && previous.has_constant_length() =>
            {
                // Negative constant-length clause after a constant-length
                // part: rewrite to a not-containing filter incorporating the
                // previous part.
                let prev_len = previous.min_length();
                let my_len = self.min_length();
                let container = Pattern::Expansion {
                    clause: Box::new(previous.clone()),
                    direction: ExpandDirection::Right,
                    min_expand: my_len,
                    max_expand: Some(my_len),
                };
                return Some(Pattern::PositionFilter {
                    producer: Box::new(container.rewrite()),
                    filter: Box::new(self.inverted().rewrite()),
                    operation: FilterOperation::Containing,
                    invert: true,
                    left_adjust: prev_len as i32,
                    right_adjust: 0,
                });
            }
            _ => {}
        }
        None
    }
}
