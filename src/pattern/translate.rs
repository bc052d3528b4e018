//! Translation of pattern trees into target representations.
//!
//! A `PatternTranslator` has one method per pattern variant, so new targets
//! (executable index queries, debug strings, ...) can be added without
//! touching the node definitions. `Pattern::translate` walks the tree,
//! translates children first and hands the results to the matching method.

use std::fmt;

use crate::error::SearchError;
use crate::index::query::IndexQuery;

use super::node::{ExpandDirection, FilterOperation, Pattern};

/// Where a pattern is evaluated: the content field and the annotation
/// (token attribute) the leaf values refer to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryContext {
    pub field: String,
    pub annotation: String,
}

impl QueryContext {
    pub fn new(field: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            annotation: annotation.into(),
        }
    }

    /// Plain context for a given field, useful in tests and diagnostics.
    pub fn simple(field: impl Into<String>) -> Self {
        Self::new(field, "word")
    }
}

/// Target-specific translation of each pattern variant.
///
/// Child clauses arrive already translated. Translators reject constructs
/// their target cannot express with [`SearchError::InvalidQuery`].
pub trait PatternTranslator {
    type Output;

    fn term(&self, context: &QueryContext, value: &str) -> Result<Self::Output, SearchError>;

    fn sequence(
        &self,
        context: &QueryContext,
        clauses: Vec<Self::Output>,
    ) -> Result<Self::Output, SearchError>;

    fn repetition(
        &self,
        context: &QueryContext,
        clause: Self::Output,
        min: u32,
        max: Option<u32>,
    ) -> Result<Self::Output, SearchError>;

    fn expansion(
        &self,
        context: &QueryContext,
        clause: Self::Output,
        direction: ExpandDirection,
        min_expand: u32,
        max_expand: Option<u32>,
    ) -> Result<Self::Output, SearchError>;

    #[allow(clippy::too_many_arguments)]
    fn position_filter(
        &self,
        context: &QueryContext,
        producer: Self::Output,
        filter: Self::Output,
        operation: FilterOperation,
        invert: bool,
        left_adjust: i32,
        right_adjust: i32,
    ) -> Result<Self::Output, SearchError>;

    fn not(&self, context: &QueryContext, clause: Self::Output)
        -> Result<Self::Output, SearchError>;

    fn and(
        &self,
        context: &QueryContext,
        clauses: Vec<Self::Output>,
    ) -> Result<Self::Output, SearchError>;

    fn or(
        &self,
        context: &QueryContext,
        clauses: Vec<Self::Output>,
    ) -> Result<Self::Output, SearchError>;
}

impl Pattern {
    /// Translate this pattern into the translator's target representation.
    pub fn translate<T: PatternTranslator>(
        &self,
        translator: &T,
        context: &QueryContext,
    ) -> Result<T::Output, SearchError> {
        match self {
            Pattern::Term(value) => translator.term(context, value),
            Pattern::Sequence(clauses) => {
                let translated = translate_all(clauses, translator, context)?;
                translator.sequence(context, translated)
            }
            Pattern::Repetition { clause, min, max } => {
                let inner = clause.translate(translator, context)?;
                translator.repetition(context, inner, *min, *max)
            }
            Pattern::Expansion {
                clause,
                direction,
                min_expand,
                max_expand,
            } => {
                let inner = clause.translate(translator, context)?;
                translator.expansion(context, inner, *direction, *min_expand, *max_expand)
            }
            Pattern::PositionFilter {
                producer,
                filter,
                operation,
                invert,
                left_adjust,
                right_adjust,
            } => {
                let producer = producer.translate(translator, context)?;
                let filter = filter.translate(translator, context)?;
                translator.position_filter(
                    context,
                    producer,
                    filter,
                    *operation,
                    *invert,
                    *left_adjust,
                    *right_adjust,
                )
            }
            Pattern::Not(clause) => {
                let inner = clause.translate(translator, context)?;
                translator.not(context, inner)
            }
            Pattern::And(clauses) => {
                let translated = translate_all(clauses, translator, context)?;
                translator.and(context, translated)
            }
            Pattern::Or(clauses) => {
                let translated = translate_all(clauses, translator, context)?;
                translator.or(context, translated)
            }
        }
    }
}

fn translate_all<T: PatternTranslator>(
    clauses: &[Pattern],
    translator: &T,
    context: &QueryContext,
) -> Result<Vec<T::Output>, SearchError> {
    clauses
        .iter()
        .map(|c| c.translate(translator, context))
        .collect()
}

/// Renders the canonical descriptive form of a pattern, e.g.
/// `seq(term(contents.word:the), rep(term(contents.word:very), 1, inf))`.
/// Backs `Display` for `Pattern`; used in logs and cache diagnostics, never
/// re-parsed.
pub struct StringTranslator;

impl StringTranslator {
    fn bound(max: Option<u32>) -> String {
        match max {
            Some(n) => n.to_string(),
            None => "inf".to_string(),
        }
    }
}

impl PatternTranslator for StringTranslator {
    type Output = String;

    fn term(&self, context: &QueryContext, value: &str) -> Result<String, SearchError> {
        Ok(format!(
            "term({}.{}:{})",
            context.field, context.annotation, value
        ))
    }

    fn sequence(
        &self,
        _context: &QueryContext,
        clauses: Vec<String>,
    ) -> Result<String, SearchError> {
        Ok(format!("seq({})", clauses.join(", ")))
    }

    fn repetition(
        &self,
        _context: &QueryContext,
        clause: String,
        min: u32,
        max: Option<u32>,
    ) -> Result<String, SearchError> {
        Ok(format!("rep({}, {}, {})", clause, min, Self::bound(max)))
    }

    fn expansion(
        &self,
        _context: &QueryContext,
        clause: String,
        direction: ExpandDirection,
        min_expand: u32,
        max_expand: Option<u32>,
    ) -> Result<String, SearchError> {
        let dir = match direction {
            ExpandDirection::Left => "left",
            ExpandDirection::Right => "right",
        };
        Ok(format!(
            "expand({}, {}, {}, {})",
            clause,
            dir,
            min_expand,
            Self::bound(max_expand)
        ))
    }

    fn position_filter(
        &self,
        _context: &QueryContext,
        producer: String,
        filter: String,
        operation: FilterOperation,
        invert: bool,
        left_adjust: i32,
        right_adjust: i32,
    ) -> Result<String, SearchError> {
        let op = match (operation, invert) {
            (FilterOperation::Containing, false) => "containing",
            (FilterOperation::Containing, true) => "notcontaining",
            (FilterOperation::Within, false) => "within",
            (FilterOperation::Within, true) => "notwithin",
        };
        Ok(format!(
            "posfilter({}, {}, {}, {}, {})",
            producer, filter, op, left_adjust, right_adjust
        ))
    }

    fn not(&self, _context: &QueryContext, clause: String) -> Result<String, SearchError> {
        Ok(format!("not({})", clause))
    }

    fn and(&self, _context: &QueryContext, clauses: Vec<String>) -> Result<String, SearchError> {
        Ok(format!("and({})", clauses.join(", ")))
    }

    fn or(&self, _context: &QueryContext, clauses: Vec<String>) -> Result<String, SearchError> {
        Ok(format!("or({})", clauses.join(", ")))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .translate(&StringTranslator, &QueryContext::simple("contents"))
            .unwrap_or_else(|_| "<untranslatable>".to_string());
        f.write_str(&rendered)
    }
}

/// Translates a pattern into the executable query handed to the index
/// engine. Constructs the postings layer cannot evaluate are rejected here,
/// before any job is created.
pub struct IndexQueryTranslator;

impl PatternTranslator for IndexQueryTranslator {
    type Output = IndexQuery;

    fn term(&self, context: &QueryContext, value: &str) -> Result<IndexQuery, SearchError> {
        Ok(IndexQuery::Term {
            annotation: context.annotation.clone(),
            value: value.to_string(),
        })
    }

    fn sequence(
        &self,
        _context: &QueryContext,
        clauses: Vec<IndexQuery>,
    ) -> Result<IndexQuery, SearchError> {
        if clauses.is_empty() {
            return Err(SearchError::InvalidQuery(
                "empty sequence cannot be executed".to_string(),
            ));
        }
        Ok(IndexQuery::Sequence(clauses))
    }

    fn repetition(
        &self,
        _context: &QueryContext,
        clause: IndexQuery,
        min: u32,
        max: Option<u32>,
    ) -> Result<IndexQuery, SearchError> {
        if let Some(max) = max {
            if max < min {
                return Err(SearchError::InvalidQuery(format!(
                    "repetition range {}..{} is empty",
                    min, max
                )));
            }
        }
        Ok(IndexQuery::Repeat {
            clause: Box::new(clause),
            min,
            max,
        })
    }

    fn expansion(
        &self,
        _context: &QueryContext,
        clause: IndexQuery,
        direction: ExpandDirection,
        min_expand: u32,
        max_expand: Option<u32>,
    ) -> Result<IndexQuery, SearchError> {
        Ok(IndexQuery::Expand {
            clause: Box::new(clause),
            left: direction == ExpandDirection::Left,
            min_expand,
            max_expand,
        })
    }

    fn position_filter(
        &self,
        _context: &QueryContext,
        producer: IndexQuery,
        filter: IndexQuery,
        operation: FilterOperation,
        invert: bool,
        left_adjust: i32,
        right_adjust: i32,
    ) -> Result<IndexQuery, SearchError> {
        Ok(IndexQuery::PositionFilter {
            producer: Box::new(producer),
            filter: Box::new(filter),
            containing: operation == FilterOperation::Containing,
            invert,
            left_adjust,
            right_adjust,
        })
    }

    fn not(&self, _context: &QueryContext, clause: IndexQuery) -> Result<IndexQuery, SearchError> {
        Ok(IndexQuery::NotToken(Box::new(clause)))
    }

    fn and(
        &self,
        _context: &QueryContext,
        clauses: Vec<IndexQuery>,
    ) -> Result<IndexQuery, SearchError> {
        if clauses.is_empty() {
            return Err(SearchError::InvalidQuery(
                "AND of zero clauses cannot be executed".to_string(),
            ));
        }
        Ok(IndexQuery::And(clauses))
    }

    fn or(
        &self,
        _context: &QueryContext,
        clauses: Vec<IndexQuery>,
    ) -> Result<IndexQuery, SearchError> {
        if clauses.is_empty() {
            return Err(SearchError::InvalidQuery(
                "OR of zero clauses cannot be executed".to_string(),
            ));
        }
        Ok(IndexQuery::Or(clauses))
    }
}
