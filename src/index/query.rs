//! Executable query representation.
//!
//! This is the wire contract between the pattern algebra and the postings
//! engine: the `IndexQueryTranslator` produces it, an `IndexEngine`
//! implementation consumes it. It deliberately mirrors the pattern variants
//! the postings layer can evaluate directly and nothing more; optimization
//! happens on the pattern tree before translation, never here.

/// A query the index engine can execute against one content field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// All positions where the annotation has this value.
    Term { annotation: String, value: String },
    /// Clauses matched back to back.
    Sequence(Vec<IndexQuery>),
    /// Clause repeated `min` through `max` times (`None` = unbounded).
    Repeat {
        clause: Box<IndexQuery>,
        min: u32,
        max: Option<u32>,
    },
    /// Clause with extra arbitrary tokens on the left or right.
    Expand {
        clause: Box<IndexQuery>,
        left: bool,
        min_expand: u32,
        max_expand: Option<u32>,
    },
    /// Producer spans filtered by their position relative to filter spans.
    PositionFilter {
        producer: Box<IndexQuery>,
        filter: Box<IndexQuery>,
        containing: bool,
        invert: bool,
        left_adjust: i32,
        right_adjust: i32,
    },
    /// A single token not matching the clause.
    NotToken(Box<IndexQuery>),
    /// Spans matching every clause.
    And(Vec<IndexQuery>),
    /// Spans matching any clause.
    Or(Vec<IndexQuery>),
}
