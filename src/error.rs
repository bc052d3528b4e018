//! Error taxonomy for the search core.
//!
//! Only terminal conditions are modelled as errors. Failing to optimize a
//! pattern is not an error (the rewrite simply returns the node unchanged),
//! and out-of-range paging parameters are clamped rather than rejected.
//! Job computation failures are captured on the job itself and replayed to
//! every holder on retrieval, so they are wrapped in `Arc` by the engine.

use thiserror::Error;

/// Terminal error conditions surfaced by the search core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The pattern (or a request parameter such as a serialized group key)
    /// cannot be expressed by the chosen translator or parsed at all.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A running job was cooperatively interrupted.
    #[error("search was cancelled")]
    Cancelled,

    /// The computation behind a job failed; the message carries the
    /// underlying index-engine error.
    #[error("search job failed: {0}")]
    JobFailed(String),

    /// Configuration problem outside the request path.
    #[error("configuration error: {0}")]
    Config(String),
}
