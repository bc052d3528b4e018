//! Engine configuration knobs.
//!
//! Loading these from a file or the environment belongs to the application
//! boot layer, not this core; here they are plain values with sensible
//! defaults.

use std::time::Duration;

/// Limits and policies for plan execution and the job cache.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hard upper bound on a result page; larger requests clamp to this.
    pub max_page_size: usize,
    /// Page size substituted when a request carries a negative count.
    pub default_page_size: usize,
    /// How long a finished job with no remaining references stays cached
    /// for reuse. Zero evicts immediately.
    pub finished_job_linger: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_page_size: 20,
            finished_job_linger: Duration::ZERO,
        }
    }
}
