//! Job Execution Engine
//!
//! Runs search plans on the shared worker pool and shares their outcomes
//! across concurrent requests. The cache owns every job; consumers only ever
//! hold counted handles.
//!
//! ## Responsibilities
//! - **Deduplication**: one job (and at most one execution) per distinct
//!   plan, keyed by the plan's structural identity.
//! - **Lifecycle**: the `Created -> Running -> Finished | Failed` state
//!   machine, with failures stored on the job and replayed to every holder.
//! - **Reference counting**: handles release on scope exit, on every path;
//!   jobs become evictable when the count reaches zero.
//! - **Blocking and busy modes**: a blocking acquire suspends until the job
//!   is terminal; a non-blocking one returns immediately and consumers poll.
//!
//! ## Submodules
//! - **`job`**: one plan's computation and its cached outcome.
//! - **`cache`**: the plan-keyed job cache and the counted `JobHandle`.
//! - **`config`**: paging limits and eviction policy knobs.

pub mod cache;
pub mod config;
pub mod job;

pub use cache::{Delivery, GroupedWindow, JobHandle, SearchCache};
pub use config::SearchConfig;
pub use job::{Job, JobPhase, JobPoll};
