//! Composable Search Plans
//!
//! A search plan is a lazily-evaluated description of a result-producing
//! operation: a root plan runs a pattern against the index, and decorator
//! plans add one operation each (collapse to documents, window, group, sort,
//! count). Building a plan performs no work.
//!
//! Plans are plain values with structural equality and hashing over
//! (operator, source plan, parameters). That structural identity is the job
//! cache's key, so two independently built but equivalent plans share one
//! job and one execution.
//!
//! ## Submodules
//! - **`plan`**: the variant set, builder methods and canonical rendering.
//! - **`execute`**: recursive evaluation of a plan against the index
//!   boundary, producing a `SearchOutcome`.

pub mod execute;
pub mod plan;

pub use execute::{execute, SearchOutcome};
pub use plan::SearchPlan;
