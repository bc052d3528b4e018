//! Corpus Search Execution Core
//!
//! This library turns declarative token-pattern queries into results while
//! sharing and reusing computation across concurrent requests. It is the
//! execution core of a corpus search engine: the inverted index itself, the
//! HTTP layer and configuration bootstrap live outside and talk to this
//! crate through the boundaries in `index`.
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`pattern`**: the immutable query-pattern algebra. Pattern trees are
//!   rewritten into a cheaper computational shape before execution and
//!   translated into target representations (executable index queries,
//!   canonical debug strings) through a per-variant translator contract.
//! - **`plan`**: composable, lazily-evaluated search plans. Each plan node
//!   decorates a source plan with one operation (window, group, sort,
//!   count); structural identity over the whole plan tree is the cache key.
//! - **`engine`**: the job execution engine. A deduplicating cache of
//!   reference-counted jobs guarantees at most one execution per distinct
//!   plan, with blocking and polling ("busy") consumption modes.
//! - **`results`**: the result key model plus windowing and grouping of
//!   ordered result collections.
//! - **`index`**: interfaces to external collaborators: the postings
//!   engine, the document-format registry, and an in-memory reference
//!   index.

pub mod engine;
pub mod error;
pub mod index;
pub mod pattern;
pub mod plan;
pub mod results;

pub use engine::{Delivery, GroupedWindow, JobHandle, JobPoll, SearchCache, SearchConfig};
pub use error::SearchError;
pub use index::{DocId, Hit, IndexEngine, MemoryIndex};
pub use pattern::{Pattern, QueryContext};
pub use plan::{SearchOutcome, SearchPlan};
pub use results::{Group, GroupProperty, Groups, PropertyValue, WindowStats};
