//! Result Key Model, Windowing & Grouping
//!
//! Everything that happens to raw hits after the index engine returns them
//! and before they leave the core:
//!
//! - **`property`**: group-identity values — atomic or composite, totally
//!   ordered, serializable to a compact wire string and back.
//! - **`window`**: bounded pages over ordered collections, with clamped
//!   parameters and `WindowStats`.
//! - **`group`**: partitioning ordered results by a group identity,
//!   preserving first-seen order unless explicitly sorted.
//!
//! All types here are plain immutable data; they carry serde derives because
//! the response layer streams them out as-is.

pub mod group;
pub mod property;
pub mod window;

pub use group::{DocResult, DocResults, Group, GroupProperty, Groups, HitResults};
pub use property::PropertyValue;
pub use window::WindowStats;

#[cfg(test)]
mod tests;
