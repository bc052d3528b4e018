//! Bounded pages over ordered result collections.
//!
//! Paging parameters are corrected, never rejected: a negative start clamps
//! to zero, a negative requested count falls back to the configured default
//! page size, and a count above the configured maximum clamps to that
//! maximum.

use serde::{Deserialize, Serialize};

use crate::engine::config::SearchConfig;

/// Shape of one result window, as reported alongside its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Index of the first result in the window.
    pub first: usize,
    /// Number of results the (corrected) request asked for.
    pub requested: usize,
    /// Number of results actually in the window.
    pub actual: usize,
    /// Whether results exist beyond this window.
    pub has_next: bool,
}

/// Applies the clamping rules to raw request parameters.
pub fn clamp_page(first: i64, number: i64, config: &SearchConfig) -> (usize, usize) {
    let first = first.max(0) as usize;
    let number = if number < 0 {
        config.default_page_size
    } else {
        (number as usize).min(config.max_page_size)
    };
    (first, number)
}

/// Window stats for a corrected `(first, number)` over `total` results.
pub fn window_stats(first: usize, number: usize, total: usize) -> WindowStats {
    WindowStats {
        first,
        requested: number,
        actual: total.saturating_sub(first).min(number),
        has_next: first + number < total,
    }
}

/// Slices the window `[first, first + actual)` out of an ordered collection,
/// together with its stats.
pub fn window<T: Clone>(
    items: &[T],
    first: i64,
    number: i64,
    config: &SearchConfig,
) -> (Vec<T>, WindowStats) {
    let (first, number) = clamp_page(first, number, config);
    let stats = window_stats(first, number, items.len());
    let page = items
        .iter()
        .skip(first)
        .take(stats.actual)
        .cloned()
        .collect();
    (page, stats)
}
