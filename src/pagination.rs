//! Windowed pagination for list responses.

use serde::Serialize;

/// One bounded window of an ordered result set.
///
/// `total` is the size of the full result before windowing so callers can
/// tell whether more segments remain; `segment_size` is the number of items
/// actually returned.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub start: usize,
    pub segment_size: usize,
    pub total: usize,
}

/// Slice `items` down to the requested `[start, start + size)` window.
///
/// `start` defaults to 0 when absent or negative and is clamped to the
/// sequence length; `size` defaults to "the rest of the sequence" when
/// absent, zero or negative. A window past the end yields an empty page, a
/// window over the end yields a short one. Never an error.
pub fn paginate<T>(items: Vec<T>, start: Option<i64>, size: Option<i64>) -> Page<T> {
    let total = items.len();

    let start = match start {
        Some(s) if s > 0 => (s as usize).min(total),
        _ => 0,
    };
    let remaining = total - start;
    let size = match size {
        Some(s) if s > 0 => (s as usize).min(remaining),
        _ => remaining,
    };

    let results: Vec<T> = items.into_iter().skip(start).take(size).collect();
    let segment_size = results.len();

    Page {
        results,
        start,
        segment_size,
        total,
    }
}
