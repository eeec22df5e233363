//! Char-based text windows around a match.
//!
//! Match offsets are byte offsets from the regex engine; window radii are in
//! chars so multi-byte emoji in chat text do not shrink the window.

use crate::models::errors::{AppError, AppResult};

/// Up to `radius` chars on each side of `start..end`, including the match
pub fn surrounding(text: &str, start: usize, end: usize, radius: usize) -> AppResult<&str> {
    let head = text
        .get(..start)
        .ok_or_else(|| AppError::window_out_of_bounds(start, end, text.len()))?;
    let tail = text
        .get(end..)
        .ok_or_else(|| AppError::window_out_of_bounds(start, end, text.len()))?;

    let lo = if radius == 0 {
        start
    } else {
        head.char_indices()
            .rev()
            .take(radius)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start)
    };
    let hi = tail
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text.get(lo..hi)
        .ok_or_else(|| AppError::window_out_of_bounds(lo, hi, text.len()))
}

/// Up to `count` chars immediately before byte offset `start`
pub fn preceding(text: &str, start: usize, count: usize) -> AppResult<&str> {
    let head = text
        .get(..start)
        .ok_or_else(|| AppError::window_out_of_bounds(0, start, text.len()))?;
    if count == 0 {
        return Ok(&head[head.len()..]);
    }
    let lo = head
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    Ok(&head[lo..])
}
