//! Scoring module - line-clear points, levels and drop speed
//!
//! - Line clears score `LINE_SCORES[lines] * level`, using the level the piece
//!   locked at (before any level-up from the same clear).
//! - Hard drops add 2 points per row travelled.
//! - Level is `lines / 10 + 1`.
//! - The drop interval shrinks by 10% per level above 1, never below 100ms.

use crate::types::{
    DROP_INTERVAL_MIN_MS, DROP_SPEED_FACTOR, HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL,
    LINE_SCORES,
};

/// Points for clearing `lines` rows at `level`.
///
/// More than four rows can only come from a hand-built board; those score as a
/// four-row clear.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    let base = LINE_SCORES[lines.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level)
}

/// Bonus for a hard drop of `distance` rows.
pub fn calculate_drop_score(distance: u32) -> u32 {
    distance.saturating_mul(HARD_DROP_POINTS_PER_CELL)
}

/// Level management
/// Level increases every 10 lines cleared, starting at 1
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Drop interval (ms) for `level`, starting from `initial_ms` at level 1.
///
/// `max(100, initial * 0.9^(level - 1))`, rounded to the nearest millisecond.
pub fn get_drop_interval_ms(initial_ms: u32, level: u32) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let interval = (initial_ms as f64 * DROP_SPEED_FACTOR.powi(exponent)).round();
    (interval as u32).max(DROP_INTERVAL_MIN_MS)
}
