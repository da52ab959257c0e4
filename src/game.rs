#![warn(clippy::all, clippy::pedantic)]

use std::time::Duration;

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Line clear scoring (level 1 values, multiplied by the current level)
pub const POINTS_SINGLE: u32 = 40;
pub const POINTS_DOUBLE: u32 = 100;
pub const POINTS_TRIPLE: u32 = 300;
pub const POINTS_TETRIS: u32 = 1200;

// Level progression
pub const LINES_PER_LEVEL: u32 = 10;
pub const STARTING_LEVEL: u32 = 1;

// Gravity timing: the interval shrinks by DROP_STEP_MS per level above 1,
// floored at MIN_DROP_MS
pub const BASE_DROP_MS: u64 = 1000;
pub const DROP_STEP_MS: u64 = 50;
pub const MIN_DROP_MS: u64 = 100;

/// Base points for clearing `rows` lines simultaneously, before the level
/// multiplier is applied.
#[must_use]
pub fn line_clear_points(rows: usize) -> u32 {
    match rows {
        1 => POINTS_SINGLE,
        2 => POINTS_DOUBLE,
        3 => POINTS_TRIPLE,
        4 => POINTS_TETRIS,
        _ => 0,
    }
}

/// Gravity interval for a level: `max(100ms, 1000ms - (level - 1) * 50ms)`.
#[must_use]
pub fn drop_interval(level: u32) -> Duration {
    let reduction = u64::from(level.saturating_sub(1)) * DROP_STEP_MS;
    Duration::from_millis(BASE_DROP_MS.saturating_sub(reduction).max(MIN_DROP_MS))
}
