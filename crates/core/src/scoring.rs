//! Scoring module - live-game points and gravity timing
//!
//! Points are the classic line table multiplied by the level:
//!
//! | Lines | Points |
//! |-------|--------|
//! | 1 | 100 x level |
//! | 2 | 300 x level |
//! | 3 | 600 x level |
//! | 4 | 1000 x level |
//!
//! Anything else (no clear, or more than four rows on an unusually short
//! board) scores nothing.

use crate::types::{BASE_DROP_MS, DROP_STEP_MS, LINE_SCORES, MAX_LEVEL, MIN_LEVEL};

/// Points for clearing `lines` rows at once on `level`
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    match LINE_SCORES.get(lines) {
        Some(&base) => base.saturating_mul(level),
        None => 0,
    }
}

/// Gravity interval for a level, clamped to `[MIN_LEVEL, MAX_LEVEL]`
pub fn drop_interval_ms(level: u32) -> u32 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    BASE_DROP_MS - DROP_STEP_MS * (level - MIN_LEVEL)
}
