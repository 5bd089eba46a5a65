//! Score entries and ranking

use serde::{Deserialize, Serialize};

/// Name used when a submission comes without one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// One row of the high-score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
}

impl ScoreEntry {
    /// Build an entry; a blank name becomes [`DEFAULT_PLAYER_NAME`]
    pub fn new(player_name: &str, score: u32) -> Self {
        let trimmed = player_name.trim();
        let player_name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        Self {
            player_name: player_name.to_string(),
            score,
        }
    }
}

/// Sort descending by score and keep the best `capacity`
///
/// The sort is stable: among equal scores the earlier entry stays ahead.
pub fn rank(mut entries: Vec<ScoreEntry>, capacity: usize) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(capacity);
    entries
}

/// Whether `score` earns a place in an already ranked list
pub fn qualifies(ranked: &[ScoreEntry], capacity: usize, score: u32) -> bool {
    if score == 0 {
        return false;
    }
    if ranked.len() < capacity {
        return true;
    }
    ranked.last().map_or(true, |worst| score > worst.score)
}
