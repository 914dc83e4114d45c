//! High score leaderboard system
//!
//! Persisted locally. Keeps the 10 best runs, at most one per road seed.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Ticks survived
    pub score: u64,
    /// Spawner seed of the run
    pub seed: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "road_dodge_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished run; returns its rank (1-indexed) if it made the board
    ///
    /// A seed replays the same road, so each seed holds at most one entry:
    /// replaying a seed only counts when it beats that seed's best.
    pub fn record(&mut self, score: u64, seed: u64, timestamp: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        if let Some(i) = self.entries.iter().position(|e| e.seed == seed) {
            if self.entries[i].score >= score {
                return None;
            }
            self.entries.remove(i);
        }

        // Descending by score; an equal score ranks behind the earlier run
        let index = self.entries.partition_point(|e| e.score >= score);
        if index >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(
            index,
            HighScoreEntry {
                score,
                seed,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    /// Best score on the board
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh on missing or corrupt data
    pub fn load() -> Self {
        match persistence::load_json::<HighScores>(Self::STORAGE_KEY) {
            Ok(Some(scores)) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        match persistence::save_json(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Failed to save high scores: {}", e),
        }
    }
}

/// Current time as Unix milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(board: &HighScores) -> Vec<(u64, u64)> {
        board.entries.iter().map(|e| (e.score, e.seed)).collect()
    }

    #[test]
    fn test_zero_is_never_recorded() {
        let mut board = HighScores::new();
        assert_eq!(board.record(0, 1, 0.0), None);
        assert!(board.entries.is_empty());
        assert_eq!(board.top_score(), None);
    }

    #[test]
    fn test_ranks_descending_with_ties_behind() {
        let mut board = HighScores::new();
        assert_eq!(board.record(40, 1, 0.0), Some(1));
        assert_eq!(board.record(90, 2, 0.0), Some(1));
        assert_eq!(board.record(60, 3, 0.0), Some(2));
        assert_eq!(board.record(60, 4, 0.0), Some(3));

        assert_eq!(scores(&board), vec![(90, 2), (60, 3), (60, 4), (40, 1)]);
        assert_eq!(board.top_score(), Some(90));
    }

    #[test]
    fn test_one_entry_per_seed() {
        let mut board = HighScores::new();
        board.record(50, 7, 0.0);
        board.record(80, 8, 0.0);

        // Replaying seed 7 without beating it changes nothing
        assert_eq!(board.record(50, 7, 1.0), None);
        assert_eq!(board.record(30, 7, 1.0), None);
        assert_eq!(board.entries.len(), 2);

        // Beating it moves the single entry up
        assert_eq!(board.record(120, 7, 2.0), Some(1));
        assert_eq!(scores(&board), vec![(120, 7), (80, 8)]);
        assert_eq!(board.entries[0].timestamp, 2.0);
    }

    #[test]
    fn test_full_board_rejects_and_trims() {
        let mut board = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            board.record(s * 10, s, 0.0);
        }
        // Ties with the last entry rank behind it, off the board
        assert_eq!(board.record(10, 99, 0.0), None);
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);

        assert_eq!(board.record(1000, 100, 0.0), Some(1));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));
    }
}
