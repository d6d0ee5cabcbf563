//! High score leaderboard
//!
//! Tracks the top 10 scores, highest first. Persisted through
//! [`crate::persistence`].

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SCORES;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Final score of the session
    pub score: i64,
    /// Unix timestamp (seconds) when the session ended
    pub timestamp: u64,
}

/// Score-descending leaderboard; equal scores keep insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: i64) -> bool {
        if self.entries.len() < MAX_SCORES {
            return true;
        }
        // Must beat the lowest entry; ties lose to the older record
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a new score (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: i64, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = ScoreRecord { score, timestamp };

        // Insert after any equal scores
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_SCORES);

        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and size after loading from an untrusted source
    pub fn normalize(&mut self) {
        // Stable sort keeps the stored order for ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_SCORES);
    }
}

/// Current Unix time in seconds (0 if the clock is before the epoch)
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_descending_order() {
        let mut board = Leaderboard::new();
        board.add_score(5, 1);
        board.add_score(9, 2);
        board.add_score(1, 3);
        let scores: Vec<_> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 5, 1]);
        assert_eq!(board.top_score(), Some(9));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score(4, 100), Some(1));
        assert_eq!(board.add_score(4, 200), Some(2));
        assert_eq!(board.entries[0].timestamp, 100);
        assert_eq!(board.entries[1].timestamp, 200);
    }

    #[test]
    fn test_zero_scores_are_recorded() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score(0, 1), Some(1));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_full_board() {
        let mut board = Leaderboard::new();
        for i in 0..MAX_SCORES as i64 {
            board.add_score(10 + i, i as u64);
        }
        assert!(!board.qualifies(10));
        assert_eq!(board.add_score(10, 99), None);
        assert!(board.qualifies(100));
        assert_eq!(board.add_score(11, 99), Some(MAX_SCORES));
        assert_eq!(board.len(), MAX_SCORES);
        assert_eq!(board.entries.last().map(|e| e.timestamp), Some(99));
    }

    #[test]
    fn test_normalize() {
        let mut board = Leaderboard {
            entries: vec![
                ScoreRecord { score: 1, timestamp: 1 },
                ScoreRecord { score: 3, timestamp: 2 },
                ScoreRecord { score: 1, timestamp: 3 },
            ],
        };
        board.normalize();
        let order: Vec<_> = board.entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_sorted(scores in prop::collection::vec(0i64..1000, 0..40)) {
            let mut board = Leaderboard::new();
            for (i, score) in scores.iter().enumerate() {
                board.add_score(*score, i as u64);
            }
            prop_assert!(board.len() <= MAX_SCORES);
            prop_assert_eq!(board.len(), scores.len().min(MAX_SCORES));
            for pair in board.entries.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].timestamp < pair[1].timestamp);
                }
            }
        }

        #[test]
        fn prop_json_round_trip(scores in prop::collection::vec((0i64..1000, 0u64..u64::MAX), 0..12)) {
            let mut board = Leaderboard::new();
            for (score, ts) in scores {
                board.add_score(score, ts);
            }
            let json = serde_json::to_string(&board).expect("serialize");
            let restored: Leaderboard = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(restored, board);
        }
    }
}
