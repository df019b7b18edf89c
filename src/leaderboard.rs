//! Leaderboard records and local top-10 ranking
//!
//! `ScoreRecord` matches the score-service wire format field for field, so a
//! record serializes directly into a submission body and service responses
//! deserialize into the same type. `Leaderboard` mirrors the service's
//! ordering locally: descending by points, top 10 kept.

use serde::{Deserialize, Serialize};

use crate::sim::GameOverResult;

/// Maximum number of records the board keeps
pub const MAX_RECORDS: usize = 10;

/// One submitted run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub points: u64,
    pub level: u32,
    pub kills: u32,
    /// Achievement labels earned during the run
    pub achievements: Vec<String>,
}

impl ScoreRecord {
    /// Build a submission from a finished session
    pub fn from_result(player_name: impl Into<String>, result: &GameOverResult) -> Self {
        Self {
            player_name: player_name.into(),
            points: result.score,
            level: result.level,
            kills: result.kills,
            achievements: result.achievements.clone(),
        }
    }
}

/// Local leaderboard, sorted descending by points
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub records: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build from a service response; re-sorts and trims in case the payload
    /// arrived unordered or overlong.
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.sort_by(|a, b| b.points.cmp(&a.points));
        records.truncate(MAX_RECORDS);
        Self { records }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, points: u64) -> bool {
        if points == 0 {
            return false;
        }
        if self.records.len() < MAX_RECORDS {
            return true;
        }
        self.records.last().map(|r| points > r.points).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, points: u64) -> Option<usize> {
        if !self.qualifies(points) {
            return None;
        }
        let rank = self.records.iter().position(|r| points > r.points);
        Some(rank.unwrap_or(self.records.len()) + 1)
    }

    /// Insert a record if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_record(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.points) {
            return None;
        }

        // Insertion point keeps descending order; ties go below existing
        // records of the same score
        let pos = self.records.iter().position(|r| record.points > r.points);
        let rank = match pos {
            Some(i) => {
                self.records.insert(i, record);
                i + 1
            }
            None => {
                self.records.push(record);
                self.records.len()
            }
        };

        self.records.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.records.first().map(|r| r.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, points: u64) -> ScoreRecord {
        ScoreRecord {
            player_name: name.to_string(),
            points,
            level: 3,
            kills: 40,
            achievements: vec![],
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
    }

    #[test]
    fn test_descending_order_and_trim() {
        let mut board = Leaderboard::new();
        for points in [300, 100, 500, 200, 400, 700, 600, 800, 900, 1000, 1100] {
            board.add_record(record("p", points));
        }
        assert_eq!(board.records.len(), MAX_RECORDS);
        assert_eq!(board.top_score(), Some(1100));
        for pair in board.records.windows(2) {
            assert!(pair[0].points >= pair[1].points);
        }
        // 100 was pushed off the bottom
        assert!(board.records.iter().all(|r| r.points > 100));
    }

    #[test]
    fn test_rank_reported() {
        let mut board = Leaderboard::new();
        board.add_record(record("a", 500));
        board.add_record(record("b", 300));

        assert_eq!(board.potential_rank(400), Some(2));
        assert_eq!(board.add_record(record("c", 400)), Some(2));
        assert_eq!(board.records[1].player_name, "c");
    }

    #[test]
    fn test_tie_ranks_below_existing() {
        let mut board = Leaderboard::new();
        board.add_record(record("first", 500));
        let rank = board.add_record(record("second", 500));
        assert_eq!(rank, Some(2));
        assert_eq!(board.records[0].player_name, "first");
    }

    #[test]
    fn test_full_board_rejects_low_score() {
        let mut board = Leaderboard::new();
        for i in 1..=10u64 {
            board.add_record(record("p", i * 100));
        }
        assert!(!board.qualifies(50));
        assert_eq!(board.add_record(record("late", 50)), None);
        assert_eq!(board.records.len(), MAX_RECORDS);
    }

    #[test]
    fn test_wire_format_field_names() {
        let rec = record("ace", 4200);
        let json = serde_json::to_string(&rec).unwrap();
        for field in ["player_name", "points", "level", "kills", "achievements"] {
            assert!(json.contains(field), "missing field {field}");
        }
        let back: ScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }

    #[test]
    fn test_from_records_sorts_unordered_payload() {
        let board = Leaderboard::from_records(vec![
            record("low", 100),
            record("high", 900),
            record("mid", 500),
        ]);
        assert_eq!(board.top_score(), Some(900));
        assert_eq!(board.records[2].points, 100);
    }

    #[test]
    fn test_record_from_game_over() {
        let result = crate::sim::GameOverResult {
            score: 7500,
            level: 8,
            kills: 120,
            achievements: vec!["First Blood".into()],
        };
        let rec = ScoreRecord::from_result("ace", &result);
        assert_eq!(rec.points, 7500);
        assert_eq!(rec.level, 8);
        assert_eq!(rec.achievements.len(), 1);
    }
}
