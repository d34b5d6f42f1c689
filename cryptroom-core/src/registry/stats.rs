use crate::types::Room;
use serde::{Deserialize, Serialize};

/// Community totals over the full, unfiltered room list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomStats {
    pub total_rooms: usize,
    pub total_plays: u64,
    pub total_likes: u64,
    pub average_difficulty: f64,
}

impl RoomStats {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        if rooms.is_empty() {
            return Self::default();
        }

        let total_difficulty: u64 = rooms.iter().map(|r| u64::from(r.difficulty)).sum();

        // Counters come straight from ledger JSON and may be arbitrarily large
        Self {
            total_rooms: rooms.len(),
            total_plays: rooms.iter().fold(0u64, |acc, r| acc.saturating_add(r.plays)),
            total_likes: rooms.iter().fold(0u64, |acc, r| acc.saturating_add(r.likes)),
            average_difficulty: total_difficulty as f64 / rooms.len() as f64,
        }
    }

    /// One decimal, `0.0` with no rooms.
    pub fn average_difficulty_display(&self) -> String {
        format!("{:.1}", self.average_difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(difficulty: u8, likes: u64, plays: u64) -> Room {
        Room {
            id: format!("{}-{}-{}", difficulty, likes, plays),
            name: "Room".to_string(),
            creator: "0xabc".to_string(),
            difficulty,
            encrypted_solution: String::new(),
            creation_date: 0,
            likes,
            plays,
            tags: vec![],
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = RoomStats::from_rooms(&[]);
        assert_eq!(stats.total_rooms, 0);
        assert_eq!(stats.average_difficulty_display(), "0.0");
    }

    #[test]
    fn test_totals() {
        let stats = RoomStats::from_rooms(&[room(1, 2, 3), room(2, 0, 10), room(4, 5, 0)]);

        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.total_likes, 7);
        assert_eq!(stats.total_plays, 13);
        assert_eq!(stats.average_difficulty_display(), "2.3");
    }

    #[test]
    fn test_totals_saturate() {
        let stats = RoomStats::from_rooms(&[room(1, u64::MAX, 1), room(5, 1, u64::MAX)]);

        assert_eq!(stats.total_likes, u64::MAX);
        assert_eq!(stats.total_plays, u64::MAX);
        assert_eq!(stats.average_difficulty_display(), "3.0");
    }
}
