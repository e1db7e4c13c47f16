//! Collaborators that keep games outside of the engine
//!
//! The engine itself does no I/O. A [`SaveSlot`] keeps one unfinished game per player as a
//! snapshot line, and a [`HistorySink`] receives the results of finished games.
//! [`MemoryStore`] implements both in memory.

use crate::types::GameResult;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Result of a finished game, as stored in the history
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameRecord {
    pub player: String,
    pub opponent: String,
    /// Result from the point of view of `player`
    pub result: GameResult,
    /// When the game finished
    pub timestamp: DateTime<Utc>,
}

impl GameRecord {
    /// Creates a record stamped with the current time
    pub fn new(player: &str, opponent: &str, result: GameResult) -> GameRecord {
        GameRecord::with_timestamp(player, opponent, result, Utc::now())
    }

    pub fn with_timestamp(
        player: &str,
        opponent: &str,
        result: GameResult,
        timestamp: DateTime<Utc>,
    ) -> GameRecord {
        GameRecord {
            player: player.to_string(),
            opponent: opponent.to_string(),
            result,
            timestamp,
        }
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} vs {}: {} ({})",
            self.player,
            self.opponent,
            self.result,
            self.timestamp.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Storage for one unfinished game per player
pub trait SaveSlot {
    fn save(&mut self, player: &str, snapshot: &str);
    fn load(&self, player: &str) -> Option<String>;
    fn delete(&mut self, player: &str);
}

/// Receiver of finished-game results
pub trait HistorySink {
    fn record(&mut self, record: GameRecord);
}

/// In-memory [`SaveSlot`] and [`HistorySink`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saves: HashMap<String, String>,
    history: Vec<GameRecord>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// All the recorded results, oldest first
    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    /// Recorded results of games played by `player`
    pub fn history_of<'a>(
        &'a self,
        player: &'a str,
    ) -> impl Iterator<Item = &'a GameRecord> + 'a {
        self.history.iter().filter(move |r| r.player == player)
    }
}

impl SaveSlot for MemoryStore {
    fn save(&mut self, player: &str, snapshot: &str) {
        self.saves.insert(player.to_string(), snapshot.to_string());
    }

    fn load(&self, player: &str) -> Option<String> {
        self.saves.get(player).cloned()
    }

    fn delete(&mut self, player: &str) {
        self.saves.remove(player);
    }
}

impl HistorySink for MemoryStore {
    fn record(&mut self, record: GameRecord) {
        self.history.push(record);
    }
}
