//! Append-only battle log.
//!
//! Every entry is a human-readable line tagged with the turn it happened on.
//! The presentation layer reads the log, it never edits it. Backed by
//! `im::Vector` so that cloning a `BattleState` shares the history.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::side::Side;

/// One line of the battle log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Turn the entry was written on.
    pub turn: u32,
    /// Side the entry concerns, `None` for battle-wide lines.
    pub side: Option<Side>,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(turn: u32, side: Option<Side>, message: impl Into<String>) -> Self {
        Self {
            turn,
            side,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Some(side) => write!(f, "[Turn {}] {}: {}", self.turn, side, self.message),
            None => write!(f, "[Turn {}] {}", self.turn, self.message),
        }
    }
}

/// Append-only sequence of log entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleLog {
    entries: Vector<LogEntry>,
}

impl BattleLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries appended after the first `from` entries.
    pub fn since(&self, from: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(from)
    }

    /// Most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
