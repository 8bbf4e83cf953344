//! In-memory, append-only log of submitted commands and their outcomes.
//!
//! History lives for one interactive session and is never persisted by the
//! client; any durable context belongs to the backend. Entries are ordered by
//! submission time and immutable once recorded.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One submitted command and its backend outcome.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// The raw line as the user submitted it.
    pub command: String,
    /// The response envelope, however loosely shaped.
    pub response: Value,
    /// Whether the request resolved successfully.
    pub success: bool,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Append-only sequence of [`HistoryEntry`] values.
///
/// The entry vector is private and the only mutation is [`History::record`],
/// so ordering and immutability hold by construction.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, stamping it with the current time.
    pub fn record(&mut self, command: impl Into<String>, response: Value, success: bool) {
        self.entries.push(HistoryEntry {
            command: command.into(),
            response,
            success,
            timestamp: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}
