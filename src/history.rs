use chrono::{DateTime, Utc};
use std::collections::VecDeque;

const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Session-only recall of submitted queries, newest first. Nothing here is
/// ever written to disk; the app keeps no persisted state between runs.
#[derive(Debug, Default)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    /// Position while browsing with Up/Down; None when not browsing.
    cursor: Option<usize>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted query. Repeats of the most recent entry are
    /// collapsed so Up does not page through duplicates.
    pub fn push(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.front().map(|e| e.query.as_str()) == Some(trimmed) {
            self.reset_cursor();
            return;
        }
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(HistoryEntry {
            query: trimmed.to_string(),
            timestamp: Utc::now(),
        });
        self.reset_cursor();
    }

    /// Step back in time (Up). Returns the entry to show, if any.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => 0,
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(|e| e.query.as_str())
    }

    /// Step forward (Down). Returns None once past the newest entry, which
    /// means "back to whatever the user was typing".
    pub fn next(&mut self) -> Option<&str> {
        match self.cursor {
            None | Some(0) => {
                self.cursor = None;
                None
            }
            Some(i) => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1).map(|e| e.query.as_str())
            }
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_is_newest_first() {
        let mut history = QueryHistory::new();
        history.push("AAPL");
        history.push("NVDA");

        assert_eq!(history.previous(), Some("NVDA"));
        assert_eq!(history.previous(), Some("AAPL"));
        // Clamped at the oldest entry.
        assert_eq!(history.previous(), Some("AAPL"));
        assert_eq!(history.next(), Some("NVDA"));
        assert_eq!(history.next(), None, "stepping past newest returns to live input");
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut history = QueryHistory::new();
        history.push("TSLA");
        history.push("TSLA");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn capped_at_max_entries() {
        let mut history = QueryHistory::new();
        for i in 0..200 {
            history.push(&format!("Q{}", i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.previous(), Some("Q199"));
    }

    #[test]
    fn blank_queries_are_not_recorded() {
        let mut history = QueryHistory::new();
        history.push("   ");
        assert!(history.is_empty());
    }
}
