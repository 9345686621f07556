//! Undo/redo history
//!
//! Two stacks of whole-buffer snapshots. Recording a new edit pushes onto the
//! undo stack and discards the redo stack; undo and redo only shuttle
//! snapshots between the two.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;

/// Default undo depth limit: unbounded
pub const DEFAULT_HISTORY_LIMIT: usize = 0;

/// A full copy of the buffer's lines at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Buffer lines
    pub lines: Vec<String>,
    /// Cursor at the time of the snapshot
    pub cursor: Cursor,
}

impl Snapshot {
    pub fn new(lines: Vec<String>, cursor: Cursor) -> Self {
        Self { lines, cursor }
    }
}

/// Undo and redo stacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    /// Maximum undo depth (0 = unbounded)
    limit: usize,
}

impl History {
    /// Create an empty history keeping at most `limit` undo snapshots
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Get the undo depth limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the state before an edit
    ///
    /// Clears the redo stack; the oldest snapshot is evicted past the limit.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo.push(snapshot);
        self.redo.clear();

        if self.limit > 0 && self.undo.len() > self.limit {
            let excess = self.undo.len() - self.limit;
            self.undo.drain(..excess);
        }
    }

    /// Step back: `current` goes onto the redo stack, the previous snapshot is returned
    ///
    /// Returns `None` (and drops nothing) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward: `current` goes onto the undo stack, the next snapshot is returned
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(lines: &[&str]) -> Snapshot {
        Snapshot::new(lines.iter().map(|s| s.to_string()).collect(), Cursor::new())
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut history = History::default();
        assert!(history.undo(snap(&["a"])).is_none());
        assert!(history.redo(snap(&["a"])).is_none());
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::default();
        history.push(snap(&[""]));

        let restored = history.undo(snap(&["x"])).unwrap();
        assert_eq!(restored, snap(&[""]));
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, snap(&["x"]));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::default();
        history.push(snap(&["1"]));
        history.undo(snap(&["2"]));
        assert_eq!(history.redo_len(), 1);

        history.push(snap(&["1"]));
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::new(2);
        history.push(snap(&["1"]));
        history.push(snap(&["2"]));
        history.push(snap(&["3"]));
        assert_eq!(history.undo_len(), 2);

        assert_eq!(history.undo(snap(&["4"])), Some(snap(&["3"])));
        assert_eq!(history.undo(snap(&["3"])), Some(snap(&["2"])));
        assert_eq!(history.undo(snap(&["2"])), None);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut history = History::new(0);
        for i in 0..5000 {
            history.push(snap(&[&i.to_string()]));
        }
        assert_eq!(history.undo_len(), 5000);
    }

    #[test]
    fn test_default_keeps_every_snapshot() {
        let mut history = History::default();
        assert_eq!(history.limit(), 0);
        for i in 0..3000 {
            history.push(snap(&[&i.to_string()]));
        }
        assert_eq!(history.undo_len(), 3000);
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push(snap(&["1"]));
        history.push(snap(&["2"]));
        history.undo(snap(&["3"]));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
