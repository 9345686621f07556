//! Text selection for copy/cut
//!
//! A selection is an anchor (where it started) and an active end (where the
//! cursor is). Bounds are half-open: the char at the end position is not
//! selected.

use serde::{Deserialize, Serialize};

use crate::cursor::Position;

/// Selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Start point (anchor)
    pub anchor: Position,
    /// End point (follows the cursor)
    pub active: Position,
}

impl Selection {
    /// Start a new, empty selection at the given point
    pub fn new(anchor: Position) -> Self {
        Self {
            anchor,
            active: anchor,
        }
    }

    /// Create a selection spanning two points
    pub fn spanning(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Update the active end
    pub fn update(&mut self, point: Position) {
        self.active = point;
    }

    /// Get the normalized selection bounds (start <= end)
    pub fn bounds(&self) -> (Position, Position) {
        if self.anchor <= self.active {
            (self.anchor, self.active)
        } else {
            (self.active, self.anchor)
        }
    }

    /// Check if a char is within the selection
    pub fn contains(&self, line: usize, col: usize) -> bool {
        let (start, end) = self.bounds();
        let pos = Position::new(line, col);
        pos >= start && pos < end
    }

    /// Check if a line has any selected chars, or is crossed by the selection
    pub fn touches_line(&self, line: usize) -> bool {
        let (start, end) = self.bounds();
        !self.is_empty() && line >= start.line && line <= end.line
    }

    /// Check if selection spans multiple lines
    pub fn is_multiline(&self) -> bool {
        self.anchor.line != self.active.line
    }

    /// Check if selection is empty (anchor == active)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}
