//! Cursor state management
//!
//! Handles cursor position and movement over a [`Buffer`]. Columns are
//! counted in chars and may equal the line length (cursor after the last char).

use serde::{Deserialize, Serialize};

use crate::buffer::Buffer;

/// A position in the buffer (line, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line index (0-indexed)
    pub line: usize,
    /// Column offset in chars (0-indexed)
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Line position (0-indexed)
    pub line: usize,
    /// Column position (0-indexed, in chars)
    pub col: usize,
    /// Column to return to when moving vertically through shorter lines
    #[serde(default)]
    pub preferred_col: usize,
}

impl Cursor {
    /// Create a new cursor at position (0, 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Move cursor to a position, clamping to the buffer
    pub fn move_to(&mut self, pos: Position, buffer: &Buffer) {
        self.line = pos.line.min(buffer.line_count() - 1);
        self.col = pos.col.min(buffer.line_len(self.line));
        self.preferred_col = self.col;
    }

    /// Move one char left, wrapping to the end of the previous line
    pub fn move_left(&mut self, buffer: &Buffer) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.line > 0 {
            self.line -= 1;
            self.col = buffer.line_len(self.line);
        }
        self.preferred_col = self.col;
    }

    /// Move one char right, wrapping to the start of the next line
    pub fn move_right(&mut self, buffer: &Buffer) {
        if self.col < buffer.line_len(self.line) {
            self.col += 1;
        } else if self.line + 1 < buffer.line_count() {
            self.line += 1;
            self.col = 0;
        }
        self.preferred_col = self.col;
    }

    /// Move up one line, keeping the preferred column where possible
    pub fn move_up(&mut self, buffer: &Buffer) {
        if self.line > 0 {
            self.line -= 1;
            self.col = self.preferred_col.min(buffer.line_len(self.line));
        }
    }

    /// Move down one line, keeping the preferred column where possible
    pub fn move_down(&mut self, buffer: &Buffer) {
        if self.line + 1 < buffer.line_count() {
            self.line += 1;
            self.col = self.preferred_col.min(buffer.line_len(self.line));
        }
    }

    /// Move to beginning of line
    pub fn move_home(&mut self) {
        self.col = 0;
        self.preferred_col = 0;
    }

    /// Move to end of line
    pub fn move_end(&mut self, buffer: &Buffer) {
        self.col = buffer.line_len(self.line);
        self.preferred_col = self.col;
    }

    /// Re-establish the cursor invariant after the buffer changed underneath it
    pub fn clamp(&mut self, buffer: &Buffer) {
        self.line = self.line.min(buffer.line_count() - 1);
        self.col = self.col.min(buffer.line_len(self.line));
    }

    /// Check the cursor invariant against a buffer
    pub fn is_valid_for(&self, buffer: &Buffer) -> bool {
        self.line < buffer.line_count() && self.col <= buffer.line_len(self.line)
    }

    /// Reset cursor to (0, 0)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl From<Position> for Cursor {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line,
            col: pos.col,
            preferred_col: pos.col,
        }
    }
}
