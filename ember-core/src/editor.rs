//! Editor state and editing operations
//!
//! Ties the buffer, cursor, selection and history together. Every operation
//! that changes the buffer records exactly one undo snapshot before it does
//! so; operations that turn out to be no-ops record nothing.

use std::path::Path;

use crate::buffer::Buffer;
use crate::cursor::{Cursor, Position};
use crate::error::Result;
use crate::history::{History, Snapshot, DEFAULT_HISTORY_LIMIT};
use crate::selection::Selection;
use crate::{closing_pair, is_closing_bracket};

/// A single editable document
#[derive(Debug, Clone)]
pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    selection: Option<Selection>,
    history: History,
    /// Buffer changed since the last load/save
    modified: bool,
    /// Insert closing brackets automatically
    auto_pair: bool,
}

impl Editor {
    /// Create an editor with an empty buffer
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an editor keeping at most `limit` undo snapshots (0 = unbounded)
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            selection: None,
            history: History::new(limit),
            modified: false,
            auto_pair: true,
        }
    }

    /// Create an editor holding `text`, cursor at the start
    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.buffer = Buffer::from_text(text);
        editor
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The current selection, if one is being made (it may still be empty)
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Whether a non-empty selection exists
    pub fn has_selection(&self) -> bool {
        self.selection.is_some_and(|s| !s.is_empty())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_auto_pair(&mut self, enabled: bool) {
        self.auto_pair = enabled;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.buffer.lines().to_vec(), self.cursor)
    }

    /// Record the current state before a mutation
    fn record(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
        self.modified = true;
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.buffer.set_lines(snapshot.lines);
        self.cursor = snapshot.cursor;
        self.cursor.clamp(&self.buffer);
        self.selection = None;
        self.modified = true;
    }

    /// Remove the selected text without recording history
    fn take_selection(&mut self) -> Option<String> {
        let selection = self.selection.take()?;
        if selection.is_empty() {
            return None;
        }
        let (start, end) = selection.bounds();
        let removed = self.buffer.remove_range(start, end);
        self.cursor.move_to(start, &self.buffer);
        Some(removed)
    }

    /// Type a single character
    ///
    /// Opening brackets insert their closing partner after the cursor. Typing
    /// a closing bracket directly in front of the same bracket steps over it
    /// instead of inserting a duplicate.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }

        if self.auto_pair
            && !self.has_selection()
            && is_closing_bracket(c)
            && self.buffer.char_at(self.cursor.position()) == Some(c)
        {
            self.selection = None;
            self.cursor.move_right(&self.buffer);
            return;
        }

        self.record();
        self.take_selection();

        let pos = self.cursor.position();
        match closing_pair(c).filter(|_| self.auto_pair) {
            Some(close) => {
                let mut pair = String::with_capacity(2);
                pair.push(c);
                pair.push(close);
                self.buffer.insert_str(pos, &pair);
                self.cursor
                    .move_to(Position::new(pos.line, pos.col + 1), &self.buffer);
            }
            None => {
                let mut tmp = [0u8; 4];
                let end = self.buffer.insert_str(pos, c.encode_utf8(&mut tmp));
                self.cursor.move_to(end, &self.buffer);
            }
        }
    }

    /// Insert text verbatim (paste); newlines split lines
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.record();
        self.take_selection();
        let end = self.buffer.insert_str(self.cursor.position(), text);
        self.cursor.move_to(end, &self.buffer);
    }

    /// Split the current line at the cursor
    pub fn newline(&mut self) {
        self.record();
        self.take_selection();
        let pos = self.buffer.split_line(self.cursor.position());
        self.cursor.move_to(pos, &self.buffer);
    }

    /// Delete the selection, or the char before the cursor
    ///
    /// At the start of a line the line is joined onto the previous one.
    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.record();
            self.take_selection();
            return;
        }
        self.selection = None;

        let Cursor { line, col, .. } = self.cursor;
        if col > 0 {
            self.record();
            self.buffer.remove_char(Position::new(line, col - 1));
            self.cursor
                .move_to(Position::new(line, col - 1), &self.buffer);
        } else if line > 0 {
            self.record();
            let join_col = self.buffer.line_len(line - 1);
            self.buffer.join_with_next(line - 1);
            self.cursor
                .move_to(Position::new(line - 1, join_col), &self.buffer);
        }
    }

    /// Delete the selection, or the char under the cursor
    ///
    /// At the end of a line the next line is joined onto this one.
    pub fn delete_forward(&mut self) {
        if self.has_selection() {
            self.record();
            self.take_selection();
            return;
        }
        self.selection = None;

        let Cursor { line, col, .. } = self.cursor;
        if col < self.buffer.line_len(line) {
            self.record();
            self.buffer.remove_char(Position::new(line, col));
        } else if line + 1 < self.buffer.line_count() {
            self.record();
            self.buffer.join_with_next(line);
        }
    }

    /// Apply a cursor movement, extending or dropping the selection
    fn move_cursor<F>(&mut self, extend: bool, movement: F)
    where
        F: FnOnce(&mut Cursor, &Buffer),
    {
        let before = self.cursor.position();
        movement(&mut self.cursor, &self.buffer);

        if extend {
            let anchor = self.selection.map(|s| s.anchor).unwrap_or(before);
            self.selection = Some(Selection::spanning(anchor, self.cursor.position()));
        } else {
            self.selection = None;
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        self.move_cursor(extend, Cursor::move_left);
    }

    pub fn move_right(&mut self, extend: bool) {
        self.move_cursor(extend, Cursor::move_right);
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_cursor(extend, Cursor::move_up);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_cursor(extend, Cursor::move_down);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.move_cursor(extend, |cursor, _| cursor.move_home());
    }

    pub fn move_end(&mut self, extend: bool) {
        self.move_cursor(extend, Cursor::move_end);
    }

    /// Place the cursor (clamped), dropping any selection
    pub fn set_cursor(&mut self, pos: Position) {
        self.selection = None;
        self.cursor.move_to(pos, &self.buffer);
    }

    /// Select the whole buffer, cursor at the end
    pub fn select_all(&mut self) {
        let end = self.buffer.end();
        self.selection = Some(Selection::spanning(Position::new(0, 0), end));
        self.cursor.move_to(end, &self.buffer);
    }

    /// Start a selection at a point (mouse press)
    pub fn begin_selection(&mut self, pos: Position) {
        let pos = self.buffer.clamp(pos);
        self.cursor.move_to(pos, &self.buffer);
        self.selection = Some(Selection::new(pos));
    }

    /// Move the active end of the selection (mouse drag)
    pub fn extend_selection_to(&mut self, pos: Position) {
        let pos = self.buffer.clamp(pos);
        let anchor = self
            .selection
            .map(|s| s.anchor)
            .unwrap_or(self.cursor.position());
        self.cursor.move_to(pos, &self.buffer);
        self.selection = Some(Selection::spanning(anchor, pos));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text covered by a non-empty selection
    pub fn selected_text(&self) -> Option<String> {
        let selection = self.selection.filter(|s| !s.is_empty())?;
        let (start, end) = selection.bounds();
        Some(self.buffer.text_range(start, end))
    }

    /// Text to put on the clipboard: the selection, or the whole current line
    pub fn copy_text(&self) -> String {
        self.selected_text().unwrap_or_else(|| {
            let mut line = self.buffer.line(self.cursor.line).unwrap_or_default().to_string();
            line.push('\n');
            line
        })
    }

    /// Remove and return the selection, or the whole current line
    pub fn cut(&mut self) -> String {
        let has_selection = self.selection.is_some_and(|s| !s.is_empty());
        if !has_selection && self.buffer.is_blank() {
            self.selection = None;
            return self.copy_text();
        }
        self.record();
        if let Some(text) = self.take_selection() {
            return text;
        }
        self.selection = None;

        let line = self.cursor.line;
        let mut text = self.buffer.remove_lines(line..=line).concat();
        text.push('\n');
        self.cursor.move_to(Position::new(line, 0), &self.buffer);
        text
    }

    /// Restore the state before the last recorded edit; no-op when there is none
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit; no-op when there is none
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Discard everything and start from a single empty line
    pub fn new_document(&mut self) {
        self.buffer = Buffer::new();
        self.cursor.reset();
        self.selection = None;
        self.history.clear();
        self.modified = false;
    }

    /// Replace the buffer with the contents of a file
    ///
    /// On failure the current buffer is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.buffer = Buffer::load(path)?;
        self.cursor.reset();
        self.selection = None;
        self.history.clear();
        self.modified = false;
        Ok(())
    }

    /// Write the buffer to a file
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.buffer.save(path)?;
        self.modified = false;
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(editor: &Editor) -> Vec<&str> {
        editor.buffer().lines().iter().map(String::as_str).collect()
    }

    fn type_str(editor: &mut Editor, text: &str) {
        for c in text.chars() {
            editor.insert_char(c);
        }
    }

    #[test]
    fn test_typing() {
        let mut editor = Editor::new();
        type_str(&mut editor, "int x;");
        assert_eq!(lines(&editor), vec!["int x;"]);
        assert_eq!(editor.cursor().position(), Position::new(0, 6));
        assert!(editor.is_modified());
    }

    #[test]
    fn test_auto_pair_brackets() {
        let mut editor = Editor::new();
        editor.insert_char('(');
        assert_eq!(lines(&editor), vec!["()"]);
        assert_eq!(editor.cursor().col, 1);

        editor.insert_char('[');
        editor.insert_char('{');
        assert_eq!(lines(&editor), vec!["([{}])"]);
        assert_eq!(editor.cursor().col, 3);
    }

    #[test]
    fn test_closing_bracket_steps_over() {
        let mut editor = Editor::new();
        editor.insert_char('(');
        editor.insert_char('x');
        let undo_depth = editor.history().undo_len();

        editor.insert_char(')');
        assert_eq!(lines(&editor), vec!["(x)"]);
        assert_eq!(editor.cursor().col, 3);
        // stepping over records nothing
        assert_eq!(editor.history().undo_len(), undo_depth);
    }

    #[test]
    fn test_closing_bracket_inserted_when_not_adjacent() {
        let mut editor = Editor::new();
        editor.insert_char('}');
        assert_eq!(lines(&editor), vec!["}"]);
        assert_eq!(editor.cursor().col, 1);
    }

    #[test]
    fn test_auto_pair_disabled() {
        let mut editor = Editor::new();
        editor.set_auto_pair(false);
        editor.insert_char('(');
        editor.insert_char(')');
        assert_eq!(lines(&editor), vec!["()"]);
        assert_eq!(editor.cursor().col, 2);
    }

    #[test]
    fn test_newline_splits_line() {
        let mut editor = Editor::from_text("int main() {}");
        editor.set_cursor(Position::new(0, 12));
        editor.newline();
        assert_eq!(lines(&editor), vec!["int main() {", "}"]);
        assert_eq!(editor.cursor().position(), Position::new(1, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::from_text("ab\ncd");
        editor.set_cursor(Position::new(1, 0));
        editor.backspace();
        assert_eq!(lines(&editor), vec!["abcd"]);
        assert_eq!(editor.cursor().position(), Position::new(0, 2));
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut editor = Editor::from_text("ab");
        editor.backspace();
        assert_eq!(lines(&editor), vec!["ab"]);
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn test_delete_forward() {
        let mut editor = Editor::from_text("ab\ncd");
        editor.set_cursor(Position::new(0, 1));
        editor.delete_forward();
        assert_eq!(lines(&editor), vec!["a", "cd"]);
        editor.delete_forward();
        assert_eq!(lines(&editor), vec!["acd"]);
        editor.move_end(false);
        editor.delete_forward();
        assert_eq!(lines(&editor), vec!["acd"]);
    }

    #[test]
    fn test_shift_movement_selects() {
        let mut editor = Editor::from_text("hello");
        editor.move_right(true);
        editor.move_right(true);
        assert_eq!(editor.selected_text().as_deref(), Some("he"));

        editor.move_right(false);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut editor = Editor::from_text("hello world");
        editor.begin_selection(Position::new(0, 0));
        editor.extend_selection_to(Position::new(0, 5));
        editor.insert_char('X');
        assert_eq!(lines(&editor), vec!["X world"]);
        assert!(editor.selection().is_none());
    }

    #[test]
    fn test_select_all_and_cut() {
        let mut editor = Editor::from_text("a\nb\nc");
        editor.select_all();
        assert_eq!(editor.copy_text(), "a\nb\nc");
        let cut = editor.cut();
        assert_eq!(cut, "a\nb\nc");
        assert_eq!(lines(&editor), vec![""]);
        assert_eq!(editor.cursor().position(), Position::new(0, 0));
    }

    #[test]
    fn test_cut_without_selection_takes_line() {
        let mut editor = Editor::from_text("one\ntwo\nthree");
        editor.set_cursor(Position::new(1, 2));
        assert_eq!(editor.cut(), "two\n");
        assert_eq!(lines(&editor), vec!["one", "three"]);
        assert_eq!(editor.cursor().position(), Position::new(1, 0));
    }

    #[test]
    fn test_cut_last_line_keeps_cursor_valid() {
        let mut editor = Editor::from_text("one\ntwo");
        editor.set_cursor(Position::new(1, 1));
        editor.cut();
        assert_eq!(lines(&editor), vec!["one"]);
        assert!(editor.cursor().is_valid_for(editor.buffer()));
    }

    #[test]
    fn test_cut_blank_buffer_records_nothing() {
        let mut editor = Editor::new();
        assert_eq!(editor.cut(), "\n");
        assert!(editor.buffer().is_blank());
        assert_eq!(editor.history().undo_len(), 0);
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_copy_without_selection_takes_line() {
        let editor = Editor::from_text("first\nsecond");
        assert_eq!(editor.copy_text(), "first\n");
    }

    #[test]
    fn test_paste_multiline() {
        let mut editor = Editor::from_text("ab");
        editor.set_cursor(Position::new(0, 1));
        editor.insert_text("1\n2\n3");
        assert_eq!(lines(&editor), vec!["a1", "2", "3b"]);
        assert_eq!(editor.cursor().position(), Position::new(2, 1));
    }

    #[test]
    fn test_undo_redo() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab");
        editor.newline();

        assert!(editor.undo());
        assert_eq!(lines(&editor), vec!["ab"]);
        assert_eq!(editor.cursor().position(), Position::new(0, 2));

        assert!(editor.redo());
        assert_eq!(lines(&editor), vec!["ab", ""]);
        assert_eq!(editor.cursor().position(), Position::new(1, 0));
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut editor = Editor::from_text("x");
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert_eq!(lines(&editor), vec!["x"]);
    }

    #[test]
    fn test_edit_after_undo_clears_redo() {
        let mut editor = Editor::new();
        type_str(&mut editor, "ab");
        editor.undo();
        editor.insert_char('z');
        assert!(!editor.redo());
        assert_eq!(lines(&editor), vec!["az"]);
    }

    #[test]
    fn test_new_document() {
        let mut editor = Editor::from_text("stuff\nmore");
        editor.insert_char('x');
        editor.new_document();
        assert!(editor.buffer().is_blank());
        assert!(!editor.history().can_undo());
        assert!(!editor.is_modified());
    }
}
