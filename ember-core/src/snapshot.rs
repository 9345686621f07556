//! Editor snapshot for testing and debugging
//!
//! Provides a serializable representation of editor state.

use serde::{Deserialize, Serialize};

use crate::cursor::Position;
use crate::editor::Editor;
use crate::error::Result;

/// A complete snapshot of editor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    /// Buffer content
    pub lines: Vec<String>,
    /// Cursor position
    pub cursor: Position,
    /// Selection bounds, normalized, if a non-empty selection exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<(Position, Position)>,
    /// Undo stack depth
    pub undo_depth: usize,
    /// Redo stack depth
    pub redo_depth: usize,
    /// Unsaved changes
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub modified: bool,
}

impl EditorSnapshot {
    /// Create a snapshot from an editor
    pub fn from_editor(editor: &Editor) -> Self {
        Self {
            lines: editor.buffer().lines().to_vec(),
            cursor: editor.cursor().position(),
            selection: editor
                .selection()
                .filter(|s| !s.is_empty())
                .map(|s| s.bounds()),
            undo_depth: editor.history().undo_len(),
            redo_depth: editor.history().redo_len(),
            modified: editor.is_modified(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_editor() {
        let mut editor = Editor::new();
        editor.insert_text("int x;\nx++;");
        editor.move_left(true);

        let snap = EditorSnapshot::from_editor(&editor);
        assert_eq!(snap.lines, vec!["int x;", "x++;"]);
        assert_eq!(snap.cursor, Position::new(1, 3));
        assert_eq!(snap.selection, Some((Position::new(1, 3), Position::new(1, 4))));
        assert_eq!(snap.undo_depth, 1);
        assert_eq!(snap.redo_depth, 0);
        assert!(snap.modified);
    }

    #[test]
    fn test_snapshot_json() {
        let editor = Editor::from_text("a\nb");
        let snap = EditorSnapshot::from_editor(&editor);

        let json = snap.to_json().unwrap();
        assert!(json.contains("\"lines\""));
        assert!(!json.contains("\"selection\""));
        assert!(!json.contains("\"modified\""));

        let restored = EditorSnapshot::from_json(&json).unwrap();
        assert_eq!(snap, restored);
    }
}
