//! Ember Core - platform-independent editor model
//!
//! This crate provides the data structures and logic behind the editor:
//! - Line buffer with cursor-relative insert/delete/split/join
//! - Cursor and selection tracking
//! - Snapshot-based undo/redo history
//! - Substring keyword matching for line highlighting
//! - Char column <-> display cell mapping
//!
//! Nothing in here touches a window or a process, so every operation is
//! deterministic and can be tested headlessly.

mod buffer;
mod cursor;
mod editor;
mod error;
pub mod highlight;
mod history;
pub mod selection;
mod snapshot;
pub mod width;

pub use buffer::Buffer;
pub use cursor::{Cursor, Position};
pub use editor::Editor;
pub use error::{Error, Result};
pub use history::{History, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use selection::Selection;
pub use snapshot::EditorSnapshot;

/// Characters that open an auto-closed pair, with their closing partner
pub const BRACKET_PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Return the closing partner for an opening bracket
pub fn closing_pair(c: char) -> Option<char> {
    BRACKET_PAIRS
        .iter()
        .find(|(open, _)| *open == c)
        .map(|(_, close)| *close)
}

/// Check if a character closes one of the auto-closed pairs
pub fn is_closing_bracket(c: char) -> bool {
    BRACKET_PAIRS.iter().any(|(_, close)| *close == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_pair() {
        assert_eq!(closing_pair('('), Some(')'));
        assert_eq!(closing_pair('['), Some(']'));
        assert_eq!(closing_pair('{'), Some('}'));
        assert_eq!(closing_pair('<'), None);
    }

    #[test]
    fn test_is_closing_bracket() {
        assert!(is_closing_bracket(')'));
        assert!(is_closing_bracket('}'));
        assert!(!is_closing_bracket('('));
    }
}
