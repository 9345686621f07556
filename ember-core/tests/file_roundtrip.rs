//! Save/load tests against real files

use std::fs;

use ember_core::{Buffer, Editor, Error, Position};

#[test]
fn save_then_load_reproduces_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved_code.cpp");

    let mut editor = Editor::new();
    editor.insert_text("#include <iostream>\n\nint main() {\n    return 0;\n}");
    editor.save(&path).unwrap();
    assert!(!editor.is_modified());

    let mut other = Editor::new();
    other.load(&path).unwrap();
    assert_eq!(other.buffer().lines(), editor.buffer().lines());
    assert_eq!(other.cursor().position(), Position::new(0, 0));
    assert!(!other.history().can_undo());
}

#[test]
fn saved_file_is_newline_terminated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.cpp");

    let buffer = Buffer::from_text("a\n\nb");
    buffer.save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\n\nb\n");
}

#[test]
fn empty_buffer_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.cpp");

    Buffer::new().save(&path).unwrap();
    let loaded = Buffer::load(&path).unwrap();
    assert!(loaded.is_blank());
}

#[test]
fn trailing_empty_lines_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trailing.cpp");

    let buffer = Buffer::from_text("x\n\n");
    assert_eq!(buffer.line_count(), 3);
    buffer.save(&path).unwrap();
    assert_eq!(Buffer::load(&path).unwrap(), buffer);
}

#[test]
fn failed_load_keeps_current_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = Editor::from_text("keep me");

    let err = editor.load(&dir.path().join("missing.cpp")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert_eq!(editor.buffer().lines(), ["keep me".to_string()]);
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = Editor::from_text("x");
    let err = editor
        .save(&dir.path().join("no/such/dir/file.cpp"))
        .unwrap_err();
    assert!(matches!(err, Error::Write { .. }));
}
