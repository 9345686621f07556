//! Line buffer
//!
//! An ordered sequence of text lines. Lines never contain `'\n'` and the
//! buffer always holds at least one (possibly empty) line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cursor::Position;
use crate::error::{Error, Result};

/// Byte offset of the char at `col`, or the line length when past the end
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

/// The text being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Buffer {
    /// Create a buffer holding a single empty line
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Create a buffer from lines; an empty iterator yields one empty line
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut buffer = Self {
            lines: lines.into_iter().collect(),
        };
        buffer.ensure_non_empty();
        buffer
    }

    /// Create a buffer from text, splitting on newlines
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n').map(|l| l.trim_end_matches('\r').to_string()))
    }

    fn ensure_non_empty(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// All lines, in visual order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace every line at once (used when restoring a snapshot)
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.ensure_non_empty();
    }

    /// Number of lines (always at least 1)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Length of a line in chars (0 for out-of-range lines)
    pub fn line_len(&self, index: usize) -> usize {
        self.lines
            .get(index)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Char at a position, if any
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line)?.chars().nth(pos.col)
    }

    /// Whether the buffer is a single empty line
    pub fn is_blank(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Clamp a position into the buffer
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    /// Position just past the last char of the buffer
    pub fn end(&self) -> Position {
        let line = self.lines.len() - 1;
        Position::new(line, self.line_len(line))
    }

    /// Insert text at a position, splitting lines on `'\n'`
    ///
    /// Returns the position just after the inserted text.
    pub fn insert_str(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        let tail = line.split_off(at);

        let mut segments = text.split('\n').map(|s| s.trim_end_matches('\r'));
        // split always yields at least one segment
        let first = segments.next().unwrap_or_default();
        line.push_str(first);

        let mut end = Position::new(pos.line, pos.col + first.chars().count());
        for segment in segments {
            end = Position::new(end.line + 1, segment.chars().count());
            self.lines.insert(end.line, segment.to_string());
        }

        self.lines[end.line].push_str(&tail);
        end
    }

    /// Split a line at a position; the text after the column moves to a new line below
    pub fn split_line(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_index(line, pos.col);
        let tail = line.split_off(at);
        self.lines.insert(pos.line + 1, tail);
        Position::new(pos.line + 1, 0)
    }

    /// Append the next line onto `index`; returns false when there is no next line
    pub fn join_with_next(&mut self, index: usize) -> bool {
        if index + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(index + 1);
        self.lines[index].push_str(&next);
        true
    }

    /// Remove the char at a position
    pub fn remove_char(&mut self, pos: Position) -> Option<char> {
        let line = self.lines.get_mut(pos.line)?;
        let (at, _) = line.char_indices().nth(pos.col)?;
        Some(line.remove(at))
    }

    /// Text in the half-open range `[start, end)`, lines joined with `'\n'`
    pub fn text_range(&self, start: Position, end: Position) -> String {
        let (start, end) = ordered(self.clamp(start), self.clamp(end));

        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_index(line, start.col)..byte_index(line, end.col)].to_string();
        }

        let first = &self.lines[start.line];
        let mut text = first[byte_index(first, start.col)..].to_string();
        for line in &self.lines[start.line + 1..end.line] {
            text.push('\n');
            text.push_str(line);
        }
        let last = &self.lines[end.line];
        text.push('\n');
        text.push_str(&last[..byte_index(last, end.col)]);
        text
    }

    /// Remove the half-open range `[start, end)`, joining lines as needed
    ///
    /// Returns the removed text.
    pub fn remove_range(&mut self, start: Position, end: Position) -> String {
        let (start, end) = ordered(self.clamp(start), self.clamp(end));
        let removed = self.text_range(start, end);

        let last = &self.lines[end.line];
        let tail = last[byte_index(last, end.col)..].to_string();

        let first = &mut self.lines[start.line];
        let at = byte_index(first, start.col);
        first.truncate(at);
        first.push_str(&tail);

        if end.line > start.line {
            self.lines.drain(start.line + 1..=end.line);
        }
        removed
    }

    /// Remove whole lines; the buffer keeps at least one empty line
    pub fn remove_lines(&mut self, range: RangeInclusive<usize>) -> Vec<String> {
        let last = (*range.end()).min(self.lines.len() - 1);
        let first = *range.start();
        if first > last {
            return Vec::new();
        }
        let removed = self.lines.drain(first..=last).collect();
        self.ensure_non_empty();
        removed
    }

    /// Whole buffer as text, every line newline-terminated
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Read lines from a reader, replacing the buffer contents
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let mut line = line?;
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        self.set_lines(lines);
        Ok(())
    }

    /// Write every line followed by a newline
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    /// Load a buffer from a flat text file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut buffer = Self::new();
        buffer
            .read_from(BufReader::new(file))
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded {} lines from {:?}", buffer.line_count(), path);
        Ok(buffer)
    }

    /// Save the buffer to a flat text file, truncating it
    pub fn save(&self, path: &Path) -> Result<()> {
        let write = || -> io::Result<()> {
            let file = File::create(path)?;
            self.write_to(BufWriter::new(file))
        };
        write().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved {} lines to {:?}", self.line_count(), path);
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &Buffer) -> Vec<&str> {
        buf.lines().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1);
        assert!(buf.is_blank());
    }

    #[test]
    fn test_from_lines_empty() {
        let buf = Buffer::from_lines(Vec::new());
        assert_eq!(lines(&buf), vec![""]);
    }

    #[test]
    fn test_insert_single_line() {
        let mut buf = Buffer::from_text("held");
        let end = buf.insert_str(Position::new(0, 3), "l wor");
        assert_eq!(lines(&buf), vec!["hell word"]);
        assert_eq!(end, Position::new(0, 8));
    }

    #[test]
    fn test_insert_multi_line() {
        let mut buf = Buffer::from_text("int main() {}");
        let end = buf.insert_str(Position::new(0, 12), "\n    return 0;\n");
        assert_eq!(lines(&buf), vec!["int main() {", "    return 0;", "}"]);
        assert_eq!(end, Position::new(2, 0));
    }

    #[test]
    fn test_insert_strips_carriage_returns() {
        let mut buf = Buffer::new();
        buf.insert_str(Position::new(0, 0), "a\r\nb");
        assert_eq!(lines(&buf), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_multibyte() {
        let mut buf = Buffer::from_text("héllo");
        buf.insert_str(Position::new(0, 2), "X");
        assert_eq!(lines(&buf), vec!["héXllo"]);
        assert_eq!(buf.line_len(0), 6);
    }

    #[test]
    fn test_split_and_join() {
        let mut buf = Buffer::from_text("foobar");
        let pos = buf.split_line(Position::new(0, 3));
        assert_eq!(pos, Position::new(1, 0));
        assert_eq!(lines(&buf), vec!["foo", "bar"]);

        assert!(buf.join_with_next(0));
        assert_eq!(lines(&buf), vec!["foobar"]);
        assert!(!buf.join_with_next(0));
    }

    #[test]
    fn test_split_at_end_creates_empty_line() {
        let mut buf = Buffer::from_text("abc");
        buf.split_line(Position::new(0, 3));
        assert_eq!(lines(&buf), vec!["abc", ""]);
    }

    #[test]
    fn test_remove_char() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.remove_char(Position::new(0, 1)), Some('b'));
        assert_eq!(lines(&buf), vec!["ac"]);
        assert_eq!(buf.remove_char(Position::new(0, 5)), None);
    }

    #[test]
    fn test_text_range() {
        let buf = Buffer::from_text("one\ntwo\nthree");
        assert_eq!(buf.text_range(Position::new(0, 1), Position::new(0, 3)), "ne");
        assert_eq!(
            buf.text_range(Position::new(0, 2), Position::new(2, 2)),
            "e\ntwo\nth"
        );
        // Reversed bounds are normalized
        assert_eq!(buf.text_range(Position::new(1, 3), Position::new(1, 0)), "two");
    }

    #[test]
    fn test_remove_range_across_lines() {
        let mut buf = Buffer::from_text("one\ntwo\nthree");
        let removed = buf.remove_range(Position::new(0, 2), Position::new(2, 2));
        assert_eq!(removed, "e\ntwo\nth");
        assert_eq!(lines(&buf), vec!["onree"]);
    }

    #[test]
    fn test_remove_lines_keeps_invariant() {
        let mut buf = Buffer::from_text("a\nb\nc");
        let removed = buf.remove_lines(0..=2);
        assert_eq!(removed, vec!["a", "b", "c"]);
        assert_eq!(lines(&buf), vec![""]);
    }

    #[test]
    fn test_remove_lines_clamps_range() {
        let mut buf = Buffer::from_text("a\nb\nc");
        buf.remove_lines(1..=10);
        assert_eq!(lines(&buf), vec!["a"]);
    }

    #[test]
    fn test_to_text_newline_terminated() {
        let buf = Buffer::from_text("a\nb");
        assert_eq!(buf.to_text(), "a\nb\n");
    }

    #[test]
    fn test_read_write_roundtrip() {
        let buf = Buffer::from_text("#include <cstdio>\n\nint main() {\n}");
        let mut out = Vec::new();
        buf.write_to(&mut out).unwrap();

        let mut loaded = Buffer::new();
        loaded.read_from(out.as_slice()).unwrap();
        assert_eq!(loaded, buf);
    }

    #[test]
    fn test_read_empty_input() {
        let mut buf = Buffer::from_text("old");
        buf.read_from(&b""[..]).unwrap();
        assert!(buf.is_blank());
    }

    #[test]
    fn test_read_crlf() {
        let mut buf = Buffer::new();
        buf.read_from(&b"a\r\nb\r\n"[..]).unwrap();
        assert_eq!(lines(&buf), vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Buffer::load(Path::new("/definitely/not/here.cpp")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
