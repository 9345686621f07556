//! Display-width helpers
//!
//! Map between char columns and on-screen cells so that the cursor, the
//! selection and mouse hits line up with what the renderer draws.

use unicode_width::UnicodeWidthChar;

/// Cells occupied by a tab character
pub const TAB_WIDTH: usize = 4;

/// Cells occupied by a single char
pub fn char_width(c: char) -> usize {
    if c == '\t' {
        TAB_WIDTH
    } else {
        c.width().unwrap_or(1)
    }
}

/// Cells occupied by the first `col` chars of a line
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars().take(col).map(char_width).sum()
}

/// Char column closest to a fractional cell offset (for mouse hits)
pub fn col_at_cell(line: &str, cell: f64) -> usize {
    let mut width = 0;
    for (col, c) in line.chars().enumerate() {
        let w = char_width(c);
        // snap to whichever edge of the char is nearer
        if cell < width as f64 + w as f64 / 2.0 {
            return col;
        }
        width += w;
    }
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_col_ascii() {
        assert_eq!(display_col("hello", 0), 0);
        assert_eq!(display_col("hello", 3), 3);
        assert_eq!(display_col("hello", 99), 5);
    }

    #[test]
    fn test_display_col_wide_and_tab() {
        assert_eq!(display_col("中文x", 2), 4);
        assert_eq!(display_col("\tx", 1), TAB_WIDTH);
    }

    #[test]
    fn test_col_at_cell() {
        assert_eq!(col_at_cell("hello", 0.0), 0);
        assert_eq!(col_at_cell("hello", 2.4), 2);
        assert_eq!(col_at_cell("hello", 2.6), 3);
        assert_eq!(col_at_cell("hello", 40.0), 5);
    }

    #[test]
    fn test_col_at_cell_wide_chars() {
        // left half of a wide char snaps before it, right half after it
        assert_eq!(col_at_cell("中文", 0.6), 0);
        assert_eq!(col_at_cell("中文", 1.2), 1);
        assert_eq!(col_at_cell("中文", 2.9), 1);
        assert_eq!(col_at_cell("中文", 3.5), 2);
        assert_eq!(col_at_cell("a中b", 1.6), 1);
        assert_eq!(col_at_cell("a中b", 2.1), 2);
    }
}
