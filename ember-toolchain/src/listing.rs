//! Numbered source listings

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Number lines from 1 as `"N: line"`
pub fn numbered_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line.as_ref()))
        .collect()
}

/// Read a file and number its lines
pub fn numbered_listing(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(Error::file(path))?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    Ok(numbered_lines(&lines))
}
