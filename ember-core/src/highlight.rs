//! Keyword highlighting
//!
//! Deliberately trivial: a line is drawn in the keyword colour when any
//! keyword occurs in it as a substring.

/// Keywords highlighted when no list is configured
pub const DEFAULT_KEYWORDS: [&str; 6] = ["int", "if", "return", "else", "for", "while"];

/// Line colouring class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Keyword,
}

/// Keyword matcher
#[derive(Debug, Clone)]
pub struct Highlighter {
    keywords: Vec<String>,
}

impl Highlighter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classify a line
    pub fn style(&self, line: &str) -> LineStyle {
        if self.keywords.iter().any(|k| line.contains(k.as_str())) {
            LineStyle::Keyword
        } else {
            LineStyle::Plain
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_line() {
        let hl = Highlighter::default();
        assert_eq!(hl.style("int main() {"), LineStyle::Keyword);
        assert_eq!(hl.style("    return 0;"), LineStyle::Keyword);
        assert_eq!(hl.style("}"), LineStyle::Plain);
    }

    #[test]
    fn test_substring_match() {
        // "print" contains "int"
        let hl = Highlighter::default();
        assert_eq!(hl.style("print(x);"), LineStyle::Keyword);
    }

    #[test]
    fn test_custom_keywords() {
        let hl = Highlighter::new(["fn", "", "let"]);
        assert_eq!(hl.keywords().len(), 2);
        assert_eq!(hl.style("let x = 1;"), LineStyle::Keyword);
        assert_eq!(hl.style("int x = 1;"), LineStyle::Plain);
    }
}
