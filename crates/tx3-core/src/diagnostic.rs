//! Parse diagnostics and source positions
//!
//! The parser accumulates every problem it finds rather than stopping at
//! the first one. Severity is always `Error` here; tools downstream decide
//! how to render or demote them.

use serde::{Deserialize, Serialize};

use crate::parser::token::Span;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single parse diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            span,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// `line:column: severity: message`, positions 1-based
    pub fn render(&self, index: &LineIndex) -> String {
        let (line, column) = index.line_col(self.span.start);
        format!("{}:{}: {}: {}", line, column, self.severity, self.message)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.severity, self.span, self.message)
    }
}

/// Maps byte offsets to 1-based line and column (columns count chars)
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    text: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(text: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { text, line_starts }
    }

    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map_or(offset - start, |s| s.chars().count());
        (line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(1), (1, 2));
        assert_eq!(index.line_col(3), (2, 1));
        assert_eq!(index.line_col(7), (4, 1));
        assert_eq!(index.line_col(100), (4, 2));
    }

    #[test]
    fn test_columns_count_chars_not_bytes() {
        let index = LineIndex::new("€€x");
        assert_eq!(index.line_col(6), (1, 3));
    }

    #[test]
    fn test_render() {
        let index = LineIndex::new("party\n  X");
        let d = Diagnostic::error(Span::new(8, 9), "Expected ';'");
        assert_eq!(d.render(&index), "2:3: error: Expected ';'");
        assert_eq!(d.to_string(), "error at 8..9: Expected ';'");
    }
}
