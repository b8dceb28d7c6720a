//! Tx3 Core - lossless tokenizer and error-tolerant parser for the Tx3
//! transaction DSL
//!
//! Turns Tx3 source text into a concrete syntax tree that keeps every
//! character of the input, plus a list of diagnostics. Editors, formatters
//! and linters build on the tree; nothing here resolves names or checks types.
//!
//! # Architecture
//!
//! ```text
//! Tx3 Text → Tokenizer → Tokens (trivia included)
//!                           ↓
//!                        Parser → CST (File root) + Diagnostics
//! ```
//!
//! # Guarantees
//!
//! - **Lossless**: token texts concatenate back to the input
//! - **Total**: any input, however broken, yields a complete tree
//! - **Linear**: every parse loop consumes a token or stops

pub mod diagnostic;
pub mod error;
pub mod parser;

use serde::Serialize;

pub use diagnostic::{Diagnostic, LineIndex, Severity};
pub use error::{Error, Result};
pub use parser::cst::{NodeKind, SyntaxElement, SyntaxNode};
pub use parser::token::{Span, Token, TokenKind};

/// Crate version, as reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tokenize Tx3 text. Never fails; unknown characters become `Invalid`
/// tokens.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    parser::tokenizer::Tokenizer::new(input).tokenize()
}

/// Tokenize and parse Tx3 text into a [`Parse`]
pub fn parse(input: &str) -> Parse<'_> {
    let tokens = tokenize(input);
    let (root, diagnostics) = parser::parse_tokens(&tokens);
    Parse {
        tokens,
        root,
        diagnostics,
    }
}

/// Result of parsing one text: the token stream, the tree built over it,
/// and every diagnostic found on the way
#[derive(Debug, Clone, Serialize)]
pub struct Parse<'src> {
    pub tokens: Vec<Token<'src>>,
    pub root: SyntaxNode<'src>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'src> Parse<'src> {
    /// No diagnostics were produced
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics with `Severity::Error`
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Pretty JSON of the tree and diagnostics
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Indented debug rendering of the tree
    pub fn dump(&self) -> String {
        self.root.dump()
    }

    /// Strict view: the tree when the text is clean, otherwise
    /// [`Error::Syntax`] describing the first problem
    pub fn into_result(self) -> Result<SyntaxNode<'src>> {
        match self.diagnostics.first() {
            None => Ok(self.root),
            Some(first) => Err(Error::Syntax {
                count: self.diagnostics.len(),
                span: first.span,
                message: first.message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_source() {
        let parse = parse("party Sender;\nparty Receiver;\n");
        assert!(parse.is_ok());
        assert_eq!(parse.root.declarations().count(), 2);
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let err = parse("party ;\nparty ;").into_result().unwrap_err();
        match err {
            Error::Syntax {
                count,
                span,
                message,
            } => {
                assert_eq!(count, 2);
                assert_eq!(span.start, 6);
                assert_eq!(message, "Expected party name");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_to_json_contains_tree_and_diagnostics() {
        let json = parse("party").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root"]["kind"], "File");
        assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["diagnostics"][0]["severity"], "error");
    }

    #[test]
    fn test_errors_filters_by_severity() {
        let parse = parse("tx t() { bogus }");
        assert_eq!(parse.errors().count(), parse.diagnostics.len());
        assert!(!parse.is_ok());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_results_are_send_sync() {
        assert_send_sync::<Parse<'static>>();
        assert_send_sync::<SyntaxNode<'static>>();
        assert_send_sync::<Token<'static>>();
        assert_send_sync::<Diagnostic>();
        assert_send_sync::<Error>();
    }

    #[test]
    fn test_tokenize_reexport() {
        let tokens = tokenize("tx");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Tx);
    }
}
