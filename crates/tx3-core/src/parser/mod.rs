//! Tx3 Parser - tokenizer, kind tables, CST, and recursive descent parser
//!
//! Converts Tx3 text into a concrete syntax tree plus diagnostics.
//!
//! # Guarantees
//! - Total: every input yields a `File` tree, however partial
//! - Lossless: every token, trivia included, is a leaf of the tree
//! - Terminating: every loop either consumes a token or exits
//! - Complete: reports all errors, not just the first

pub mod cst;
pub mod token;
pub mod tokenizer;

mod grammar;

use tracing::{debug, trace};

use crate::diagnostic::Diagnostic;
use cst::{Checkpoint, NodeKind, SyntaxNode, TreeBuilder};
use token::{Span, Token, TokenKind};

/// Deepest expression/type nesting the parser descends into before it
/// reports an error instead of recursing further
const MAX_NESTING: usize = 128;

/// Parse a token stream into a `File` node and its diagnostics.
///
/// The tokens must be the complete output of [`tokenizer::Tokenizer`] for
/// one text; trivia is skipped for grammar decisions but kept in the tree.
pub fn parse_tokens<'src>(tokens: &[Token<'src>]) -> (SyntaxNode<'src>, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    parser.parse_file();
    let (root, mut diagnostics) = parser.finish();
    diagnostics.sort_by_key(|d| d.span.start);
    debug!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "parsed tx3 source"
    );
    (root, diagnostics)
}

/// Recursive descent parser state.
///
/// `significant` indexes the non-trivia tokens; `cursor` walks it.
/// `emitted` is the next raw token not yet attached to the tree, so trivia
/// is flushed lazily: leading trivia of a node lands in its parent.
pub(crate) struct Parser<'t, 'src> {
    tokens: &'t [Token<'src>],
    significant: Vec<usize>,
    cursor: usize,
    emitted: usize,
    builder: TreeBuilder<'src>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Parser {
            tokens,
            significant,
            cursor: 0,
            emitted: 0,
            builder: TreeBuilder::new(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn finish(mut self) -> (SyntaxNode<'src>, Vec<Diagnostic>) {
        self.emit_until(self.tokens.len());
        (self.builder.finish(), self.diagnostics)
    }

    // ── Token inspection ───────────────────────────────────

    /// Kind of the current significant token, `None` at end of input
    fn current(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    /// Kind of the significant token `n` places ahead
    fn nth(&self, n: usize) -> Option<TokenKind> {
        self.significant
            .get(self.cursor + n)
            .map(|&i| self.tokens[i].kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.cursor >= self.significant.len()
    }

    /// Identifier or soft keyword
    fn at_name(&self) -> bool {
        self.current().is_some_and(TokenKind::is_name)
    }

    /// Current position; loops compare it before and after a sub-parse
    fn pos(&self) -> usize {
        self.cursor
    }

    fn current_span(&self) -> Span {
        match self.significant.get(self.cursor) {
            Some(&i) => self.tokens[i].span,
            None => Span::empty(self.tokens.last().map_or(0, |t| t.span.end)),
        }
    }

    // ── Tree building ──────────────────────────────────────

    fn emit_until(&mut self, end: usize) {
        while self.emitted < end {
            let token = self.tokens[self.emitted];
            if token.is_unterminated() {
                let what = match token.kind {
                    TokenKind::StringLiteral => "Unterminated string literal",
                    _ => "Unterminated block comment",
                };
                self.diagnostics.push(Diagnostic::error(token.span, what));
            }
            self.builder.token(token);
            self.emitted += 1;
        }
    }

    /// Attach pending trivia to the node currently open
    fn flush_trivia(&mut self) {
        let end = self
            .significant
            .get(self.cursor)
            .copied()
            .unwrap_or(self.tokens.len());
        self.emit_until(end);
    }

    /// Consume the current significant token (with the trivia before it)
    fn bump(&mut self) {
        if let Some(&i) = self.significant.get(self.cursor) {
            self.emit_until(i + 1);
            self.cursor += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn start_node(&mut self, kind: NodeKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    // ── Diagnostics & recovery ─────────────────────────────

    fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.diagnostics.push(Diagnostic::error(span, message));
    }

    /// Consume `kind` or report `message` without consuming anything
    fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Consume an identifier or soft keyword, or report `message`
    fn expect_name(&mut self, message: &str) -> bool {
        if self.at_name() {
            self.bump();
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Wrap the current token in an `Error` node and move past it
    fn bump_as_error(&mut self) {
        if self.at_eof() {
            return;
        }
        self.start_node(NodeKind::Error);
        self.bump();
        self.finish_node();
    }

    /// Report `message` and skip the current token
    fn error_and_bump(&mut self, message: &str) {
        self.error(message);
        self.bump_as_error();
    }

    /// Progress guard for loops: if the sub-parse started at `before`
    /// consumed nothing and the loop's terminator (`close`, or end of input
    /// when `None`) is not reached, skip one token so the loop cannot spin.
    fn ensure_progress(&mut self, before: usize, close: Option<TokenKind>) {
        let stop = match close {
            Some(close) => self.at_list_end(close),
            None => self.at_eof(),
        };
        if self.pos() == before && !stop {
            trace!(pos = before, kind = ?self.current(), "force-advance");
            self.bump_as_error();
        }
    }

    /// True when a delimited loop waiting for `close` should stop: at the
    /// closer, at end of input, or at a declaration keyword that can only
    /// start a new top-level item.
    fn at_list_end(&self, close: TokenKind) -> bool {
        match self.current() {
            None => true,
            Some(kind) => kind == close || kind.is_hard_declaration_keyword(),
        }
    }

    /// Enter one level of expression/type nesting. Returns false, with a
    /// diagnostic, once `MAX_NESTING` is reached.
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            self.error("Expression or type nested too deeply");
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `item` until `close`, guarding progress on every iteration
    fn delimited_items(&mut self, close: TokenKind, mut item: impl FnMut(&mut Self)) {
        while !self.at_list_end(close) {
            let before = self.pos();
            item(self);
            self.ensure_progress(before, Some(close));
        }
    }
}
