//! Tx3 Tokenizer - converts Tx3 text into a lossless token stream
//!
//! Handles: keywords, identifiers, the `0x` literal family (hex, UTxO
//! reference, asset), `#` bytes, strings, integers, operators, punctuation.
//! Whitespace and comments are emitted as real tokens, never discarded.
//!
//! Guarantees:
//! - Total: every input produces a token stream, unknown characters become
//!   single-character `Invalid` tokens
//! - Lossless: concatenating token texts reproduces the input exactly
//! - Spans are byte offsets and always fall on `char` boundaries

use tracing::trace;

use super::token::{Token, TokenKind};

/// Tokenizer for Tx3 source text
pub struct Tokenizer<'src> {
    input: &'src str,
    position: usize,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given input text
    pub fn new(text: &'src str) -> Self {
        Tokenizer {
            input: text,
            position: 0,
        }
    }

    /// Tokenize the entire input into a stream of tokens
    pub fn tokenize(mut self) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            tokens.push(self.next_token());
        }
        tokens
    }

    // ── Character helpers ──────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn rest(&self) -> &'src str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.position += ch.len_utf8();
        }
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token<'src> {
        Token::new(kind, &self.input[start..self.position], start)
    }

    // ── Main dispatch ──────────────────────────────────────

    fn next_token(&mut self) -> Token<'src> {
        let start = self.position;
        let Some(ch) = self.peek() else {
            return self.token_from(TokenKind::Invalid, start);
        };

        let kind = match ch {
            c if c.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' if self.peek_ahead(1) == Some('/') => {
                self.advance_while(|c| c != '\n');
                TokenKind::LineComment
            }
            '/' if self.peek_ahead(1) == Some('*') => self.read_block_comment(),
            '"' => {
                self.read_string();
                TokenKind::StringLiteral
            }
            '#' => self.read_bytes(),
            '0' if self.peek_ahead(1) == Some('x')
                && self.peek_ahead(2).is_some_and(|c| c.is_ascii_hexdigit()) =>
            {
                self.read_hex_family()
            }
            c if c.is_ascii_digit() => {
                self.advance_while(|c| c.is_ascii_digit());
                TokenKind::IntLiteral
            }
            c if is_ident_start(c) => {
                self.advance_while(is_ident_continue);
                let text = &self.input[start..self.position];
                TokenKind::keyword(text).unwrap_or(TokenKind::Ident)
            }
            _ => self.read_symbol(),
        };

        self.token_from(kind, start)
    }

    // ── Comments & strings ─────────────────────────────────

    /// `/* ... */`, non-nesting. Runs to end of input when unterminated.
    fn read_block_comment(&mut self) -> TokenKind {
        self.position += 2;
        match self.rest().find("*/") {
            Some(end) => self.position += end + 2,
            None => self.position = self.input.len(),
        }
        TokenKind::BlockComment
    }

    /// Quote-delimited text. A backslash skips the next character. Stops
    /// before a newline when the closing quote is missing.
    fn read_string(&mut self) -> bool {
        self.advance(); // consume opening "
        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return true;
                }
                '\n' => return false,
                '\\' => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        false
    }

    // ── Literal families ───────────────────────────────────

    /// `#` followed by hex digits
    fn read_bytes(&mut self) -> TokenKind {
        self.advance(); // consume #
        if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            trace!(offset = self.position - 1, "lone '#'");
            return TokenKind::Invalid;
        }
        self.advance_while(|c| c.is_ascii_hexdigit());
        TokenKind::BytesLiteral
    }

    /// `0x` hex run, then decide on what follows:
    /// `#digits` makes a UTxO reference, `."text"` makes an asset,
    /// anything else leaves a plain hex literal.
    fn read_hex_family(&mut self) -> TokenKind {
        self.position += 2; // consume 0x
        self.advance_while(|c| c.is_ascii_hexdigit());

        match (self.peek(), self.peek_ahead(1)) {
            (Some('#'), Some(d)) if d.is_ascii_digit() => {
                self.advance(); // consume #
                self.advance_while(|c| c.is_ascii_digit());
                TokenKind::UtxoRefLiteral
            }
            (Some('.'), Some('"')) => {
                let checkpoint = self.position;
                self.advance(); // consume .
                if self.read_string() {
                    TokenKind::AssetLiteral
                } else {
                    self.position = checkpoint;
                    TokenKind::HexLiteral
                }
            }
            _ => TokenKind::HexLiteral,
        }
    }

    // ── Operators & punctuation ────────────────────────────

    fn read_symbol(&mut self) -> TokenKind {
        let rest = self.rest();
        let (kind, len) = if rest.starts_with("...") {
            (TokenKind::Spread, 3)
        } else if rest.starts_with("::") {
            (TokenKind::ColonColon, 2)
        } else if rest.starts_with("==") {
            (TokenKind::EqEq, 2)
        } else if rest.starts_with("!=") {
            (TokenKind::NotEq, 2)
        } else if rest.starts_with("<=") {
            (TokenKind::Le, 2)
        } else if rest.starts_with(">=") {
            (TokenKind::Ge, 2)
        } else if rest.starts_with("&&") {
            (TokenKind::AndAnd, 2)
        } else if rest.starts_with("||") {
            (TokenKind::OrOr, 2)
        } else {
            let kind = match self.peek() {
                Some('+') => TokenKind::Plus,
                Some('-') => TokenKind::Minus,
                Some('*') => TokenKind::Star,
                Some('/') => TokenKind::Slash,
                Some('<') => TokenKind::Lt,
                Some('>') => TokenKind::Gt,
                Some('!') => TokenKind::Bang,
                Some('=') => TokenKind::Eq,
                Some('?') => TokenKind::Question,
                Some('|') => TokenKind::Pipe,
                Some('{') => TokenKind::LBrace,
                Some('}') => TokenKind::RBrace,
                Some('(') => TokenKind::LParen,
                Some(')') => TokenKind::RParen,
                Some('[') => TokenKind::LBracket,
                Some(']') => TokenKind::RBracket,
                Some(',') => TokenKind::Comma,
                Some(';') => TokenKind::Semicolon,
                Some(':') => TokenKind::Colon,
                Some('.') => TokenKind::Dot,
                other => {
                    trace!(offset = self.position, ch = ?other, "unexpected character");
                    TokenKind::Invalid
                }
            };
            self.advance();
            return kind;
        };
        self.position += len;
        kind
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
