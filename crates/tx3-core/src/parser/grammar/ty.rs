//! Type references

use crate::parser::cst::NodeKind;
use crate::parser::token::TokenKind;
use crate::parser::Parser;

impl Parser<'_, '_> {
    /// A base type followed by any number of `[]` suffixes; each suffix
    /// wraps the type before it in an `ArrayType`.
    pub(super) fn parse_type(&mut self) {
        if !self.enter() {
            return;
        }
        let cp = self.checkpoint();
        self.base_type();
        let mut wrapped = 0;
        while self.at(TokenKind::LBracket)
            && self.nth(1) == Some(TokenKind::RBracket)
            && self.enter()
        {
            wrapped += 1;
            self.start_node_at(cp, NodeKind::ArrayType);
            self.bump();
            self.bump();
            self.finish_node();
        }
        for _ in 0..=wrapped {
            self.leave();
        }
    }

    /// `A | B | C` as one `UnionType`; a lone type is left unwrapped
    pub(super) fn type_or_union(&mut self) {
        let cp = self.checkpoint();
        self.parse_type();
        if !self.at(TokenKind::Pipe) {
            return;
        }
        self.start_node_at(cp, NodeKind::UnionType);
        while self.eat(TokenKind::Pipe) {
            self.parse_type();
        }
        self.finish_node();
    }

    /// Whether the current token can begin a type
    pub(super) fn at_type_start(&self) -> bool {
        self.current().is_some_and(|kind| {
            kind.is_builtin_type()
                || kind.is_name()
                || matches!(kind, TokenKind::LBracket | TokenKind::LBrace)
        })
    }

    fn base_type(&mut self) {
        match self.current() {
            Some(TokenKind::LBracket) => {
                self.start_node(NodeKind::ListType);
                self.bump();
                self.parse_type();
                self.expect(TokenKind::RBracket, "Expected ']'");
                self.finish_node();
            }
            Some(TokenKind::ListType) => {
                self.start_node(NodeKind::GenericType);
                self.bump();
                if self.eat(TokenKind::Lt) {
                    self.parse_type();
                    self.expect(TokenKind::Gt, "Expected '>'");
                }
                self.finish_node();
            }
            Some(TokenKind::MapType) => {
                self.start_node(NodeKind::MapType);
                self.bump();
                if self.eat(TokenKind::Lt) {
                    self.parse_type();
                    self.eat(TokenKind::Comma);
                    self.parse_type();
                    self.expect(TokenKind::Gt, "Expected '>'");
                }
                self.finish_node();
            }
            Some(TokenKind::LBrace) => {
                self.start_node(NodeKind::AnonymousRecordType);
                self.record_field_block();
                self.finish_node();
            }
            // User types may carry soft-keyword names (`type metadata { .. }`)
            Some(kind) if kind.is_scalar_type() || kind.is_name() => {
                self.start_node(NodeKind::TypeRef);
                self.bump();
                self.finish_node();
            }
            _ => {
                self.error("Expected a type name");
                self.start_node(NodeKind::TypeRef);
                self.finish_node();
            }
        }
    }
}
