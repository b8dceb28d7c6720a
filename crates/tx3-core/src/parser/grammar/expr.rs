//! Expressions, lowest precedence first:
//! ternary, logical, comparison, additive, multiplicative, unary, postfix,
//! primary.

use crate::parser::cst::NodeKind;
use crate::parser::token::TokenKind;
use crate::parser::Parser;

impl Parser<'_, '_> {
    pub(super) fn expr(&mut self) {
        if !self.enter() {
            return;
        }
        self.ternary_expr();
        self.leave();
    }

    /// `cond ? then : else`
    fn ternary_expr(&mut self) {
        let cp = self.checkpoint();
        self.logical_expr();
        if self.at(TokenKind::Question) {
            self.start_node_at(cp, NodeKind::TernaryExpr);
            self.bump();
            self.expr();
            self.expect(TokenKind::Colon, "Expected ':'");
            self.expr();
            self.finish_node();
        }
    }

    fn logical_expr(&mut self) {
        self.binary_layer(
            |k| matches!(k, TokenKind::AndAnd | TokenKind::OrOr),
            Self::compare_expr,
        );
    }

    fn compare_expr(&mut self) {
        self.binary_layer(TokenKind::is_comparison_op, Self::additive_expr);
    }

    fn additive_expr(&mut self) {
        self.binary_layer(
            |k| matches!(k, TokenKind::Plus | TokenKind::Minus),
            Self::multiplicative_expr,
        );
    }

    fn multiplicative_expr(&mut self) {
        self.binary_layer(
            |k| matches!(k, TokenKind::Star | TokenKind::Slash),
            Self::unary_expr,
        );
    }

    /// One precedence layer. All operands of the layer share a single flat
    /// `BinaryExpr`, opened only once an operator is actually seen.
    fn binary_layer(&mut self, is_op: fn(TokenKind) -> bool, operand: fn(&mut Self)) {
        let cp = self.checkpoint();
        operand(self);
        if !self.current().is_some_and(is_op) {
            return;
        }
        self.start_node_at(cp, NodeKind::BinaryExpr);
        while self.current().is_some_and(is_op) {
            self.bump();
            operand(self);
        }
        self.finish_node();
    }

    /// `!x`, `-x`; stacked prefixes open one node each
    fn unary_expr(&mut self) {
        let mut open = 0;
        while matches!(self.current(), Some(TokenKind::Bang | TokenKind::Minus)) {
            if !self.enter() {
                break;
            }
            self.start_node(NodeKind::UnaryExpr);
            self.bump();
            open += 1;
        }
        self.postfix_expr();
        for _ in 0..open {
            self.finish_node();
            self.leave();
        }
    }

    /// `base.name` and `base[index]`, each wrapping everything parsed so far
    fn postfix_expr(&mut self) {
        let cp = self.checkpoint();
        self.primary_expr();
        let mut wrapped = 0;
        while matches!(
            self.current(),
            Some(TokenKind::Dot | TokenKind::LBracket)
        ) && self.enter()
        {
            wrapped += 1;
            match self.current() {
                Some(TokenKind::Dot) => {
                    self.start_node_at(cp, NodeKind::FieldAccessExpr);
                    self.bump();
                    self.expect_name("Expected field name after '.'");
                    self.finish_node();
                }
                Some(TokenKind::LBracket) => {
                    self.start_node_at(cp, NodeKind::IndexExpr);
                    self.bump();
                    self.expr();
                    self.expect(TokenKind::RBracket, "Expected ']'");
                    self.finish_node();
                }
                _ => {}
            }
        }
        for _ in 0..wrapped {
            self.leave();
        }
    }

    fn primary_expr(&mut self) {
        let Some(kind) = self.current() else {
            self.error("Expected an expression");
            return;
        };
        match kind {
            TokenKind::Spread => {
                self.start_node(NodeKind::SpreadExpr);
                self.bump();
                if self.at_name() {
                    self.bump();
                }
                self.finish_node();
            }
            TokenKind::LParen if self.nth(1) == Some(TokenKind::RParen) => {
                self.start_node(NodeKind::Literal);
                self.bump();
                self.bump();
                self.finish_node();
            }
            TokenKind::LParen => {
                self.bump();
                self.expr();
                self.expect(TokenKind::RParen, "Expected ')'");
            }
            TokenKind::LBracket => self.list_expr(),
            TokenKind::LBrace => self.map_expr(),
            _ if kind.is_name() && self.nth(1) == Some(TokenKind::ColonColon) => {
                self.variant_expr();
            }
            _ if kind.is_name() && self.nth(1) == Some(TokenKind::LBrace) => {
                self.start_node(NodeKind::RecordLiteral);
                self.bump();
                self.record_init_block();
                self.finish_node();
            }
            _ if (kind.is_name() || kind == TokenKind::Ada)
                && self.nth(1) == Some(TokenKind::LParen) =>
            {
                self.start_node(NodeKind::CallExpr);
                self.bump();
                self.arg_list();
                self.finish_node();
            }
            _ if kind.is_name() || kind.is_builtin_symbol() => {
                self.start_node(NodeKind::NameRef);
                self.bump();
                self.finish_node();
            }
            _ if kind.is_literal() || matches!(kind, TokenKind::True | TokenKind::False) => {
                self.start_node(NodeKind::Literal);
                self.bump();
                self.finish_node();
            }
            // Leave delimiters and declaration keywords to the enclosing loop
            _ if kind.is_closing() || kind.is_hard_declaration_keyword() => {
                self.error("Expected an expression");
            }
            _ => self.error_and_bump("Expected an expression"),
        }
    }

    /// `Type::Case` with an optional `{ inits }`
    fn variant_expr(&mut self) {
        self.start_node(NodeKind::VariantExpr);
        self.bump();
        self.bump();
        if self.expect_name("Expected variant case name") && self.at(TokenKind::LBrace) {
            self.record_init_block();
        }
        self.finish_node();
    }

    /// `{ name: expr, ...spread }`; entries become children of the open node
    fn record_init_block(&mut self) {
        self.bump();
        self.delimited_items(TokenKind::RBrace, Self::record_init_entry);
        self.expect(TokenKind::RBrace, "Expected '}'");
    }

    fn record_init_entry(&mut self) {
        if self.at(TokenKind::Spread) {
            self.start_node(NodeKind::SpreadExpr);
            self.bump();
            if self.at_name() {
                self.bump();
            }
            self.eat(TokenKind::Comma);
            self.finish_node();
            return;
        }
        self.start_node(NodeKind::RecordFieldInit);
        if self.expect_name("Expected field name") {
            self.expect(TokenKind::Colon, "Expected ':'");
            self.expr();
            self.eat(TokenKind::Comma);
        }
        self.finish_node();
    }

    fn arg_list(&mut self) {
        self.start_node(NodeKind::ArgList);
        self.bump();
        self.delimited_items(TokenKind::RParen, |p| {
            p.expr();
            p.eat(TokenKind::Comma);
        });
        self.expect(TokenKind::RParen, "Expected ')'");
        self.finish_node();
    }

    /// `[a, b, ..]`
    fn list_expr(&mut self) {
        self.start_node(NodeKind::ListExpr);
        self.bump();
        self.delimited_items(TokenKind::RBracket, |p| {
            p.expr();
            p.eat(TokenKind::Comma);
        });
        self.expect(TokenKind::RBracket, "Expected ']'");
        self.finish_node();
    }

    /// `{ key: value, .. }`
    fn map_expr(&mut self) {
        self.start_node(NodeKind::MapExpr);
        self.bump();
        self.delimited_items(TokenKind::RBrace, |p| {
            p.expr();
            p.expect(TokenKind::Colon, "Expected ':'");
            p.expr();
            p.eat(TokenKind::Comma);
        });
        self.expect(TokenKind::RBrace, "Expected '}'");
        self.finish_node();
    }
}
