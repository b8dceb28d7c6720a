//! Top-level declarations: party, policy, type/record, env, asset, tx

use crate::parser::cst::NodeKind;
use crate::parser::token::TokenKind;
use crate::parser::Parser;

impl Parser<'_, '_> {
    /// `party Name;`
    pub(super) fn party_decl(&mut self) {
        self.start_node(NodeKind::PartyDecl);
        self.bump();
        if self.expect_name("Expected party name") {
            self.expect(TokenKind::Semicolon, "Expected ';'");
        } else {
            self.eat(TokenKind::Semicolon);
        }
        self.finish_node();
    }

    /// `policy Name = import(path);`, `policy Name = 0x..;` or
    /// `policy Name { hash: .., script: .., ref: .. }`
    pub(super) fn policy_decl(&mut self) {
        self.start_node(NodeKind::PolicyDecl);
        self.bump();
        if !self.expect_name("Expected policy name") {
            self.finish_node();
            return;
        }
        match self.current() {
            Some(TokenKind::Eq) => {
                self.bump();
                match self.current() {
                    Some(TokenKind::Import) => self.import_call(),
                    Some(TokenKind::HexLiteral) => self.bump(),
                    _ => self.error("Expected 'import(path)' or hex literal for policy value"),
                }
                self.expect(TokenKind::Semicolon, "Expected ';'");
            }
            Some(TokenKind::LBrace) => self.block_body(),
            _ => self.error("Expected '=' or '{'"),
        }
        self.finish_node();
    }

    /// `import(some/path)`: the path is kept as raw tokens
    fn import_call(&mut self) {
        self.start_node(NodeKind::CallExpr);
        self.bump();
        if self.expect(TokenKind::LParen, "Expected '('") {
            self.start_node(NodeKind::PathExpr);
            while !self.at_list_end(TokenKind::RParen) && !self.at(TokenKind::Semicolon) {
                self.bump();
            }
            self.finish_node();
            self.expect(TokenKind::RParen, "Expected ')'");
        }
        self.finish_node();
    }

    /// `type Name { .. }`, `type Name = A | B;` or legacy `record Name { .. }`.
    ///
    /// A `type` body whose first item is a name followed by `{`, `(`, `,`
    /// or `}` is a variant list; anything else (and every `record` body)
    /// is a list of record fields.
    pub(super) fn type_decl(&mut self, legacy: bool) {
        let kind = if legacy {
            NodeKind::RecordDecl
        } else {
            NodeKind::TypeDecl
        };
        let decl = self.checkpoint();
        self.bump();
        if !self.expect_name("Expected type name") {
            self.start_node_at(decl, kind);
            self.finish_node();
            return;
        }

        if !legacy && self.at(TokenKind::Eq) {
            self.start_node_at(decl, NodeKind::TypeAliasDecl);
            self.bump();
            self.type_or_union();
            self.expect(TokenKind::Semicolon, "Expected ';'");
            self.finish_node();
            return;
        }

        self.start_node_at(decl, kind);
        if self.expect(TokenKind::LBrace, "Expected '{'") {
            if !legacy && self.at_variant_case() {
                self.delimited_items(TokenKind::RBrace, Self::variant_case);
            } else {
                self.delimited_items(TokenKind::RBrace, Self::record_field);
            }
            self.expect(TokenKind::RBrace, "Expected '}'");
        }
        self.finish_node();
    }

    fn at_variant_case(&self) -> bool {
        self.at_name()
            && matches!(
                self.nth(1),
                Some(TokenKind::LBrace | TokenKind::Comma | TokenKind::RBrace | TokenKind::LParen)
            )
    }

    /// `Case`, `Case { fields }` or `Case(Type, ..)`, with optional comma
    fn variant_case(&mut self) {
        self.start_node(NodeKind::VariantCase);
        if self.expect_name("Expected variant case name") {
            match self.current() {
                Some(TokenKind::LBrace) => self.record_field_block(),
                Some(TokenKind::LParen) => self.variant_tuple_params(),
                _ => {}
            }
            self.eat(TokenKind::Comma);
        }
        self.finish_node();
    }

    fn variant_tuple_params(&mut self) {
        self.start_node(NodeKind::VariantTupleParams);
        self.bump();
        self.delimited_items(TokenKind::RParen, |p| {
            p.parse_type();
            p.eat(TokenKind::Comma);
        });
        self.expect(TokenKind::RParen, "Expected ')'");
        self.finish_node();
    }

    /// `{ name: Type, .. }`; the fields become children of the open node
    pub(super) fn record_field_block(&mut self) {
        self.bump();
        self.delimited_items(TokenKind::RBrace, Self::record_field);
        self.expect(TokenKind::RBrace, "Expected '}'");
    }

    /// `name: Type` with optional trailing comma
    pub(super) fn record_field(&mut self) {
        self.start_node(NodeKind::RecordField);
        if self.expect_name("Expected field name") {
            self.typed_tail();
            self.eat(TokenKind::Comma);
        }
        self.finish_node();
    }

    /// `: Type` after a field or parameter name. A missing colon still
    /// parses the type when one plainly follows.
    fn typed_tail(&mut self) {
        if self.expect(TokenKind::Colon, "Expected ':'") || self.at_type_start() {
            self.parse_type();
        }
    }

    /// `env { name: Type, .. }`
    pub(super) fn env_decl(&mut self) {
        self.start_node(NodeKind::EnvDecl);
        self.bump();
        if self.at(TokenKind::LBrace) {
            self.record_field_block();
        } else {
            self.error("Expected '{'");
        }
        self.finish_node();
    }

    /// `asset Name = 0xPOLICY."token";` or `asset Name = 0xPOLICY;`
    pub(super) fn asset_decl(&mut self) {
        self.start_node(NodeKind::AssetDecl);
        self.bump();
        if self.expect_name("Expected asset name") && self.expect(TokenKind::Eq, "Expected '='") {
            if matches!(
                self.current(),
                Some(TokenKind::AssetLiteral | TokenKind::HexLiteral)
            ) {
                self.bump();
            } else {
                self.error("Expected asset identifier (hex literal or hex.\"token\")");
            }
            self.expect(TokenKind::Semicolon, "Expected ';'");
        }
        self.finish_node();
    }

    /// `tx name(params) { body }`
    pub(super) fn tx_decl(&mut self) {
        self.start_node(NodeKind::TxDecl);
        self.bump();
        if self.expect_name("Expected transaction name") {
            self.param_list();
            if self.expect(TokenKind::LBrace, "Expected '{'") {
                self.delimited_items(TokenKind::RBrace, Self::tx_body_item);
                self.expect(TokenKind::RBrace, "Expected '}'");
            }
        }
        self.finish_node();
    }

    /// `(name: Type, ..)`. Stops early at `{` so an unclosed list still
    /// lets the tx body parse.
    fn param_list(&mut self) {
        self.start_node(NodeKind::ParamList);
        if self.expect(TokenKind::LParen, "Expected '('") {
            while !self.at_list_end(TokenKind::RParen) && !self.at(TokenKind::LBrace) {
                let before = self.pos();
                self.tx_param();
                self.eat(TokenKind::Comma);
                self.ensure_progress(before, Some(TokenKind::RParen));
            }
            self.expect(TokenKind::RParen, "Expected ')'");
        }
        self.finish_node();
    }

    fn tx_param(&mut self) {
        self.start_node(NodeKind::TxParam);
        if self.expect_name("Expected parameter name") {
            self.typed_tail();
        }
        self.finish_node();
    }
}
