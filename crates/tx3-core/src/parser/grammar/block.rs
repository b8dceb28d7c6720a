//! Transaction body: blocks, `let` bindings, and `field: expr` entries

use crate::parser::cst::NodeKind;
use crate::parser::token::TokenKind;
use crate::parser::Parser;

impl Parser<'_, '_> {
    /// One item of a tx body
    pub(super) fn tx_body_item(&mut self) {
        match self.current() {
            Some(TokenKind::Input) => self.input_block(),
            Some(TokenKind::Output) => self.named_block(NodeKind::OutputBlock),
            Some(TokenKind::Burn) => self.named_block(NodeKind::BurnBlock),
            Some(TokenKind::Mint) => self.named_block(NodeKind::MintBlock),
            Some(TokenKind::Reference) => self.named_block(NodeKind::ReferenceBlock),
            Some(TokenKind::Collateral) => self.keyword_block(NodeKind::CollateralBlock),
            Some(TokenKind::Validity) => self.keyword_block(NodeKind::ValidityBlock),
            Some(TokenKind::Locals) => self.locals_block(),
            Some(TokenKind::Signers) => self.signers_block(),
            Some(TokenKind::Metadata) => self.metadata_block(),
            Some(TokenKind::Cardano) => self.cardano_block(),
            Some(TokenKind::Let) => self.let_binding(),
            _ => self.error_and_bump(
                "Expected a tx body block (input, output, burn, mint, locals, collateral, \
                 reference, signers, validity, metadata, cardano, let)",
            ),
        }
    }

    /// `input [*] [name] { .. }`
    fn input_block(&mut self) {
        self.start_node(NodeKind::InputBlock);
        self.bump();
        self.eat(TokenKind::Star);
        if self.at_name() {
            self.bump();
        }
        self.block_body();
        self.finish_node();
    }

    /// `output|burn|mint|reference [name] { .. }`
    fn named_block(&mut self, kind: NodeKind) {
        self.start_node(kind);
        self.bump();
        if self.at_name() {
            self.bump();
        }
        self.block_body();
        self.finish_node();
    }

    /// `collateral { .. }`, `validity { .. }`
    fn keyword_block(&mut self, kind: NodeKind) {
        self.start_node(kind);
        self.bump();
        self.block_body();
        self.finish_node();
    }

    /// `{ field: expr, .. }`; the entries become children of the open node
    pub(super) fn block_body(&mut self) {
        if !self.expect(TokenKind::LBrace, "Expected '{'") {
            return;
        }
        self.delimited_items(TokenKind::RBrace, Self::block_field);
        self.expect(TokenKind::RBrace, "Expected '}'");
    }

    fn block_field(&mut self) {
        if !self.at_name() {
            self.error_and_bump("Expected a field keyword or identifier");
            return;
        }
        self.start_node(NodeKind::BlockField);
        self.bump();
        self.expect(TokenKind::Colon, "Expected ':'");
        self.expr();
        self.eat(TokenKind::Comma);
        self.finish_node();
    }

    /// `locals { name: expr, .. }`
    fn locals_block(&mut self) {
        self.start_node(NodeKind::LocalsBlock);
        self.bump();
        if self.expect(TokenKind::LBrace, "Expected '{'") {
            self.delimited_items(TokenKind::RBrace, |p| {
                p.start_node(NodeKind::LetBinding);
                if p.expect_name("Expected local name") {
                    p.expect(TokenKind::Colon, "Expected ':'");
                    p.expr();
                    p.eat(TokenKind::Comma);
                }
                p.finish_node();
            });
            self.expect(TokenKind::RBrace, "Expected '}'");
        }
        self.finish_node();
    }

    /// `signers { expr, .. }`
    fn signers_block(&mut self) {
        self.start_node(NodeKind::SignersBlock);
        self.bump();
        if self.expect(TokenKind::LBrace, "Expected '{'") {
            self.delimited_items(TokenKind::RBrace, |p| {
                p.expr();
                p.eat(TokenKind::Comma);
            });
            self.expect(TokenKind::RBrace, "Expected '}'");
        }
        self.finish_node();
    }

    /// `metadata { 674: expr, "key": expr, .. }`
    fn metadata_block(&mut self) {
        self.start_node(NodeKind::MetadataBlock);
        self.bump();
        if self.expect(TokenKind::LBrace, "Expected '{'") {
            self.delimited_items(TokenKind::RBrace, Self::metadata_field);
            self.expect(TokenKind::RBrace, "Expected '}'");
        }
        self.finish_node();
    }

    fn metadata_field(&mut self) {
        const BAD_KEY: &str = "Expected integer or string key in metadata block";
        self.start_node(NodeKind::BlockField);
        match self.current() {
            Some(TokenKind::IntLiteral | TokenKind::StringLiteral) => self.bump(),
            // A name in key position is kept as the key so the value still parses
            Some(kind) if kind.is_name() => {
                self.error(BAD_KEY);
                self.bump();
            }
            Some(TokenKind::Colon) => self.error(BAD_KEY),
            _ => {
                self.error(BAD_KEY);
                self.finish_node();
                return;
            }
        }
        self.expect(TokenKind::Colon, "Expected ':'");
        self.expr();
        self.eat(TokenKind::Comma);
        self.finish_node();
    }

    /// `cardano::name { .. }`
    fn cardano_block(&mut self) {
        self.start_node(NodeKind::CardanoBlock);
        self.bump();
        if self.expect(TokenKind::ColonColon, "Expected '::'")
            && self.expect_name("Expected cardano block name")
        {
            self.block_body();
        }
        self.finish_node();
    }

    /// `let name = expr;`
    fn let_binding(&mut self) {
        self.start_node(NodeKind::LetBinding);
        self.bump();
        if self.expect_name("Expected variable name") {
            self.expect(TokenKind::Eq, "Expected '='");
            self.expr();
            self.expect(TokenKind::Semicolon, "Expected ';'");
        }
        self.finish_node();
    }
}
