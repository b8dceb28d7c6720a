//! Grammar productions, one file per layer: declarations, tx body blocks,
//! expressions, and types.

mod block;
mod decl;
mod expr;
mod ty;

use tracing::trace;

use super::token::TokenKind;
use super::Parser;

impl Parser<'_, '_> {
    /// `file := decl*`
    pub(super) fn parse_file(&mut self) {
        while !self.at_eof() {
            let before = self.pos();
            let kind = self.current();
            trace!(pos = before, kind = ?kind, "top-level item");
            match kind {
                Some(TokenKind::Party) => self.party_decl(),
                Some(TokenKind::Policy) => self.policy_decl(),
                Some(TokenKind::Record) => self.type_decl(true),
                Some(TokenKind::Type) => self.type_decl(false),
                Some(TokenKind::Tx) => self.tx_decl(),
                Some(TokenKind::Env) => self.env_decl(),
                Some(TokenKind::Asset) => self.asset_decl(),
                _ => self.error_and_bump(
                    "Expected a top-level declaration (party, policy, type, tx, env, asset)",
                ),
            }
            self.ensure_progress(before, None);
        }
    }
}
