//! Tx3 token kinds, spans, and the static kind tables.
//!
//! Every kind belongs to zero or more named sets (soft keyword, builtin
//! type, literal, ...). Set membership is a property of the kind, so all
//! queries here are `const fn` over the enumeration.

use serde::{Deserialize, Serialize};

/// Byte range `[start, end)` in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Zero-width span at `offset`
    pub const fn empty(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True if `offset` lies inside the span (end exclusive)
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token kinds for Tx3 syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    // Top-level declaration keywords
    Party,
    Policy,
    Record, // legacy spelling of `type`
    Type,
    Tx,
    Env,
    Asset,

    // Tx body block keywords
    Input,
    Output,
    Burn,
    Mint,
    Locals,
    Collateral,
    Reference,
    Signers,
    Validity,
    Metadata,
    Cardano,

    // Field keywords
    From,
    To,
    Amount,
    Datum,
    DatumIs,
    Redeemer,
    MinAmount,
    Ref,
    Script,
    Hash,
    SinceSlot,
    UntilSlot,
    Drep,
    Stake,
    Version,
    Coin,

    // Control keywords
    Import,
    Let,
    If,
    Else,
    True,
    False,

    // Builtin types
    IntType,
    BytesType,
    BoolType,
    UnitType,
    UtxoRefType,
    AddressType,
    ValueType,
    ListType,
    MapType,

    // Builtin symbols
    Ada,
    Fees,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Eq,
    ColonColon,
    Spread,
    Question,
    Pipe,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,

    // Literals
    IntLiteral,
    HexLiteral,
    StringLiteral,
    BytesLiteral,
    UtxoRefLiteral,
    AssetLiteral,

    // Other
    Ident,
    Invalid,
}

use TokenKind::*;

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: &'static [TokenKind] = &[
        Whitespace, LineComment, BlockComment,
        Party, Policy, Record, Type, Tx, Env, Asset,
        Input, Output, Burn, Mint, Locals, Collateral, Reference, Signers, Validity, Metadata,
        Cardano,
        From, To, Amount, Datum, DatumIs, Redeemer, MinAmount, Ref, Script, Hash, SinceSlot,
        UntilSlot, Drep, Stake, Version, Coin,
        Import, Let, If, Else, True, False,
        IntType, BytesType, BoolType, UnitType, UtxoRefType, AddressType, ValueType, ListType,
        MapType,
        Ada, Fees,
        Plus, Minus, Star, Slash, EqEq, NotEq, Lt, Le, Gt, Ge, AndAnd, OrOr, Bang, Eq, ColonColon,
        Spread, Question, Pipe,
        LBrace, RBrace, LParen, RParen, LBracket, RBracket, Comma, Semicolon, Colon, Dot,
        IntLiteral, HexLiteral, StringLiteral, BytesLiteral, UtxoRefLiteral, AssetLiteral,
        Ident, Invalid,
    ];

    /// Map an identifier-shaped lexeme to its reserved kind.
    ///
    /// Comparison is exact and case-sensitive: `Int` is a builtin type,
    /// `int` is an identifier.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "party" => Party,
            "policy" => Policy,
            "record" => Record,
            "type" => Type,
            "tx" => Tx,
            "env" => Env,
            "asset" => Asset,

            "input" => Input,
            "output" => Output,
            "burn" => Burn,
            "mint" => Mint,
            "locals" => Locals,
            "collateral" => Collateral,
            "reference" => Reference,
            "signers" => Signers,
            "validity" => Validity,
            "metadata" => Metadata,
            "cardano" => Cardano,

            "from" => From,
            "to" => To,
            "amount" => Amount,
            "datum" => Datum,
            "datum_is" => DatumIs,
            "redeemer" => Redeemer,
            "min_amount" => MinAmount,
            "ref" => Ref,
            "script" => Script,
            "hash" => Hash,
            "since_slot" => SinceSlot,
            "until_slot" => UntilSlot,
            "drep" => Drep,
            "stake" => Stake,
            "version" => Version,
            "coin" => Coin,

            "import" => Import,
            "let" => Let,
            "if" => If,
            "else" => Else,
            "true" => True,
            "false" => False,

            "Int" => IntType,
            "Bytes" => BytesType,
            "Bool" => BoolType,
            "Unit" => UnitType,
            "UtxoRef" => UtxoRefType,
            "Address" => AddressType,
            "Value" => ValueType,
            "List" => ListType,
            "Map" => MapType,

            "Ada" => Ada,
            "fees" => Fees,

            _ => return None,
        };
        Some(kind)
    }

    /// Debug name: the fixed text for keywords and symbols, an upper-case
    /// tag for variable-text kinds.
    pub const fn name(self) -> &'static str {
        match self {
            Whitespace => "WHITE_SPACE",
            LineComment => "LINE_COMMENT",
            BlockComment => "BLOCK_COMMENT",
            Party => "party",
            Policy => "policy",
            Record => "record",
            Type => "type",
            Tx => "tx",
            Env => "env",
            Asset => "asset",
            Input => "input",
            Output => "output",
            Burn => "burn",
            Mint => "mint",
            Locals => "locals",
            Collateral => "collateral",
            Reference => "reference",
            Signers => "signers",
            Validity => "validity",
            Metadata => "metadata",
            Cardano => "cardano",
            From => "from",
            To => "to",
            Amount => "amount",
            Datum => "datum",
            DatumIs => "datum_is",
            Redeemer => "redeemer",
            MinAmount => "min_amount",
            Ref => "ref",
            Script => "script",
            Hash => "hash",
            SinceSlot => "since_slot",
            UntilSlot => "until_slot",
            Drep => "drep",
            Stake => "stake",
            Version => "version",
            Coin => "coin",
            Import => "import",
            Let => "let",
            If => "if",
            Else => "else",
            True => "true",
            False => "false",
            IntType => "Int",
            BytesType => "Bytes",
            BoolType => "Bool",
            UnitType => "Unit",
            UtxoRefType => "UtxoRef",
            AddressType => "Address",
            ValueType => "Value",
            ListType => "List",
            MapType => "Map",
            Ada => "Ada",
            Fees => "fees",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            AndAnd => "&&",
            OrOr => "||",
            Bang => "!",
            Eq => "=",
            ColonColon => "::",
            Spread => "...",
            Question => "?",
            Pipe => "|",
            LBrace => "{",
            RBrace => "}",
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            Dot => ".",
            IntLiteral => "INT_LITERAL",
            HexLiteral => "HEX_LITERAL",
            StringLiteral => "STRING_LITERAL",
            BytesLiteral => "BYTES_LITERAL",
            UtxoRefLiteral => "UTXO_REF_LITERAL",
            AssetLiteral => "ASSET_LITERAL",
            Ident => "IDENTIFIER",
            Invalid => "BAD_CHARACTER",
        }
    }

    // ── Kind sets ──────────────────────────────────────────

    /// Whitespace and comments: kept in the tree, ignored by the grammar
    pub const fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }

    pub const fn is_top_level_keyword(self) -> bool {
        matches!(self, Party | Policy | Record | Type | Tx | Env | Asset)
    }

    /// Top-level keywords that are never valid names. Recovery loops stop here.
    pub const fn is_hard_declaration_keyword(self) -> bool {
        matches!(self, Party | Policy | Record | Type | Tx)
    }

    pub const fn is_block_keyword(self) -> bool {
        matches!(
            self,
            Input | Output | Burn | Mint | Locals | Collateral | Reference | Signers | Validity
                | Metadata | Cardano
        )
    }

    pub const fn is_field_keyword(self) -> bool {
        matches!(
            self,
            From | To | Amount | Datum | DatumIs | Redeemer | MinAmount | Ref | Script | Hash
                | SinceSlot | UntilSlot | Drep | Stake | Version | Coin
        )
    }

    pub const fn is_control_keyword(self) -> bool {
        matches!(self, Import | Let | If | Else | True | False)
    }

    pub const fn is_builtin_type(self) -> bool {
        matches!(
            self,
            IntType | BytesType | BoolType | UnitType | UtxoRefType | AddressType | ValueType
                | ListType | MapType
        )
    }

    /// Builtin types usable as a bare type reference (`List`/`Map` need arguments)
    pub const fn is_scalar_type(self) -> bool {
        self.is_builtin_type() && !matches!(self, ListType | MapType)
    }

    pub const fn is_builtin_symbol(self) -> bool {
        matches!(self, Ada | Fees)
    }

    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Plus | Minus | Star | Slash | EqEq | NotEq | Lt | Le | Gt | Ge | AndAnd | OrOr | Bang
                | Eq | ColonColon | Spread | Question | Pipe
        )
    }

    pub const fn is_punctuation(self) -> bool {
        matches!(
            self,
            LBrace | RBrace | LParen | RParen | LBracket | RBracket | Comma | Semicolon | Colon | Dot
        )
    }

    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            IntLiteral | HexLiteral | StringLiteral | BytesLiteral | UtxoRefLiteral | AssetLiteral
        )
    }

    pub const fn is_keyword(self) -> bool {
        self.is_top_level_keyword()
            || self.is_block_keyword()
            || self.is_field_keyword()
            || self.is_control_keyword()
            || self.is_builtin_type()
            || self.is_builtin_symbol()
    }

    /// Reserved words that are only structural as tx-body block introducers
    /// (or top-level `env`/`asset`). Everywhere a name is expected they read
    /// as plain identifiers.
    pub const fn is_soft_keyword(self) -> bool {
        matches!(
            self,
            Metadata | Mint | Collateral | Reference | Signers | Validity | Cardano | Env | Asset
        ) || self.is_field_keyword()
    }

    /// Identifier or soft keyword
    pub const fn is_name(self) -> bool {
        matches!(self, Ident) || self.is_soft_keyword()
    }

    /// Binary operators at the comparison layer
    pub const fn is_comparison_op(self) -> bool {
        matches!(self, EqEq | NotEq | Lt | Le | Gt | Ge)
    }

    /// Closing delimiters and separators an expression parse never swallows
    pub const fn is_closing(self) -> bool {
        matches!(self, RBrace | RParen | RBracket | Comma | Semicolon)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TokenKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        TokenKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| crate::Error::UnknownKind(s.to_string()))
    }
}

/// A lexed token: kind, the exact source slice, and its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, start: usize) -> Self {
        Token {
            kind,
            text,
            span: Span::new(start, start + text.len()),
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// True for a string literal or block comment whose closing delimiter
    /// is missing
    pub fn is_unterminated(&self) -> bool {
        match self.kind {
            StringLiteral => !string_is_closed(self.text),
            BlockComment => self.text.len() < 4 || !self.text.ends_with("*/"),
            _ => false,
        }
    }
}

fn string_is_closed(text: &str) -> bool {
    let mut chars = text.chars().skip(1);
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return chars.next().is_none(),
            _ => {}
        }
    }
    false
}
