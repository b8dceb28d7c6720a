//! Tx3 concrete syntax tree
//!
//! One node type, [`SyntaxNode`], keyed by the closed [`NodeKind`]
//! enumeration. Nodes own their children outright: no parent pointers, no
//! shared nodes. Consumers that need parents rebuild them by traversal.
//!
//! Every token of the source, trivia included, appears exactly once as a
//! leaf, so the tree text equals the input.

use serde::{Deserialize, Serialize};

use super::token::{Span, Token, TokenKind};

/// Node kinds, mirroring the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,

    // Declarations
    PartyDecl,
    PolicyDecl,
    RecordDecl,
    TypeDecl,
    TypeAliasDecl,
    TxDecl,
    EnvDecl,
    AssetDecl,

    // Tx body blocks
    InputBlock,
    OutputBlock,
    BurnBlock,
    MintBlock,
    LocalsBlock,
    CollateralBlock,
    ReferenceBlock,
    SignersBlock,
    ValidityBlock,
    MetadataBlock,
    CardanoBlock,

    // Fields
    RecordField,
    BlockField,
    LetBinding,
    VariantCase,
    TxParam,
    ParamList,
    ArgList,

    // Expressions
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    RecordLiteral,
    RecordFieldInit,
    NameRef,
    Literal,
    PathExpr,
    ListExpr,
    MapExpr,
    SpreadExpr,
    VariantExpr,
    FieldAccessExpr,
    IndexExpr,
    TernaryExpr,

    // Types
    TypeRef,
    ListType,
    MapType,
    GenericType,
    ArrayType,
    UnionType,
    AnonymousRecordType,
    VariantTupleParams,

    /// Tokens skipped while recovering from a syntax error
    Error,
}

use NodeKind::*;

impl NodeKind {
    pub const ALL: &'static [NodeKind] = &[
        File, PartyDecl, PolicyDecl, RecordDecl, TypeDecl, TypeAliasDecl, TxDecl, EnvDecl,
        AssetDecl, InputBlock, OutputBlock, BurnBlock, MintBlock, LocalsBlock, CollateralBlock,
        ReferenceBlock, SignersBlock, ValidityBlock, MetadataBlock, CardanoBlock, RecordField,
        BlockField, LetBinding, VariantCase, TxParam, ParamList, ArgList, BinaryExpr, UnaryExpr,
        CallExpr, RecordLiteral, RecordFieldInit, NameRef, Literal, PathExpr, ListExpr, MapExpr,
        SpreadExpr, VariantExpr, FieldAccessExpr, IndexExpr, TernaryExpr, TypeRef, ListType,
        MapType, GenericType, ArrayType, UnionType, AnonymousRecordType, VariantTupleParams,
        Error,
    ];

    /// Debug name used in tree dumps
    pub const fn name(self) -> &'static str {
        match self {
            File => "FILE",
            PartyDecl => "PARTY_DECL",
            PolicyDecl => "POLICY_DECL",
            RecordDecl => "RECORD_DECL",
            TypeDecl => "TYPE_DECL",
            TypeAliasDecl => "TYPE_ALIAS_DECL",
            TxDecl => "TX_DECL",
            EnvDecl => "ENV_DECL",
            AssetDecl => "ASSET_DECL",
            InputBlock => "INPUT_BLOCK",
            OutputBlock => "OUTPUT_BLOCK",
            BurnBlock => "BURN_BLOCK",
            MintBlock => "MINT_BLOCK",
            LocalsBlock => "LOCALS_BLOCK",
            CollateralBlock => "COLLATERAL_BLOCK",
            ReferenceBlock => "REFERENCE_BLOCK",
            SignersBlock => "SIGNERS_BLOCK",
            ValidityBlock => "VALIDITY_BLOCK",
            MetadataBlock => "METADATA_BLOCK",
            CardanoBlock => "CARDANO_BLOCK",
            RecordField => "RECORD_FIELD",
            BlockField => "BLOCK_FIELD",
            LetBinding => "LET_BINDING",
            VariantCase => "VARIANT_CASE",
            TxParam => "TX_PARAM",
            ParamList => "PARAM_LIST",
            ArgList => "ARG_LIST",
            BinaryExpr => "BINARY_EXPR",
            UnaryExpr => "UNARY_EXPR",
            CallExpr => "CALL_EXPR",
            RecordLiteral => "RECORD_LITERAL",
            RecordFieldInit => "RECORD_FIELD_INIT",
            NameRef => "NAME_REF",
            Literal => "LITERAL",
            PathExpr => "PATH_EXPR",
            ListExpr => "LIST_EXPR",
            MapExpr => "MAP_EXPR",
            SpreadExpr => "SPREAD_EXPR",
            VariantExpr => "VARIANT_EXPR",
            FieldAccessExpr => "FIELD_ACCESS_EXPR",
            IndexExpr => "INDEX_EXPR",
            TernaryExpr => "TERNARY_EXPR",
            TypeRef => "TYPE_REF",
            ListType => "LIST_TYPE",
            MapType => "MAP_TYPE",
            GenericType => "GENERIC_TYPE",
            ArrayType => "ARRAY_TYPE",
            UnionType => "UNION_TYPE",
            AnonymousRecordType => "ANONYMOUS_RECORD_TYPE",
            VariantTupleParams => "VARIANT_TUPLE_PARAMS",
            Error => "ERROR_ELEMENT",
        }
    }

    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            PartyDecl | PolicyDecl | RecordDecl | TypeDecl | TypeAliasDecl | TxDecl | EnvDecl
                | AssetDecl
        )
    }

    pub const fn is_block(self) -> bool {
        matches!(
            self,
            InputBlock | OutputBlock | BurnBlock | MintBlock | LocalsBlock | CollateralBlock
                | ReferenceBlock | SignersBlock | ValidityBlock | MetadataBlock | CardanoBlock
        )
    }

    pub const fn is_type(self) -> bool {
        matches!(
            self,
            TypeRef | ListType | MapType | GenericType | ArrayType | UnionType | AnonymousRecordType
        )
    }

    /// Kinds whose trailing comma is their own last child. Tx parameters and
    /// bare expression or type items leave it as the next sibling instead.
    pub const fn holds_own_comma(self) -> bool {
        matches!(
            self,
            RecordField | BlockField | LetBinding | VariantCase | RecordFieldInit | SpreadExpr
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| crate::Error::UnknownKind(s.to_string()))
    }
}

/// A child of a node: either a leaf token or a nested node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SyntaxElement<'src> {
    Node(SyntaxNode<'src>),
    Token(Token<'src>),
}

impl<'src> SyntaxElement<'src> {
    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(node) => node.span,
            SyntaxElement::Token(token) => token.span,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode<'src>> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token<'src>> {
        match self {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        }
    }

    fn is_trivia(&self) -> bool {
        matches!(self, SyntaxElement::Token(t) if t.is_trivia())
    }
}

/// An interior node of the CST
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxNode<'src> {
    kind: NodeKind,
    span: Span,
    children: Vec<SyntaxElement<'src>>,
}

impl<'src> SyntaxNode<'src> {
    /// Build a node; the span is the union of the children's spans, or
    /// `Span::empty(offset)` when there are none.
    pub fn new(kind: NodeKind, children: Vec<SyntaxElement<'src>>, offset: usize) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::empty(offset),
        };
        SyntaxNode {
            kind,
            span,
            children,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[SyntaxElement<'src>] {
        &self.children
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    pub fn child_tokens(&self) -> impl Iterator<Item = &Token<'src>> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// Direct child tokens that are not whitespace or comments
    pub fn significant_tokens(&self) -> impl Iterator<Item = &Token<'src>> {
        self.child_tokens().filter(|t| !t.is_trivia())
    }

    pub fn first_child_of(&self, kind: NodeKind) -> Option<&SyntaxNode<'src>> {
        self.child_nodes().find(|n| n.kind == kind)
    }

    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.child_nodes().filter(move |n| n.kind == kind)
    }

    /// Pre-order traversal of this node and every node below it
    pub fn descendants(&self) -> Descendants<'_, 'src> {
        Descendants { stack: vec![self] }
    }

    /// All leaf tokens below this node, in source order
    pub fn tokens(&self) -> Vec<&Token<'src>> {
        let mut out = Vec::new();
        collect_tokens(self, &mut out);
        out
    }

    /// Source text covered by this node
    pub fn text(&self) -> String {
        self.tokens().into_iter().map(|t| t.text).collect()
    }

    /// Innermost node whose span contains `offset`
    pub fn find_node_at_offset(&self, offset: usize) -> Option<&SyntaxNode<'src>> {
        if !self.span.contains(offset) {
            return None;
        }
        self.child_nodes()
            .find_map(|child| child.find_node_at_offset(offset))
            .or(Some(self))
    }

    // ── Typed accessors ────────────────────────────────────

    /// The token naming this construct: a declaration, field, parameter,
    /// binding, variant case, named block, or name reference.
    pub fn name(&self) -> Option<&Token<'src>> {
        let mut tokens = self.significant_tokens();
        let candidate = match self.kind {
            PartyDecl | PolicyDecl | RecordDecl | TypeDecl | TypeAliasDecl | TxDecl | AssetDecl
            | InputBlock | OutputBlock | BurnBlock | MintBlock | ReferenceBlock => {
                tokens.next(); // keyword
                tokens.find(|t| t.kind != TokenKind::Star)
            }
            LetBinding => {
                let first = tokens.next()?;
                if first.kind == TokenKind::Let {
                    tokens.next()
                } else {
                    Some(first)
                }
            }
            CardanoBlock => tokens.skip_while(|t| t.kind != TokenKind::ColonColon).nth(1),
            RecordField | VariantCase | TxParam | RecordFieldInit | BlockField | NameRef => {
                tokens.next()
            }
            FieldAccessExpr => tokens.skip_while(|t| t.kind != TokenKind::Dot).nth(1),
            _ => None,
        };
        candidate.filter(|t| t.kind.is_name())
    }

    /// Declarations directly under a `File` node
    pub fn declarations(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.child_nodes().filter(|n| n.kind.is_declaration())
    }

    /// Record fields of a record/type/env declaration, an anonymous record
    /// type, or a variant case with a struct payload
    pub fn fields(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.children_of(RecordField)
    }

    pub fn variant_cases(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.children_of(VariantCase)
    }

    /// Parameters of a `TxDecl`
    pub fn params(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.first_child_of(ParamList)
            .into_iter()
            .flat_map(|list| list.children_of(TxParam))
    }

    /// Field entries of a block (`BlockField`, or `LetBinding` for `locals`)
    pub fn block_fields(&self) -> impl Iterator<Item = &SyntaxNode<'src>> {
        self.child_nodes()
            .filter(|n| matches!(n.kind, BlockField | LetBinding))
    }

    /// Declared type of a `TxParam`, `RecordField`, or `TypeAliasDecl`
    pub fn declared_type(&self) -> Option<&SyntaxNode<'src>> {
        self.child_nodes().find(|n| n.kind.is_type())
    }

    /// Whether the child node at `index` is followed by a comma, looking
    /// inside the item or after it depending on its kind
    pub fn has_trailing_comma(&self, index: usize) -> bool {
        let Some(SyntaxElement::Node(item)) = self.children.get(index) else {
            return false;
        };
        let next = if item.kind.holds_own_comma() {
            item.children.iter().rev().find(|c| !c.is_trivia())
        } else {
            self.children[index + 1..].iter().find(|c| !c.is_trivia())
        };
        next.and_then(SyntaxElement::as_token)
            .is_some_and(|t| t.kind == TokenKind::Comma)
    }

    // ── Debug dump ─────────────────────────────────────────

    /// Indented debug rendering, one element per line, whitespace omitted:
    ///
    /// ```text
    /// FILE(0,13)
    ///   PARTY_DECL(0,13)
    ///     party('party')(0,5)
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(self, 0, &mut out);
        out
    }
}

fn collect_tokens<'a, 'src>(node: &'a SyntaxNode<'src>, out: &mut Vec<&'a Token<'src>>) {
    for child in &node.children {
        match child {
            SyntaxElement::Token(token) => out.push(token),
            SyntaxElement::Node(inner) => collect_tokens(inner, out),
        }
    }
}

fn dump_node(node: &SyntaxNode<'_>, depth: usize, out: &mut String) {
    use std::fmt::Write;

    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{}{}({},{})", indent, node.kind, node.span.start, node.span.end);
    for child in &node.children {
        match child {
            SyntaxElement::Node(inner) => dump_node(inner, depth + 1, out),
            SyntaxElement::Token(token) if token.kind == TokenKind::Whitespace => {}
            SyntaxElement::Token(token) => {
                let _ = writeln!(
                    out,
                    "{}  {}('{}')({},{})",
                    indent,
                    token.kind,
                    token.text.escape_debug(),
                    token.span.start,
                    token.span.end
                );
            }
        }
    }
}

/// Pre-order node iterator, see [`SyntaxNode::descendants`]
pub struct Descendants<'a, 'src> {
    stack: Vec<&'a SyntaxNode<'src>>,
}

impl<'a, 'src> Iterator for Descendants<'a, 'src> {
    type Item = &'a SyntaxNode<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().filter_map(SyntaxElement::as_node));
        Some(node)
    }
}

// ── Builder ───────────────────────────────────────────────

/// Position in the builder that a later `start_node_at` can wrap from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    depth: usize,
    len: usize,
}

/// In-progress node: kind plus the children collected so far
struct Frame<'src> {
    kind: NodeKind,
    children: Vec<SyntaxElement<'src>>,
}

/// Stack-of-frames tree builder.
///
/// `start_node` pushes a frame, `finish_node` pops it and attaches the
/// finished node to its parent. `checkpoint` + `start_node_at` wrap
/// children that were already emitted, so a node can be opened after its
/// first operand has been parsed.
pub struct TreeBuilder<'src> {
    stack: Vec<Frame<'src>>,
    offset: usize,
}

impl<'src> TreeBuilder<'src> {
    pub fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame {
                kind: File,
                children: Vec::new(),
            }],
            offset: 0,
        }
    }

    pub fn token(&mut self, token: Token<'src>) {
        self.offset = token.span.end;
        self.top().children.push(SyntaxElement::Token(token));
    }

    pub fn start_node(&mut self, kind: NodeKind) {
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.stack.len(),
            len: self.stack.last().map_or(0, |f| f.children.len()),
        }
    }

    /// Open a node that adopts every child emitted since `checkpoint`.
    /// The checkpoint must belong to the frame that is currently on top.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        debug_assert_eq!(checkpoint.depth, self.stack.len(), "stale checkpoint");
        let top = self.top();
        let at = checkpoint.len.min(top.children.len());
        let adopted = top.children.split_off(at);
        self.stack.push(Frame {
            kind,
            children: adopted,
        });
    }

    pub fn finish_node(&mut self) {
        if self.stack.len() <= 1 {
            debug_assert!(false, "finish_node without matching start_node");
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let node = SyntaxNode::new(frame.kind, frame.children, self.offset);
            self.top().children.push(SyntaxElement::Node(node));
        }
    }

    /// Close any frames left open and return the `File` root
    pub fn finish(mut self) -> SyntaxNode<'src> {
        while self.stack.len() > 1 {
            self.finish_node();
        }
        let root = self.stack.pop().map(|f| f.children).unwrap_or_default();
        SyntaxNode::new(File, root, self.offset)
    }

    /// The innermost open frame; the `File` frame is never popped before
    /// `finish`
    fn top(&mut self) -> &mut Frame<'src> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl Default for TreeBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenKind as T;

    fn tok(kind: T, text: &'static str, start: usize) -> Token<'static> {
        Token::new(kind, text, start)
    }

    #[test]
    fn test_builder_nests_frames() {
        let mut b = TreeBuilder::new();
        b.start_node(PartyDecl);
        b.token(tok(T::Party, "party", 0));
        b.token(tok(T::Whitespace, " ", 5));
        b.token(tok(T::Ident, "A", 6));
        b.token(tok(T::Semicolon, ";", 7));
        b.finish_node();
        let root = b.finish();

        assert_eq!(root.kind(), File);
        assert_eq!(root.span(), Span::new(0, 8));
        let party = root.first_child_of(PartyDecl).unwrap();
        assert_eq!(party.span(), Span::new(0, 8));
        assert_eq!(party.name().unwrap().text, "A");
        assert_eq!(root.text(), "party A;");
    }

    #[test]
    fn test_start_node_at_wraps_emitted_children() {
        let mut b = TreeBuilder::new();
        let cp = b.checkpoint();
        b.start_node(NameRef);
        b.token(tok(T::Ident, "a", 0));
        b.finish_node();
        b.start_node_at(cp, BinaryExpr);
        b.token(tok(T::Plus, "+", 1));
        b.start_node(NameRef);
        b.token(tok(T::Ident, "b", 2));
        b.finish_node();
        b.finish_node();
        let root = b.finish();

        let bin = root.first_child_of(BinaryExpr).unwrap();
        assert_eq!(bin.child_nodes().count(), 2);
        assert_eq!(bin.span(), Span::new(0, 3));
        assert_eq!(root.child_nodes().count(), 1);
    }

    #[test]
    fn test_empty_node_has_empty_span_at_position() {
        let mut b = TreeBuilder::new();
        b.token(tok(T::Ident, "x", 0));
        b.start_node(TypeRef);
        b.finish_node();
        let root = b.finish();
        let ty = root.first_child_of(TypeRef).unwrap();
        assert_eq!(ty.span(), Span::empty(1));
    }

    #[test]
    fn test_root_frame_collects_top_level_tokens() {
        let mut b = TreeBuilder::new();
        b.token(tok(T::Whitespace, " ", 0));
        b.start_node(PartyDecl);
        b.token(tok(T::Party, "party", 1));
        b.finish_node();
        b.token(tok(T::Whitespace, "\n", 6));
        let root = b.finish();
        assert_eq!(root.kind(), File);
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.text(), " party\n");
        assert_eq!(root.first_child_of(PartyDecl).unwrap().span(), Span::new(1, 6));
    }

    #[test]
    fn test_finish_closes_open_frames() {
        let mut b = TreeBuilder::new();
        b.start_node(TxDecl);
        b.token(tok(T::Tx, "tx", 0));
        let root = b.finish();
        assert_eq!(root.first_child_of(TxDecl).unwrap().text(), "tx");
    }

    #[test]
    fn test_trailing_comma_child_or_sibling() {
        let mut b = TreeBuilder::new();
        b.start_node(ParamList);
        b.start_node(TxParam);
        b.token(tok(T::Ident, "a", 0));
        b.finish_node();
        b.token(tok(T::Comma, ",", 1));
        b.start_node(TxParam);
        b.token(tok(T::Ident, "b", 2));
        b.finish_node();
        b.start_node(RecordField);
        b.token(tok(T::Ident, "c", 3));
        b.token(tok(T::Comma, ",", 4));
        b.token(tok(T::Whitespace, " ", 5));
        b.finish_node();
        b.finish_node();
        let root = b.finish();

        let list = root.first_child_of(ParamList).unwrap();
        assert!(list.has_trailing_comma(0));
        assert!(!list.has_trailing_comma(2));
        assert!(list.has_trailing_comma(3));
        assert!(!list.has_trailing_comma(1), "tokens are not items");
    }

    #[test]
    fn test_descendants_preorder_and_find_at_offset() {
        let mut b = TreeBuilder::new();
        b.start_node(TxDecl);
        b.token(tok(T::Tx, "tx", 0));
        b.start_node(ParamList);
        b.token(tok(T::LParen, "(", 2));
        b.token(tok(T::RParen, ")", 3));
        b.finish_node();
        b.finish_node();
        let root = b.finish();

        let kinds: Vec<_> = root.descendants().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![File, TxDecl, ParamList]);
        assert_eq!(root.find_node_at_offset(3).map(|n| n.kind()), Some(ParamList));
        assert_eq!(root.find_node_at_offset(0).map(|n| n.kind()), Some(TxDecl));
        assert!(root.find_node_at_offset(9).is_none());
    }

    #[test]
    fn test_node_kind_names_parse_back() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.name().parse::<NodeKind>().unwrap(), *kind);
        }
        assert!("NOT_A_NODE".parse::<NodeKind>().is_err());
    }
}
