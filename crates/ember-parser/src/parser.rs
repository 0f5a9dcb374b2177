//! Recursive-descent / Pratt parser building directly into a [`NodeStore`].
//!
//! Unlike a rowan-style builder, which must append to a flat event log
//! because the green tree is immutable and built bottom-up in one pass,
//! this parser allocates each node only once it knows its full child list —
//! so postfix chains (`f(x).y[0]`) are built the ordinary recursive-descent
//! way: parse the primary, then fold postfix operators onto it directly,
//! no forward-parent bookkeeping needed.

use ember_common::{DiagnosticSink, Span, Token, TokenKind};

use crate::node::{NodeId, NodeKind, NodeStore};

pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    store: NodeStore,
    diagnostics: DiagnosticSink,
    prev_end: u32,
    /// Suppressed while parsing `if`/`while`/`case` scrutinee expressions,
    /// so `if x { ... }` parses as a condition followed by a block rather
    /// than `x` wrapped in a composite literal. Always cleared inside any
    /// bracketed subexpression, where the ambiguity can't arise.
    no_struct_lit: bool,
}

/// Tokens a statement/declaration parser can resynchronize on after an
/// error, so one bad construct doesn't swallow the rest of the file.
const SYNC: &[TokenKind] = &[
    TokenKind::Semicolon,
    TokenKind::RBrace,
    TokenKind::Let,
    TokenKind::Fun,
    TokenKind::Struct,
    TokenKind::Enum,
    TokenKind::Union,
    TokenKind::Error,
    TokenKind::Import,
    TokenKind::Eof,
];

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token<'src>>) -> Self {
        // Comments are trivia: the parser never sees them.
        let tokens: Vec<Token<'src>> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        Self {
            tokens,
            pos: 0,
            store: NodeStore::new(),
            diagnostics: DiagnosticSink::new(),
            prev_end: 0,
            no_struct_lit: false,
        }
    }

    pub fn finish(self) -> (NodeStore, DiagnosticSink) {
        (self.store, self.diagnostics)
    }

    // ── Token stream primitives ─────────────────────────────────────

    fn cur(&self) -> Token<'src> {
        self.tokens[self.pos]
    }

    fn kind(&self) -> TokenKind {
        self.cur().kind
    }

    fn at(&self, k: TokenKind) -> bool {
        self.kind() == k
    }

    /// The kind of the token `offset` slots ahead of the cursor, `Eof` past
    /// the end of the stream. Used for the one-token lookahead that
    /// disambiguates a named argument/initializer (`name = expr`) from a
    /// plain positional one without backtracking.
    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    fn bump(&mut self) -> Token<'src> {
        let tok = self.cur();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.prev_end = tok.span.end;
        tok
    }

    fn error(&mut self, message: &str) {
        self.diagnostics.push(self.cur().span.start, message.to_string());
    }

    fn expect(&mut self, k: TokenKind, what: &str) -> Option<Token<'src>> {
        if self.at(k) {
            Some(self.bump())
        } else {
            self.error(&format!("expected {what}"));
            None
        }
    }

    /// Consume tokens until a synchronizing token (or EOF) is reached,
    /// without consuming the sync token itself. Guarantees every top-level
    /// parse loop makes progress even on malformed input.
    fn recover(&mut self) {
        while !SYNC.contains(&self.kind()) && !self.at_eof() {
            self.bump();
        }
    }

    // ── Node construction ────────────────────────────────────────────

    fn finish_node(&mut self, kind: NodeKind, start: u32, children: &[NodeId]) -> NodeId {
        let id = self.store.alloc(kind, Span::new(start, self.prev_end));
        for &c in children {
            self.store.add_child(id, c);
        }
        id
    }

    fn ident_node(&mut self) -> NodeId {
        let start = self.cur().span.start;
        if !self.at(TokenKind::Ident) {
            self.error("expected identifier");
            let id = self.store.alloc(NodeKind::Error, Span::new(start, start));
            self.store.mark_error(id);
            return id;
        }
        let tok = self.bump();
        let id = self.store.alloc(NodeKind::Ident, tok.span);
        self.store.set_text(id, tok.text().to_string());
        id
    }

    // ── Entry point ──────────────────────────────────────────────────

    pub fn parse_source_file(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let mut children = Vec::new();
        while !self.at_eof() {
            if let Some(decl) = self.parse_top_level() {
                children.push(decl);
            }
        }
        self.finish_node(NodeKind::SourceFile, start, &children)
    }

    fn parse_top_level(&mut self) -> Option<NodeId> {
        let before = self.pos;
        let node = match self.kind() {
            TokenKind::Import => Some(self.parse_import()),
            TokenKind::Let => Some(self.parse_var_decl()),
            TokenKind::Fun => Some(self.parse_fn_decl()),
            TokenKind::Struct => Some(self.parse_struct_decl()),
            TokenKind::Enum => Some(self.parse_enum_decl()),
            TokenKind::Union => Some(self.parse_union_decl()),
            TokenKind::Error => Some(self.parse_error_decl()),
            _ => {
                self.error("expected a declaration");
                None
            }
        };
        if self.pos == before {
            // ensure_progress: the grammar rule above consumed nothing.
            self.recover();
        }
        node
    }

    // ── Declarations ───────────────────────────────────────────────

    fn parse_import(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // import
        let path = self.parse_scoped_ident();
        self.expect(TokenKind::Semicolon, "`;` after import");
        self.finish_node(NodeKind::Import, start, &[path])
    }

    fn parse_var_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // let
        self.eat(TokenKind::Mut);
        let binding = self.parse_binding();
        let mut children = vec![binding];
        if self.eat(TokenKind::Colon) {
            // Wrapped in a `Type` node so a later pass can tell a type
            // annotation apart from an initializer positionally -- both a
            // type and an expression can be a bare `ScopedIdent`, so the
            // node kind alone wouldn't disambiguate an annotation-only
            // declaration from an initializer-only one.
            let tstart = self.cur().span.start;
            let ty = self.parse_type();
            children.push(self.finish_node(NodeKind::Type, tstart, &[ty]));
        }
        if self.eat(TokenKind::Eq) {
            children.push(self.parse_expr(0));
        }
        self.expect(TokenKind::Semicolon, "`;` after variable declaration");
        self.finish_node(NodeKind::VarDecl, start, &children)
    }

    fn parse_binding(&mut self) -> NodeId {
        let start = self.cur().span.start;
        if self.eat(TokenKind::LParen) {
            let mut names = vec![self.ident_node()];
            while self.eat(TokenKind::Comma) {
                names.push(self.ident_node());
            }
            self.expect(TokenKind::RParen, "`)` to close destructuring binding");
            return self.finish_node(NodeKind::Binding, start, &names);
        }
        let name = self.ident_node();
        self.finish_node(NodeKind::Binding, start, &[name])
    }

    fn parse_fn_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // fun
        let name = self.ident_node();
        let mut children = vec![name];
        if self.at(TokenKind::Lt) {
            children.push(self.parse_generic_param_list());
        }
        self.expect(TokenKind::LParen, "`(` to start parameter list");
        while !self.at(TokenKind::RParen) && !self.at_eof() {
            children.push(self.parse_fn_param());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` to close parameter list");
        if self.eat(TokenKind::Arrow) {
            children.push(self.parse_type());
        }
        children.push(self.parse_compound_stmt());
        self.finish_node(NodeKind::FnDecl, start, &children)
    }

    fn parse_generic_param_list(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // <
        let mut params = Vec::new();
        while !self.at(TokenKind::Gt) && !self.at_eof() {
            let pstart = self.cur().span.start;
            let name = self.ident_node();
            params.push(self.finish_node(NodeKind::GenericParam, pstart, &[name]));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>` to close generic parameter list");
        self.finish_node(NodeKind::GenericParamList, start, &params)
    }

    fn parse_fn_param(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let name = self.ident_node();
        let ty = self.parse_type();
        self.finish_node(NodeKind::FnParam, start, &[name, ty])
    }

    fn parse_struct_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // struct
        let name = self.ident_node();
        let mut children = vec![name];
        self.expect(TokenKind::LBrace, "`{` to open struct body");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            children.push(self.parse_struct_field());
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close struct body");
        self.finish_node(NodeKind::StructDecl, start, &children)
    }

    fn parse_struct_field(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let name = self.ident_node();
        let ty = self.parse_type();
        self.finish_node(NodeKind::StructField, start, &[name, ty])
    }

    fn parse_enum_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // enum
        let name = self.ident_node();
        let mut children = vec![name];
        self.expect(TokenKind::LBrace, "`{` to open enum body");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let astart = self.cur().span.start;
            let alt_name = self.ident_node();
            children.push(self.finish_node(NodeKind::EnumAlt, astart, &[alt_name]));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close enum body");
        self.finish_node(NodeKind::EnumDecl, start, &children)
    }

    fn parse_union_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // union
        let name = self.ident_node();
        let mut children = vec![name];
        self.expect(TokenKind::LBrace, "`{` to open union body");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            children.push(self.parse_union_alt());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close union body");
        self.finish_node(NodeKind::UnionDecl, start, &children)
    }

    /// A union alternative is either `Name(Type)` (`UNION_ALT_TYPE`) or
    /// `Name { field: Type, ... }` (`UNION_ALT_INLINE_DECL`), mirroring the
    /// two alternative-source shapes the type resolver distinguishes.
    fn parse_union_alt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let name = self.ident_node();
        if self.eat(TokenKind::LParen) {
            let ty = self.parse_type();
            self.expect(TokenKind::RParen, "`)` to close union alternative payload");
            return self.finish_node(NodeKind::UnionAlt, start, &[name, ty]);
        }
        if self.at(TokenKind::LBrace) {
            let inline = self.parse_struct_type();
            return self.finish_node(NodeKind::UnionAlt, start, &[name, inline]);
        }
        self.finish_node(NodeKind::UnionAlt, start, &[name])
    }

    fn parse_error_decl(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // error
        let name = self.ident_node();
        let mut children = vec![name];
        if self.eat(TokenKind::LParen) {
            children.push(self.parse_type());
            self.expect(TokenKind::RParen, "`)` to close error payload type");
        }
        self.expect(TokenKind::Semicolon, "`;` after error declaration");
        self.finish_node(NodeKind::ErrorDecl, start, &children)
    }

    // ── Statements ───────────────────────────────────────────────────

    fn parse_compound_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.expect(TokenKind::LBrace, "`{` to open a block");
        let mut children = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            children.push(self.parse_stmt());
            if self.pos == before {
                self.recover();
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close a block");
        self.finish_node(NodeKind::CompStmt, start, &children)
    }

    fn parse_stmt(&mut self) -> NodeId {
        match self.kind() {
            TokenKind::Let => self.parse_var_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Case => self.parse_case_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::LBrace => self.parse_compound_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_condition(&mut self) -> NodeId {
        let saved = self.no_struct_lit;
        self.no_struct_lit = true;
        let cond = self.parse_expr(0);
        self.no_struct_lit = saved;
        cond
    }

    fn parse_if_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // if
        let cond = self.parse_condition();
        let then_branch = self.parse_compound_stmt();
        let mut children = vec![cond, then_branch];
        if self.eat(TokenKind::Else) {
            let else_branch = if self.at(TokenKind::If) {
                self.parse_if_stmt()
            } else {
                self.parse_compound_stmt()
            };
            children.push(else_branch);
        }
        self.finish_node(NodeKind::IfStmt, start, &children)
    }

    fn parse_while_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // while
        let cond = self.parse_condition();
        let body = self.parse_compound_stmt();
        self.finish_node(NodeKind::WhileStmt, start, &[cond, body])
    }

    fn parse_case_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // case
        let scrutinee = self.parse_condition();
        let mut children = vec![scrutinee];
        self.expect(TokenKind::LBrace, "`{` to open case body");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let astart = self.cur().span.start;
            let pattern = self.parse_condition();
            self.expect(TokenKind::Arrow, "`->` after case pattern");
            let body = self.parse_compound_stmt();
            children.push(self.finish_node(NodeKind::CaseArm, astart, &[pattern, body]));
        }
        self.expect(TokenKind::RBrace, "`}` to close case body");
        self.finish_node(NodeKind::CaseStmt, start, &children)
    }

    fn parse_return_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // return
        let mut children = Vec::new();
        if !self.at(TokenKind::Semicolon) {
            children.push(self.parse_expr(0));
        }
        self.expect(TokenKind::Semicolon, "`;` after return");
        self.finish_node(NodeKind::ReturnStmt, start, &children)
    }

    /// Either a plain expression statement or an assignment (`lvalue =
    /// rvalue;`): both start the same way, so the `=` is only distinguished
    /// after the left side has already been parsed as an expression.
    fn parse_expr_stmt(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let expr = self.parse_expr(0);
        if self.eat(TokenKind::Eq) {
            let value = self.parse_expr(0);
            self.expect(TokenKind::Semicolon, "`;` after assignment");
            return self.finish_node(NodeKind::AssignStmt, start, &[expr, value]);
        }
        self.expect(TokenKind::Semicolon, "`;` after expression statement");
        self.finish_node(NodeKind::ExprStmt, start, &[expr])
    }

    // ── Types ──────────────────────────────────────────────────────

    fn parse_type(&mut self) -> NodeId {
        let start = self.cur().span.start;
        if ember_common::is_builtin_type(self.kind()) {
            let tok = self.bump();
            let id = self.finish_node(NodeKind::BuiltinType, start, &[]);
            self.store.set_text(id, tok.text().to_string());
            return id;
        }
        match self.kind() {
            TokenKind::Star => {
                self.bump();
                let inner = self.parse_type();
                self.finish_node(NodeKind::PtrType, start, &[inner])
            }
            TokenKind::LParen => {
                self.bump();
                let mut elems = Vec::new();
                while !self.at(TokenKind::RParen) && !self.at_eof() {
                    elems.push(self.parse_type());
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "`)` to close tuple type");
                self.finish_node(NodeKind::TupleType, start, &elems)
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Union => self.parse_tagged_union_type(),
            TokenKind::Enum => self.parse_enum_type(),
            TokenKind::Ident | TokenKind::ColonColon => self.parse_scoped_ident(),
            _ => {
                self.error("expected a type");
                let id = self.store.alloc(NodeKind::Error, Span::new(start, start));
                self.store.mark_error(id);
                id
            }
        }
    }

    fn parse_struct_type(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // struct
        self.expect(TokenKind::LBrace, "`{` to open struct type body");
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            fields.push(self.parse_struct_field());
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close struct type body");
        self.finish_node(NodeKind::StructType, start, &fields)
    }

    fn parse_tagged_union_type(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // union
        self.expect(TokenKind::LBrace, "`{` to open union type body");
        let mut alts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            // Nested anonymous unions are rejected by the type resolver, not
            // the parser: the grammar here just disallows a bare `union`
            // keyword starting an alternative.
            if self.at(TokenKind::Union) {
                self.error("nested anonymous union is not allowed here");
            }
            alts.push(self.parse_union_alt());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close union type body");
        self.finish_node(NodeKind::TaggedUnionType, start, &alts)
    }

    fn parse_enum_type(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // enum
        self.expect(TokenKind::LBrace, "`{` to open enum type body");
        let mut alts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let astart = self.cur().span.start;
            let name = self.ident_node();
            alts.push(self.finish_node(NodeKind::EnumAlt, astart, &[name]));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close enum type body");
        self.finish_node(NodeKind::EnumType, start, &alts)
    }

    /// `foo::bar::baz` or the inferred form `::bar::baz` (leading `::`,
    /// synthesized empty first component, resolved later against a type
    /// hint rather than lexical scope).
    fn parse_scoped_ident(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let mut segments = Vec::new();
        if self.at(TokenKind::ColonColon) {
            let empty_start = self.cur().span.start;
            let empty = self.store.alloc(NodeKind::Ident, Span::new(empty_start, empty_start));
            self.store.set_text(empty, String::new());
            segments.push(empty);
        } else {
            segments.push(self.ident_node());
        }
        while self.eat(TokenKind::ColonColon) {
            segments.push(self.ident_node());
        }
        self.finish_node(NodeKind::ScopedIdent, start, &segments)
    }

    // ── Expressions (Pratt) ────────────────────────────────────────

    fn parse_expr(&mut self, min_bp: u8) -> NodeId {
        let start = self.cur().span.start;
        let mut lhs = self.parse_prefix();
        loop {
            let Some((op, lbp, rbp)) = infix_binding_power(self.kind()) else {
                break;
            };
            if lbp < min_bp {
                break;
            }
            let tok = self.bump();
            let _ = op;
            let rhs = self.parse_expr(rbp);
            let id = self.finish_node(NodeKind::BinExpr, start, &[lhs, rhs]);
            self.store.set_text(id, tok.text().to_string());
            lhs = id;
        }
        lhs
    }

    fn parse_prefix(&mut self) -> NodeId {
        let start = self.cur().span.start;
        match self.kind() {
            TokenKind::Minus | TokenKind::Bang | TokenKind::Amp | TokenKind::Star => {
                let tok = self.bump();
                let operand = self.parse_prefix();
                let id = self.finish_node(NodeKind::UnaryExpr, start, &[operand]);
                self.store.set_text(id, tok.text().to_string());
                id
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> NodeId {
        let start = self.cur().span.start;
        let mut expr = self.parse_primary();
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.bump();
                    let field = self.ident_node();
                    expr = self.finish_node(NodeKind::FieldAccess, start, &[expr, field]);
                }
                TokenKind::LParen => {
                    let arg_list = self.parse_arg_list();
                    expr = self.finish_node(NodeKind::Call, start, &[expr, arg_list]);
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.with_struct_lit_allowed(|p| p.parse_expr(0));
                    self.expect(TokenKind::RBracket, "`]` to close index expression");
                    expr = self.finish_node(NodeKind::IndexExpr, start, &[expr, index]);
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus | TokenKind::Question => {
                    let tok = self.bump();
                    expr = self.finish_node(NodeKind::UnaryExpr, start, &[expr]);
                    self.store.set_text(expr, tok.text().to_string());
                }
                TokenKind::LBrace if self.can_start_composite_lit(expr) => {
                    let init = self.parse_init_list();
                    expr = self.finish_node(NodeKind::CompositeLit, start, &[expr, init]);
                }
                _ => break,
            }
        }
        expr
    }

    /// A `{` only starts a composite literal directly after a type-shaped
    /// primary (a scoped identifier or builtin type), never after an
    /// arbitrary expression — this keeps `if x { ... }` from being
    /// misparsed as `if (x{...})`.
    fn can_start_composite_lit(&self, expr: NodeId) -> bool {
        !self.no_struct_lit
            && matches!(
                self.store.get(expr).kind,
                NodeKind::ScopedIdent | NodeKind::BuiltinType
            )
    }

    /// Run `f` with composite-literal parsing re-enabled, restoring the
    /// previous setting afterward. Used inside any bracketed subexpression,
    /// where `{` can never be mistaken for a following block.
    fn with_struct_lit_allowed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.no_struct_lit;
        self.no_struct_lit = false;
        let result = f(self);
        self.no_struct_lit = saved;
        result
    }

    fn parse_arg_list(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // (
        let mut args = Vec::new();
        self.with_struct_lit_allowed(|p| {
            while !p.at(TokenKind::RParen) && !p.at_eof() {
                args.push(p.parse_call_arg());
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        });
        self.expect(TokenKind::RParen, "`)` to close argument list");
        self.finish_node(NodeKind::ArgList, start, &args)
    }

    fn parse_init_list(&mut self) -> NodeId {
        let start = self.cur().span.start;
        self.bump(); // {
        let mut entries = Vec::new();
        self.with_struct_lit_allowed(|p| {
            while !p.at(TokenKind::RBrace) && !p.at_eof() {
                entries.push(p.parse_call_arg());
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        });
        self.expect(TokenKind::RBrace, "`}` to close composite literal");
        self.finish_node(NodeKind::InitList, start, &entries)
    }

    /// An argument list entry and a composite-literal entry share this same
    /// grammar: a plain expression, or a named form (`name = expr`)
    /// disambiguated by a one-token lookahead past the identifier (no
    /// dot-designator syntax -- the name stands alone on the left of `=`).
    fn parse_call_arg(&mut self) -> NodeId {
        let start = self.cur().span.start;
        if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::Eq {
            let name = self.ident_node();
            self.bump(); // =
            let value = self.parse_expr(0);
            return self.finish_node(NodeKind::Designator, start, &[name, value]);
        }
        self.parse_expr(0)
    }

    fn parse_primary(&mut self) -> NodeId {
        let start = self.cur().span.start;
        match self.kind() {
            TokenKind::Num => {
                let tok = self.bump();
                let id = self.store.alloc(NodeKind::Atom, tok.span);
                if let Some(v) = tok.value {
                    self.store.set_num_value(id, v);
                }
                id
            }
            TokenKind::Str | TokenKind::Char | TokenKind::True | TokenKind::False => {
                let tok = self.bump();
                let id = self.store.alloc(NodeKind::Atom, tok.span);
                self.store.set_text(id, tok.text().to_string());
                id
            }
            TokenKind::Ident | TokenKind::ColonColon => self.parse_scoped_ident(),
            tk if ember_common::is_builtin_type(tk) => self.parse_type(),
            TokenKind::LParen => {
                self.bump();
                let inner = self.with_struct_lit_allowed(|p| p.parse_expr(0));
                self.expect(TokenKind::RParen, "`)` to close parenthesized expression");
                self.finish_node(NodeKind::ParenExpr, start, &[inner])
            }
            _ => {
                self.error("expected an expression");
                let id = self.store.alloc(NodeKind::Error, Span::new(start, start));
                self.store.mark_error(id);
                // Consume the offending token so the caller's loop still
                // makes progress.
                if !self.at_eof() {
                    self.bump();
                }
                id
            }
        }
    }

    fn eat(&mut self, k: TokenKind) -> bool {
        if self.at(k) {
            self.bump();
            true
        } else {
            false
        }
    }
}

/// `(left binding power, right binding power)` for a binary operator, per
/// the eleven-tier precedence table: postfix and unary bind tighter than
/// any of these (handled directly by `parse_prefix`/`parse_postfix`); shift
/// operators are reserved and have no surface syntax, so they never appear
/// here.
fn infix_binding_power(kind: TokenKind) -> Option<(TokenKind, u8, u8)> {
    use TokenKind::*;
    let bp = match kind {
        Or => (1, 2),
        And => (3, 4),
        Pipe => (5, 6),
        Amp => (7, 8),
        EqEq | NotEq => (9, 10),
        Lt | Gt | LtEq | GtEq => (11, 12),
        Plus | Minus => (15, 16),
        Star | Slash | Percent => (17, 18),
        _ => return None,
    };
    Some((kind, bp.0, bp.1))
}
