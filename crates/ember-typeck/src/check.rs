//! The type checker.
//!
//! Runs after [`crate::scope::build_symbol_table`] and [`crate::resolve::resolve_names`].
//! Walks every declaration, resolving its type annotations into [`TypeId`]s
//! and checking each function body expression by expression. A type hint
//! flows down into composite literals and inferred scoped identifiers
//! (`::red`) so they can be resolved without their own type annotation;
//! every other position checks by structural identity -- this language has
//! no implicit numeric conversion, so `u8` and `s32` are as distinct as
//! `string` and `bool`.

use rustc_hash::FxHashMap;

use ember_common::DiagnosticSink;
use ember_parser::{NodeId, NodeKind, NodeStore};

use crate::resolve::Resolutions;
use crate::scope::ScopeTable;
use crate::types::{Builtin, TypeId, TypeRepr, Types};

pub struct FnSig {
    pub params: Vec<TypeId>,
    pub param_names: Vec<String>,
    pub ret: TypeId,
}

pub struct CheckResult {
    pub types: Types,
    /// The type computed for every checked expression node.
    pub expr_types: FxHashMap<NodeId, TypeId>,
    /// The type of every declared name (a `VarDecl` binding's `Ident`, or a
    /// `FnParam`).
    pub decl_types: FxHashMap<NodeId, TypeId>,
    pub fn_sigs: FxHashMap<NodeId, FnSig>,
}

pub fn check(
    store: &NodeStore,
    root: NodeId,
    scopes: &ScopeTable,
    resolutions: &Resolutions,
    diags: &mut DiagnosticSink,
) -> CheckResult {
    let mut cx = Checker {
        store,
        scopes,
        resolutions,
        diags,
        types: Types::new(),
        expr_types: FxHashMap::default(),
        decl_types: FxHashMap::default(),
        fn_sigs: FxHashMap::default(),
    };
    cx.check_module(root);
    CheckResult {
        types: cx.types,
        expr_types: cx.expr_types,
        decl_types: cx.decl_types,
        fn_sigs: cx.fn_sigs,
    }
}

struct Checker<'a> {
    store: &'a NodeStore,
    scopes: &'a ScopeTable,
    resolutions: &'a Resolutions,
    diags: &'a mut DiagnosticSink,
    types: Types,
    expr_types: FxHashMap<NodeId, TypeId>,
    decl_types: FxHashMap<NodeId, TypeId>,
    fn_sigs: FxHashMap<NodeId, FnSig>,
}

fn text(store: &NodeStore, id: NodeId) -> String {
    store.get(id).text.clone().unwrap_or_default()
}

impl<'a> Checker<'a> {
    fn check_module(&mut self, root: NodeId) {
        let top: Vec<NodeId> = self.store.children(root).collect();

        // Pass 1: reserve a nominal id for every named type decl, so
        // forward and self references resolve regardless of source order.
        for &decl in &top {
            if matches!(
                self.store.get(decl).kind,
                NodeKind::StructDecl | NodeKind::EnumDecl | NodeKind::UnionDecl
            ) {
                self.types.reserve(decl);
            }
        }

        // Pass 2: fill in each named type's real representation.
        for &decl in &top {
            match self.store.get(decl).kind {
                NodeKind::StructDecl => self.fill_struct_decl(decl),
                NodeKind::EnumDecl => self.fill_enum_decl(decl),
                NodeKind::UnionDecl => self.fill_union_decl(decl),
                _ => {}
            }
        }

        // Pass 3: signatures, then bodies (so mutually-recursive calls
        // resolve even when the callee is declared later in the file).
        for &decl in &top {
            if self.store.get(decl).kind == NodeKind::FnDecl {
                self.register_fn_sig(decl);
            }
        }
        for &decl in &top {
            match self.store.get(decl).kind {
                NodeKind::FnDecl => self.check_fn_body(decl),
                NodeKind::VarDecl => self.check_var_decl(decl),
                NodeKind::ErrorDecl => self.check_error_decl(decl),
                _ => {}
            }
        }
    }

    fn struct_fields(&mut self, decl: NodeId) -> Vec<(String, TypeId)> {
        self.store
            .children(decl)
            .skip(1)
            .filter(|&c| self.store.get(c).kind == NodeKind::StructField)
            .map(|c| {
                let children: Vec<NodeId> = self.store.children(c).collect();
                let name = text(self.store, children[0]);
                let ty = self.resolve_type_expr(children[1]);
                (name, ty)
            })
            .collect()
    }

    fn fill_struct_decl(&mut self, decl: NodeId) {
        let fields = self.struct_fields(decl);
        let id = self.types.decl_type[&decl];
        self.types.fill(id, TypeRepr::Struct { decl: Some(decl), fields });
    }

    fn fill_enum_decl(&mut self, decl: NodeId) {
        let alts: Vec<String> = self
            .store
            .children(decl)
            .skip(1)
            .filter(|&c| self.store.get(c).kind == NodeKind::EnumAlt)
            .map(|c| text(self.store, self.store.children(c).next().unwrap()))
            .collect();
        let id = self.types.decl_type[&decl];
        self.types.fill(id, TypeRepr::Enum { decl: Some(decl), alts });
    }

    fn fill_union_decl(&mut self, decl: NodeId) {
        let alts: Vec<(String, Option<TypeId>)> = self
            .store
            .children(decl)
            .skip(1)
            .filter(|&c| self.store.get(c).kind == NodeKind::UnionAlt)
            .map(|c| {
                let children: Vec<NodeId> = self.store.children(c).collect();
                let name = text(self.store, children[0]);
                let payload = children.get(1).map(|&t| self.resolve_type_expr(t));
                (name, payload)
            })
            .collect();
        let id = self.types.decl_type[&decl];
        self.types.fill(id, TypeRepr::TaggedUnion { decl: Some(decl), alts });
    }

    fn register_fn_sig(&mut self, decl: NodeId) {
        let children: Vec<NodeId> = self.store.children(decl).collect();
        let mut params = Vec::new();
        let mut param_names = Vec::new();
        let mut ret = self.types.builtin(Builtin::Unit);
        for &c in &children[1..] {
            match self.store.get(c).kind {
                NodeKind::FnParam => {
                    let param_children: Vec<NodeId> = self.store.children(c).collect();
                    let (name_node, ty_node) = (param_children[0], param_children[1]);
                    let ty = self.resolve_type_expr(ty_node);
                    self.decl_types.insert(c, ty);
                    params.push(ty);
                    param_names.push(text(self.store, name_node));
                }
                NodeKind::GenericParamList | NodeKind::CompStmt => {}
                _ => ret = self.resolve_type_expr(c),
            }
        }
        self.fn_sigs.insert(decl, FnSig { params, param_names, ret });
    }

    fn check_fn_body(&mut self, decl: NodeId) {
        let body = self
            .store
            .children(decl)
            .find(|&c| self.store.get(c).kind == NodeKind::CompStmt)
            .expect("fn decl always has a body");
        let ret = self.fn_sigs[&decl].ret;
        self.check_block(body, ret);
    }

    fn check_error_decl(&mut self, decl: NodeId) {
        if let Some(payload) = self.store.children(decl).nth(1) {
            self.resolve_type_expr(payload);
        }
    }

    fn check_var_decl(&mut self, decl: NodeId) {
        let children: Vec<NodeId> = self.store.children(decl).collect();
        let binding = children[0];
        let names: Vec<NodeId> = self.store.children(binding).collect();

        let mut annotated = None;
        let mut init = None;
        for &c in &children[1..] {
            if self.store.get(c).kind == NodeKind::Type {
                let inner = self.store.children(c).next().unwrap();
                annotated = Some(self.resolve_type_expr(inner));
            } else {
                init = Some(c);
            }
        }

        let declared_ty = if let Some(ann) = annotated {
            if let Some(init_expr) = init {
                let init_ty = self.check_expr(init_expr, Some(ann));
                if !self.types.is_error(init_ty) && init_ty != ann {
                    self.mismatch(init_expr, ann, init_ty);
                }
            }
            ann
        } else if let Some(init_expr) = init {
            self.check_expr(init_expr, None)
        } else {
            self.types.error()
        };

        if names.len() == 1 {
            self.decl_types.insert(names[0], declared_ty);
        } else if let TypeRepr::Tuple(elems) = self.types.get(declared_ty).clone() {
            for (i, &name) in names.iter().enumerate() {
                let ty = elems.get(i).copied().unwrap_or_else(|| self.types.error());
                self.decl_types.insert(name, ty);
            }
        } else {
            for &name in &names {
                self.decl_types.insert(name, self.types.error());
            }
        }
    }

    fn check_block(&mut self, block: NodeId, ret_ty: TypeId) {
        for stmt in self.store.children(block).collect::<Vec<_>>() {
            self.check_stmt(stmt, ret_ty);
        }
    }

    fn check_stmt(&mut self, stmt: NodeId, ret_ty: TypeId) {
        match self.store.get(stmt).kind {
            NodeKind::VarDecl => self.check_var_decl(stmt),
            NodeKind::ExprStmt => {
                let expr = self.store.children(stmt).next().unwrap();
                self.check_expr(expr, None);
            }
            NodeKind::ReturnStmt => {
                if let Some(expr) = self.store.children(stmt).next() {
                    let got = self.check_expr(expr, Some(ret_ty));
                    if !self.types.is_error(got) && got != ret_ty {
                        self.mismatch(expr, ret_ty, got);
                    }
                } else if ret_ty != self.types.builtin(Builtin::Unit) {
                    self.diags.push(
                        self.store.get(stmt).span.start,
                        format!("expected a return value of type {}", self.types.display(ret_ty)),
                    );
                }
            }
            NodeKind::IfStmt => {
                let children: Vec<NodeId> = self.store.children(stmt).collect();
                self.check_condition(children[0]);
                self.check_block(children[1], ret_ty);
                if let Some(&else_branch) = children.get(2) {
                    if self.store.get(else_branch).kind == NodeKind::IfStmt {
                        self.check_stmt(else_branch, ret_ty);
                    } else {
                        self.check_block(else_branch, ret_ty);
                    }
                }
            }
            NodeKind::WhileStmt => {
                let children: Vec<NodeId> = self.store.children(stmt).collect();
                self.check_condition(children[0]);
                self.check_block(children[1], ret_ty);
            }
            NodeKind::CaseStmt => {
                let children: Vec<NodeId> = self.store.children(stmt).collect();
                let scrutinee_ty = self.check_expr(children[0], None);
                for &arm in &children[1..] {
                    let arm_children: Vec<NodeId> = self.store.children(arm).collect();
                    self.check_expr(arm_children[0], Some(scrutinee_ty));
                    self.check_block(arm_children[1], ret_ty);
                }
            }
            NodeKind::AssignStmt => {
                let children: Vec<NodeId> = self.store.children(stmt).collect();
                let target_ty = self.check_expr(children[0], None);
                let value_ty = self.check_expr(children[1], Some(target_ty));
                if !self.types.is_error(target_ty)
                    && !self.types.is_error(value_ty)
                    && target_ty != value_ty
                {
                    self.mismatch(children[1], target_ty, value_ty);
                }
            }
            NodeKind::CompStmt => self.check_block(stmt, ret_ty),
            NodeKind::Error => {}
            _ => {}
        }
    }

    /// `if`/`while`/`case` scrutinees must be a strict `bool` for `if`/`while`;
    /// `case` just evaluates its scrutinee as an ordinary expression (its
    /// type feeds the arm patterns as a hint, handled by the caller).
    fn check_condition(&mut self, cond: NodeId) {
        let ty = self.check_expr(cond, None);
        let bool_ty = self.types.builtin(Builtin::Bool);
        if !self.types.is_error(ty) && ty != bool_ty {
            self.mismatch(cond, bool_ty, ty);
        }
    }

    fn mismatch(&mut self, node: NodeId, expected: TypeId, got: TypeId) {
        self.diags.push(
            self.store.get(node).span.start,
            format!(
                "expected type {}, found {}",
                self.types.display(expected),
                self.types.display(got)
            ),
        );
    }

    fn resolve_type_expr(&mut self, ty_node: NodeId) -> TypeId {
        let n = self.store.get(ty_node);
        match n.kind {
            NodeKind::BuiltinType => {
                let name = text(self.store, ty_node);
                match Builtin::from_text(&name) {
                    Some(b) => self.types.builtin(b),
                    None => self.types.error(),
                }
            }
            NodeKind::PtrType => {
                let inner = self.store.children(ty_node).next().unwrap();
                let inner_ty = self.resolve_type_expr(inner);
                self.types.intern(TypeRepr::Ptr(inner_ty))
            }
            NodeKind::TupleType => {
                let elems: Vec<TypeId> = self
                    .store
                    .children(ty_node)
                    .map(|c| self.resolve_type_expr(c))
                    .collect();
                self.types.intern(TypeRepr::Tuple(elems))
            }
            NodeKind::StructType => {
                let fields: Vec<(String, TypeId)> = self
                    .store
                    .children(ty_node)
                    .map(|c| {
                        let children: Vec<NodeId> = self.store.children(c).collect();
                        let name = text(self.store, children[0]);
                        let ty = self.resolve_type_expr(children[1]);
                        (name, ty)
                    })
                    .collect();
                self.types.intern(TypeRepr::Struct { decl: None, fields })
            }
            NodeKind::TaggedUnionType => {
                let alts: Vec<(String, Option<TypeId>)> = self
                    .store
                    .children(ty_node)
                    .map(|c| {
                        let children: Vec<NodeId> = self.store.children(c).collect();
                        let name = text(self.store, children[0]);
                        let payload = children.get(1).map(|&t| self.resolve_type_expr(t));
                        (name, payload)
                    })
                    .collect();
                self.types.intern(TypeRepr::TaggedUnion { decl: None, alts })
            }
            NodeKind::EnumType => {
                let alts: Vec<String> = self
                    .store
                    .children(ty_node)
                    .map(|c| text(self.store, self.store.children(c).next().unwrap()))
                    .collect();
                self.types.intern(TypeRepr::Enum { decl: None, alts })
            }
            NodeKind::ScopedIdent => match self.resolutions.get(&ty_node) {
                Some(&decl) => self.types.decl_type.get(&decl).copied().unwrap_or_else(|| {
                    self.types.error()
                }),
                None => {
                    self.diags.push(n.span.start, "expected a type name".to_string());
                    self.types.error()
                }
            },
            _ => self.types.error(),
        }
    }

    fn check_expr(&mut self, expr: NodeId, hint: Option<TypeId>) -> TypeId {
        let ty = self.check_expr_inner(expr, hint);
        self.expr_types.insert(expr, ty);
        ty
    }

    fn check_expr_inner(&mut self, expr: NodeId, hint: Option<TypeId>) -> TypeId {
        let node = self.store.get(expr);
        match node.kind {
            NodeKind::Atom => self.check_atom(expr, hint),
            NodeKind::ParenExpr => {
                let inner = self.store.children(expr).next().unwrap();
                self.check_expr(inner, hint)
            }
            NodeKind::ScopedIdent => self.check_scoped_ident(expr, hint),
            NodeKind::FieldAccess => self.check_field_access(expr),
            NodeKind::IndexExpr => self.check_index_expr(expr),
            NodeKind::UnaryExpr => self.check_unary_expr(expr),
            NodeKind::BinExpr => self.check_bin_expr(expr),
            NodeKind::Call => self.check_call(expr),
            NodeKind::CompositeLit => self.check_composite_lit(expr),
            NodeKind::BuiltinType => self.resolve_type_expr(expr),
            NodeKind::Error => self.types.error(),
            _ => self.types.error(),
        }
    }

    fn check_atom(&mut self, atom: NodeId, hint: Option<TypeId>) -> TypeId {
        let n = self.store.get(atom);
        if n.num_value.is_some() {
            if let Some(h) = hint {
                if let TypeRepr::Builtin(b) = self.types.get(h) {
                    if b.is_numeric() {
                        return h;
                    }
                }
            }
            return self.types.builtin(Builtin::S32);
        }
        let t = n.text.as_deref().unwrap_or("");
        if t == "true" || t == "false" {
            return self.types.builtin(Builtin::Bool);
        }
        if t.starts_with('"') {
            return self.types.builtin(Builtin::String);
        }
        if t.starts_with('\'') {
            return self.types.builtin(Builtin::U8);
        }
        self.types.error()
    }

    fn check_scoped_ident(&mut self, node: NodeId, hint: Option<TypeId>) -> TypeId {
        let segments: Vec<NodeId> = self.store.children(node).collect();
        let first_empty = segments
            .first()
            .and_then(|&f| self.store.get(f).text.as_deref())
            .map(|t| t.is_empty())
            .unwrap_or(false);

        if first_empty {
            return self.check_inferred_scoped_ident(node, &segments, hint);
        }

        let Some(&decl) = self.resolutions.get(&node) else {
            return self.types.error();
        };
        self.type_of_decl(decl)
    }

    /// `::member` / `::member::inner` -- resolved against the type hint in
    /// scope at its use site, per the inferred-scoped-identifier rule,
    /// rather than against lexical scope (there is none to use here).
    fn check_inferred_scoped_ident(&mut self, node: NodeId, segments: &[NodeId], hint: Option<TypeId>) -> TypeId {
        let Some(hint_ty) = hint else {
            self.diags.push(
                self.store.get(node).span.start,
                "cannot infer the type of `::...` without a surrounding type hint".to_string(),
            );
            return self.types.error();
        };
        let decl = match self.types.get(hint_ty).clone() {
            TypeRepr::Enum { decl: Some(d), .. } | TypeRepr::TaggedUnion { decl: Some(d), .. } => d,
            _ => {
                self.diags.push(
                    self.store.get(node).span.start,
                    "the type hint here is not an enum or union".to_string(),
                );
                return self.types.error();
            }
        };
        let Some(scope) = self.scopes.scope_of(decl) else {
            return self.types.error();
        };
        for &seg in &segments[1..] {
            let name = text(self.store, seg);
            if self.scopes.direct_lookup(scope, &name).is_none() {
                self.diags.push(
                    self.store.get(seg).span.start,
                    format!("`{name}` is not a member of {}", self.types.display(hint_ty)),
                );
                return self.types.error();
            }
        }
        hint_ty
    }

    fn type_of_decl(&mut self, decl: NodeId) -> TypeId {
        match self.store.get(decl).kind {
            NodeKind::FnParam | NodeKind::Ident => self
                .decl_types
                .get(&decl)
                .copied()
                .unwrap_or_else(|| self.types.error()),
            NodeKind::StructDecl | NodeKind::EnumDecl | NodeKind::UnionDecl => {
                self.types.decl_type.get(&decl).copied().unwrap_or_else(|| self.types.error())
            }
            NodeKind::EnumAlt | NodeKind::UnionAlt => {
                // Member resolved through an explicit path (`Color::Red`):
                // its type is the enclosing enum/union's own type, found by
                // walking up to the owning decl.
                let parent = self.store.get(decl).parent;
                parent
                    .and_then(|p| self.types.decl_type.get(&p).copied())
                    .unwrap_or_else(|| self.types.error())
            }
            NodeKind::FnDecl => {
                // Bare function reference without a call; not otherwise
                // typed in this language, so this only matters as the
                // callee of a `Call`, handled separately in `check_call`.
                self.types.error()
            }
            _ => self.decl_types.get(&decl).copied().unwrap_or_else(|| self.types.error()),
        }
    }

    fn check_field_access(&mut self, node: NodeId) -> TypeId {
        let children: Vec<NodeId> = self.store.children(node).collect();
        let base_ty = self.check_expr(children[0], None);
        if self.types.is_error(base_ty) {
            return self.types.error();
        }
        let field_name = text(self.store, children[1]);
        let deref_ty = self.types.auto_deref(base_ty);
        match self.types.get(deref_ty).clone() {
            TypeRepr::Struct { fields, .. } => {
                match fields.iter().find(|(n, _)| *n == field_name) {
                    Some((_, ty)) => *ty,
                    None => {
                        self.diags.push(
                            self.store.get(children[1]).span.start,
                            format!("no field `{field_name}` on {}", self.types.display(deref_ty)),
                        );
                        self.types.error()
                    }
                }
            }
            _ => {
                self.diags.push(
                    self.store.get(children[0]).span.start,
                    format!("{} has no fields", self.types.display(base_ty)),
                );
                self.types.error()
            }
        }
    }

    fn check_index_expr(&mut self, node: NodeId) -> TypeId {
        let children: Vec<NodeId> = self.store.children(node).collect();
        let base_ty = self.check_expr(children[0], None);
        let index_ty = self.check_expr(children[1], None);
        if self.types.is_error(base_ty) || self.types.is_error(index_ty) {
            return self.types.error();
        }
        if !self.is_integer(index_ty) {
            self.diags.push(
                self.store.get(children[1]).span.start,
                "index expression must be an integer".to_string(),
            );
        }
        match self.types.get(base_ty).clone() {
            TypeRepr::Ptr(inner) => inner,
            _ => {
                self.diags.push(
                    self.store.get(children[0]).span.start,
                    format!("{} cannot be indexed", self.types.display(base_ty)),
                );
                self.types.error()
            }
        }
    }

    fn is_integer(&self, ty: TypeId) -> bool {
        matches!(self.types.get(ty), TypeRepr::Builtin(b) if b.is_integer())
    }

    fn is_numeric(&self, ty: TypeId) -> bool {
        matches!(self.types.get(ty), TypeRepr::Builtin(b) if b.is_numeric())
    }

    fn check_unary_expr(&mut self, node: NodeId) -> TypeId {
        let op = text(self.store, node);
        let operand = self.store.children(node).next().unwrap();
        match op.as_str() {
            "&" => {
                let inner = self.check_expr(operand, None);
                self.types.intern(TypeRepr::Ptr(inner))
            }
            "*" => {
                let inner = self.check_expr(operand, None);
                if self.types.is_error(inner) {
                    return self.types.error();
                }
                match self.types.get(inner).clone() {
                    TypeRepr::Ptr(pointee) => pointee,
                    _ => {
                        self.diags.push(
                            self.store.get(operand).span.start,
                            format!("cannot dereference {}", self.types.display(inner)),
                        );
                        self.types.error()
                    }
                }
            }
            "!" => {
                let inner = self.check_expr(operand, None);
                let bool_ty = self.types.builtin(Builtin::Bool);
                if !self.types.is_error(inner) && inner != bool_ty {
                    self.mismatch(operand, bool_ty, inner);
                }
                bool_ty
            }
            "-" | "++" | "--" => {
                let inner = self.check_expr(operand, None);
                if !self.types.is_error(inner) && !self.is_numeric(inner) {
                    self.diags.push(
                        self.store.get(operand).span.start,
                        format!("`{op}` requires a numeric operand, found {}", self.types.display(inner)),
                    );
                    return self.types.error();
                }
                inner
            }
            // `?` propagates an error-union payload through unchanged; the
            // surrounding function's own error set isn't modeled yet.
            "?" => self.check_expr(operand, None),
            _ => self.types.error(),
        }
    }

    fn check_bin_expr(&mut self, node: NodeId) -> TypeId {
        let op = text(self.store, node);
        let children: Vec<NodeId> = self.store.children(node).collect();
        let (lhs, rhs) = (children[0], children[1]);

        if op == "and" || op == "or" {
            let bool_ty = self.types.builtin(Builtin::Bool);
            let lt = self.check_expr(lhs, Some(bool_ty));
            let rt = self.check_expr(rhs, Some(bool_ty));
            if !self.types.is_error(lt) && lt != bool_ty {
                self.mismatch(lhs, bool_ty, lt);
            }
            if !self.types.is_error(rt) && rt != bool_ty {
                self.mismatch(rhs, bool_ty, rt);
            }
            return bool_ty;
        }

        let lt = self.check_expr(lhs, None);
        let rt = self.check_expr(rhs, Some(lt));
        if self.types.is_error(lt) || self.types.is_error(rt) {
            return self.types.error();
        }
        if lt != rt {
            self.mismatch(rhs, lt, rt);
            return self.types.error();
        }

        match op.as_str() {
            "==" | "!=" | "<" | ">" | "<=" | ">=" => self.types.builtin(Builtin::Bool),
            "+" | "-" | "*" | "/" | "%" => {
                if !self.is_numeric(lt) {
                    self.diags.push(
                        self.store.get(lhs).span.start,
                        format!("`{op}` requires numeric operands, found {}", self.types.display(lt)),
                    );
                    return self.types.error();
                }
                lt
            }
            "&" | "|" => {
                if !self.is_integer(lt) {
                    self.diags.push(
                        self.store.get(lhs).span.start,
                        format!("`{op}` requires integer operands, found {}", self.types.display(lt)),
                    );
                    return self.types.error();
                }
                lt
            }
            _ => self.types.error(),
        }
    }

    fn check_call(&mut self, node: NodeId) -> TypeId {
        let children: Vec<NodeId> = self.store.children(node).collect();
        let (callee, arg_list) = (children[0], children[1]);

        let fn_decl = match self.store.get(callee).kind {
            NodeKind::ScopedIdent => self.resolutions.get(&callee).copied(),
            _ => None,
        };
        self.check_expr(callee, None);

        let Some(fn_decl) = fn_decl.filter(|&d| self.store.get(d).kind == NodeKind::FnDecl) else {
            self.diags.push(self.store.get(callee).span.start, "callee is not a function".to_string());
            for arg in self.store.children(arg_list) {
                self.check_expr(self.call_arg_value(arg), None);
            }
            return self.types.error();
        };

        let params = self.fn_sigs[&fn_decl].params.clone();
        let param_names = self.fn_sigs[&fn_decl].param_names.clone();
        let ret = self.fn_sigs[&fn_decl].ret;
        let args: Vec<NodeId> = self.store.children(arg_list).collect();
        if args.len() != params.len() {
            self.diags.push(
                self.store.get(arg_list).span.start,
                format!("expected {} argument(s), found {}", params.len(), args.len()),
            );
        }
        let mut positional = 0;
        for &arg in &args {
            if self.store.get(arg).kind == NodeKind::Designator {
                let arg_children: Vec<NodeId> = self.store.children(arg).collect();
                let (name_node, value) = (arg_children[0], arg_children[1]);
                let arg_name = text(self.store, name_node);
                match param_names.iter().position(|n| *n == arg_name) {
                    Some(i) => {
                        let expected = params[i];
                        let got = self.check_expr(value, Some(expected));
                        if !self.types.is_error(got) && got != expected {
                            self.mismatch(value, expected, got);
                        }
                    }
                    None => {
                        self.diags.push(
                            self.store.get(name_node).span.start,
                            format!("no parameter named `{arg_name}`"),
                        );
                        self.check_expr(value, None);
                    }
                }
            } else {
                let hint = params.get(positional).copied();
                let got = self.check_expr(arg, hint);
                if let Some(expected) = hint {
                    if !self.types.is_error(got) && got != expected {
                        self.mismatch(arg, expected, got);
                    }
                }
                positional += 1;
            }
        }
        ret
    }

    /// The value half of a call/init-list entry: a `Designator`'s second
    /// child, or the entry itself when it's a plain positional expression.
    fn call_arg_value(&self, entry: NodeId) -> NodeId {
        if self.store.get(entry).kind == NodeKind::Designator {
            self.store.children(entry).nth(1).unwrap()
        } else {
            entry
        }
    }

    fn check_composite_lit(&mut self, node: NodeId) -> TypeId {
        let children: Vec<NodeId> = self.store.children(node).collect();
        let (ty_node, init_list) = (children[0], children[1]);
        let target_ty = self.check_expr(ty_node, None);
        if self.types.is_error(target_ty) {
            for entry in self.store.children(init_list) {
                let value = if self.store.get(entry).kind == NodeKind::Designator {
                    self.store.children(entry).nth(1).unwrap()
                } else {
                    entry
                };
                self.check_expr(value, None);
            }
            return self.types.error();
        }

        let fields = match self.types.get(target_ty).clone() {
            TypeRepr::Struct { fields, .. } => fields,
            _ => {
                self.diags.push(
                    self.store.get(ty_node).span.start,
                    format!("{} is not a struct type", self.types.display(target_ty)),
                );
                Vec::new()
            }
        };

        for (i, entry) in self.store.children(init_list).enumerate() {
            if self.store.get(entry).kind == NodeKind::Designator {
                let entry_children: Vec<NodeId> = self.store.children(entry).collect();
                let field_name = text(self.store, entry_children[0]);
                let value = entry_children[1];
                match fields.iter().find(|(n, _)| *n == field_name) {
                    Some((_, fty)) => {
                        let got = self.check_expr(value, Some(*fty));
                        if !self.types.is_error(got) && got != *fty {
                            self.mismatch(value, *fty, got);
                        }
                    }
                    None => {
                        self.diags.push(
                            self.store.get(entry_children[0]).span.start,
                            format!("no field `{field_name}` on {}", self.types.display(target_ty)),
                        );
                        self.check_expr(value, None);
                    }
                }
            } else if let Some((_, fty)) = fields.get(i) {
                let fty = *fty;
                let got = self.check_expr(entry, Some(fty));
                if !self.types.is_error(got) && got != fty {
                    self.mismatch(entry, fty, got);
                }
            } else {
                self.diags.push(
                    self.store.get(entry).span.start,
                    "too many initializers for this struct".to_string(),
                );
                self.check_expr(entry, None);
            }
        }
        target_ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Token;
    use ember_lexer::Lexer;

    fn check_source(src: &str) -> (CheckResult, usize) {
        let lexer = Lexer::new(src.as_bytes());
        let (tokens, _): (Vec<Token>, _) = lexer.tokenize();
        let parsed = ember_parser::parse(tokens);
        let mut diags = DiagnosticSink::new();
        let scopes = crate::scope::build_symbol_table(&parsed.store, parsed.root, &mut diags);
        let resolutions = crate::resolve::resolve_names(&parsed.store, parsed.root, &scopes, &mut diags);
        let result = check(&parsed.store, parsed.root, &scopes, &resolutions, &mut diags);
        (result, diags.len())
    }

    #[test]
    fn well_typed_function_has_no_diagnostics() {
        let (_, diags) = check_source("fun add(a s32, b s32) -> s32 { return a + b; }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn mismatched_return_type_is_reported() {
        let (_, diags) = check_source("fun f() -> s32 { return true; }");
        assert!(diags > 0);
    }

    #[test]
    fn struct_field_access_resolves_field_type() {
        let (_, diags) = check_source(
            "struct Point { x s32, y s32 } fun f(p Point) -> s32 { return p.x + p.y; }",
        );
        assert_eq!(diags, 0);
    }

    #[test]
    fn struct_composite_literal_checks_named_fields() {
        let (_, diags) = check_source(
            "struct Point { x s32, y s32 } fun f() { let p = Point{x=1,y=2}; }",
        );
        assert_eq!(diags, 0);
    }

    #[test]
    fn inferred_scoped_ident_resolves_through_hint() {
        let (_, diags) = check_source("enum Color { Red, Blue } fun f() { let c: Color = ::Red; }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn call_arg_count_mismatch_is_reported() {
        let (_, diags) = check_source("fun add(a s32, b s32) -> s32 { return a + b; } fun g() { add(1); }");
        assert!(diags > 0);
    }

    #[test]
    fn named_call_argument_matches_by_param_name() {
        let (_, diags) =
            check_source("fun add(a s32, b s32) -> s32 { return a + b; } fun g() -> s32 { return add(b=2, a=1); }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn pointer_dereference_and_address_of_round_trip() {
        let (_, diags) = check_source("fun f(a s32) -> s32 { let p = &a; return *p; }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn and_or_require_strict_bool_operands() {
        let (_, diags) = check_source("fun f(a bool, n s32) -> bool { return a and n; }");
        assert!(diags > 0);
    }

    #[test]
    fn self_referential_struct_resolves_through_pointer() {
        let (_, diags) = check_source("struct Node { value s32, next *Node }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn assignment_resolves_both_sides_to_the_same_declaration() {
        let (_, diags) = check_source("fun main() { let x = 10; x = 20; }");
        assert_eq!(diags, 0);
    }

    #[test]
    fn assignment_type_mismatch_is_reported() {
        let (_, diags) = check_source("fun f(a s32) { a = true; }");
        assert!(diags > 0);
    }
}
