//! Scopes and the symbol table builder.
//!
//! A `Scope` is a flat name→entry map plus a link to its lexical parent.
//! Every declaration-shaped node (`FnDecl`, `StructDecl`, `CompStmt`, ...)
//! owns exactly one scope, built bottom-up in a single DFS pass before any
//! reference is resolved against it.

use rustc_hash::FxHashMap;

use ember_common::DiagnosticSink;
use ember_parser::{NodeId, NodeKind, NodeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// One bound name within a scope: the node that introduced it (a decl,
/// param, or binding), and — for member lookup through a type hint — a
/// nested scope of its own (e.g. a struct's field scope).
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    pub name: String,
    pub decl: NodeId,
    pub sub_scope: Option<ScopeId>,
    /// Non-`None` only for entries introduced by an outer scope that this
    /// one also binds; direct (hint-based) lookups never need to chase
    /// this, but lexical lookups do.
    pub shadows: Option<Box<ScopeEntry>>,
}

#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    entries: FxHashMap<String, ScopeEntry>,
    order: Vec<String>,
}

impl Scope {
    pub fn insert(&mut self, name: String, decl: NodeId, sub_scope: Option<ScopeId>) {
        let shadowed = self.entries.remove(&name).map(Box::new);
        self.order.push(name.clone());
        self.entries.insert(
            name.clone(),
            ScopeEntry {
                name,
                decl,
                sub_scope,
                shadows: shadowed,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeEntry> {
        self.order.iter().filter_map(|n| self.entries.get(n))
    }
}

#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    /// The scope each node owns, if any (decls, blocks, the source file).
    owner: FxHashMap<NodeId, ScopeId>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            ..Default::default()
        });
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.owner.get(&node).copied()
    }

    /// Walk up from `scope`, returning the first entry bound to `name`.
    pub fn lexical_lookup(&self, scope: ScopeId, name: &str) -> Option<&ScopeEntry> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let s = self.get(id);
            if let Some(entry) = s.get(name) {
                return Some(entry);
            }
            cur = s.parent;
        }
        None
    }

    /// Look up `name` directly in `scope` only, no walk to the parent —
    /// used for scoped-identifier member resolution (`Type::member`),
    /// which must not leak into enclosing lexical scopes.
    pub fn direct_lookup(&self, scope: ScopeId, name: &str) -> Option<&ScopeEntry> {
        self.get(scope).get(name)
    }
}

/// Build a scope for every declaration-shaped node in the tree, in one DFS.
/// Resolution (binding `Ident`/`ScopedIdent` references to the entries
/// recorded here) is a separate, later pass — see [`crate::resolve`].
pub fn build_symbol_table(store: &NodeStore, root: NodeId, diags: &mut DiagnosticSink) -> ScopeTable {
    let mut table = ScopeTable::new();
    let file_scope = table.alloc(None);
    table.owner.insert(root, file_scope);
    build_scope_for_children(store, root, file_scope, &mut table, diags);
    table
}

fn build_scope_for_children(
    store: &NodeStore,
    node: NodeId,
    scope: ScopeId,
    table: &mut ScopeTable,
    diags: &mut DiagnosticSink,
) {
    for child in store.children(node).collect::<Vec<_>>() {
        build_decl(store, child, scope, table, diags);
    }
}

fn ident_text(store: &NodeStore, id: NodeId) -> String {
    store.get(id).text.clone().unwrap_or_default()
}

fn build_decl(
    store: &NodeStore,
    node: NodeId,
    scope: ScopeId,
    table: &mut ScopeTable,
    diags: &mut DiagnosticSink,
) {
    let n = store.get(node);
    match n.kind {
        NodeKind::Import => {}

        NodeKind::VarDecl => {
            let binding = store.children(node).next();
            if let Some(binding) = binding {
                // Each bound name's decl is its own `Ident` node, not the
                // shared `VarDecl`/`Binding` -- a destructuring bind
                // (`let (a, b) = pair;`) introduces two distinct names that
                // need distinct per-name types later.
                for name_id in store.children(binding) {
                    let name = ident_text(store, name_id);
                    if name.is_empty() {
                        continue;
                    }
                    declare(table, scope, name, name_id, None, diags);
                }
            }
            build_scope_for_children(store, node, scope, table, diags);
        }

        NodeKind::FnDecl => {
            let children: Vec<_> = store.children(node).collect();
            let name_id = children[0];
            let name = ident_text(store, name_id);
            let fn_scope = table.alloc(Some(scope));
            if !name.is_empty() {
                declare(table, scope, name, node, Some(fn_scope), diags);
            }
            table.owner.insert(node, fn_scope);
            for &c in &children[1..] {
                match store.get(c).kind {
                    NodeKind::FnParam => {
                        let pname = ident_text(store, store.children(c).next().unwrap());
                        if !pname.is_empty() {
                            declare(table, fn_scope, pname, c, None, diags);
                        }
                    }
                    NodeKind::CompStmt => build_block(store, c, fn_scope, table, diags),
                    _ => {}
                }
            }
        }

        NodeKind::StructDecl => {
            let children: Vec<_> = store.children(node).collect();
            let name = ident_text(store, children[0]);
            let field_scope = table.alloc(Some(scope));
            table.owner.insert(node, field_scope);
            if !name.is_empty() {
                declare(table, scope, name, node, Some(field_scope), diags);
            }
            for &c in &children[1..] {
                if store.get(c).kind == NodeKind::StructField {
                    let fname = ident_text(store, store.children(c).next().unwrap());
                    if !fname.is_empty() {
                        declare(table, field_scope, fname, c, None, diags);
                    }
                }
            }
        }

        NodeKind::EnumDecl => {
            let children: Vec<_> = store.children(node).collect();
            let name = ident_text(store, children[0]);
            let alt_scope = table.alloc(Some(scope));
            table.owner.insert(node, alt_scope);
            if !name.is_empty() {
                declare(table, scope, name, node, Some(alt_scope), diags);
            }
            for &c in &children[1..] {
                if store.get(c).kind == NodeKind::EnumAlt {
                    let aname = ident_text(store, store.children(c).next().unwrap());
                    if !aname.is_empty() {
                        declare(table, alt_scope, aname, c, None, diags);
                    }
                }
            }
        }

        NodeKind::UnionDecl => {
            let children: Vec<_> = store.children(node).collect();
            let name = ident_text(store, children[0]);
            let alt_scope = table.alloc(Some(scope));
            table.owner.insert(node, alt_scope);
            if !name.is_empty() {
                declare(table, scope, name, node, Some(alt_scope), diags);
            }
            for &c in &children[1..] {
                if store.get(c).kind == NodeKind::UnionAlt {
                    let aname = ident_text(store, store.children(c).next().unwrap());
                    if !aname.is_empty() {
                        declare(table, alt_scope, aname, c, None, diags);
                    }
                }
            }
        }

        NodeKind::ErrorDecl => {
            let name = ident_text(store, store.children(node).next().unwrap());
            if !name.is_empty() {
                declare(table, scope, name, node, None, diags);
            }
        }

        NodeKind::CompStmt => build_block(store, node, scope, table, diags),

        NodeKind::IfStmt | NodeKind::WhileStmt | NodeKind::CaseStmt | NodeKind::CaseArm => {
            build_scope_for_children(store, node, scope, table, diags);
        }

        _ => {}
    }
}

/// A block introduces its own scope; `let`s bound inside it are visible
/// only to statements after them in program order and to nested blocks.
fn build_block(
    store: &NodeStore,
    node: NodeId,
    parent_scope: ScopeId,
    table: &mut ScopeTable,
    diags: &mut DiagnosticSink,
) {
    let block_scope = table.alloc(Some(parent_scope));
    table.owner.insert(node, block_scope);
    build_scope_for_children(store, node, block_scope, table, diags);
}

fn declare(
    table: &mut ScopeTable,
    scope: ScopeId,
    name: String,
    decl: NodeId,
    sub_scope: Option<ScopeId>,
    diags: &mut DiagnosticSink,
) {
    if let Some(existing) = table.get(scope).get(&name) {
        if existing.decl != decl {
            diags.push(
                0,
                format!("redeclaration of `{name}` in the same scope"),
            );
        }
    }
    table.get_mut(scope).insert(name, decl, sub_scope);
}
