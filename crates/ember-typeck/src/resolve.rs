//! Name resolution: binds every `ScopedIdent` reference to the declaration
//! it names, using the scopes [`crate::scope::build_symbol_table`] already
//! built.
//!
//! The synthetic inferred form (`::red`, leading empty segment) is left
//! unresolved here on purpose — it has no lexical scope to look up against;
//! the type checker resolves it later against the type hint in scope at its
//! use site (spec's "inferred scoped identifier" rule).

use rustc_hash::FxHashMap;

use ember_common::DiagnosticSink;
use ember_parser::{NodeId, NodeKind, NodeStore};

use crate::scope::ScopeTable;

/// Maps a `ScopedIdent` node to the declaration its last segment names.
pub type Resolutions = FxHashMap<NodeId, NodeId>;

pub fn resolve_names(
    store: &NodeStore,
    root: NodeId,
    scopes: &ScopeTable,
    diags: &mut DiagnosticSink,
) -> Resolutions {
    let mut out = Resolutions::default();
    store.walk_preorder(root, |id| {
        if store.get(id).kind == NodeKind::ScopedIdent {
            resolve_one(store, id, scopes, diags, &mut out);
        }
    });
    out
}

fn enclosing_scope(store: &NodeStore, scopes: &ScopeTable, mut node: NodeId) -> Option<crate::scope::ScopeId> {
    loop {
        if let Some(s) = scopes.scope_of(node) {
            return Some(s);
        }
        node = store.get(node).parent?;
    }
}

fn resolve_one(
    store: &NodeStore,
    scoped_ident: NodeId,
    scopes: &ScopeTable,
    diags: &mut DiagnosticSink,
    out: &mut Resolutions,
) {
    let segments: Vec<NodeId> = store.children(scoped_ident).collect();
    let Some(&first) = segments.first() else { return };
    let first_text = store.get(first).text.clone().unwrap_or_default();

    // Leading `::` (inferred form): synthetic empty first segment, no
    // lexical scope to resolve against.
    if first_text.is_empty() {
        return;
    }

    let Some(scope) = enclosing_scope(store, scopes, scoped_ident) else {
        return;
    };
    let Some(entry) = scopes.lexical_lookup(scope, &first_text) else {
        diags.push(
            store.get(first).span.start,
            format!("could not resolve name `{first_text}`"),
        );
        return;
    };

    let mut decl = entry.decl;
    let mut sub_scope = entry.sub_scope;
    for &seg in &segments[1..] {
        let name = store.get(seg).text.clone().unwrap_or_default();
        let Some(inner_scope) = sub_scope else {
            diags.push(
                store.get(seg).span.start,
                format!("`{name}` has no members to look up `{name}` in"),
            );
            return;
        };
        let Some(next) = scopes.direct_lookup(inner_scope, &name) else {
            diags.push(store.get(seg).span.start, format!("could not resolve member `{name}`"));
            return;
        };
        decl = next.decl;
        sub_scope = next.sub_scope;
    }

    out.insert(scoped_ident, decl);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Token;
    use ember_lexer::Lexer;

    fn run(src: &str) -> (NodeStore, Resolutions, usize) {
        let lexer = Lexer::new(src.as_bytes());
        let (tokens, _): (Vec<Token>, _) = lexer.tokenize();
        let parsed = ember_parser::parse(tokens);
        let mut diags = DiagnosticSink::new();
        let scopes = crate::scope::build_symbol_table(&parsed.store, parsed.root, &mut diags);
        let res = resolve_names(&parsed.store, parsed.root, &scopes, &mut diags);
        (parsed.store, res, diags.len())
    }

    #[test]
    fn resolves_local_variable_reference() {
        let (store, res, diag_count) = run("fun f() { let a = 1; let b = a; }");
        assert_eq!(diag_count, 0);
        let scoped_idents: Vec<_> = store
            .ids()
            .filter(|id| store.get(*id).kind == NodeKind::ScopedIdent)
            .collect();
        assert!(scoped_idents.iter().any(|id| res.contains_key(id)));
    }

    #[test]
    fn unresolved_name_raises_one_diagnostic() {
        let (_store, _res, diag_count) = run("fun f() { let a = nope; }");
        assert_eq!(diag_count, 1);
    }

    #[test]
    fn inferred_form_is_left_for_the_checker() {
        let (store, res, diag_count) = run("fun f() { let c: Color = ::red; }");
        assert_eq!(diag_count, 0);
        let inferred = store
            .ids()
            .find(|id| {
                store.get(*id).kind == NodeKind::ScopedIdent
                    && store
                        .children(*id)
                        .next()
                        .map(|first| store.get(first).text.as_deref() == Some(""))
                        .unwrap_or(false)
            })
            .unwrap();
        assert!(!res.contains_key(&inferred));
    }

    #[test]
    fn resolves_enum_member_through_scoped_path() {
        let (store, res, diag_count) =
            run("enum Color { Red, Blue } fun f() { let c = Color::Red; }");
        assert_eq!(diag_count, 0);
        let usage = store
            .ids()
            .filter(|id| store.get(*id).kind == NodeKind::ScopedIdent)
            .find(|id| store.children(*id).count() == 2)
            .unwrap();
        assert!(res.contains_key(&usage));
    }
}
