//! Parser for the Ember compiler front end.
//!
//! Turns a token stream into a flat [`NodeStore`] (see [`node`]) rather than
//! a rowan green tree: later passes (symbol table builder, name resolver,
//! type resolver, type checker) all walk this same store and annotate it in
//! place.

pub mod dump;
pub mod node;
mod parser;

pub use dump::dump_tree;
pub use node::{Node, NodeId, NodeKind, NodeStore};

use ember_common::{DiagnosticSink, Token};
use parser::Parser;

/// Result of parsing one translation unit.
pub struct Parse {
    pub store: NodeStore,
    pub root: NodeId,
    pub diagnostics: DiagnosticSink,
}

/// Parse a token stream (as produced by `ember_lexer::Lexer::tokenize`)
/// into a [`Parse`].
pub fn parse(tokens: Vec<Token<'_>>) -> Parse {
    let mut parser = Parser::new(tokens);
    let root = parser.parse_source_file();
    let (store, diagnostics) = parser.finish();
    Parse {
        store,
        root,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_lexer::Lexer;

    fn parse_source(src: &str) -> Parse {
        let lexer = Lexer::new(src.as_bytes());
        let (tokens, _lex_diags) = lexer.tokenize();
        parse(tokens)
    }

    #[test]
    fn parses_var_decl() {
        let p = parse_source("let x: s32 = 1;");
        assert!(p.diagnostics.is_empty());
        assert_eq!(p.store.get(p.root).kind, NodeKind::SourceFile);
        let decl = p.store.children(p.root).next().unwrap();
        assert_eq!(p.store.get(decl).kind, NodeKind::VarDecl);
    }

    #[test]
    fn parses_fn_decl_with_params_and_return_type() {
        let p = parse_source("fun add(a s32, b s32) -> s32 { return a + b; }");
        assert!(p.diagnostics.is_empty());
        let decl = p.store.children(p.root).next().unwrap();
        assert_eq!(p.store.get(decl).kind, NodeKind::FnDecl);
    }

    #[test]
    fn parses_struct_decl() {
        let p = parse_source("struct Point { x s32, y s32 }");
        assert!(p.diagnostics.is_empty());
        let decl = p.store.children(p.root).next().unwrap();
        assert_eq!(p.store.get(decl).kind, NodeKind::StructDecl);
        assert_eq!(p.store.children(decl).count(), 3); // name + 2 fields
    }

    #[test]
    fn parses_if_else_without_composite_literal_ambiguity() {
        let p = parse_source("fun f(flag bool) -> s32 { if flag { return 1; } else { return 2; } }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_postfix_chain() {
        let p = parse_source("fun f(a Point) -> s32 { return a.x.y; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_composite_literal_with_named_fields() {
        let p = parse_source("fun f() { let p = Point{x=1,y=2}; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_assignment_statement() {
        let p = parse_source("fun main() { let x = 10; x = 20; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_named_call_argument() {
        let p = parse_source("fun f() { g(n=1); }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_scoped_ident_inferred_form() {
        let p = parse_source("fun f() { let c: Color = ::red; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_binary_precedence_chain() {
        let p = parse_source("fun f() -> s32 { return 1 + 2 * 3 and 4 or 5; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn unclosed_brace_is_reported_and_recovers() {
        let p = parse_source("fun f() { let x = 1;");
        assert!(!p.diagnostics.is_empty());
    }

    #[test]
    fn parses_union_decl_with_typed_alternative() {
        let p = parse_source("union Shape { Circle(s32), Square(s32) }");
        assert!(p.diagnostics.is_empty());
        let decl = p.store.children(p.root).next().unwrap();
        assert_eq!(p.store.get(decl).kind, NodeKind::UnionDecl);
    }

    #[test]
    fn parses_enum_decl() {
        let p = parse_source("enum Color { Red, Green, Blue }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_generic_fn_decl() {
        let p = parse_source("fun identity<T>(x T) -> T { return x; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_case_stmt() {
        let p = parse_source(
            "fun f(c Color) -> s32 { case c { ::red -> { return 1; } ::blue -> { return 2; } } }",
        );
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_destructuring_binding() {
        let p = parse_source("fun f() { let (a, b) = pair; }");
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn parses_import_and_error_decl() {
        let p = parse_source("import std::io;\nerror NotFound(string);");
        assert!(p.diagnostics.is_empty());
    }
}
