//! Semantic analysis for the Ember compiler front end: symbol tables, name
//! resolution, and type checking over the flat node store the parser
//! builds.
//!
//! Three passes run in order, each depending on the last:
//! [`scope::build_symbol_table`] assigns every declaration its own scope,
//! [`resolve::resolve_names`] binds every reference to a declaration, and
//! [`check::check`] resolves types and checks every expression.

pub mod check;
pub mod resolve;
pub mod scope;
pub mod types;

use ember_common::DiagnosticSink;
use ember_parser::NodeId;
use ember_parser::NodeStore;

pub use check::CheckResult;
pub use resolve::Resolutions;
pub use scope::ScopeTable;

/// Run every analysis pass over one parsed translation unit.
pub struct Analysis {
    pub scopes: ScopeTable,
    pub resolutions: Resolutions,
    pub result: CheckResult,
}

pub fn analyze(store: &NodeStore, root: NodeId, diags: &mut DiagnosticSink) -> Analysis {
    let scopes = scope::build_symbol_table(store, root, diags);
    let resolutions = resolve::resolve_names(store, root, &scopes, diags);
    let result = check::check(store, root, &scopes, &resolutions, diags);
    Analysis { scopes, resolutions, result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Token;
    use ember_lexer::Lexer;

    #[test]
    fn analyze_runs_all_three_passes_clean_on_valid_source() {
        let source = r#"
struct Point { x s32, y s32 }

fun distance(a Point, b Point) -> s32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    return dx * dx + dy * dy;
}
"#;
        let lexer = Lexer::new(source.as_bytes());
        let (tokens, lex_diags): (Vec<Token>, _) = lexer.tokenize();
        assert!(lex_diags.is_empty());
        let parsed = ember_parser::parse(tokens);
        assert!(parsed.diagnostics.is_empty());
        let mut diags = DiagnosticSink::new();
        let analysis = analyze(&parsed.store, parsed.root, &mut diags);
        assert!(diags.is_empty());
        assert!(!analysis.result.fn_sigs.is_empty());
    }

    #[test]
    fn analyze_reports_unresolved_name() {
        let source = "fun f() { let a = nope; }";
        let lexer = Lexer::new(source.as_bytes());
        let (tokens, _): (Vec<Token>, _) = lexer.tokenize();
        let parsed = ember_parser::parse(tokens);
        let mut diags = DiagnosticSink::new();
        let _ = analyze(&parsed.store, parsed.root, &mut diags);
        assert!(!diags.is_empty());
    }
}
