//! The tree dumper: the acceptance format parser tests are written against.
//!
//! One node per line, two-space indentation, `name:` for a labeled child
//! node (itself dumped on the following indented lines) and `name=` for a
//! labeled leaf token (`'token-text'` inline). A node whose error flag is
//! set gets `(error!)` appended after its kind.

use std::fmt::Write;

use crate::node::{NodeId, NodeKind, NodeStore};

pub fn dump_tree(store: &NodeStore, root: NodeId) -> String {
    let mut out = String::new();
    write_node(store, root, 0, &mut out);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// The semantic field names for a node's children, in child order. `None`
/// labels fall back to a generic ordinal (`item0`, `item1`, ...), used for
/// variable-length lists (struct fields, call arguments, block statements).
fn field_names(kind: NodeKind) -> &'static [&'static str] {
    use NodeKind::*;
    match kind {
        VarDecl => &["binding", "type", "init"],
        FnDecl => &["name"],
        FnParam => &["name", "type"],
        StructDecl => &["name"],
        StructField => &["name", "type"],
        EnumDecl => &["name"],
        UnionDecl => &["name"],
        UnionAlt => &["name", "payload"],
        ErrorDecl => &["name", "payload"],
        Import => &["path"],
        IfStmt => &["cond", "then", "else"],
        WhileStmt => &["cond", "body"],
        CaseStmt => &["scrutinee"],
        CaseArm => &["pattern", "body"],
        ReturnStmt => &["value"],
        AssignStmt => &["target", "value"],
        PtrType => &["referent"],
        Designator => &["field", "value"],
        FieldAccess => &["base", "field"],
        IndexExpr => &["base", "index"],
        Call => &["callee", "args"],
        CompositeLit => &["type", "init"],
        UnaryExpr => &["operand"],
        BinExpr => &["lhs", "rhs"],
        _ => &[],
    }
}

fn write_node(store: &NodeStore, id: NodeId, depth: usize, out: &mut String) {
    let node = store.get(id);
    indent(out, depth);
    let _ = write!(out, "{:?}", node.kind);
    if node.has_error {
        out.push_str(" (error!)");
    }
    out.push_str(" {\n");

    if let Some(text) = &node.text {
        indent(out, depth + 1);
        let _ = writeln!(out, "text='{text}'");
    }
    if let Some(v) = node.num_value {
        indent(out, depth + 1);
        let _ = writeln!(out, "value={v}");
    }

    let labels = field_names(node.kind);
    for (i, child) in store.children(id).enumerate() {
        let label = labels.get(i).copied();
        let child_node = store.get(child);
        match label {
            Some(name) if matches!(child_node.kind, NodeKind::Ident) => {
                indent(out, depth + 1);
                let text = child_node.text.as_deref().unwrap_or("");
                let _ = writeln!(out, "{name}='{text}'");
            }
            Some(name) => {
                indent(out, depth + 1);
                let _ = writeln!(out, "{name}:");
                write_node(store, child, depth + 2, out);
            }
            None => {
                indent(out, depth + 1);
                let _ = writeln!(out, "item{i}:");
                write_node(store, child, depth + 2, out);
            }
        }
    }

    indent(out, depth);
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Token;
    use ember_lexer::Lexer;

    fn dump(src: &str) -> String {
        let lexer = Lexer::new(src.as_bytes());
        let (tokens, _): (Vec<Token>, _) = lexer.tokenize();
        let p = crate::parse(tokens);
        dump_tree(&p.store, p.root)
    }

    #[test]
    fn dump_shows_var_decl_fields() {
        let text = dump("let x: s32 = 1;");
        assert!(text.contains("VarDecl"));
        assert!(text.contains("binding:"));
        assert!(text.contains("type:"));
        assert!(text.contains("init:"));
    }

    #[test]
    fn dump_marks_error_nodes() {
        let text = dump("fun f() { let x = ; }");
        assert!(text.contains("(error!)"));
    }

    #[test]
    fn dump_renders_ident_leaves_inline() {
        let text = dump("struct Point { x s32 }");
        assert!(text.contains("name='Point'"));
        assert!(text.contains("name='x'"));
    }
}
