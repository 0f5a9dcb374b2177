//! The flat node store the parser builds into.
//!
//! Rather than a rowan-style Green/Red CST, the tree is a dense arena of
//! [`Node`] values addressed by [`NodeId`] — every later pass (symbol table
//! builder, name resolver, type resolver, type checker) walks this same
//! store and stamps extra fields onto nodes it cares about instead of
//! building its own side tree.

use ember_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// Every kind of node the parser produces. A flat, non-hierarchical
/// enumeration: a node's position in the tree (not its kind) says whether
/// it's e.g. a statement or an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    SourceFile,
    Import,
    VarDecl,
    FnDecl,
    FnParam,
    StructDecl,
    StructField,
    EnumDecl,
    EnumAlt,
    ErrorDecl,
    UnionDecl,
    UnionAlt,
    Binding,
    GenericParamList,
    GenericParam,

    // ── Statements ───────────────────────────────────────────────────
    IfStmt,
    WhileStmt,
    CaseStmt,
    CaseArm,
    ReturnStmt,
    CompStmt,
    ExprStmt,
    AssignStmt,

    // ── Types ────────────────────────────────────────────────────────
    Type,
    BuiltinType,
    PtrType,
    TupleType,
    StructType,
    TaggedUnionType,
    EnumType,

    // ── Identifiers ──────────────────────────────────────────────────
    ScopedIdent,
    Ident,

    // ── Expressions ──────────────────────────────────────────────────
    Atom,
    ParenExpr,
    CompositeLit,
    Call,
    FieldAccess,
    IndexExpr,
    UnaryExpr,
    BinExpr,
    Designator,
    InitList,
    ArgList,

    /// Wraps a single malformed token/production so parsing can continue.
    Error,
}

/// A child slot: either a real node, or a token payload attached directly
/// (identifier text, a literal's lexeme) with no node of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<Child>,
    /// For `Ident` nodes and atoms with lexeme payloads: the exact source
    /// text, copied out of the token stream so later passes don't need to
    /// re-slice the original buffer.
    pub text: Option<String>,
    /// Parsed numeric value, for `Atom` nodes over a `Num` token.
    pub num_value: Option<u64>,
    /// Set by a pass that hits an error while processing this node. Once
    /// set, later passes skip deeper diagnostics about this node's
    /// descendants to avoid cascades.
    pub has_error: bool,
}

impl Node {
    fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            text: None,
            num_value: None,
            has_error: false,
        }
    }
}

/// Owns every node produced while parsing one translation unit.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, span));
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` to `parent`'s child list and set `child`'s parent
    /// pointer. Every node except the root is added exactly once: this is
    /// the invariant the "no duplicate parenting" testable property checks.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(Child::Node(child));
    }

    pub fn set_text(&mut self, id: NodeId, text: String) {
        self.nodes[id.0 as usize].text = Some(text);
    }

    pub fn set_num_value(&mut self, id: NodeId, value: u64) {
        self.nodes[id.0 as usize].num_value = Some(value);
    }

    pub fn mark_error(&mut self, id: NodeId) {
        self.nodes[id.0 as usize].has_error = true;
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0 as usize].children.iter().map(|c| match c {
            Child::Node(n) => *n,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Depth-first pre-order walk starting at `root`, calling `visit` with
    /// each node's id before descending into its children.
    pub fn walk_preorder(&self, root: NodeId, mut visit: impl FnMut(NodeId)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            visit(id);
            let children: Vec<NodeId> = self.children(id).collect();
            for c in children.into_iter().rev() {
                stack.push(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_add_child_links_parent() {
        let mut store = NodeStore::new();
        let root = store.alloc(NodeKind::SourceFile, Span::new(0, 10));
        let child = store.alloc(NodeKind::VarDecl, Span::new(0, 5));
        store.add_child(root, child);
        assert_eq!(store.get(child).parent, Some(root));
        assert_eq!(store.children(root).collect::<Vec<_>>(), vec![child]);
    }

    #[test]
    fn walk_preorder_visits_every_node_once() {
        let mut store = NodeStore::new();
        let root = store.alloc(NodeKind::SourceFile, Span::new(0, 10));
        let a = store.alloc(NodeKind::VarDecl, Span::new(0, 5));
        let b = store.alloc(NodeKind::VarDecl, Span::new(5, 10));
        store.add_child(root, a);
        store.add_child(root, b);
        let mut seen = Vec::new();
        store.walk_preorder(root, |id| seen.push(id));
        assert_eq!(seen, vec![root, a, b]);
    }
}
