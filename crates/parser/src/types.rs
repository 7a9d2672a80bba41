/// A call expression reduced to simple names.
///
/// Anything that cannot be reduced this far (computed callees, chained
/// attribute receivers) never reaches the graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallExpr {
    /// `f(...)`
    Bare { callee: String },

    /// `obj.method(...)` where `obj` is a simple name
    Qualified { receiver: String, method: String },
}

/// A node in the condensed parse tree.
///
/// Only declarations and call expressions survive condensation; all other
/// syntax is collapsed, with its interesting descendants hoisted into the
/// nearest surviving ancestor. Source order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    Function {
        name: String,
        children: Vec<SyntaxNode>,
    },
    Class {
        name: String,
        /// Abstract-base or test class: walked, but never a qualification.
        excluded: bool,
        children: Vec<SyntaxNode>,
    },
    Call {
        expr: CallExpr,
        /// Calls nested inside the argument list.
        children: Vec<SyntaxNode>,
    },
}

impl SyntaxNode {
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Function { children, .. }
            | SyntaxNode::Class { children, .. }
            | SyntaxNode::Call { children, .. } => children,
        }
    }
}

/// Condensed parse tree for one or more source files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    pub roots: Vec<SyntaxNode>,
}

impl ParseTree {
    pub fn new(roots: Vec<SyntaxNode>) -> Self {
        Self { roots }
    }

    /// Append another file's tree after this one, preserving file order.
    pub fn merge(&mut self, other: ParseTree) {
        self.roots.extend(other.roots);
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
