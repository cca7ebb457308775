//! Parse tree visitor.
//!
//! Override `visit_*` methods to act on particular nodes and call the
//! matching `walk_*` function to keep descending. The tree itself is never
//! mutated; the visitor may mutate its own state.
//!
//! # Example
//!
//! ```
//! use tern_ir::visitor::{walk_list, Visitor};
//! use tern_ir::{NodeId, ParseTree};
//!
//! struct Depth {
//!     current: usize,
//!     max: usize,
//! }
//!
//! impl<'t> Visitor<'t> for Depth {
//!     fn visit_list(&mut self, tree: &'t ParseTree, _id: NodeId, children: &'t [NodeId]) {
//!         self.current += 1;
//!         self.max = self.max.max(self.current);
//!         walk_list(self, tree, children);
//!         self.current -= 1;
//!     }
//! }
//! ```

use crate::stack::ensure_sufficient_stack;
use crate::{Literal, NodeId, NodeKind, ParseTree};

pub trait Visitor<'t> {
    /// Visit any node. The default dispatches on comment/leaf/list.
    fn visit_node(&mut self, tree: &'t ParseTree, id: NodeId) {
        walk_node(self, tree, id);
    }

    /// Visit a comment node. Ignored by default.
    fn visit_comment(&mut self, tree: &'t ParseTree, id: NodeId) {
        let _ = (tree, id);
    }

    /// Visit a leaf; `value` is `None` for leaves that only carry a problem.
    fn visit_leaf(&mut self, tree: &'t ParseTree, id: NodeId, value: Option<&'t Literal>) {
        let _ = (tree, id, value);
    }

    /// Visit a list. The default walks the children.
    fn visit_list(&mut self, tree: &'t ParseTree, id: NodeId, children: &'t [NodeId]) {
        let _ = id;
        walk_list(self, tree, children);
    }
}

/// Dispatch `id` to the matching `visit_*` method.
pub fn walk_node<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, tree: &'t ParseTree, id: NodeId) {
    let node = tree.node(id);
    if node.is_comment {
        visitor.visit_comment(tree, id);
        return;
    }
    match &node.kind {
        NodeKind::Leaf(value) => visitor.visit_leaf(tree, id, value.as_ref()),
        NodeKind::List(children) => visitor.visit_list(tree, id, children),
    }
}

/// Visit each child in order.
pub fn walk_list<'t, V: Visitor<'t> + ?Sized>(
    visitor: &mut V,
    tree: &'t ParseTree,
    children: &'t [NodeId],
) {
    for &child in children {
        ensure_sufficient_stack(|| visitor.visit_node(tree, child));
    }
}
