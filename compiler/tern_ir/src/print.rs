//! Printing trees back to source text.
//!
//! Literals print as tokens the reader classifies identically, lists as
//! space-separated parenthesized forms. Comment nodes and unclassified
//! leaves are omitted, so printing is only a faithful round-trip for trees
//! without problems.

use std::fmt::Write;

use crate::visitor::{walk_node, Visitor};
use crate::{Literal, NodeId, NodeKind, ParseTree};

struct Printer {
    out: String,
    /// Whether the next item in the current list needs a leading space.
    pending_space: bool,
}

impl Printer {
    fn separate(&mut self) {
        if self.pending_space {
            self.out.push(' ');
        }
        self.pending_space = true;
    }
}

impl<'t> Visitor<'t> for Printer {
    fn visit_leaf(&mut self, _tree: &'t ParseTree, _id: NodeId, value: Option<&'t Literal>) {
        if let Some(value) = value {
            self.separate();
            let _ = write!(self.out, "{value}");
        }
    }

    fn visit_list(&mut self, tree: &'t ParseTree, _id: NodeId, children: &'t [NodeId]) {
        self.separate();
        self.out.push('(');
        self.pending_space = false;
        for &child in children {
            crate::stack::ensure_sufficient_stack(|| walk_node(self, tree, child));
        }
        self.out.push(')');
        self.pending_space = true;
    }
}

impl ParseTree {
    /// Print the subtree rooted at `id`.
    pub fn print(&self, id: NodeId) -> String {
        let mut printer = Printer {
            out: String::new(),
            pending_space: false,
        };
        printer.visit_node(self, id);
        printer.out
    }

    /// Print each top-level form on its own line.
    pub fn print_forms(&self) -> String {
        self.forms()
            .filter(|&id| !matches!(self.node(id).kind, NodeKind::Leaf(None)))
            .map(|id| self.print(id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
