//! Owned structural view of a subtree.
//!
//! A `Datum` drops spans, problems, parents and comments, keeping only
//! values and nesting. Two trees read from differently formatted text
//! compare equal as data when they hold the same forms.

use crate::stack::ensure_sufficient_stack;
use crate::{Literal, NodeId, NodeKind, ParseTree};

/// An atom or a list of data.
///
/// Cloning, comparing and dropping work on arbitrarily deep nesting.
#[derive(Debug)]
pub enum Datum {
    /// A leaf; `None` for an unclassified leaf.
    Atom(Option<Literal>),
    List(Vec<Datum>),
}

impl Datum {
    pub(crate) fn from_tree(tree: &ParseTree, id: NodeId) -> Datum {
        match &tree.node(id).kind {
            NodeKind::Leaf(value) => Datum::Atom(value.clone()),
            NodeKind::List(_) => Datum::List(
                tree.children_without_comments(id)
                    .map(|child| ensure_sufficient_stack(|| Datum::from_tree(tree, child)))
                    .collect(),
            ),
        }
    }

    /// Shorthand for a symbol atom.
    pub fn symbol(name: impl Into<String>) -> Datum {
        Datum::Atom(Some(Literal::Symbol(name.into())))
    }

    /// Shorthand for a keyword atom.
    pub fn keyword(name: impl Into<String>) -> Datum {
        Datum::Atom(Some(Literal::Keyword(name.into())))
    }

    /// Shorthand for a literal atom.
    pub fn lit(literal: Literal) -> Datum {
        Datum::Atom(Some(literal))
    }
}

impl Clone for Datum {
    fn clone(&self) -> Self {
        match self {
            Datum::Atom(value) => Datum::Atom(value.clone()),
            Datum::List(items) => Datum::List(
                items
                    .iter()
                    .map(|item| ensure_sufficient_stack(|| item.clone()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Datum::Atom(a), Datum::Atom(b)) if a == b => {}
                (Datum::List(a), Datum::List(b)) if a.len() == b.len() => {
                    pending.extend(a.iter().zip(b));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Drop for Datum {
    /// Flattens nested lists onto a worklist so each element is dropped
    /// with no children left.
    fn drop(&mut self) {
        let Datum::List(items) = self else {
            return;
        };
        let mut pending = std::mem::take(items);
        while let Some(mut datum) = pending.pop() {
            if let Datum::List(children) = &mut datum {
                pending.append(children);
            }
        }
    }
}
