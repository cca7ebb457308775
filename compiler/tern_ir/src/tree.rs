//! Arena-backed parse tree.
//!
//! Every node lives in one `Vec<Node>` owned by the [`ParseTree`] and is
//! addressed by [`NodeId`]. Children are stored as ids in program order and
//! each node keeps its parent's id, so navigation in both directions is an
//! index lookup.
//!
//! Trees are assembled with a [`TreeBuilder`] and frozen by
//! [`TreeBuilder::finish`]; a finished tree only hands out shared references.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::datum::Datum;
use crate::visitor::{walk_node, Visitor};
use crate::{Literal, Position, Problem, Span};

/// Index into a tree's node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Leaf or list payload.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A classified atom. `None` when the token could not be classified and
    /// the node only exists to carry its problem.
    Leaf(Option<Literal>),
    /// Child nodes in program order.
    List(SmallVec<[NodeId; 4]>),
}

/// One node of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub problem: Option<Problem>,
    /// Retained for tooling; skipped by consumers of program structure.
    pub is_comment: bool,
    pub parent: Option<NodeId>,
}

impl Node {
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List(_))
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Leaf value, if this is a classified leaf.
    #[inline]
    pub fn value(&self) -> Option<&Literal> {
        match &self.kind {
            NodeKind::Leaf(value) => value.as_ref(),
            NodeKind::List(_) => None,
        }
    }

    /// Children (empty for leaves).
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::List(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Symbol name, if this leaf is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        self.value().and_then(Literal::as_symbol)
    }

    /// Keyword name, if this leaf is a keyword.
    pub fn as_keyword(&self) -> Option<&str> {
        self.value().and_then(Literal::as_keyword)
    }
}

/// A finished parse tree.
///
/// The root is always a list node spanning everything the reader consumed;
/// its children are the top-level forms.
#[derive(Clone, Debug)]
pub struct ParseTree {
    source: Arc<str>,
    nodes: Vec<Node>,
    root: NodeId,
    end: Position,
    expressions: usize,
    exhausted: bool,
}

impl ParseTree {
    /// Name of the source this tree was read from.
    #[inline]
    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Shared handle to the source name.
    #[inline]
    pub fn source_handle(&self) -> &Arc<str> {
        &self.source
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Position just past the last consumed character.
    #[inline]
    pub fn end(&self) -> Position {
        self.end
    }

    /// Number of completed top-level expressions.
    #[inline]
    pub fn expression_count(&self) -> usize {
        self.expressions
    }

    /// Whether the reader ran out of input (as opposed to stopping at its
    /// expression limit).
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of nodes in the arena, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds nothing but its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Get a node.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Top-level forms, comments excluded.
    pub fn forms(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children_without_comments(self.root)
    }

    /// Children of `id`, comments excluded.
    pub fn children_without_comments(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| !self.node(c).is_comment)
    }

    /// All recorded problems, in document order (a list's own problem
    /// before those of its children).
    pub fn problems(&self) -> Vec<(NodeId, &Problem)> {
        struct Collect<'t> {
            found: Vec<(NodeId, &'t Problem)>,
        }

        impl<'t> Visitor<'t> for Collect<'t> {
            fn visit_node(&mut self, tree: &'t ParseTree, id: NodeId) {
                if let Some(problem) = &tree.node(id).problem {
                    self.found.push((id, problem));
                }
                walk_node(self, tree, id);
            }
        }

        let mut collect = Collect { found: Vec::new() };
        collect.visit_node(self, self.root);
        collect.found
    }

    /// Check if any node of the tree carries a problem.
    pub fn has_problems(&self) -> bool {
        self.nodes.iter().any(|n| n.problem.is_some())
    }

    /// Owned structural view of `id` (comments dropped).
    pub fn datum(&self, id: NodeId) -> Datum {
        Datum::from_tree(self, id)
    }

    /// Iterate over every node id in creation order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "arena length is bounded by u32 ids"
    )]
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }
}

/// Mutable tree under construction.
///
/// Nodes are created unattached and linked with [`attach`](Self::attach);
/// spans stay adjustable until [`finish`](Self::finish).
#[derive(Debug)]
pub struct TreeBuilder {
    source: Arc<str>,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(source: Arc<str>) -> Self {
        TreeBuilder {
            source,
            nodes: Vec::new(),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "source offsets are u32, so node counts are too"
    )]
    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            problem: None,
            is_comment: false,
            parent: None,
        });
        id
    }

    /// Create an empty list starting at `start`.
    pub fn open_list(&mut self, start: Position) -> NodeId {
        self.push(NodeKind::List(SmallVec::new()), Span::point(start))
    }

    /// Create a leaf.
    pub fn leaf(&mut self, value: Option<Literal>, span: Span) -> NodeId {
        self.push(NodeKind::Leaf(value), span)
    }

    /// Append `child` to the list `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        if let NodeKind::List(children) = &mut self.nodes[parent.index()].kind {
            children.push(child);
        }
    }

    /// Set the exclusive end offset of a node's span.
    pub fn close(&mut self, id: NodeId, end: u32) {
        let span = &mut self.nodes[id.index()].span;
        *span = Span::until(span.start, end);
    }

    /// Record a problem on `id`.
    ///
    /// A node holds one problem; if it already has one the new problem is
    /// dropped and `false` is returned.
    pub fn set_problem(&mut self, id: NodeId, problem: Problem) -> bool {
        let slot = &mut self.nodes[id.index()].problem;
        if slot.is_some() {
            return false;
        }
        *slot = Some(problem);
        true
    }

    pub fn mark_comment(&mut self, id: NodeId) {
        self.nodes[id.index()].is_comment = true;
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Freeze the tree.
    ///
    /// `end` is the position after the last consumed character,
    /// `expressions` the number of completed top-level forms and
    /// `exhausted` whether the input ran out.
    pub fn finish(
        self,
        root: NodeId,
        end: Position,
        expressions: usize,
        exhausted: bool,
    ) -> ParseTree {
        ParseTree {
            source: self.source,
            nodes: self.nodes,
            root,
            end,
            expressions,
            exhausted,
        }
    }
}
