//! Tern IR - parse tree types shared by the reader and the binder.
//!
//! This crate contains the data model produced by `tern_reader`:
//! - Source positions and spans (line, column, byte offset, length)
//! - Classified literal values (`Literal`, `Number`, `Pattern`, `Version`)
//! - Recorded parse problems
//! - The arena-backed `ParseTree` and its builder
//! - A `Visitor` for generic tree walks, an owned `Datum` view and a printer
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: nodes live in one arena and refer to each other
//!   by `NodeId(u32)`; the parent link is an index, never an owning pointer.
//! - **Problems are data**: a malformed token or unbalanced parenthesis is
//!   recorded on the node at fault and the tree is still returned.

mod datum;
mod literal;
mod print;
mod problem;
mod span;
pub mod stack;
mod tree;
pub mod visitor;

pub use datum::Datum;
pub use literal::{
    Literal, Number, Pattern, PatternError, PatternKind, Version, VersionError,
};
pub use problem::{Problem, ProblemKind};
pub use span::{Position, Span};
pub use tree::{Node, NodeId, NodeKind, ParseTree, TreeBuilder};
