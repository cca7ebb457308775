//! Where reading starts and how the reader behaves.

use std::sync::Arc;

use tern_ir::{ParseTree, Position};

/// Name and starting position of a character stream.
///
/// Contexts are cheap to clone and are cloned rather than shared: reading
/// several chunks of one stream means resuming from each tree's end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceContext {
    name: Arc<str>,
    position: Position,
}

impl SourceContext {
    /// A context at line 1, column 1, offset 0.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        SourceContext {
            name: name.into(),
            position: Position::START,
        }
    }

    /// A context at an arbitrary position.
    pub fn at(name: impl Into<Arc<str>>, position: Position) -> Self {
        SourceContext {
            name: name.into(),
            position,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_handle(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Context positioned just past what `tree` consumed.
    pub fn resume(&self, tree: &ParseTree) -> SourceContext {
        SourceContext {
            name: Arc::clone(&self.name),
            position: tree.end(),
        }
    }
}

/// Reader options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Stop after this many completed top-level expressions.
    pub max_expressions: Option<usize>,
    /// Keep `;` comments as comment leaves.
    pub keep_comments: bool,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_expressions(mut self, max: Option<usize>) -> Self {
        self.max_expressions = max;
        self
    }

    #[must_use]
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }
}
