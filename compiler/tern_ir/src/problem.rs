//! Parse problems: recoverable errors recorded on the node at fault.

use std::fmt;

use crate::Span;

/// What went wrong while reading.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ProblemKind {
    /// A `)` with no open list to close.
    #[error("too many right parentheses")]
    TooManyRightParens,
    /// Input ended inside a `"` string.
    #[error("unclosed string")]
    UnclosedString,
    /// Input ended with this list still open.
    #[error("unbalanced open parenthesis")]
    UnbalancedOpenParen,
    /// Input ended inside a `|...|` symbol region.
    #[error("unterminated atom: missing closing `|`")]
    UnterminatedAtom,
    /// A token looked like a literal of some kind but was malformed.
    #[error("invalid atom `{token}`: {message}")]
    InvalidAtom { token: String, message: String },
}

/// A problem and where it happened.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Problem {
    pub kind: ProblemKind,
    pub span: Span,
}

impl Problem {
    pub fn new(kind: ProblemKind, span: Span) -> Self {
        Problem { kind, span }
    }

    /// Human-readable message (without position).
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.kind)
    }
}

impl std::error::Error for Problem {}
