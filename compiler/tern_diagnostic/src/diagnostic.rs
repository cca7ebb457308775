//! Core diagnostic type.

use std::fmt;
use std::sync::Arc;

use tern_bind::{BindError, BindErrorKind};
use tern_ir::{Problem, ProblemKind, Span};

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// The source line a diagnostic points into.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Excerpt {
    /// Text of the line, without its line terminator.
    pub text: String,
    /// 1-based column of the first marked character.
    pub column: u32,
    /// Number of characters to mark; at least 1.
    pub width: u32,
}

impl Excerpt {
    /// Cut the line holding `span` out of `source`.
    ///
    /// Returns `None` when the span does not fall inside `source`. Spans
    /// running past the end of the line are clipped to it.
    pub fn from_source(source: &str, span: Span) -> Option<Excerpt> {
        let offset = span.offset() as usize;
        let before = source.get(..offset)?;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let rest = source.get(line_start..)?;
        let line = rest.split('\n').next().unwrap_or(rest);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let marked_bytes = (span.end() as usize).saturating_sub(offset);
        let marked = line.get(offset - line_start..).map_or(0, |tail| {
            tail.char_indices()
                .take_while(|&(i, _)| i < marked_bytes)
                .count()
        });

        Some(Excerpt {
            text: line.to_string(),
            column: span.column(),
            width: u32::try_from(marked).unwrap_or(u32::MAX).max(1),
        })
    }
}

/// A located message for the user.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Name of the source the diagnostic refers to.
    pub source_name: Arc<str>,
    pub span: Option<Span>,
    pub excerpt: Option<Excerpt>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, source_name: Arc<str>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            source_name,
            span: None,
            excerpt: None,
            notes: Vec::new(),
        }
    }

    pub fn error(source_name: Arc<str>, message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, source_name, message)
    }

    /// Diagnostic for a parse problem.
    pub fn from_problem(source_name: Arc<str>, problem: &Problem) -> Self {
        let diagnostic = Diagnostic::error(source_name, problem.message()).at(problem.span);
        match problem.kind {
            ProblemKind::UnbalancedOpenParen => {
                diagnostic.with_note("this list is never closed")
            }
            ProblemKind::UnterminatedAtom => {
                diagnostic.with_note("`|` regions must be closed before the end of input")
            }
            _ => diagnostic,
        }
    }

    /// Diagnostic for a parameter or binding error.
    pub fn from_bind_error(source_name: Arc<str>, error: &BindError) -> Self {
        let mut diagnostic = Diagnostic::error(source_name, error.kind.to_string());
        if let Some(span) = error.span {
            diagnostic = diagnostic.at(span);
        }
        match &error.kind {
            BindErrorKind::MisplacedMarker(_) => diagnostic.with_note(
                "&OPTIONAL, &REST, &KEY and &REST-KEY must come before trailing required parameters",
            ),
            BindErrorKind::UnexpectedKeyword(_) => {
                diagnostic.with_note("declare &ALLOW-OTHER-KEYS to accept unknown keywords")
            }
            _ => diagnostic,
        }
    }

    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach the source line the span points into.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.excerpt = self.span.and_then(|span| Excerpt::from_source(source, span));
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Sort key: source, then line, then column. Unlocated diagnostics sort
    /// first within their source.
    pub(crate) fn sort_key(&self) -> (&str, u32, u32) {
        let (line, column) = self.span.map_or((0, 0), |s| (s.line(), s.column()));
        (&self.source_name, line, column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "{}:{span}: {}: {}",
                self.source_name, self.severity, self.message
            ),
            None => write!(f, "{}: {}: {}", self.source_name, self.severity, self.message),
        }
    }
}

#[cfg(test)]
mod tests;
