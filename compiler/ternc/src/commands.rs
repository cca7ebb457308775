//! Command handlers for the `tern` CLI.
//!
//! Shared pieces (source loading, problem reporting) live here in the
//! module root.

use std::sync::Arc;

use tern_diagnostic::{Diagnostic, DiagnosticQueue};
use tern_ir::ParseTree;

mod bind;
mod check;
mod parse;

pub use bind::bind_source;
pub use check::check_sources;
pub use parse::parse_source;

/// A named source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: Arc<str>,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Load `path`, reporting a read failure as a diagnostic.
pub fn read_source(path: &str) -> Result<SourceFile, Diagnostic> {
    std::fs::read_to_string(path)
        .map(|text| SourceFile::new(path, text))
        .map_err(|e| Diagnostic::error(Arc::from(path), format!("cannot read file: {e}")))
}

/// What a command produced: text for stdout and diagnostics for stderr.
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub output: String,
    pub diagnostics: DiagnosticQueue,
}

impl Report {
    pub fn failed(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Diagnostics for every problem in `tree`, in document order.
fn problem_diagnostics<'t>(
    tree: &'t ParseTree,
    source: &'t str,
) -> impl Iterator<Item = Diagnostic> + 't {
    tree.problems().into_iter().map(move |(_, problem)| {
        Diagnostic::from_problem(Arc::clone(tree.source_handle()), problem).with_source(source)
    })
}
