//! The `check` command: report the problems in a set of sources.

use std::fmt::Write;
use std::sync::Arc;

use rayon::prelude::*;
use tern_diagnostic::Diagnostic;
use tern_reader::{parse_str, SourceContext};

use super::{problem_diagnostics, Report, SourceFile};

/// Read every source, in parallel, and collect their problems.
///
/// Clean sources get an `OK` line in the output.
#[tracing::instrument(level = "debug", skip_all, fields(files = sources.len()))]
pub fn check_sources(sources: &[SourceFile]) -> Report {
    let results: Vec<(SourceFile, Vec<Diagnostic>, usize)> = sources
        .par_iter()
        .map(|source| {
            let tree = parse_str(&SourceContext::new(Arc::clone(&source.name)), &source.text);
            let problems = problem_diagnostics(&tree, &source.text).collect();
            (source.clone(), problems, tree.expression_count())
        })
        .collect();

    let mut report = Report::default();
    for (source, problems, forms) in results {
        if problems.is_empty() {
            let _ = writeln!(
                report.output,
                "OK: {} ({forms} form{})",
                source.name,
                if forms == 1 { "" } else { "s" }
            );
        } else {
            tracing::debug!(file = %source.name, problems = problems.len(), "problems found");
            report.diagnostics.extend(problems);
        }
    }
    report
}
