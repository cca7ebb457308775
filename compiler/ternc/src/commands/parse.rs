//! The `parse` command: print the forms read from a source.

use std::fmt::Write;
use std::sync::Arc;

use tern_ir::{Literal, NodeKind};
use tern_reader::{parse_with_config, ReaderConfig, SourceContext};

use super::{problem_diagnostics, Report, SourceFile};

/// Read `source` and print one top-level form per line.
///
/// With comments kept, top-level comments are printed in place. When the
/// expression limit stops the reader early, a trailing comment says where.
pub fn parse_source(source: &SourceFile, config: &ReaderConfig) -> Report {
    let ctx = SourceContext::new(Arc::clone(&source.name));
    let tree = parse_with_config(&ctx, &mut source.text.chars().peekable(), config);

    let mut report = Report::default();
    for &id in tree.children(tree.root()) {
        let node = tree.node(id);
        if node.is_comment {
            if let Some(Literal::Str(text)) = node.value() {
                let _ = writeln!(report.output, "{text}");
            }
        } else if !matches!(node.kind, NodeKind::Leaf(None)) {
            let _ = writeln!(report.output, "{}", tree.print(id));
        }
    }
    if !tree.is_exhausted() {
        let _ = writeln!(
            report.output,
            "; stopped after {} expressions at {}",
            tree.expression_count(),
            tree.end()
        );
    }

    report
        .diagnostics
        .extend(problem_diagnostics(&tree, &source.text));
    report
}
