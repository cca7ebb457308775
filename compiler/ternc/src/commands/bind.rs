//! The `bind` command: bind an argument list to a parameter list.

use std::fmt::Write;
use std::rc::Rc;
use std::sync::Arc;

use tern_bind::{ArgumentBinder, Environment, ParamSpec, SimpleCompiler};
use tern_diagnostic::Diagnostic;
use tern_ir::NodeId;
use tern_reader::{parse_str, SourceContext};

use super::{problem_diagnostics, Report};

const PARAMS: &str = "<params>";
const ARGS: &str = "<args>";

/// Bind `args` (a sequence of forms) to the parameter list `params` and
/// print each slot's value.
///
/// Symbols in either input are variables; none are defined, so a symbol
/// that gets evaluated is an error.
pub fn bind_source(params: &str, args: &str) -> Report {
    let mut report = Report::default();

    let params_tree = parse_str(&SourceContext::new(PARAMS), params);
    let args_tree = parse_str(&SourceContext::new(ARGS), args);
    report
        .diagnostics
        .extend(problem_diagnostics(&params_tree, params));
    report
        .diagnostics
        .extend(problem_diagnostics(&args_tree, args));
    if report.failed() {
        return report;
    }

    let Some(list) = params_tree.forms().next() else {
        report
            .diagnostics
            .add(Diagnostic::error(Arc::from(PARAMS), "missing parameter list"));
        return report;
    };
    let spec = match ParamSpec::parse(&params_tree, list, &SimpleCompiler) {
        Ok(spec) => spec,
        Err(e) => {
            report
                .diagnostics
                .add(Diagnostic::from_bind_error(Arc::from(PARAMS), &e).with_source(params));
            return report;
        }
    };

    let actuals: Vec<NodeId> = args_tree.forms().collect();
    let binding = match ArgumentBinder::new(&spec, &SimpleCompiler).bind(&args_tree, &actuals) {
        Ok(binding) => binding,
        Err(e) => {
            report
                .diagnostics
                .add(Diagnostic::from_bind_error(Arc::from(ARGS), &e).with_source(args));
            return report;
        }
    };

    let frame = match binding.evaluate(&Environment::new(Rc::new(SimpleCompiler))) {
        Ok(frame) => frame,
        Err(e) => {
            report.diagnostics.add(Diagnostic::error(
                Arc::from(ARGS),
                format!("evaluation failed: {e}"),
            ));
            return report;
        }
    };

    for (index, (slot, value)) in binding.slots().iter().zip(&frame.values).enumerate() {
        let supplied = if binding.is_supplied(index) {
            ""
        } else {
            " (not supplied)"
        };
        let _ = writeln!(report.output, "{} = {value}{supplied}", slot.name);
    }
    report
}
