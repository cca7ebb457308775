//! Tern CLI
//!
//! `tern parse`, `tern check` and `tern bind`.

use std::io::IsTerminal;
use std::process::ExitCode;

use tern_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use tern_reader::ReaderConfig;
use ternc::commands::{bind_source, check_sources, parse_source, read_source, Report};

fn main() -> ExitCode {
    ternc::init_tracing();

    let mut color = None;
    let mut args = Vec::new();
    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--color=") {
            match value.parse::<ColorMode>() {
                Ok(mode) => color = Some(mode),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(2);
                }
            }
        } else {
            args.push(arg);
        }
    }
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    let color = ternc::color_mode(color, no_color);

    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::SUCCESS;
    };

    match command.as_str() {
        "parse" => {
            let mut config = ReaderConfig::new();
            let mut path = None;
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--comments" => config = config.with_comments(true),
                    "--max" => {
                        let Some(max) = args.get(i + 1).and_then(|n| n.parse::<usize>().ok())
                        else {
                            eprintln!("error: --max expects a number");
                            return ExitCode::from(2);
                        };
                        config = config.with_max_expressions(Some(max));
                        i += 1;
                    }
                    other if !other.starts_with('-') && path.is_none() => path = Some(other),
                    other => {
                        eprintln!("error: unexpected argument `{other}`");
                        eprintln!("Usage: tern parse <file> [--max N] [--comments]");
                        return ExitCode::from(2);
                    }
                }
                i += 1;
            }
            let Some(path) = path else {
                eprintln!("Usage: tern parse <file> [--max N] [--comments]");
                return ExitCode::from(2);
            };
            match read_source(path) {
                Ok(source) => finish(parse_source(&source, &config), color),
                Err(diagnostic) => {
                    let mut report = Report::default();
                    report.diagnostics.add(diagnostic);
                    finish(report, color)
                }
            }
        }
        "check" => {
            if args.len() < 2 {
                eprintln!("Usage: tern check <file>...");
                return ExitCode::from(2);
            }
            let mut sources = Vec::new();
            let mut unreadable = Vec::new();
            for path in &args[1..] {
                match read_source(path) {
                    Ok(source) => sources.push(source),
                    Err(diagnostic) => unreadable.push(diagnostic),
                }
            }
            let mut report = check_sources(&sources);
            report.diagnostics.extend(unreadable);
            finish(report, color)
        }
        "bind" => {
            let [_, params, call_args] = args.as_slice() else {
                eprintln!("Usage: tern bind <params> <args>");
                eprintln!();
                eprintln!("Example: tern bind '(a &OPTIONAL (b 2) &KEY c)' '1 :c 3'");
                return ExitCode::from(2);
            };
            finish(bind_source(params, call_args), color)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("error: unknown command `{other}`");
            print_usage();
            ExitCode::from(2)
        }
    }
}

/// Print the report, emit its diagnostics and pick the exit code.
fn finish(report: Report, color: ColorMode) -> ExitCode {
    let Report {
        output,
        mut diagnostics,
    } = report;
    print!("{output}");

    let errors = diagnostics.error_count();
    let warnings = diagnostics.warning_count();
    let sorted = diagnostics.flush();
    if !sorted.is_empty() {
        let is_tty = std::io::stderr().is_terminal();
        let mut emitter = TerminalEmitter::stderr(color, is_tty);
        emitter.emit_all(&sorted);
        emitter.emit_summary(errors, warnings);
        emitter.flush();
    }

    if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_usage() {
    println!("Tern reader and argument binder");
    println!();
    println!("Usage: tern <command> [options]");
    println!();
    println!("Commands:");
    println!("  parse <file> [--max N] [--comments]   Print the forms read from a file");
    println!("  check <file>...                       Report reader problems, exit 1 if any");
    println!("  bind <params> <args>                  Bind arguments to a parameter list");
    println!();
    println!("Options:");
    println!("  --color=auto|always|never             Colored diagnostics (honors NO_COLOR)");
    println!();
    println!("Environment:");
    println!("  RUST_LOG=debug                        Enable tracing output");
    println!("  TERN_LOG_TREE=1                       Render tracing as a tree");
}
