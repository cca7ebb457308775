//! Plain-text rendering of diagnostics for a terminal.
//!
//! Each diagnostic is a `file:line:col: severity: message` header, an
//! optional source excerpt with a caret run under the span, and its notes:
//!
//! ```text
//! demo.tern:2:5: error: unclosed string
//!   |
//! 2 | (a "bc
//!   |    ^
//! ```

use std::io::{self, Write};
use std::str::FromStr;

use crate::{Diagnostic, Excerpt, Severity};

use super::DiagnosticEmitter;

/// Text styles used by the emitter, as SGR escape sequences.
#[derive(Clone, Copy)]
enum Style {
    Error,
    Warning,
    Note,
    Strong,
    Gutter,
}

impl Style {
    const RESET: &'static str = "\x1b[0m";

    fn escape(self) -> &'static str {
        match self {
            Style::Error => "\x1b[1;31m",
            Style::Warning => "\x1b[1;33m",
            Style::Note => "\x1b[1;36m",
            Style::Strong => "\x1b[1m",
            Style::Gutter => "\x1b[1;34m",
        }
    }

    fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Error => Style::Error,
            Severity::Warning => Style::Warning,
            Severity::Note => Style::Note,
        }
    }
}

/// `1 error`, `3 warnings`.
fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// When to style output with escape sequences (the `--color` flag).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Only when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether to emit escape sequences, given whether the output is a tty.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Unrecognized `--color` argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseColorModeError(String);

impl std::fmt::Display for ParseColorModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid color mode `{}` (expected auto, always or never)",
            self.0
        )
    }
}

impl std::error::Error for ParseColorModeError {}

impl FromStr for ColorMode {
    type Err = ParseColorModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(ParseColorModeError(other.to_string())),
        }
    }
}

/// Writes diagnostics as text, styled or plain.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// `is_tty` tells `ColorMode::Auto` whether `writer` is a terminal.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn styled(&mut self, text: &str, style: Style) {
        if self.colors {
            let _ = write!(self.writer, "{}{text}{}", style.escape(), Style::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_excerpt(&mut self, line: u32, excerpt: &Excerpt) {
        let number = line.to_string();
        let blank_gutter = format!("{} |", " ".repeat(number.len()));

        self.styled(&blank_gutter, Style::Gutter);
        let _ = writeln!(self.writer);
        self.styled(&format!("{number} |"), Style::Gutter);
        let _ = writeln!(self.writer, " {}", excerpt.text);
        self.styled(&blank_gutter, Style::Gutter);

        let indent = " ".repeat(excerpt.column.saturating_sub(1) as usize);
        let _ = write!(self.writer, " {indent}");
        self.styled(&"^".repeat(excerpt.width as usize), Style::Error);
        let _ = writeln!(self.writer);
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let location = match diagnostic.span {
            Some(span) => format!("{}:{span}", diagnostic.source_name),
            None => diagnostic.source_name.to_string(),
        };
        self.styled(&location, Style::Strong);
        let _ = write!(self.writer, ": ");
        self.styled(
            &diagnostic.severity.to_string(),
            Style::for_severity(diagnostic.severity),
        );
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        if let (Some(span), Some(excerpt)) = (diagnostic.span, &diagnostic.excerpt) {
            self.write_excerpt(span.line(), excerpt);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.styled("note", Style::Strong);
            let _ = writeln!(self.writer, ": {note}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let (severity, found) = match (error_count, warning_count) {
            (0, 0) => return,
            (0, warnings) => (Severity::Warning, counted(warnings, "warning")),
            (errors, 0) => (Severity::Error, counted(errors, "error")),
            (errors, warnings) => (
                Severity::Error,
                format!(
                    "{} and {}",
                    counted(errors, "error"),
                    counted(warnings, "warning")
                ),
            ),
        };
        self.styled(&severity.to_string(), Style::for_severity(severity));
        let _ = writeln!(self.writer, ": {found} found");
    }
}
