//! Classified literal values carried by leaf nodes.
//!
//! `Display` renders every literal back to a token the reader classifies as
//! the same literal, which is what makes printed trees re-readable.

mod pattern;
mod version;

use std::fmt;

pub use pattern::{Pattern, PatternError, PatternKind};
pub use version::{Version, VersionError};

/// A typed numeric literal.
///
/// The variant records the width chosen by the token's type suffix
/// (`1b`, `1s`, `1i`, `1L`, `1.0f`, `1d`) or inferred from its shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Name of the numeric kind, for messages.
    pub fn type_name(self) -> &'static str {
        match self {
            Number::Byte(_) => "byte",
            Number::Short(_) => "short",
            Number::Int(_) => "int",
            Number::Long(_) => "long",
            Number::Float(_) => "float",
            Number::Double(_) => "double",
        }
    }

    /// Check if this is one of the integral kinds.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Number::Byte(_) | Number::Short(_) | Number::Int(_) | Number::Long(_)
        )
    }

    /// Widen to `i64`; `None` for floating kinds.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Byte(v) => Some(i64::from(v)),
            Number::Short(v) => Some(i64::from(v)),
            Number::Int(v) => Some(i64::from(v)),
            Number::Long(v) => Some(v),
            Number::Float(_) | Number::Double(_) => None,
        }
    }

    /// Widen to `f64`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "numeric view used for range arithmetic"
    )]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Byte(v) => f64::from(v),
            Number::Short(v) => f64::from(v),
            Number::Int(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Float(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{v}b"),
            Number::Short(v) => write!(f, "{v}s"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}L"),
            // Debug keeps the decimal point (`1.0`), so the token re-reads as floating.
            Number::Float(v) => write!(f, "{v:?}f"),
            Number::Double(v) => write!(f, "{v:?}"),
        }
    }
}

/// The value of a leaf node.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// `nil` / `null`.
    Nil,
    Bool(bool),
    Number(Number),
    Str(String),
    /// `r"..."` or `g"..."`.
    Pattern(Pattern),
    /// `v"..."`.
    Version(Version),
    /// `:name`, stored without the colon.
    Keyword(String),
    Symbol(String),
}

impl Literal {
    /// Name of the literal kind, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Nil => "nil",
            Literal::Bool(_) => "boolean",
            Literal::Number(n) => n.type_name(),
            Literal::Str(_) => "string",
            Literal::Pattern(p) => match p.kind() {
                PatternKind::Regex => "regex",
                PatternKind::Glob => "glob",
            },
            Literal::Version(_) => "version",
            Literal::Keyword(_) => "keyword",
            Literal::Symbol(_) => "symbol",
        }
    }

    /// Symbol name, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Literal::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Keyword name (without the colon), if this is a keyword.
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Literal::Keyword(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => f.write_str("nil"),
            Literal::Bool(true) => f.write_str("true"),
            Literal::Bool(false) => f.write_str("false"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Str(s) => write_quoted(f, s),
            Literal::Pattern(p) => {
                let prefix = match p.kind() {
                    PatternKind::Regex => 'r',
                    PatternKind::Glob => 'g',
                };
                write!(f, "{prefix}\"")?;
                for c in p.source().chars() {
                    if c == '"' {
                        f.write_str("\\\"")?;
                    } else {
                        write!(f, "{c}")?;
                    }
                }
                write!(f, "\"{}", p.flags())
            }
            Literal::Version(v) => write!(f, "v\"{v}\""),
            Literal::Keyword(name) => {
                f.write_str(":")?;
                write_name(f, name, false)
            }
            Literal::Symbol(name) => write_name(f, name, true),
        }
    }
}

/// Write `s` as a double-quoted string token with escapes.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{c}' => f.write_str("\\f")?,
            '\u{8}' => f.write_str("\\b")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

/// Characters that end or alter a token unless escaped.
fn is_structural(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ';' | '"' | '|' | '\\')
}

/// Check if a bare symbol token would classify as something other than a symbol.
fn reads_as_other_literal(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if matches!(lower.as_str(), "nil" | "null" | "true" | "false") {
        return true;
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('+' | '-' | '.'), Some(d)) if d.is_ascii_digit() || d == '.' => true,
        (Some(':'), _) => true,
        _ => false,
    }
}

/// Write a symbol or keyword name, wrapping it in `|...|` when needed.
fn write_name(f: &mut fmt::Formatter<'_>, name: &str, is_symbol: bool) -> fmt::Result {
    let needs_pipes = name.is_empty()
        || name.chars().any(is_structural)
        || (is_symbol && reads_as_other_literal(name));
    if !needs_pipes {
        return f.write_str(name);
    }
    f.write_str("|")?;
    for c in name.chars() {
        if matches!(c, '|' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("|")
}
