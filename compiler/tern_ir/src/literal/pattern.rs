//! Compiled regular-expression and glob literals.

use std::fmt;

use regex::{Regex, RegexBuilder};

/// Which surface syntax a pattern literal used.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatternKind {
    /// `r"..."`: the source is a regular expression.
    Regex,
    /// `g"..."`: the source is a shell-style glob.
    Glob,
}

/// Error compiling a pattern literal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unknown pattern flag `{0}`")]
    UnknownFlag(char),
    #[error("unterminated character class in glob")]
    UnterminatedClass,
    #[error("invalid regular expression: {0}")]
    Invalid(String),
}

/// A pattern literal: its kind, its source text, its flag letters, and the
/// compiled matcher.
///
/// Two patterns are equal when kind, source and flags are equal.
#[derive(Clone)]
pub struct Pattern {
    kind: PatternKind,
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// Flag letters: `i` case-insensitive, `m` multi-line, `s` dot matches
    /// newline, `x` ignore whitespace, `l` literal (the source is matched
    /// verbatim). `d`, `u`, `c` and `U` are accepted; the matcher already
    /// uses `\n` line endings and Unicode semantics, so they change nothing.
    pub fn compile(
        kind: PatternKind,
        source: impl Into<String>,
        flags: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let source = source.into();
        let flags = flags.into();

        let mut literal = false;
        let mut builder_flags = Flags::default();
        for flag in flags.chars() {
            match flag {
                'i' => builder_flags.case_insensitive = true,
                'm' => builder_flags.multi_line = true,
                's' => builder_flags.dot_all = true,
                'x' => builder_flags.extended = true,
                'l' => literal = true,
                'd' | 'u' | 'c' | 'U' => {}
                other => return Err(PatternError::UnknownFlag(other)),
            }
        }

        let expr = match (kind, literal) {
            (_, true) => format!("^{}$", regex::escape(&source)),
            (PatternKind::Regex, false) => source.clone(),
            (PatternKind::Glob, false) => glob_to_regex(&source)?,
        };

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(builder_flags.case_insensitive)
            .multi_line(builder_flags.multi_line)
            .dot_matches_new_line(builder_flags.dot_all)
            .ignore_whitespace(builder_flags.extended)
            .build()
            .map_err(|e| PatternError::Invalid(e.to_string()))?;

        Ok(Pattern {
            kind,
            source,
            flags,
            regex,
        })
    }

    #[inline]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Source text as written between the quotes.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flag letters as written after the closing quote.
    #[inline]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The compiled matcher.
    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Check if `text` matches (anywhere for regexes, entirely for globs).
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Flags {
    case_insensitive: bool,
    multi_line: bool,
    dot_all: bool,
    extended: bool,
}

/// Translate a glob into an anchored regular expression.
///
/// `*` any run, `?` any one character, `[...]` a class (`[!...]` negated),
/// `{a,b}` alternation, `\x` a literal `x`.
fn glob_to_regex(glob: &str) -> Result<String, PatternError> {
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');
    let mut chars = glob.chars().peekable();
    let mut brace_depth = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'!') {
                    chars.next();
                    out.push('^');
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    if matches!(inner, '\\' | '[' | '^') {
                        out.push('\\');
                    }
                    out.push(inner);
                }
                if !closed {
                    return Err(PatternError::UnterminatedClass);
                }
                out.push(']');
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            ',' if brace_depth > 0 => out.push('|'),
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                } else {
                    out.push_str(r"\\");
                }
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }

    // An unclosed `{` matches nothing sensible; close it so the regex compiles.
    for _ in 0..brace_depth {
        out.push(')');
    }
    out.push('$');
    Ok(out)
}
