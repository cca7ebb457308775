//! Atom classifiers.
//!
//! A completed token is offered to each [`Classifier`] in [`Classifier::ORDER`].
//! A classifier either claims the token (`Ok(Some(_))`), declines it
//! (`Ok(None)`, the next classifier gets a turn) or claims it but finds it
//! malformed (`Err(_)`, the reader records an invalid-atom problem). The
//! symbol classifier comes last and claims everything left.

use tern_ir::{Literal, PatternError, PatternKind, Version, VersionError};

use crate::escape::{cook, raw, split_quoted, unescape_name};
use crate::number::classify_number;

/// A classified token.
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Literal(Literal),
    /// `f"name"`; the reader expands it to `(FUNCTION name)`.
    FunctionRef(String),
}

/// Why a token that looked like a literal could not be read as one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("integer `{0}` does not fit in 64 bits")]
    IntegerOverflow(String),
    #[error("`{value}` does not fit in a {kind}")]
    OutOfRange { value: String, kind: &'static str },
    #[error("{kind} suffix on a fractional number")]
    FractionalInteger { kind: &'static str },
    #[error("number is not finite")]
    NotFinite,
    #[error("missing closing quote")]
    Unterminated,
    #[error("unexpected `{0}` after closing quote")]
    TrailingText(String),
    #[error("trailing escape character")]
    DanglingEscape,
    #[error("empty {0} name")]
    EmptyName(&'static str),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("invalid version: {0}")]
    Version(#[from] VersionError),
}

/// The closed set of atom classifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Classifier {
    Nil,
    Boolean,
    Number,
    Str,
    Pattern,
    Version,
    FunctionRef,
    Keyword,
    Symbol,
}

impl Classifier {
    /// Priority order in which classifiers are tried.
    pub const ORDER: [Classifier; 9] = [
        Classifier::Nil,
        Classifier::Boolean,
        Classifier::Number,
        Classifier::Str,
        Classifier::Pattern,
        Classifier::Version,
        Classifier::FunctionRef,
        Classifier::Keyword,
        Classifier::Symbol,
    ];

    /// Try this classifier on `token`.
    pub fn classify(self, token: &str) -> Result<Option<Atom>, ClassifyError> {
        let literal = match self {
            Classifier::Nil => (token.eq_ignore_ascii_case("nil")
                || token.eq_ignore_ascii_case("null"))
            .then_some(Literal::Nil),
            Classifier::Boolean => {
                if token.eq_ignore_ascii_case("true") {
                    Some(Literal::Bool(true))
                } else if token.eq_ignore_ascii_case("false") {
                    Some(Literal::Bool(false))
                } else {
                    None
                }
            }
            Classifier::Number => classify_number(token)?.map(Literal::Number),
            Classifier::Str => classify_string(token)?.map(Literal::Str),
            Classifier::Pattern => classify_pattern(token)?.map(Literal::Pattern),
            Classifier::Version => classify_version(token)?.map(Literal::Version),
            Classifier::FunctionRef => {
                return Ok(classify_function_ref(token)?.map(Atom::FunctionRef));
            }
            Classifier::Keyword => match token.strip_prefix(':') {
                Some(name) => Some(Literal::Keyword(non_empty(unescape_name(name)?, "keyword")?)),
                None => None,
            },
            Classifier::Symbol => Some(Literal::Symbol(non_empty(
                unescape_name(token)?,
                "symbol",
            )?)),
        };
        Ok(literal.map(Atom::Literal))
    }
}

/// Run the classifier chain on `token`.
pub fn classify(token: &str) -> Result<Atom, ClassifyError> {
    for classifier in Classifier::ORDER {
        if let Some(atom) = classifier.classify(token)? {
            return Ok(atom);
        }
    }
    Err(ClassifyError::EmptyName("symbol"))
}

fn non_empty(name: String, what: &'static str) -> Result<String, ClassifyError> {
    if name.is_empty() {
        Err(ClassifyError::EmptyName(what))
    } else {
        Ok(name)
    }
}

/// Cooked body of `prefix"..."` with nothing after the closing quote.
fn quoted_exact<'t>(token: &'t str, prefix: &str) -> Result<Option<&'t str>, ClassifyError> {
    let Some(quoted) = token.strip_prefix(prefix) else {
        return Ok(None);
    };
    if !quoted.starts_with('"') {
        return Ok(None);
    }
    let (body, rest) = split_quoted(quoted)?;
    if !rest.is_empty() {
        return Err(ClassifyError::TrailingText(rest.to_string()));
    }
    Ok(Some(body))
}

fn classify_string(token: &str) -> Result<Option<String>, ClassifyError> {
    quoted_exact(token, "")?.map(cook).transpose()
}

fn classify_pattern(token: &str) -> Result<Option<tern_ir::Pattern>, ClassifyError> {
    let kind = match token.get(..2) {
        Some("r\"") => PatternKind::Regex,
        Some("g\"") => PatternKind::Glob,
        _ => return Ok(None),
    };
    let (body, flags) = split_quoted(&token[1..])?;
    Ok(Some(tern_ir::Pattern::compile(kind, raw(body), flags)?))
}

fn classify_version(token: &str) -> Result<Option<Version>, ClassifyError> {
    match quoted_exact(token, "v")? {
        Some(body) => Ok(Some(Version::parse(&cook(body)?)?)),
        None => Ok(None),
    }
}

fn classify_function_ref(token: &str) -> Result<Option<String>, ClassifyError> {
    match quoted_exact(token, "f")? {
        Some(body) => Ok(Some(non_empty(cook(body)?, "function")?)),
        None => Ok(None),
    }
}
