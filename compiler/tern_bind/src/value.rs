//! Run-time values produced by evaluating bound arguments.

use std::fmt;
use std::rc::Rc;

use tern_ir::{Literal, Number, Pattern, Version};

use crate::{Deferred, RangeView, RestView};

/// A run-time value.
///
/// Heap payloads are reference counted, so cloning a value is cheap.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(Number),
    Str(Rc<str>),
    Keyword(Rc<str>),
    Symbol(Rc<str>),
    Pattern(Rc<Pattern>),
    Version(Rc<Version>),
    List(Rc<[Value]>),
    /// Captured rest arguments.
    Rest(RestView),
    Range(RangeView),
    /// A lazily evaluated argument.
    Deferred(Deferred),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(n) => n.type_name(),
            Value::Str(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Symbol(_) => "symbol",
            Value::Pattern(_) => "pattern",
            Value::Version(_) => "version",
            Value::List(_) => "list",
            Value::Rest(_) => "rest list",
            Value::Range(_) => "range",
            Value::Deferred(_) => "deferred",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Numeric payload, if any.
    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn long(v: i64) -> Value {
        Value::Number(Number::Long(v))
    }

    pub fn int(v: i32) -> Value {
        Value::Number(Number::Int(v))
    }

    pub fn double(v: f64) -> Value {
        Value::Number(Number::Double(v))
    }

    pub fn string(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(Rc::from(s.as_str())),
            Literal::Pattern(p) => Value::Pattern(Rc::new(p.clone())),
            Literal::Version(v) => Value::Version(Rc::new(v.clone())),
            Literal::Keyword(k) => Value::Keyword(Rc::from(k.as_str())),
            Literal::Symbol(s) => Value::Symbol(Rc::from(s.as_str())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{}", Literal::Str(s.to_string())),
            Value::Keyword(k) => write!(f, "{}", Literal::Keyword(k.to_string())),
            Value::Symbol(s) => write!(f, "{}", Literal::Symbol(s.to_string())),
            Value::Pattern(p) => write!(f, "{}", Literal::Pattern(Pattern::clone(p))),
            Value::Version(v) => write!(f, "v\"{v}\""),
            Value::List(items) => write_seq(f, items.iter()),
            Value::Rest(rest) => write_seq(f, rest.raw_values().iter()),
            Value::Range(range) => write!(f, "{range}"),
            Value::Deferred(_) => f.write_str("#<deferred>"),
        }
    }
}

fn write_seq<'v>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = &'v Value>) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}
