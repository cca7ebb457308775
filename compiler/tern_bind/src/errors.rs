//! Binding and evaluation errors.
//!
//! Binding errors are raised while a parameter list is parsed or while call
//! arguments are matched against it; they are fatal for that call site.
//! Evaluation errors are raised at run time by compiled expressions and by
//! the deferred/rest/range helpers.

use std::fmt;

use tern_ir::Span;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// What went wrong while parsing parameters or binding arguments.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindErrorKind {
    #[error("duplicate &PIPE marker")]
    DuplicatePipe,
    #[error("&PIPE marker with no parameter after it")]
    DanglingPipe,
    #[error("misplaced argument keyword `{0}`")]
    MisplacedMarker(String),
    #[error("unknown argument keyword `{0}`")]
    UnknownMarker(String),
    #[error("invalid parameter form `{0}`")]
    InvalidParameter(String),
    #[error("insufficient arguments: expected at least {expected}, got {got}")]
    InsufficientArguments { expected: usize, got: usize },
    #[error("too many arguments: {extra} left over")]
    TooManyArguments { extra: usize },
    #[error("expected keyword, got `{0}`")]
    ExpectedKeyword(String),
    #[error("malformed keyword name `{0}`")]
    MalformedKeyword(String),
    #[error("missing value for keyword `:{0}`")]
    MissingKeywordValue(String),
    #[error("unexpected keyword parameter `:{0}`")]
    UnexpectedKeyword(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("cannot compile: {0}")]
    Compile(String),
}

/// A binding error, located at the form that caused it when known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindError {
    pub kind: BindErrorKind,
    pub span: Option<Span>,
}

impl BindError {
    pub fn new(kind: BindErrorKind) -> Self {
        BindError { kind, span: None }
    }

    /// Attach a location, keeping an existing one.
    #[must_use]
    pub fn at(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

impl From<BindErrorKind> for BindError {
    fn from(kind: BindErrorKind) -> Self {
        BindError::new(kind)
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{span}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for BindError {}

/// Run-time failure.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("deferred value forced before being bound to a context")]
    UnboundDeferred,
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot {0} a range")]
    RangeMutation(&'static str),
    #[error("invalid range step {0}")]
    InvalidStep(f64),
    #[error("range bounds must be numbers, got {0}")]
    NonNumericRange(&'static str),
    #[error("{0}")]
    Custom(String),
}

// Constructors for the common cases.

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::UndefinedVariable(name.to_string())
}

#[cold]
pub fn index_out_of_range(index: usize, len: usize) -> EvalError {
    EvalError::IndexOutOfRange { index, len }
}

#[cold]
pub fn range_mutation(operation: &'static str) -> EvalError {
    EvalError::RangeMutation(operation)
}
