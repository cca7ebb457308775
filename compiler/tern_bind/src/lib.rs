//! Tern parameter lists and argument binding.
//!
//! A parameter list such as `(a &OPTIONAL (b 1 b?) &REST r &KEY k)` is
//! parsed once into a [`ParamSpec`]. At each call site an
//! [`ArgumentBinder`] matches the argument forms against it and produces an
//! [`ArgumentBinding`], which every call then evaluates into a fresh
//! [`Environment`].
//!
//! The run-time helpers that bound values are made of live here too:
//! [`Deferred`] for `&LAZY` parameters, [`RestView`] for captured rest
//! arguments and [`RangeView`] for arithmetic progressions.

mod binder;
mod compile;
mod deferred;
mod environment;
mod errors;
mod params;
mod range;
mod rest;
mod value;

pub use binder::{ArgSource, ArgumentBinder, ArgumentBinding, CallFrame};
pub use compile::{
    constant, variable, CompiledExpr, Compiler, Const, Evaluable, ListExpr, SimpleCompiler, Var,
};
pub use deferred::{force_value, Deferred};
pub use environment::{Environment, LocalScope, Scope};
pub use errors::{BindError, BindErrorKind, EvalError, EvalResult};
pub use params::{Modifiers, ParamFlag, ParamSlot, ParamSpec};
pub use range::RangeView;
pub use rest::RestView;
pub use value::Value;
