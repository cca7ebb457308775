//! Deferred (lazy) argument values.
//!
//! A [`Deferred`] pairs a compiled expression with the environment it must
//! run in. Evaluating a `Deferred` does not run the expression: it records
//! the environment and yields the deferred value itself. [`Deferred::force`]
//! runs the expression, every time it is called.

use std::fmt;
use std::rc::Rc;

use crate::{CompiledExpr, Environment, EvalError, EvalResult, Evaluable, Value};

#[derive(Clone)]
pub struct Deferred {
    expr: CompiledExpr,
    env: Option<Environment>,
}

impl Deferred {
    /// An unbound deferred expression.
    pub fn new(expr: CompiledExpr) -> Self {
        Deferred { expr, env: None }
    }

    /// A deferred expression bound to `env`.
    pub fn bound(expr: CompiledExpr, env: Environment) -> Self {
        Deferred {
            expr,
            env: Some(env),
        }
    }

    /// Wrap `expr` so that evaluating it yields a deferred value.
    pub fn wrap(expr: CompiledExpr) -> CompiledExpr {
        Rc::new(Deferred::new(expr))
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.env.is_some()
    }

    /// The environment the expression will run in.
    pub fn env(&self) -> Option<&Environment> {
        self.env.as_ref()
    }

    /// Evaluate the held expression in the recorded environment.
    ///
    /// Results are not cached; a forced value that is itself deferred is
    /// forced in turn.
    pub fn force(&self) -> EvalResult {
        let Some(env) = &self.env else {
            return Err(EvalError::UnboundDeferred);
        };
        match self.expr.eval(env)? {
            Value::Deferred(inner) => inner.force(),
            value => Ok(value),
        }
    }
}

impl Evaluable for Deferred {
    fn eval(&self, env: &Environment) -> EvalResult {
        Ok(Value::Deferred(Deferred::bound(
            Rc::clone(&self.expr),
            env.clone(),
        )))
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.expr, &other.expr)
            && match (&self.env, &other.env) {
                (Some(a), Some(b)) => a.same_scope(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("expr", &self.expr)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Force `value` if it is deferred.
pub fn force_value(value: Value) -> EvalResult {
    match value {
        Value::Deferred(deferred) => deferred.force(),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests;
