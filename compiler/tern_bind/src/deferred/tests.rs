use std::cell::Cell;

use super::*;
use crate::{constant, SimpleCompiler};
use pretty_assertions::assert_eq;

/// Counts its evaluations and returns the count.
#[derive(Debug, Default)]
struct Tick(Rc<Cell<i32>>);

impl Evaluable for Tick {
    fn eval(&self, _env: &Environment) -> EvalResult {
        self.0.set(self.0.get() + 1);
        Ok(Value::int(self.0.get()))
    }
}

fn env() -> Environment {
    Environment::new(Rc::new(SimpleCompiler))
}

#[test]
fn eval_records_env_without_running() {
    let count = Rc::new(Cell::new(0));
    let deferred = Deferred::new(Rc::new(Tick(Rc::clone(&count))));
    assert!(!deferred.is_bound());

    let env = env();
    let Ok(Value::Deferred(bound)) = deferred.eval(&env) else {
        panic!("expected a deferred value");
    };
    assert_eq!(count.get(), 0);
    assert!(bound.is_bound());
    assert!(bound.env().is_some_and(|e| e.same_scope(&env)));
}

#[test]
fn force_re_evaluates() {
    let count = Rc::new(Cell::new(0));
    let deferred = Deferred::bound(Rc::new(Tick(Rc::clone(&count))), env());
    assert_eq!(deferred.force(), Ok(Value::int(1)));
    assert_eq!(deferred.force(), Ok(Value::int(2)));
    assert_eq!(count.get(), 2);
}

#[test]
fn unbound_force_fails() {
    let deferred = Deferred::new(constant(Value::Nil));
    assert_eq!(deferred.force(), Err(EvalError::UnboundDeferred));
}

#[test]
fn force_sees_captured_env() {
    let env = env();
    env.define("x", Value::int(5));
    let deferred = Deferred::bound(crate::variable("x"), env.clone());
    env.define("x", Value::int(6));
    assert_eq!(deferred.force(), Ok(Value::int(6)));
}

#[test]
fn nested_deferred_forces_through() {
    let env = env();
    let inner = Deferred::wrap(constant(Value::Bool(true)));
    let outer = Deferred::bound(inner, env);
    assert_eq!(outer.force(), Ok(Value::Bool(true)));
    assert_eq!(force_value(Value::Deferred(outer)), Ok(Value::Bool(true)));
    assert_eq!(force_value(Value::Nil), Ok(Value::Nil));
}
