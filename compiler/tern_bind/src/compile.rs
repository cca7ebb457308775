//! The compiler seam.
//!
//! The binder never evaluates parse nodes itself. A [`Compiler`] turns each
//! argument or default form into a [`CompiledExpr`] once, and the binding
//! evaluates those at every call. [`SimpleCompiler`] covers literals,
//! variable references and list data, which is all tooling needs.

use std::fmt;
use std::rc::Rc;

use tern_ir::{NodeId, NodeKind, ParseTree};

use crate::errors::undefined_variable;
use crate::{BindError, BindErrorKind, Environment, EvalResult, Value};

/// Something that produces a value in an environment.
pub trait Evaluable: fmt::Debug {
    fn eval(&self, env: &Environment) -> EvalResult;
}

/// A compiled, shareable expression.
pub type CompiledExpr = Rc<dyn Evaluable>;

/// Turns parse nodes into compiled expressions.
pub trait Compiler {
    fn compile(&self, tree: &ParseTree, node: NodeId) -> Result<CompiledExpr, BindError>;
}

/// A constant.
#[derive(Debug)]
pub struct Const(pub Value);

impl Evaluable for Const {
    fn eval(&self, _env: &Environment) -> EvalResult {
        Ok(self.0.clone())
    }
}

/// A variable reference.
#[derive(Debug)]
pub struct Var(pub Rc<str>);

impl Evaluable for Var {
    fn eval(&self, env: &Environment) -> EvalResult {
        env.lookup(&self.0).ok_or_else(|| undefined_variable(&self.0))
    }
}

/// A list whose elements are evaluated left to right.
#[derive(Debug)]
pub struct ListExpr(pub Vec<CompiledExpr>);

impl Evaluable for ListExpr {
    fn eval(&self, env: &Environment) -> EvalResult {
        let items = self
            .0
            .iter()
            .map(|item| item.eval(env))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::list(items))
    }
}

pub fn constant(value: Value) -> CompiledExpr {
    Rc::new(Const(value))
}

pub fn variable(name: &str) -> CompiledExpr {
    Rc::new(Var(Rc::from(name)))
}

/// Symbols are variable references, other literals are constants and lists
/// evaluate to lists of their evaluated elements.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimpleCompiler;

impl Compiler for SimpleCompiler {
    fn compile(&self, tree: &ParseTree, node: NodeId) -> Result<CompiledExpr, BindError> {
        let n = tree.node(node);
        match &n.kind {
            NodeKind::Leaf(Some(literal)) => match literal.as_symbol() {
                Some(name) => Ok(variable(name)),
                None => Ok(constant(Value::from(literal))),
            },
            NodeKind::Leaf(None) => Err(BindError::new(BindErrorKind::Compile(
                "unreadable form".to_string(),
            ))
            .at(n.span)),
            NodeKind::List(_) => {
                let items = tree
                    .children_without_comments(node)
                    .map(|child| tern_ir::stack::ensure_sufficient_stack(|| self.compile(tree, child)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Rc::new(ListExpr(items)))
            }
        }
    }
}
