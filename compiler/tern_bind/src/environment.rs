//! Lexical environments for argument evaluation.
//!
//! An [`Environment`] is a cheap handle onto a chain of scopes. Cloning the
//! handle shares the scope; [`Environment::child`] opens a fresh scope whose
//! lookups fall back to the parent. Deferred values keep a handle to the
//! environment they were created in, so scopes live as long as anything
//! still refers to them.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{Compiler, Value};

/// Single-threaded shared scope.
///
/// All scope allocations go through [`LocalScope::new`].
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Check if two handles refer to the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One scope of bindings.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Rc<str>, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define (or redefine) `name` in this scope.
    #[inline]
    pub fn define(&mut self, name: Rc<str>, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Look `name` up here, then in the parents.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    #[inline]
    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

/// Handle to a scope chain plus the compiler that owns it.
#[derive(Clone)]
pub struct Environment {
    scope: LocalScope<Scope>,
    compiler: Rc<dyn Compiler>,
}

impl Environment {
    /// A root environment with no bindings.
    pub fn new(compiler: Rc<dyn Compiler>) -> Self {
        Environment {
            scope: LocalScope::new(Scope::new()),
            compiler,
        }
    }

    /// A fresh scope whose lookups fall back to this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            scope: LocalScope::new(Scope::with_parent(self.scope.clone())),
            compiler: Rc::clone(&self.compiler),
        }
    }

    /// Define `name` in the innermost scope.
    pub fn define(&self, name: impl Into<Rc<str>>, value: Value) {
        self.scope.borrow_mut().define(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.scope.borrow().lookup(name)
    }

    /// Check if `name` is bound in the innermost scope itself.
    pub fn defines_locally(&self, name: &str) -> bool {
        self.scope.borrow().contains_local(name)
    }

    /// The compiler this environment belongs to.
    pub fn compiler(&self) -> &Rc<dyn Compiler> {
        &self.compiler
    }

    /// Check if both handles share the innermost scope.
    pub fn same_scope(&self, other: &Environment) -> bool {
        self.scope.ptr_eq(&other.scope)
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut parent = self.scope.borrow().parent.clone();
        while let Some(scope) = parent {
            depth += 1;
            parent = scope.borrow().parent.clone();
        }
        depth
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
