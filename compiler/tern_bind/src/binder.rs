//! Matching call arguments against a parameter specification.
//!
//! [`ArgumentBinder::bind`] runs once per call site. It compiles every
//! argument form and assigns it to a slot in five passes over the argument
//! list, using a left cursor and a right cursor:
//!
//! 1. required-right slots, last declared first, take actuals from the right;
//! 2. required-left slots take actuals from the left;
//! 3. optional slots take actuals from the left while any remain;
//! 4. the rest slot takes everything between the cursors, unless keyword
//!    slots follow it, in which case it takes nothing;
//! 5. keyword slots are matched from `:name value` pairs.
//!
//! The resulting [`ArgumentBinding`] is immutable. Each call evaluates it
//! with [`ArgumentBinding::evaluate`] to get the values of the new frame.

use std::rc::Rc;

use smallvec::SmallVec;
use tern_ir::{NodeId, ParseTree, Span};

use crate::{
    BindError, BindErrorKind, CompiledExpr, Compiler, Deferred, Environment, EvalError, ParamFlag,
    ParamSlot, ParamSpec, RestView, Value,
};

/// Where a slot's value comes from.
#[derive(Clone, Debug)]
pub enum ArgSource {
    /// A supplied argument, evaluated in the caller's environment.
    Supplied(CompiledExpr),
    /// The slot's default, evaluated in the call environment.
    Default(CompiledExpr),
    /// Captured arguments of a rest or rest-keyword slot.
    List(Vec<CompiledExpr>),
}

/// A compiled call argument.
#[derive(Clone, Debug)]
struct Actual {
    expr: CompiledExpr,
    /// Keyword name, when the argument is a keyword literal.
    keyword: Option<String>,
    text: String,
    span: Span,
}

/// Matches arguments against one parameter specification.
pub struct ArgumentBinder<'a> {
    spec: &'a ParamSpec,
    compiler: &'a dyn Compiler,
}

impl<'a> ArgumentBinder<'a> {
    pub fn new(spec: &'a ParamSpec, compiler: &'a dyn Compiler) -> Self {
        ArgumentBinder { spec, compiler }
    }

    /// Bind the argument forms `args` of `tree`.
    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    pub fn bind(&self, tree: &ParseTree, args: &[NodeId]) -> Result<ArgumentBinding, BindError> {
        let actuals = self.compile_all(tree, args)?;
        self.run(actuals, None).inspect_err(log_error)
    }

    /// Bind a threading call: `piped` goes to the `&PIPE` slot, or becomes
    /// the first argument when there is none.
    ///
    /// A piped rest or rest-keyword slot gets `piped` as the first element of
    /// its list. A piped keyword slot still matches its name, and an explicit
    /// `:name value` pair takes precedence over `piped`.
    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    pub fn bind_piped(
        &self,
        tree: &ParseTree,
        piped: NodeId,
        args: &[NodeId],
    ) -> Result<ArgumentBinding, BindError> {
        let piped = self.compile(tree, piped)?;
        let mut actuals = self.compile_all(tree, args)?;
        let result = match self.spec.pipe_slot() {
            Some(slot) => self.run(actuals, Some((slot, piped))),
            None => {
                actuals.insert(0, piped);
                self.run(actuals, None)
            }
        };
        result.inspect_err(log_error)
    }

    fn compile(&self, tree: &ParseTree, id: NodeId) -> Result<Actual, BindError> {
        let node = tree.node(id);
        Ok(Actual {
            expr: self.compiler.compile(tree, id)?,
            keyword: node.as_keyword().map(str::to_string),
            text: tree.print(id),
            span: node.span,
        })
    }

    fn compile_all(&self, tree: &ParseTree, args: &[NodeId]) -> Result<Vec<Actual>, BindError> {
        args.iter()
            .filter(|&&id| !tree.node(id).is_comment)
            .map(|&id| self.compile(tree, id))
            .collect()
    }

    fn run(
        &self,
        actuals: Vec<Actual>,
        piped: Option<(usize, Actual)>,
    ) -> Result<ArgumentBinding, BindError> {
        let slots = self.spec.slots();
        let mut pass = Passes {
            slots,
            actuals: &actuals,
            left: 0,
            right: actuals.len(),
            sources: vec![None; slots.len()],
            supplied: SmallVec::from_elem(false, slots.len()),
            piped_keyword: None,
        };

        // Rest-family slots get the piped value at the head of their list;
        // a keyword slot takes it only when no `:name value` pair does.
        let mut piped_rest = None;
        if let Some((index, actual)) = piped {
            match slots[index].flag {
                flag if flag.is_rest_family() => piped_rest = Some((index, actual)),
                ParamFlag::Keyword => pass.piped_keyword = Some((index, actual.expr)),
                _ => {
                    pass.sources[index] = Some(ArgSource::Supplied(actual.expr));
                    pass.supplied[index] = true;
                }
            }
        }

        pass.required_right()?;
        pass.required_left()?;
        pass.optional();
        pass.rest();
        pass.keyword()?;

        if pass.left < pass.right {
            let extra = &actuals[pass.left];
            return Err(BindError::new(BindErrorKind::TooManyArguments {
                extra: pass.right - pass.left,
            })
            .at(extra.span));
        }

        let Passes {
            sources,
            mut supplied,
            ..
        } = pass;
        let mut sources = sources
            .into_iter()
            .zip(slots)
            .map(|(source, slot)| {
                source.ok_or_else(|| {
                    BindError::new(BindErrorKind::Internal(format!(
                        "parameter `{}` left unbound",
                        slot.name
                    )))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some((index, actual)) = piped_rest {
            if let ArgSource::List(items) = &mut sources[index] {
                items.insert(0, actual.expr);
            }
            supplied[index] = true;
        }

        // Lazy slots hand out deferred values instead of evaluating.
        for (source, slot) in sources.iter_mut().zip(slots) {
            if !slot.is_lazy() {
                continue;
            }
            match source {
                ArgSource::Supplied(expr) | ArgSource::Default(expr) => {
                    *expr = Deferred::wrap(Rc::clone(expr));
                }
                ArgSource::List(items) => {
                    for expr in items.iter_mut() {
                        *expr = Deferred::wrap(Rc::clone(expr));
                    }
                }
            }
        }

        tracing::debug!(slots = slots.len(), "arguments bound");
        Ok(ArgumentBinding {
            slots: Rc::clone(self.spec.shared_slots()),
            sources,
            supplied,
        })
    }
}

fn log_error(e: &BindError) {
    tracing::debug!(error = %e, "binding failed");
}

/// State shared by the matching passes.
struct Passes<'a> {
    slots: &'a [ParamSlot],
    actuals: &'a [Actual],
    /// First unconsumed actual.
    left: usize,
    /// One past the last unconsumed actual.
    right: usize,
    sources: Vec<Option<ArgSource>>,
    supplied: SmallVec<[bool; 8]>,
    /// Piped argument for a keyword slot, used if the slot is not matched.
    piped_keyword: Option<(usize, CompiledExpr)>,
}

impl Passes<'_> {
    fn slots_with(&self, flag: ParamFlag) -> impl DoubleEndedIterator<Item = usize> + '_ {
        let sources = &self.sources;
        self.slots
            .iter()
            .enumerate()
            .filter(move |(i, s)| s.flag == flag && sources[*i].is_none())
            .map(|(i, _)| i)
    }

    fn mandatory_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.flag, ParamFlag::RequiredLeft | ParamFlag::RequiredRight))
            .count()
    }

    fn insufficient(&self) -> BindError {
        BindError::new(BindErrorKind::InsufficientArguments {
            expected: self.mandatory_count(),
            got: self.actuals.len(),
        })
    }

    fn supply(&mut self, slot: usize, actual: usize) {
        self.sources[slot] = Some(ArgSource::Supplied(Rc::clone(&self.actuals[actual].expr)));
        self.supplied[slot] = true;
    }

    fn use_default(&mut self, slot: usize) {
        let expr = self.slots[slot]
            .default
            .clone()
            .unwrap_or_else(|| crate::constant(Value::Nil));
        self.sources[slot] = Some(ArgSource::Default(expr));
    }

    fn required_right(&mut self) -> Result<(), BindError> {
        let pending: Vec<usize> = self.slots_with(ParamFlag::RequiredRight).rev().collect();
        for slot in pending {
            if self.right <= self.left {
                return Err(self.insufficient());
            }
            self.right -= 1;
            self.supply(slot, self.right);
        }
        Ok(())
    }

    fn required_left(&mut self) -> Result<(), BindError> {
        let pending: Vec<usize> = self.slots_with(ParamFlag::RequiredLeft).collect();
        for slot in pending {
            if self.left >= self.right {
                return Err(self.insufficient());
            }
            self.supply(slot, self.left);
            self.left += 1;
        }
        Ok(())
    }

    fn optional(&mut self) {
        let pending: Vec<usize> = self.slots_with(ParamFlag::Optional).collect();
        for slot in pending {
            if self.left < self.right {
                self.supply(slot, self.left);
                self.left += 1;
            } else {
                self.use_default(slot);
            }
        }
    }

    fn rest(&mut self) {
        let Some(slot) = self.slots_with(ParamFlag::Rest).next() else {
            return;
        };
        let keywords_follow = self.slots[slot + 1..]
            .iter()
            .any(|s| s.flag.is_keyword_family());
        let items = if keywords_follow {
            Vec::new()
        } else {
            let taken = self.actuals[self.left..self.right]
                .iter()
                .map(|a| Rc::clone(&a.expr))
                .collect();
            self.left = self.right;
            taken
        };
        self.supplied[slot] = !items.is_empty();
        self.sources[slot] = Some(ArgSource::List(items));
    }

    fn keyword(&mut self) -> Result<(), BindError> {
        let keyword_slots: Vec<usize> = self.slots_with(ParamFlag::Keyword).collect();
        let rest_keyword = self.slots_with(ParamFlag::RestKeyword).next();
        if keyword_slots.is_empty() && rest_keyword.is_none() {
            return Ok(());
        }
        let allow_other_keys = self
            .slots
            .iter()
            .any(|s| s.flag.is_keyword_family() && s.allows_other_keys());

        let actuals = self.actuals;
        let mut extra: Vec<CompiledExpr> = Vec::new();
        while self.left < self.right {
            let actual = &actuals[self.left];
            let Some(name) = actual.keyword.as_deref() else {
                if rest_keyword.is_some() {
                    extra.extend(
                        actuals[self.left..self.right]
                            .iter()
                            .map(|a| Rc::clone(&a.expr)),
                    );
                    self.left = self.right;
                    break;
                }
                return Err(
                    BindError::new(BindErrorKind::ExpectedKeyword(actual.text.clone()))
                        .at(actual.span),
                );
            };
            if name.is_empty() {
                return Err(
                    BindError::new(BindErrorKind::MalformedKeyword(actual.text.clone()))
                        .at(actual.span),
                );
            }
            if self.left + 1 >= self.right {
                return Err(
                    BindError::new(BindErrorKind::MissingKeywordValue(name.to_string()))
                        .at(actual.span),
                );
            }

            let target = keyword_slots
                .iter()
                .copied()
                .find(|&slot| self.slots[slot].name.eq_ignore_ascii_case(name));
            match target {
                // First occurrence wins.
                Some(slot) if self.sources[slot].is_none() => self.supply(slot, self.left + 1),
                Some(_) => {}
                None if allow_other_keys => {
                    if rest_keyword.is_some() {
                        extra.push(Rc::clone(&actual.expr));
                        extra.push(Rc::clone(&actuals[self.left + 1].expr));
                    }
                }
                None => {
                    return Err(
                        BindError::new(BindErrorKind::UnexpectedKeyword(name.to_string()))
                            .at(actual.span),
                    );
                }
            }
            self.left += 2;
        }

        if let Some((slot, expr)) = self.piped_keyword.take() {
            if self.sources[slot].is_none() {
                self.sources[slot] = Some(ArgSource::Supplied(expr));
                self.supplied[slot] = true;
            }
        }
        for slot in keyword_slots {
            if self.sources[slot].is_none() {
                self.use_default(slot);
            }
        }
        if let Some(slot) = rest_keyword {
            self.supplied[slot] = !extra.is_empty();
            self.sources[slot] = Some(ArgSource::List(extra));
        }
        Ok(())
    }
}

/// The result of binding one call site.
///
/// Holds one source per slot and whether each slot's argument was supplied.
/// Created once, evaluated at every call.
#[derive(Clone, Debug)]
pub struct ArgumentBinding {
    slots: Rc<[ParamSlot]>,
    sources: Vec<ArgSource>,
    supplied: SmallVec<[bool; 8]>,
}

/// Values of a new call frame.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// The call environment: one binding per slot and store-var.
    pub env: Environment,
    /// Slot values in declaration order.
    pub values: Vec<Value>,
}

impl ArgumentBinding {
    pub fn slots(&self) -> &[ParamSlot] {
        &self.slots
    }

    pub fn sources(&self) -> &[ArgSource] {
        &self.sources
    }

    /// Check if slot `index` received an argument.
    pub fn is_supplied(&self, index: usize) -> bool {
        self.supplied.get(index).copied().unwrap_or(false)
    }

    pub fn supplied(&self) -> &[bool] {
        &self.supplied
    }

    /// Evaluate the binding for a call from `caller`, in a fresh child
    /// environment of `caller`.
    pub fn evaluate(&self, caller: &Environment) -> Result<CallFrame, EvalError> {
        self.evaluate_in(caller, caller.child())
    }

    /// Evaluate the binding, defining slots in `call_env`.
    ///
    /// Supplied arguments are evaluated in `caller`; defaults in `call_env`,
    /// where every earlier slot and store-var is already defined.
    #[tracing::instrument(level = "debug", skip_all, fields(slots = self.slots.len()))]
    pub fn evaluate_in(
        &self,
        caller: &Environment,
        call_env: Environment,
    ) -> Result<CallFrame, EvalError> {
        let mut values = Vec::with_capacity(self.slots.len());
        for (index, (slot, source)) in self.slots.iter().zip(&self.sources).enumerate() {
            let value = match source {
                ArgSource::Supplied(expr) => expr.eval(caller)?,
                ArgSource::Default(expr) => expr.eval(&call_env)?,
                ArgSource::List(items) => Value::Rest(RestView::new(
                    items
                        .iter()
                        .map(|item| item.eval(caller))
                        .collect::<Result<Vec<_>, _>>()?,
                )),
            };
            call_env.define(Rc::clone(&slot.name), value.clone());
            if let Some(store_var) = &slot.store_var {
                call_env.define(Rc::clone(store_var), Value::Bool(self.is_supplied(index)));
            }
            values.push(value);
        }
        Ok(CallFrame {
            env: call_env,
            values,
        })
    }
}

#[cfg(test)]
mod tests;
