//! Parameter specifications.
//!
//! A parameter list such as
//!
//! ```text
//! (a b &OPTIONAL (c 1 c-given) &REST more &KEY (verbose false))
//! ```
//!
//! is parsed once into an ordered list of [`ParamSlot`]s. Markers are
//! case-insensitive symbols starting with `&`; the mode they select applies
//! to the parameters that follow.

use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use tern_ir::{NodeId, ParseTree, Span};

use crate::compile::constant;
use crate::{BindError, BindErrorKind, CompiledExpr, Compiler, Value};

/// Which matching pass a slot takes part in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamFlag {
    /// Mandatory, matched from the left.
    RequiredLeft,
    /// Mandatory, declared after optional/rest/keyword slots and matched
    /// from the right.
    RequiredRight,
    Optional,
    Rest,
    Keyword,
    /// Catch-all for keyword arguments no keyword slot claims.
    RestKeyword,
}

impl ParamFlag {
    /// Check if this slot takes part in keyword matching.
    #[inline]
    pub fn is_keyword_family(self) -> bool {
        matches!(self, ParamFlag::Keyword | ParamFlag::RestKeyword)
    }

    /// Check if this slot captures a list.
    #[inline]
    pub fn is_rest_family(self) -> bool {
        matches!(self, ParamFlag::Rest | ParamFlag::RestKeyword)
    }
}

bitflags! {
    /// Per-slot modifiers.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Unknown keywords are accepted instead of rejected.
        const ALLOW_OTHER_KEYS = 1 << 0;
        /// The argument is passed as a deferred value.
        const LAZY = 1 << 1;
        /// The slot receives the piped argument of a threading call.
        const PIPE = 1 << 2;
    }
}

/// One declared parameter.
#[derive(Clone, Debug)]
pub struct ParamSlot {
    pub flag: ParamFlag,
    pub name: Rc<str>,
    /// Bound to `true` when the argument was supplied, `false` otherwise.
    pub store_var: Option<Rc<str>>,
    /// Present for optional and keyword slots.
    pub default: Option<CompiledExpr>,
    pub modifiers: Modifiers,
    pub span: Span,
}

impl ParamSlot {
    #[inline]
    pub fn is_lazy(&self) -> bool {
        self.modifiers.contains(Modifiers::LAZY)
    }

    #[inline]
    pub fn allows_other_keys(&self) -> bool {
        self.modifiers.contains(Modifiers::ALLOW_OTHER_KEYS)
    }

    #[inline]
    pub fn is_pipe(&self) -> bool {
        self.modifiers.contains(Modifiers::PIPE)
    }
}

/// Parameter-list markers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Marker {
    Required,
    Optional,
    Rest,
    Key,
    RestKey,
    AllowOtherKeys,
    Lazy,
    Pipe,
}

impl Marker {
    fn from_name(name: &str) -> Option<Marker> {
        const MARKERS: [(&str, Marker); 8] = [
            ("&REQUIRED", Marker::Required),
            ("&OPTIONAL", Marker::Optional),
            ("&REST", Marker::Rest),
            ("&KEY", Marker::Key),
            ("&REST-KEY", Marker::RestKey),
            ("&ALLOW-OTHER-KEYS", Marker::AllowOtherKeys),
            ("&LAZY", Marker::Lazy),
            ("&PIPE", Marker::Pipe),
        ];
        MARKERS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(name))
            .map(|&(_, marker)| marker)
    }
}

/// Declaration mode selected by the last marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Required,
    Optional,
    Rest,
    Key,
    RestKey,
}

/// A parsed parameter list.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    slots: Rc<[ParamSlot]>,
}

impl ParamSpec {
    /// Parse the parameter list `list`.
    ///
    /// Default forms are compiled with `compiler` as they are met.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(
        tree: &ParseTree,
        list: NodeId,
        compiler: &dyn Compiler,
    ) -> Result<ParamSpec, BindError> {
        let node = tree.node(list);
        if !node.is_list() {
            return Err(invalid(tree, list));
        }
        let mut parser = SpecParser {
            tree,
            compiler,
            slots: Vec::new(),
            mode: Mode::Required,
            lazy: false,
            pipe_pending: None,
            pipe_seen: false,
            allow_other_keys: false,
        };
        let result = match tree
            .children_without_comments(list)
            .try_for_each(|child| parser.form(child))
        {
            Ok(()) => parser.finish(),
            Err(e) => Err(e),
        };
        match result {
            Ok(spec) => {
                tracing::debug!(slots = spec.len(), "parameter list parsed");
                Ok(spec)
            }
            Err(e) => {
                tracing::debug!(error = %e, "invalid parameter list");
                Err(e)
            }
        }
    }

    /// Build a specification from slots directly.
    pub fn from_slots(slots: Vec<ParamSlot>) -> Self {
        ParamSpec {
            slots: slots.into(),
        }
    }

    #[inline]
    pub fn slots(&self) -> &[ParamSlot] {
        &self.slots
    }

    #[inline]
    pub(crate) fn shared_slots(&self) -> &Rc<[ParamSlot]> {
        &self.slots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Index of the slot carrying `&PIPE`.
    pub fn pipe_slot(&self) -> Option<usize> {
        self.slots.iter().position(ParamSlot::is_pipe)
    }

    /// Index of the first slot with `flag`.
    pub fn position(&self, flag: ParamFlag) -> Option<usize> {
        self.slots.iter().position(|s| s.flag == flag)
    }

    /// Index of the slot named `name`.
    pub fn slot_named(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| &*s.name == name)
    }
}

impl fmt::Display for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:?}:{}", slot.flag, slot.name)?;
        }
        f.write_str(")")
    }
}

fn invalid(tree: &ParseTree, node: NodeId) -> BindError {
    BindError::new(BindErrorKind::InvalidParameter(tree.print(node))).at(tree.node(node).span)
}

struct SpecParser<'a> {
    tree: &'a ParseTree,
    compiler: &'a dyn Compiler,
    slots: Vec<ParamSlot>,
    mode: Mode,
    /// Set by `&LAZY`; applies to every later slot.
    lazy: bool,
    /// Span of a `&PIPE` waiting for its slot.
    pipe_pending: Option<Span>,
    pipe_seen: bool,
    allow_other_keys: bool,
}

impl SpecParser<'_> {
    fn form(&mut self, id: NodeId) -> Result<(), BindError> {
        let node = self.tree.node(id);
        if let Some(name) = node.as_symbol().filter(|s| s.starts_with('&')) {
            let marker = Marker::from_name(name).ok_or_else(|| {
                BindError::new(BindErrorKind::UnknownMarker(name.to_string())).at(node.span)
            })?;
            return self.marker(marker, name, node.span);
        }

        let (flag, name, store_var, default) = match self.mode {
            Mode::Required => {
                let name = self.bare_name(id)?;
                let declared_other = self.slots.iter().any(|s| {
                    !matches!(s.flag, ParamFlag::RequiredLeft | ParamFlag::RequiredRight)
                });
                let flag = if declared_other {
                    ParamFlag::RequiredRight
                } else {
                    ParamFlag::RequiredLeft
                };
                (flag, name, None, None)
            }
            Mode::Optional | Mode::Key => {
                let (name, store_var, default) = self.defaulted(id)?;
                let flag = if self.mode == Mode::Key {
                    ParamFlag::Keyword
                } else {
                    ParamFlag::Optional
                };
                (flag, name, store_var, Some(default))
            }
            Mode::Rest | Mode::RestKey => {
                let flag = if self.mode == Mode::Rest {
                    ParamFlag::Rest
                } else {
                    ParamFlag::RestKeyword
                };
                if self.slots.iter().any(|s| s.flag == flag) {
                    return Err(BindError::new(BindErrorKind::Internal(format!(
                        "{flag:?} parameter declared twice"
                    )))
                    .at(node.span));
                }
                (flag, self.bare_name(id)?, None, None)
            }
        };

        let mut modifiers = Modifiers::empty();
        if self.lazy {
            modifiers |= Modifiers::LAZY;
        }
        if self.pipe_pending.take().is_some() {
            modifiers |= Modifiers::PIPE;
        }
        self.slots.push(ParamSlot {
            flag,
            name,
            store_var,
            default,
            modifiers,
            span: node.span,
        });
        Ok(())
    }

    fn marker(&mut self, marker: Marker, text: &str, span: Span) -> Result<(), BindError> {
        let mode = match marker {
            Marker::Required => Mode::Required,
            Marker::Optional => Mode::Optional,
            Marker::Rest => Mode::Rest,
            Marker::Key => Mode::Key,
            Marker::RestKey => Mode::RestKey,
            Marker::AllowOtherKeys => {
                self.allow_other_keys = true;
                return Ok(());
            }
            Marker::Lazy => {
                self.lazy = true;
                return Ok(());
            }
            Marker::Pipe => {
                if self.pipe_seen {
                    return Err(BindError::new(BindErrorKind::DuplicatePipe).at(span));
                }
                self.pipe_seen = true;
                self.pipe_pending = Some(span);
                return Ok(());
            }
        };
        let after_right = self
            .slots
            .iter()
            .any(|s| s.flag == ParamFlag::RequiredRight);
        if after_right && mode != Mode::Required {
            return Err(
                BindError::new(BindErrorKind::MisplacedMarker(text.to_string())).at(span),
            );
        }
        self.mode = mode;
        Ok(())
    }

    fn bare_name(&self, id: NodeId) -> Result<Rc<str>, BindError> {
        self.tree
            .node(id)
            .as_symbol()
            .map(Rc::from)
            .ok_or_else(|| invalid(self.tree, id))
    }

    /// `name`, `(name)`, `(name default)` or `(name default store-var)`.
    fn defaulted(&self, id: NodeId) -> Result<(Rc<str>, Option<Rc<str>>, CompiledExpr), BindError> {
        let node = self.tree.node(id);
        if !node.is_list() {
            return Ok((self.bare_name(id)?, None, constant(Value::Nil)));
        }
        let parts: Vec<NodeId> = self.tree.children_without_comments(id).collect();
        let (name, default, store_var) = match parts.as_slice() {
            [name] => (*name, None, None),
            [name, default] => (*name, Some(*default), None),
            [name, default, store] => (*name, Some(*default), Some(*store)),
            _ => return Err(invalid(self.tree, id)),
        };
        let name = self.bare_name(name).map_err(|_| invalid(self.tree, id))?;
        let store_var = store_var
            .map(|store| self.bare_name(store).map_err(|_| invalid(self.tree, id)))
            .transpose()?;
        let default = match default {
            Some(form) => self.compiler.compile(self.tree, form)?,
            None => constant(Value::Nil),
        };
        Ok((name, store_var, default))
    }

    fn finish(self) -> Result<ParamSpec, BindError> {
        if let Some(span) = self.pipe_pending {
            return Err(BindError::new(BindErrorKind::DanglingPipe).at(span));
        }
        let mut slots = self.slots;
        if self.allow_other_keys {
            for slot in slots.iter_mut().filter(|s| s.flag.is_keyword_family()) {
                slot.modifiers |= Modifiers::ALLOW_OTHER_KEYS;
            }
        }
        Ok(ParamSpec::from_slots(slots))
    }
}
