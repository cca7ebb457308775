//! Lazy arithmetic sequences.
//!
//! A [`RangeView`] describes `start, start + step, ...` up to (excluding)
//! `bound` without materializing it. Ranges whose start, bound and step are
//! all integral yield `Long` values; anything else yields `Double`s.

use std::fmt;

use tern_ir::Number;

use crate::errors::{index_out_of_range, range_mutation};
use crate::{EvalError, EvalResult, Value};

/// Relative tolerance for reverse lookups on fractional steps.
const EPSILON: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeView {
    start: f64,
    bound: f64,
    step: f64,
    integral: bool,
}

impl RangeView {
    /// A floating-point range. A zero or non-finite step is rejected.
    pub fn new(start: f64, bound: f64, step: f64) -> Result<Self, EvalError> {
        Self::build(start, bound, step, false)
    }

    /// An integral range.
    #[allow(
        clippy::cast_precision_loss,
        reason = "ranges are stored as f64; integral ranges beyond 2^53 lose precision"
    )]
    pub fn integral(start: i64, bound: i64, step: i64) -> Result<Self, EvalError> {
        Self::build(start as f64, bound as f64, step as f64, true)
    }

    /// A range over numeric values, integral when all three are.
    pub fn from_values(start: &Value, bound: &Value, step: &Value) -> Result<Self, EvalError> {
        let number = |v: &Value| {
            v.as_number()
                .ok_or(EvalError::NonNumericRange(v.type_name()))
        };
        let (start, bound, step) = (number(start)?, number(bound)?, number(step)?);
        let integral = [start, bound, step].iter().all(|n| n.is_integral());
        Self::build(start.as_f64(), bound.as_f64(), step.as_f64(), integral)
    }

    fn build(start: f64, bound: f64, step: f64, integral: bool) -> Result<Self, EvalError> {
        if step == 0.0 || !step.is_finite() || !start.is_finite() || !bound.is_finite() {
            return Err(EvalError::InvalidStep(step));
        }
        Ok(RangeView {
            start,
            bound,
            step,
            integral,
        })
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Number of elements: `ceil((bound - start) / step)`, at least zero.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to a non-negative whole number first"
    )]
    pub fn len(&self) -> usize {
        let n = ((self.bound - self.start) / self.step).ceil();
        if n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "index is below len, which came from an f64"
    )]
    fn nth(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "integral ranges hold whole numbers"
    )]
    fn value(&self, x: f64) -> Value {
        if self.integral {
            Value::long(x.round() as i64)
        } else {
            Value::double(x)
        }
    }

    /// Element `index`.
    pub fn get(&self, index: usize) -> EvalResult {
        let len = self.len();
        if index >= len {
            return Err(index_out_of_range(index, len));
        }
        Ok(self.value(self.nth(index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|i| self.value(self.nth(i)))
    }

    /// Position of `value` in the range, if it is an element.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "checked non-negative and below len before converting"
    )]
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        let x = value.as_number().map(Number::as_f64)?;
        let k = ((x - self.start) / self.step).round();
        if k < 0.0 || !k.is_finite() {
            return None;
        }
        let index = k as usize;
        if index >= self.len() {
            return None;
        }
        let tolerance = EPSILON * self.step.abs().max(1.0);
        ((self.nth(index) - x).abs() <= tolerance).then_some(index)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.index_of(value).is_some()
    }

    /// Elements `from..to` as a new range.
    #[allow(
        clippy::cast_precision_loss,
        reason = "indices are below len, which came from an f64"
    )]
    pub fn sub_range(&self, from: usize, to: usize) -> Result<RangeView, EvalError> {
        let len = self.len();
        if to > len {
            return Err(index_out_of_range(to, len));
        }
        if from > to {
            return Err(index_out_of_range(from, to));
        }
        Ok(RangeView {
            start: self.nth(from),
            bound: self.start + self.step * to as f64,
            ..*self
        })
    }

    pub fn set(&self, _index: usize, _value: Value) -> Result<(), EvalError> {
        Err(range_mutation("set an element of"))
    }

    pub fn push(&self, _value: Value) -> Result<(), EvalError> {
        Err(range_mutation("push onto"))
    }

    pub fn insert(&self, _index: usize, _value: Value) -> Result<(), EvalError> {
        Err(range_mutation("insert into"))
    }

    pub fn remove(&self, _index: usize) -> EvalResult {
        Err(range_mutation("remove from"))
    }

    pub fn clear(&self) -> Result<(), EvalError> {
        Err(range_mutation("clear"))
    }
}

impl fmt::Display for RangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<range {}..{} by {}>", self.start, self.bound, self.step)
    }
}
