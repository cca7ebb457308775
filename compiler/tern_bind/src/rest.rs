//! Views over captured rest arguments.
//!
//! A [`RestView`] is a window onto a shared backing vector. Reads force
//! deferred elements on the way out but never write the forced value back,
//! so a lazy rest argument re-evaluates each time an element is read.
//! Sub-views share the backing storage with the view they came from.

use std::cell::RefCell;
use std::rc::Rc;

use crate::deferred::force_value;
use crate::errors::index_out_of_range;
use crate::{EvalError, EvalResult, Value};

#[derive(Clone, Debug)]
pub struct RestView {
    items: Rc<RefCell<Vec<Value>>>,
    start: usize,
    /// Exclusive end in the backing vector; `None` tracks its length.
    end: Option<usize>,
}

impl RestView {
    pub fn new(items: Vec<Value>) -> Self {
        RestView {
            items: Rc::new(RefCell::new(items)),
            start: 0,
            end: None,
        }
    }

    fn bounds(&self) -> (usize, usize) {
        let backing = self.items.borrow().len();
        let end = self.end.map_or(backing, |end| end.min(backing));
        (self.start.min(end), end)
    }

    pub fn len(&self) -> usize {
        let (start, end) = self.bounds();
        end - start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, index: usize, len: usize) -> Result<(), EvalError> {
        if index < len {
            Ok(())
        } else {
            Err(index_out_of_range(index, len))
        }
    }

    /// Element `index`, forced if deferred.
    pub fn get(&self, index: usize) -> EvalResult {
        force_value(self.raw(index)?)
    }

    /// Element `index` as stored.
    pub fn raw(&self, index: usize) -> EvalResult {
        let (start, _) = self.bounds();
        self.check(index, self.len())?;
        Ok(self.items.borrow()[start + index].clone())
    }

    /// Stored elements of this view, without forcing.
    pub fn raw_values(&self) -> Vec<Value> {
        let (start, end) = self.bounds();
        self.items.borrow()[start..end].to_vec()
    }

    /// Forced elements, in order.
    pub fn iter(&self) -> impl Iterator<Item = EvalResult> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// All elements, forced.
    pub fn to_vec(&self) -> Result<Vec<Value>, EvalError> {
        self.iter().collect()
    }

    pub fn set(&self, index: usize, value: Value) -> Result<(), EvalError> {
        let (start, _) = self.bounds();
        self.check(index, self.len())?;
        self.items.borrow_mut()[start + index] = value;
        Ok(())
    }

    pub fn push(&mut self, value: Value) {
        let (_, end) = self.bounds();
        self.items.borrow_mut().insert(end, value);
        self.grow(end + 1);
    }

    pub fn insert(&mut self, index: usize, value: Value) -> Result<(), EvalError> {
        let (start, end) = self.bounds();
        self.check(index, self.len() + 1)?;
        self.items.borrow_mut().insert(start + index, value);
        self.grow(end + 1);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> EvalResult {
        let (start, end) = self.bounds();
        self.check(index, self.len())?;
        let value = self.items.borrow_mut().remove(start + index);
        self.grow(end - 1);
        Ok(value)
    }

    pub fn clear(&mut self) {
        let (start, end) = self.bounds();
        self.items.borrow_mut().drain(start..end);
        self.grow(start);
    }

    /// A view of elements `from..to` sharing this view's storage.
    pub fn sub_view(&self, from: usize, to: usize) -> Result<RestView, EvalError> {
        let (start, _) = self.bounds();
        let len = self.len();
        self.check(to, len + 1)?;
        if from > to {
            return Err(index_out_of_range(from, to));
        }
        Ok(RestView {
            items: Rc::clone(&self.items),
            start: start + from,
            end: Some(start + to),
        })
    }

    /// Move a fixed end after an insertion or removal.
    fn grow(&mut self, end: usize) {
        if self.end.is_some() {
            self.end = Some(end);
        }
    }
}

impl PartialEq for RestView {
    fn eq(&self, other: &Self) -> bool {
        self.raw_values() == other.raw_values()
    }
}
