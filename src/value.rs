//! Runtime values and the variable environment.
//!
//! A sequence is a shared, mutable buffer of integers.  Sharing is reference-counted: the
//! environment's slot and any evaluator temporaries each hold a counted handle, and the buffer
//! is freed when the last handle is dropped.  Sequences never contain other sequences, so
//! plain reference counting collects everything.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Initial capacity for sequences and the environment.
pub const INIT_CAP: usize = 5;

/// Maximum length of a variable name, in bytes.
pub const MAX_VAR_NAME: usize = 20;

/// A counted handle to a mutable buffer of integers.
///
/// Cloning the handle shares the buffer; mutation through any handle is visible through all of
/// them.  Equality is by content, not identity.
#[derive(Debug, Clone)]
pub struct Sequence(Rc<RefCell<Vec<i64>>>);

impl Sequence {
    /// Create an empty sequence.
    pub fn new() -> Sequence {
        Sequence(Rc::new(RefCell::new(Vec::with_capacity(INIT_CAP))))
    }

    /// Create a sequence holding the given elements.
    pub fn from_vec(elems: Vec<i64>) -> Sequence {
        Sequence(Rc::new(RefCell::new(elems)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Append one element in place.
    pub fn push(&self, value: i64) {
        self.0.borrow_mut().push(value);
    }

    /// Return the element at `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<i64> {
        self.0.borrow().get(index).copied()
    }

    /// Overwrite the element at `index` in place.  Returns false when out of bounds.
    pub fn set(&self, index: usize, value: i64) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Borrow the elements for reading.
    pub fn elems(&self) -> Ref<'_, Vec<i64>> {
        self.0.borrow()
    }

    /// Copy the elements out.
    pub fn to_vec(&self) -> Vec<i64> {
        self.0.borrow().clone()
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        *self.0.borrow() == *other.0.borrow()
    }
}

/// A value computed by the program: an integer or a handle to a sequence.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i64),
    Seq(Sequence),
}

/// The mapping from variable names to their current values.
///
/// Slots are kept in insertion order and looked up by a linear scan on byte equality.  There
/// is at most one slot per name.  Overwriting a slot drops the old value, which releases the
/// old sequence handle when there was one; the same happens for every slot when the
/// environment is dropped.
#[derive(Debug)]
pub struct Environment {
    vars: Vec<(String, Value)>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            vars: Vec::with_capacity(INIT_CAP),
        }
    }

    /// Return the value of the named variable.
    ///
    /// A name that was never assigned reads as `Int(0)`; this is the language's
    /// uninitialized-variable semantics, not an error.
    pub fn lookup(&self, name: &str) -> Value {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Int(0))
    }

    /// Bind `value` to `name`, replacing any previous binding.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((name.to_string(), value)),
        }
    }
}
