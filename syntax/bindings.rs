//! Ordered lists of bound values. Slot positions correspond to the
//! left-to-right order of the binders in a pattern, so a pattern's
//! author always knows which slot holds what.

use std::fmt;
use std::ops::Index;

use crate::{Seq, Value};

/// The values bound so far during a match. Bindings only ever grow, and
/// extension yields a new snapshot: states that share a prefix of their
/// history can safely diverge.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bindings(Vec<Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new snapshot with one more value bound.
    pub fn extended(&self, value: Value) -> Self {
        let mut values = self.0.clone();
        values.push(value);
        Self(values)
    }

    /// A new snapshot with several more values bound, in order.
    pub fn extended_with(&self, values: impl IntoIterator<Item = Value>) -> Self {
        let mut all = self.0.clone();
        all.extend(values);
        Self(all)
    }

    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.0.get(slot)
    }

    /// The integer in `slot`. Panics if the slot holds anything else:
    /// a pattern's author knows its binder layout.
    pub fn int(&self, slot: usize) -> i64 {
        self[slot].int().expect("binding should be an integer")
    }

    /// The sequence in `slot`. Panics if the slot holds anything else.
    pub fn seq(&self, slot: usize) -> Seq {
        self[slot].seq().expect("binding should be a sequence").clone()
    }
}

impl Index<usize> for Bindings {
    type Output = Value;

    fn index(&self, slot: usize) -> &Self::Output {
        self.0.index(slot)
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{{{}}}",
            self.0
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}
