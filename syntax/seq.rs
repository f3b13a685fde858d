//! Memoizing lazy sequences. Match targets may be unbounded (all the
//! integers, all the primes), so sequence cells are produced on demand
//! and remembered. Clones share cells: forcing a prefix in one branch
//! of a search makes it available to every other branch for free.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::Value;

/// A lazy cons stream of values.
#[derive(Clone)]
pub struct Seq(Rc<Node>);

struct Node {
    cell: OnceCell<Cell>,
    thunk: RefCell<Option<Thunk>>,
}

type Thunk = Box<dyn FnOnce() -> Cell>;

enum Cell {
    Nil,
    Cons(Value, Seq),
}

impl Seq {
    /// The empty sequence.
    pub fn nil() -> Self {
        Self::settled(Cell::Nil)
    }

    /// Prepend one element.
    pub fn cons(head: impl Into<Value>, tail: Seq) -> Self {
        Self::settled(Cell::Cons(head.into(), tail))
    }

    /// Adapt an iterator. The iterator is advanced only as cells are
    /// forced, so unbounded iterators are fine.
    pub fn lazy<I>(mut iter: I) -> Self
    where
        I: Iterator<Item = Value> + 'static,
    {
        Self::suspended(move || match iter.next() {
            None => Cell::Nil,
            Some(head) => Cell::Cons(head, Seq::lazy(iter)),
        })
    }

    /// The unbounded sequence `from, from + 1, from + 2, …`.
    pub fn ints(from: i64) -> Self {
        Self::lazy((from..).map(Value::from))
    }

    /// A new sequence with `prefix` in front of this one.
    pub fn prepended(&self, prefix: &[Value]) -> Self {
        prefix
            .iter()
            .rev()
            .fold(self.clone(), |tail, value| Seq::cons(value.clone(), tail))
    }

    /// Split into head and tail, forcing the first cell.
    pub fn uncons(&self) -> Option<(Value, Seq)> {
        match self.force() {
            Cell::Nil => None,
            Cell::Cons(head, tail) => Some((head.clone(), tail.clone())),
        }
    }

    /// Forces the first cell.
    pub fn is_empty(&self) -> bool {
        matches!(self.force(), Cell::Nil)
    }

    /// Visit the values in order, forcing cells as it goes.
    pub fn values(&self) -> SeqValues {
        SeqValues { seq: self.clone() }
    }

    fn settled(cell: Cell) -> Self {
        Self(Rc::new(Node {
            cell: OnceCell::from(cell),
            thunk: RefCell::new(None),
        }))
    }

    fn suspended(thunk: impl FnOnce() -> Cell + 'static) -> Self {
        Self(Rc::new(Node {
            cell: OnceCell::new(),
            thunk: RefCell::new(Some(Box::new(thunk))),
        }))
    }

    fn force(&self) -> &Cell {
        self.0.cell.get_or_init(|| {
            let thunk = self
                .0
                .thunk
                .borrow_mut()
                .take()
                .expect("unforced cell should hold a thunk");
            thunk()
        })
    }
}

impl<T: Into<Value>> FromIterator<T> for Seq {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = iter.into_iter().map(Into::into).collect::<Vec<Value>>();
        let mut seq = Seq::nil();
        while let Some(value) = values.pop() {
            seq = Seq::cons(value, seq);
        }
        seq
    }
}

/// Sequences compare elementwise. Comparing two unbounded sequences that
/// never differ does not terminate; neither does producing them.
impl PartialEq for Seq {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        let (mut left, mut right) = (self.clone(), other.clone());
        loop {
            match (left.uncons(), right.uncons()) {
                (None, None) => return true,
                (Some((x, xs)), Some((y, ys))) if x == y => {
                    left = xs;
                    right = ys;
                }
                _ => return false,
            }
        }
    }
}

impl Eq for Seq {}

/// Print only the cells forced so far; an unforced tail renders as `..`.
/// Tracing a search must not advance its targets.
impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut seq = self.clone();
        let mut first = true;
        loop {
            let tail = match seq.0.cell.get() {
                None => {
                    if !first {
                        f.write_str(", ")?;
                    }
                    f.write_str("..")?;
                    None
                }
                Some(Cell::Nil) => None,
                Some(Cell::Cons(head, tail)) => {
                    if !first {
                        f.write_str(", ")?;
                    }
                    head.fmt(f)?;
                    first = false;
                    Some(tail.clone())
                }
            };
            match tail {
                Some(tail) => seq = tail,
                None => break,
            }
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Iterator over a sequence's values.
pub struct SeqValues {
    seq: Seq,
}

impl Iterator for SeqValues {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, tail) = self.seq.uncons()?;
        self.seq = tail;
        Some(head)
    }
}

#[cfg(test)]
mod test {
    use std::cell::Cell as StdCell;

    use super::*;

    fn ints(seq: &Seq) -> Vec<i64> {
        seq.values()
            .map(|v| v.int().expect("integer element"))
            .collect()
    }

    #[test]
    fn from_iter_round_trip() {
        let seq = Seq::from_iter([1, 2, 3]);
        assert_eq!(ints(&seq), vec![1, 2, 3]);
        assert!(Seq::nil().is_empty());
        assert!(!seq.is_empty());
    }

    #[test]
    fn uncons() {
        let seq = Seq::from_iter([1, 2]);
        let (head, tail) = seq.uncons().expect("non-empty");
        assert_eq!(head, Value::from(1));
        assert_eq!(ints(&tail), vec![2]);
        assert!(Seq::nil().uncons().is_none());
    }

    #[test]
    fn prepended() {
        let seq = Seq::from_iter([3, 4]).prepended(&[Value::from(1), Value::from(2)]);
        assert_eq!(ints(&seq), vec![1, 2, 3, 4]);
    }

    #[test]
    fn unbounded() {
        let firsts = Seq::ints(5).values().take(3).collect::<Vec<_>>();
        assert_eq!(firsts, vec![Value::from(5), Value::from(6), Value::from(7)]);
    }

    #[test]
    fn forcing_is_on_demand_and_memoized() {
        let pulled = Rc::new(StdCell::new(0));
        let counter = Rc::clone(&pulled);
        let seq = Seq::lazy((0i64..).map(move |i| {
            counter.set(counter.get() + 1);
            Value::from(i)
        }));
        assert_eq!(pulled.get(), 0);

        let (head, tail) = seq.uncons().expect("unbounded");
        assert_eq!(head, Value::from(0));
        assert_eq!(pulled.get(), 1);

        // A clone shares the same cells: re-forcing costs nothing.
        let again = seq.clone();
        again.uncons();
        assert_eq!(pulled.get(), 1);

        tail.uncons();
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn equality() {
        assert_eq!(Seq::from_iter([1, 2]), Seq::from_iter([1, 2]));
        assert_ne!(Seq::from_iter([1, 2]), Seq::from_iter([1, 2, 3]));
        assert_ne!(Seq::from_iter([1, 2]), Seq::nil());
        assert_eq!(Seq::from_iter([1, 2]), Seq::ints(1).values().take(2).collect());
    }

    #[test]
    fn display_never_forces() {
        let seq = Seq::ints(1);
        assert_eq!(seq.to_string(), "[..]");
        seq.uncons();
        assert_eq!(seq.to_string(), "[1, ..]");
        assert_eq!(Seq::from_iter([1, 2]).to_string(), "[1, 2]");
        assert_eq!(Seq::nil().to_string(), "[]");
    }
}
