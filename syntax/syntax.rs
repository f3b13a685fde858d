//! Syntactic elements of a non-linear pattern-matching engine:
//! dynamically typed values, lazy sequences, ordered binding lists,
//! and the pattern algebra itself.
//!
//! See Egi & Nishiwaki, "Non-linear Pattern Matching with Backtracking
//! for Non-free Data Types" (2018). A string or macro parser may layer
//! whatever surface syntax it likes on top of these elements.

mod bindings;
mod pattern;
mod seq;
mod value;

use std::fmt;

pub use bindings::Bindings;
pub use pattern::{Pattern, PredFn, UserPattern, ValueFn, CONS, JOIN};
pub use seq::{Seq, SeqValues};
pub use value::{Opaque, Value};

/// Uninterpreted element that names a variable, a pattern former,
/// or a matcher.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: String) -> Self {
        Symbol(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(String::from(s))
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::new(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// These constructor macros can make tests involving patterns and
/// sequence values (most of them) much more readable. They are *not*
/// intended as a public interface, and *should* be behind `#[cfg(test)]`,
/// but [cargo can't currently export test code across
/// crates](https://github.com/rust-lang/cargo/issues/8379).
#[cfg(feature = "macros")]
mod macros {
    #[macro_export]
    macro_rules! wild {
        () => {
            Pattern::Wildcard
        };
    }

    #[macro_export]
    macro_rules! bind {
        ($name: ident) => {
            Pattern::bind(stringify!($name))
        };
    }

    #[macro_export]
    macro_rules! val {
        ($value: expr) => {
            Pattern::equal_to($value)
        };
    }

    #[macro_export]
    macro_rules! pred {
        (|$bindings: ident, $target: ident| $body: expr) => {
            Pattern::test(move |$bindings, $target| $body)
        };
    }

    #[macro_export]
    macro_rules! lam {
        (|$bindings: ident| $body: expr) => {
            Pattern::lambda(move |$bindings| $body)
        };
    }

    #[macro_export]
    macro_rules! later {
        ($needs: expr, |$bindings: ident| $body: expr) => {
            Pattern::later($needs, move |$bindings| $body)
        };
    }

    #[macro_export]
    macro_rules! and {
        ($p: expr, $q: expr) => {
            Pattern::and($p, $q)
        };
    }

    #[macro_export]
    macro_rules! or {
        ($p: expr, $q: expr) => {
            Pattern::or($p, $q)
        };
    }

    #[macro_export]
    macro_rules! not {
        ($p: expr) => {
            Pattern::not($p)
        };
    }

    #[macro_export]
    macro_rules! cons {
        ($head: expr, $tail: expr) => {
            Pattern::cons($head, $tail)
        };
    }

    #[macro_export]
    macro_rules! join {
        ($front: expr, $back: expr) => {
            Pattern::join($front, $back)
        };
    }

    #[macro_export]
    macro_rules! seq {
        [] => {
            Value::from(Seq::nil())
        };
        [$($value: expr),+ $(,)?] => {
            Value::from(Seq::from_iter([$(Value::from($value)),+]))
        };
    }
}
