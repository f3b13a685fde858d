//! The bundled matcher instances: opaque values, leaf equality, and
//! sequences read as lists, multisets, and sets.

use motif_syntax::{Bindings, Pattern, Seq, UserPattern, Value, CONS, JOIN};

use crate::error::MatchError;
use crate::matcher::{Alternative, Atom, Match, Matcher};

/// An opaque value: only the universal patterns (wildcard, bind, test,
/// equality) apply.
pub fn something() -> Matcher {
    Matcher::new(Something)
}

struct Something;

impl Match for Something {
    fn name(&self) -> String {
        String::from("something")
    }

    fn decompose(
        &self,
        former: &UserPattern,
        _bindings: &Bindings,
        _target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        Err(unsupported(self, former))
    }
}

/// A leaf compared by `==`.
pub fn equality() -> Matcher {
    Matcher::new(Equality)
}

struct Equality;

impl Match for Equality {
    fn name(&self) -> String {
        String::from("equality")
    }

    fn decompose(
        &self,
        former: &UserPattern,
        _bindings: &Bindings,
        _target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        Err(unsupported(self, former))
    }
}

/// A sequence read in order. `cons` splits head from tail (no
/// alternative when empty); `join` splits prefix from suffix, shortest
/// prefix first.
pub fn list(inner: Matcher) -> Matcher {
    Matcher::new(List { inner })
}

struct List {
    inner: Matcher,
}

impl Match for List {
    fn name(&self) -> String {
        format!("list({})", self.inner.name())
    }

    fn decompose(
        &self,
        former: &UserPattern,
        bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        match (former.tag().name(), former.args()) {
            (CONS, [head_pat, tail_pat]) => {
                let mut alternatives = Vec::new();
                if let Some((head, tail)) = uncons(target) {
                    alternatives.push(vec![
                        Atom::new(head_pat.clone(), self.inner.clone(), head),
                        Atom::new(tail_pat.clone(), list(self.inner.clone()), tail),
                    ]);
                }
                Ok(alternatives)
            }
            (JOIN, [..]) => Splits {
                inner: self.inner.clone(),
                prefix: Vec::new(),
            }
            .decompose(former, bindings, target),
            _ => Err(unsupported(self, former)),
        }
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.seq(), y.seq()) {
            (Some(xs), Some(ys)) => {
                let (mut xs, mut ys) = (xs.clone(), ys.clone());
                loop {
                    match (xs.uncons(), ys.uncons()) {
                        (None, None) => return true,
                        (Some((x, xt)), Some((y, yt))) if self.inner.equal(&x, &y) => {
                            xs = xt;
                            ys = yt;
                        }
                        _ => return false,
                    }
                }
            }
            _ => x == y,
        }
    }
}

/// Derived instance that enumerates `join` splits. Carries the prefix
/// consumed so far; each step either splits here or moves one element
/// from the suffix into the prefix and asks again.
struct Splits {
    inner: Matcher,
    prefix: Vec<Value>,
}

impl Match for Splits {
    fn name(&self) -> String {
        format!("list({})", self.inner.name())
    }

    fn decompose(
        &self,
        former: &UserPattern,
        _bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        match (former.tag().name(), former.args()) {
            (JOIN, [front_pat, back_pat]) => {
                if target.seq().is_none() {
                    return Ok(Vec::new());
                }
                let mut alternatives = vec![vec![
                    Atom::new(
                        front_pat.clone(),
                        list(self.inner.clone()),
                        Seq::from_iter(self.prefix.iter().cloned()),
                    ),
                    Atom::new(back_pat.clone(), list(self.inner.clone()), target.clone()),
                ]];
                if let Some((head, tail)) = uncons(target) {
                    let mut prefix = self.prefix.clone();
                    prefix.push(head);
                    alternatives.push(vec![Atom::new(
                        Pattern::User(former.clone()),
                        Matcher::new(Splits {
                            inner: self.inner.clone(),
                            prefix,
                        }),
                        tail,
                    )]);
                }
                Ok(alternatives)
            }
            _ => Err(unsupported(self, former)),
        }
    }
}

/// A sequence read in any order. `cons` decomposes once per element, in
/// positional order; each tail is the rest of the elements in their
/// original order.
pub fn multiset(inner: Matcher) -> Matcher {
    Matcher::new(Multiset {
        inner,
        held: Vec::new(),
    })
}

/// `held` is the prefix this instance has skipped over on the way to
/// later heads; it goes back on the front of every tail.
struct Multiset {
    inner: Matcher,
    held: Vec<Value>,
}

impl Match for Multiset {
    fn name(&self) -> String {
        format!("multiset({})", self.inner.name())
    }

    fn decompose(
        &self,
        former: &UserPattern,
        _bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        match (former.tag().name(), former.args()) {
            (CONS, [head_pat, tail_pat]) => {
                let mut alternatives = Vec::new();
                if let Some((head, tail)) = uncons(target) {
                    alternatives.push(vec![
                        Atom::new(head_pat.clone(), self.inner.clone(), head.clone()),
                        Atom::new(
                            tail_pat.clone(),
                            multiset(self.inner.clone()),
                            tail.prepended(&self.held),
                        ),
                    ]);
                    let mut held = self.held.clone();
                    held.push(head);
                    alternatives.push(vec![Atom::new(
                        Pattern::User(former.clone()),
                        Matcher::new(Multiset {
                            inner: self.inner.clone(),
                            held,
                        }),
                        tail,
                    )]);
                }
                Ok(alternatives)
            }
            _ => Err(unsupported(self, former)),
        }
    }

    /// Equal as multisets: same elements with the same multiplicities,
    /// in any order.
    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.seq(), y.seq()) {
            (Some(xs), Some(ys)) => {
                let mut rest = ys.values().collect::<Vec<Value>>();
                for v in xs.values() {
                    match rest.iter().position(|w| self.inner.equal(&v, w)) {
                        Some(i) => {
                            rest.swap_remove(i);
                        }
                        None => return false,
                    }
                }
                rest.is_empty()
            }
            _ => x == y,
        }
    }
}

/// A sequence read as a set. `cons` decomposes once per *distinct*
/// element, in first-occurrence order; every tail is the entire
/// original target, so elements repeat freely.
pub fn set(inner: Matcher) -> Matcher {
    Matcher::new(Set {
        inner,
        original: None,
        seen: Vec::new(),
    })
}

/// `original` is the whole target the walk started from (every tail);
/// `seen` are heads already produced, so duplicates decompose only once.
struct Set {
    inner: Matcher,
    original: Option<Value>,
    seen: Vec<Value>,
}

impl Match for Set {
    fn name(&self) -> String {
        format!("set({})", self.inner.name())
    }

    fn decompose(
        &self,
        former: &UserPattern,
        _bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        match (former.tag().name(), former.args()) {
            (CONS, [head_pat, tail_pat]) => {
                let mut alternatives = Vec::new();
                if let Some((head, tail)) = uncons(target) {
                    let original = self.original.clone().unwrap_or_else(|| target.clone());
                    if !self.seen.iter().any(|s| self.inner.equal(s, &head)) {
                        alternatives.push(vec![
                            Atom::new(head_pat.clone(), self.inner.clone(), head.clone()),
                            Atom::new(tail_pat.clone(), set(self.inner.clone()), original.clone()),
                        ]);
                    }
                    let mut seen = self.seen.clone();
                    seen.push(head);
                    alternatives.push(vec![Atom::new(
                        Pattern::User(former.clone()),
                        Matcher::new(Set {
                            inner: self.inner.clone(),
                            original: Some(original),
                            seen,
                        }),
                        tail,
                    )]);
                }
                Ok(alternatives)
            }
            _ => Err(unsupported(self, former)),
        }
    }

    /// Equal as sets: mutual inclusion, multiplicities ignored.
    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.seq(), y.seq()) {
            (Some(xs), Some(ys)) => {
                let xs = xs.values().collect::<Vec<Value>>();
                let ys = ys.values().collect::<Vec<Value>>();
                xs.iter()
                    .all(|v| ys.iter().any(|w| self.inner.equal(v, w)))
                    && ys
                        .iter()
                        .all(|w| xs.iter().any(|v| self.inner.equal(v, w)))
            }
            _ => x == y,
        }
    }
}

fn unsupported(matcher: &impl Match, former: &UserPattern) -> MatchError {
    MatchError::UnsupportedPattern {
        matcher: matcher.name(),
        former: former.tag().clone(),
    }
}

/// Split a sequence value; a value of any other shape has no head.
fn uncons(target: &Value) -> Option<(Value, Seq)> {
    target.seq()?.uncons()
}
