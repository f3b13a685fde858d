//! Partial matching states and single-step expansion.

use std::collections::VecDeque;
use std::fmt;

use motif_syntax::{Bindings, Pattern, Value};
use motif_tracer::*;

use crate::error::MatchError;
use crate::matcher::{Atom, Matcher};
use crate::search::{Search, Strategy};

/// A partial match: the bindings made so far and the obligations still
/// to discharge, topmost first. An obligation deeper in the stack may
/// read, through its closures, bindings produced by obligations above
/// it.
#[derive(Clone, Debug)]
pub struct State {
    bindings: Bindings,
    atoms: VecDeque<Atom>,

    /// Consecutive deferrals since the last real step. When this covers
    /// every remaining obligation, nothing can ever make progress.
    stalled: usize,
}

impl State {
    /// Seed a match of `pattern` against `target` under `matcher`.
    pub fn new(pattern: Pattern, matcher: Matcher, target: impl Into<Value>) -> Self {
        Self {
            bindings: Bindings::new(),
            atoms: VecDeque::from([Atom::new(pattern, matcher, target)]),
            stalled: 0,
        }
    }

    /// A state with nothing left to discharge is a solution.
    pub fn is_solved(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }

    /// Expand the top obligation into successor states: zero (the state
    /// is dismissed), one, or several (the search branches).
    pub(crate) fn expand(mut self, trace: Trace) -> Result<Vec<State>, MatchError> {
        let atom = self
            .atoms
            .pop_front()
            .expect("a solved state has nothing to expand");
        trace!(trace, Expand, "** expanding {atom}");
        let Atom {
            pattern,
            matcher,
            target,
            deferrals,
        } = atom;

        use Pattern::*;
        match pattern {
            Wildcard => Ok(vec![self.advanced()]),
            Bind(_) => {
                self.bindings = self.bindings.extended(target);
                Ok(vec![self.advanced()])
            }
            Equal(expr) | Lambda(expr) => {
                let value = expr(&self.bindings);
                if matcher.equal(&target, &value) {
                    Ok(vec![self.advanced()])
                } else {
                    Ok(Vec::new())
                }
            }
            Test(test) => {
                if test(&self.bindings, &target) {
                    Ok(vec![self.advanced()])
                } else {
                    Ok(Vec::new())
                }
            }
            And(p, q) => {
                // In order: `q` sees `p`'s bindings.
                self.atoms.push_front(Atom::new(*q, matcher.clone(), target.clone()));
                self.atoms.push_front(Atom::new(*p, matcher, target));
                Ok(vec![self.advanced()])
            }
            Or(p, q) => {
                let (left, right) = (p.arity(), q.arity());
                if left != right {
                    return Err(MatchError::ArityMismatch { left, right });
                }
                let mut first = self.clone();
                first
                    .atoms
                    .push_front(Atom::new(*p, matcher.clone(), target.clone()));
                self.atoms.push_front(Atom::new(*q, matcher, target));
                Ok(vec![first.advanced(), self.advanced()])
            }
            Not(p) => {
                let right = p.arity();
                if right != 0 {
                    return Err(MatchError::ArityMismatch { left: 0, right });
                }
                let probe = State {
                    bindings: self.bindings.clone(),
                    atoms: VecDeque::from([Atom::new(*p, matcher, target)]),
                    stalled: 0,
                };
                // To the first solution only.
                match Search::new([probe], Strategy::BreadthFirst, trace).next() {
                    Some(Err(error)) => Err(error),
                    Some(Ok(_)) => Ok(Vec::new()),
                    None => Ok(vec![self.advanced()]),
                }
            }
            Later { needs, expr } => {
                if self.bindings.len() >= needs {
                    let value = expr(&self.bindings);
                    if matcher.equal(&target, &value) {
                        Ok(vec![self.advanced()])
                    } else {
                        Ok(Vec::new())
                    }
                } else if self.stalled >= self.atoms.len() + 1 {
                    // Every remaining obligation has deferred since the
                    // last real step; the bindings it waits for can
                    // never appear.
                    Err(MatchError::Deadlock)
                } else {
                    trace!(
                        trace,
                        Defer,
                        "** deferring (x{}) with {} of {needs} bindings",
                        deferrals + 1,
                        self.bindings.len(),
                    );
                    let mut atom = Atom::new(Later { needs, expr }, matcher, target);
                    atom.deferrals = deferrals + 1;
                    self.atoms.push_back(atom);
                    self.stalled += 1;
                    Ok(vec![self])
                }
            }
            User(former) => {
                let alternatives = matcher.decompose(&former, &self.bindings, &target)?;
                Ok(alternatives
                    .into_iter()
                    .map(|alternative| {
                        let mut next = self.clone();
                        for atom in alternative.into_iter().rev() {
                            next.atoms.push_front(atom);
                        }
                        next.advanced()
                    })
                    .collect())
            }
        }
    }

    /// Progress was made: clear the stall count.
    fn advanced(mut self) -> Self {
        self.stalled = 0;
        self
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{} with [{}]",
            self.bindings,
            self.atoms
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        ))
    }
}
