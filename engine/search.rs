//! Drive the state space to solutions, fairly or depth-first.

use std::collections::VecDeque;

use motif_syntax::Bindings;
use motif_tracer::*;

use crate::error::MatchError;
use crate::state::State;

/// How pending states are scheduled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Strategy {
    /// FIFO frontier. Expansion interleaves all pending branches, so
    /// every finite solution surfaces after boundedly many steps even
    /// when a sibling branch is infinite.
    #[default]
    BreadthFirst,

    /// LIFO frontier. Solutions appear in left-depth-first order over
    /// the pattern's choice tree; an infinite branch starves its right
    /// siblings.
    DepthFirst,
}

/// Lazily enumerate the solutions reachable from some seed states.
/// Each call to `next` expands states one at a time until a state with
/// no remaining obligations surfaces, and emits its bindings; nothing
/// is expanded that the consumer never asks for. A pattern or matcher
/// error ends the enumeration.
#[must_use]
#[derive(Debug)]
pub struct Search {
    frontier: VecDeque<State>,
    strategy: Strategy,
    trace: Trace,
}

impl Search {
    pub fn new(seeds: impl IntoIterator<Item = State>, strategy: Strategy, trace: Trace) -> Self {
        Self {
            frontier: seeds.into_iter().collect(),
            strategy,
            trace,
        }
    }
}

impl Iterator for Search {
    type Item = Result<Bindings, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(state) = self.frontier.pop_front() {
            if state.is_solved() {
                let bindings = state.into_bindings();
                trace!(self.trace, Solve, "* solution {bindings}");
                return Some(Ok(bindings));
            }
            match state.expand(self.trace) {
                Err(error) => {
                    self.frontier.clear();
                    return Some(Err(error));
                }
                Ok(successors) => match self.strategy {
                    Strategy::BreadthFirst => self.frontier.extend(successors),
                    Strategy::DepthFirst => {
                        for successor in successors.into_iter().rev() {
                            self.frontier.push_front(successor);
                        }
                    }
                },
            }
        }
        None
    }
}
