//! Match patterns against dynamically typed targets, enumerating every
//! assignment of bound variables that makes a pattern hold.
//!
//! A match is posed as a target value, a [`Matcher`] saying how values
//! of that shape decompose, and clauses pairing a pattern with a body.
//! The engine expands the pattern into a tree of residual obligations
//! and drives that tree to solutions lazily; under the fair strategy,
//! solution streams stay productive even over unbounded targets. See
//! Egi & Nishiwaki, "Non-linear Pattern Matching with Backtracking for
//! Non-free Data Types" (2018).

mod builtin;
mod error;
mod matcher;
mod search;
mod state;

use std::collections::VecDeque;
use std::rc::Rc;

use motif_syntax::{Bindings, Pattern, Value};
use motif_tracer::Trace;

pub use builtin::{equality, list, multiset, set, something};
pub use error::MatchError;
pub use matcher::{Alternative, Atom, Match, Matcher};
pub use search::{Search, Strategy};
pub use state::State;

/// One way of responding to a match: a pattern to try, and a body to
/// evaluate on the bindings of each of the pattern's solutions.
pub struct Clause<T> {
    pattern: Pattern,
    body: Rc<dyn Fn(&Bindings) -> T>,
}

impl<T> Clause<T> {
    pub fn new(pattern: Pattern, body: impl Fn(&Bindings) -> T + 'static) -> Self {
        Self {
            pattern,
            body: Rc::new(body),
        }
    }
}

/// Evaluate the first clause whose pattern matches, on the pattern's
/// first solution (found depth-first). [`MatchError::NoMatch`] if no
/// clause matches.
pub fn match_first<T>(
    target: impl Into<Value>,
    matcher: Matcher,
    clauses: impl IntoIterator<Item = Clause<T>>,
) -> Result<T, MatchError> {
    match match_with(target, matcher, clauses, Strategy::DepthFirst, Trace::none()).next() {
        None => Err(MatchError::NoMatch),
        Some(result) => result,
    }
}

/// Enumerate every solution of every clause, fairly: each clause's
/// stream is productive even when its solution set is infinite, and an
/// empty result is an empty stream, not an error. Clause streams are
/// concatenated in order.
pub fn match_all<T>(
    target: impl Into<Value>,
    matcher: Matcher,
    clauses: impl IntoIterator<Item = Clause<T>>,
) -> Matches<T> {
    match_with(target, matcher, clauses, Strategy::BreadthFirst, Trace::none())
}

/// Like [`match_all`], but depth-first: solutions arrive in left-to-
/// right order over each pattern's choice tree.
pub fn match_dfs<T>(
    target: impl Into<Value>,
    matcher: Matcher,
    clauses: impl IntoIterator<Item = Clause<T>>,
) -> Matches<T> {
    match_with(target, matcher, clauses, Strategy::DepthFirst, Trace::none())
}

/// The general form: choose the strategy and trace level yourself.
pub fn match_with<T>(
    target: impl Into<Value>,
    matcher: Matcher,
    clauses: impl IntoIterator<Item = Clause<T>>,
    strategy: Strategy,
    trace: Trace,
) -> Matches<T> {
    let target = target.into();
    Matches {
        runs: clauses
            .into_iter()
            .map(|Clause { pattern, body }| {
                let seed = State::new(pattern, matcher.clone(), target.clone());
                (Search::new([seed], strategy, trace), body)
            })
            .collect(),
    }
}

/// A lazy stream of clause-body results. Nothing is searched until the
/// stream is pulled; dropping it is cancellation. An error from any
/// clause ends the stream.
#[must_use]
pub struct Matches<T> {
    runs: VecDeque<(Search, Rc<dyn Fn(&Bindings) -> T>)>,
}

impl<T> Iterator for Matches<T> {
    type Item = Result<T, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((search, body)) = self.runs.front_mut() {
            match search.next() {
                Some(Ok(bindings)) => return Some(Ok(body(&bindings))),
                Some(Err(error)) => {
                    self.runs.clear();
                    return Some(Err(error));
                }
                None => {
                    self.runs.pop_front();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use motif_syntax::*;
    use motif_tracer::Trace;

    use super::*;

    fn ints(seq: &Seq) -> Vec<i64> {
        seq.values()
            .map(|v| v.int().expect("integer element"))
            .collect()
    }

    fn head_and_tail(b: &Bindings) -> (i64, Vec<i64>) {
        (b.int(0), ints(&b.seq(1)))
    }

    /// All solutions, which had better be finitely many and error-free.
    fn all<T>(matches: Matches<T>) -> Vec<T> {
        matches
            .collect::<Result<Vec<_>, _>>()
            .expect("match should not error")
    }

    fn first_n<T>(n: usize, matches: Matches<T>) -> Vec<T> {
        matches
            .take(n)
            .collect::<Result<Vec<_>, _>>()
            .expect("match should not error")
    }

    /// The primes, unboundedly, by trial division.
    fn primes() -> Seq {
        let mut known = Vec::<i64>::new();
        Seq::lazy((2i64..).filter_map(move |n| {
            if known.iter().all(|p| n % p != 0) {
                known.push(n);
                Some(Value::from(n))
            } else {
                None
            }
        }))
    }

    #[test]
    fn first_head_and_tail() {
        let result = match_first(
            seq![1, 2, 5, 9, 4],
            list(equality()),
            [Clause::new(cons!(bind!(x), bind!(xs)), head_and_tail)],
        );
        assert_eq!(result, Ok((1, vec![2, 5, 9, 4])));
    }

    #[test]
    fn every_head_of_a_multiset() {
        let results = all(match_all(
            seq![1, 2, 5, 9, 4],
            multiset(equality()),
            [Clause::new(cons!(bind!(x), bind!(xs)), head_and_tail)],
        ));
        assert_eq!(
            results,
            vec![
                (1, vec![2, 5, 9, 4]),
                (2, vec![1, 5, 9, 4]),
                (5, vec![1, 2, 9, 4]),
                (9, vec![1, 2, 5, 4]),
                (4, vec![1, 2, 5, 9]),
            ]
        );
    }

    #[test]
    fn twin_primes() {
        let twins = join!(
            wild!(),
            cons!(
                bind!(p),
                cons!(lam!(|b| Value::from(b.int(0) + 2)), wild!())
            )
        );
        let results = first_n(
            10,
            match_all(
                Value::from(primes()),
                list(equality()),
                [Clause::new(twins, |b| (b.int(0), b.int(0) + 2))],
            ),
        );
        assert_eq!(
            results,
            vec![
                (3, 5),
                (5, 7),
                (11, 13),
                (17, 19),
                (29, 31),
                (41, 43),
                (59, 61),
                (71, 73),
                (101, 103),
                (107, 109),
            ]
        );
    }

    #[test]
    fn connectives_combine() {
        // Two distinct picks: the first is not 5, the second is 1 or 2.
        let pattern = cons!(
            and!(not!(val!(5)), bind!(x)),
            cons!(and!(or!(val!(1), val!(2)), bind!(y)), bind!(xs))
        );
        let results = all(match_all(
            seq![1, 2, 5, 9, 4],
            multiset(equality()),
            [Clause::new(pattern, |b| (b.int(0), b.int(1), ints(&b.seq(2))))],
        ));
        assert_eq!(
            results,
            vec![
                (1, 2, vec![5, 9, 4]),
                (2, 1, vec![5, 9, 4]),
                (9, 1, vec![2, 5, 4]),
                (9, 2, vec![1, 5, 4]),
                (4, 1, vec![2, 5, 9]),
                (4, 2, vec![1, 5, 9]),
            ]
        );
    }

    #[test]
    fn forward_reference() {
        // The head is one less than the binding its right sibling makes.
        let pattern = cons!(
            later!(1, |b| Value::from(b.int(0) - 1)),
            cons!(bind!(x), bind!(xs))
        );
        let result = match_first(
            seq![1, 2, 3, 4, 5],
            list(equality()),
            [Clause::new(pattern, head_and_tail)],
        );
        assert_eq!(result, Ok((2, vec![3, 4, 5])));
    }

    #[test]
    fn fair_pairs_from_all_the_integers() {
        let pattern = cons!(bind!(x), cons!(bind!(y), wild!()));
        let results = first_n(
            10,
            match_all(
                Value::from(Seq::ints(1)),
                multiset(equality()),
                [Clause::new(pattern, |b| (b.int(0), b.int(1)))],
            ),
        );
        assert_eq!(
            results,
            vec![
                (1, 2),
                (1, 3),
                (2, 1),
                (1, 4),
                (2, 3),
                (3, 1),
                (1, 5),
                (2, 4),
                (3, 2),
                (4, 1),
            ]
        );
    }

    #[test]
    fn predicate_selects_heads() {
        let pattern = cons!(
            and!(pred!(|_b, t| t.int().is_some_and(|i| i % 2 == 0)), bind!(x)),
            wild!()
        );
        let results = all(match_all(
            Value::from((1..10).collect::<Seq>()),
            multiset(equality()),
            [Clause::new(pattern, |b| b.int(0))],
        ));
        assert_eq!(results, vec![2, 4, 6, 8]);
    }

    #[test]
    fn wildcard_matches_anything() {
        let target = Value::from(Opaque::new(String::from("anything")));
        let results = all(match_all(
            target.clone(),
            something(),
            [Clause::new(wild!(), move |_| target.clone())],
        ));
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].opaque().and_then(|o| o.downcast::<String>()),
            Some(&String::from("anything"))
        );
    }

    #[test]
    fn solutions_bind_exactly_the_arity() {
        let patterns = [
            cons!(bind!(x), bind!(xs)),
            cons!(and!(not!(val!(5)), bind!(x)), cons!(bind!(y), wild!())),
            join!(wild!(), cons!(bind!(p), wild!())),
            or!(cons!(bind!(a), wild!()), cons!(wild!(), bind!(a))),
        ];
        for pattern in patterns {
            let arity = pattern.arity();
            let seed = State::new(pattern, list(equality()), seq![1, 2, 5, 9, 4]);
            for bindings in Search::new([seed], Strategy::BreadthFirst, Trace::none()) {
                assert_eq!(bindings.expect("no error").len(), arity);
            }
        }
    }

    #[test]
    fn disjunction_concatenates_depth_first() {
        let pattern = or!(
            cons!(and!(val!(1), bind!(a)), wild!()),
            cons!(and!(val!(2), bind!(a)), wild!())
        );
        let results = all(match_dfs(
            seq![1, 2],
            multiset(equality()),
            [Clause::new(pattern, |b| b.int(0))],
        ));
        assert_eq!(results, vec![1, 2]);
    }

    #[test]
    fn double_negation_is_identity() {
        let over = |p: Pattern| {
            all(match_all(
                seq![1, 2, 3],
                multiset(equality()),
                [Clause::new(cons!(and!(p, bind!(x)), wild!()), |b| b.int(0))],
            ))
        };
        let odd = || pred!(|_b, t| t.int().is_some_and(|i| i % 2 != 0));
        assert_eq!(over(not!(not!(odd()))), over(odd()));
    }

    #[test]
    fn wildcard_is_a_conjunctive_unit() {
        let heads = || cons!(bind!(x), wild!());
        let over = |p: Pattern| {
            all(match_all(
                seq![1, 2],
                multiset(equality()),
                [Clause::new(p, |b| b.int(0))],
            ))
        };
        let plain = over(heads());
        assert_eq!(over(and!(wild!(), heads())), plain);
        assert_eq!(over(and!(heads(), wild!())), plain);
    }

    #[test]
    fn heads_and_tails_partition_the_multiset() {
        let original = vec![1, 2, 5, 9, 4];
        let results = all(match_all(
            seq![1, 2, 5, 9, 4],
            multiset(equality()),
            [Clause::new(cons!(bind!(x), bind!(xs)), head_and_tail)],
        ));
        let mut heads = Vec::new();
        for (head, tail) in results {
            let mut whole = tail.clone();
            whole.push(head);
            whole.sort();
            let mut sorted = original.clone();
            sorted.sort();
            assert_eq!(whole, sorted);
            heads.push(head);
        }
        assert_eq!(heads, original);
    }

    #[test]
    fn streams_are_lazy() {
        // Unboundedly many solutions; demanding three terminates.
        let results = first_n(
            3,
            match_all(
                Value::from(Seq::ints(0)),
                multiset(equality()),
                [Clause::new(cons!(bind!(x), wild!()), |b| b.int(0))],
            ),
        );
        assert_eq!(results, vec![0, 1, 2]);

        let first = match_first(
            Value::from(Seq::ints(0)),
            multiset(equality()),
            [Clause::new(cons!(bind!(x), wild!()), |b| b.int(0))],
        );
        assert_eq!(first, Ok(0));
    }

    #[test]
    fn set_heads_are_distinct_and_tails_whole() {
        let results = all(match_all(
            seq![1, 2, 1, 3],
            set(equality()),
            [Clause::new(cons!(bind!(x), bind!(xs)), head_and_tail)],
        ));
        assert_eq!(
            results,
            vec![
                (1, vec![1, 2, 1, 3]),
                (2, vec![1, 2, 1, 3]),
                (3, vec![1, 2, 1, 3]),
            ]
        );
    }

    #[test]
    fn join_enumerates_splits_in_order() {
        let results = all(match_dfs(
            seq![1, 2, 3],
            list(equality()),
            [Clause::new(join!(bind!(front), bind!(back)), |b| {
                (ints(&b.seq(0)), ints(&b.seq(1)))
            })],
        ));
        assert_eq!(
            results,
            vec![
                (vec![], vec![1, 2, 3]),
                (vec![1], vec![2, 3]),
                (vec![1, 2], vec![3]),
                (vec![1, 2, 3], vec![]),
            ]
        );
    }

    #[test]
    fn no_clause_is_no_match() {
        let result = match_first(
            seq![1, 2],
            list(equality()),
            [Clause::new(val!(seq![3, 4]), |_| ())],
        );
        assert_eq!(result, Err(MatchError::NoMatch));

        // The same shortfall is an empty stream under match_all.
        assert_eq!(
            all(match_all(
                seq![1, 2],
                list(equality()),
                [Clause::new(val!(seq![3, 4]), |_| ())],
            )),
            vec![]
        );
    }

    #[test]
    fn disjunction_branches_must_agree_in_arity() {
        let lopsided = or!(val!(1), bind!(x));
        let results = match_all(1, equality(), [Clause::new(lopsided, |_| ())])
            .collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![Err(MatchError::ArityMismatch { left: 0, right: 1 })]
        );
    }

    #[test]
    fn negation_must_not_bind() {
        let binder = not!(bind!(x));
        let results = match_all(1, equality(), [Clause::new(binder, |_| ())])
            .collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![Err(MatchError::ArityMismatch { left: 0, right: 1 })]
        );
    }

    #[test]
    fn formers_need_a_matcher_that_knows_them() {
        let results = match_all(1, something(), [Clause::new(cons!(wild!(), wild!()), |_| ())])
            .collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![Err(MatchError::UnsupportedPattern {
                matcher: String::from("something"),
                former: Symbol::from("cons"),
            })]
        );

        let results = match_all(
            seq![1, 2],
            multiset(equality()),
            [Clause::new(join!(wild!(), wild!()), |_| ())],
        )
        .collect::<Vec<_>>();
        assert_eq!(
            results,
            vec![Err(MatchError::UnsupportedPattern {
                matcher: String::from("multiset(equality)"),
                former: Symbol::from("join"),
            })]
        );
    }

    #[test]
    fn fully_deferred_states_deadlock() {
        // Nothing to the right ever binds, so the deferral can't resolve.
        let stuck = later!(1, |b| b[0].clone());
        let results = match_all(1, equality(), [Clause::new(stuck, |_| ())])
            .collect::<Vec<_>>();
        assert_eq!(results, vec![Err(MatchError::Deadlock)]);
    }

    #[test]
    fn value_equality_descends_sequences() {
        let result = match_first(
            seq![1, 2, 3],
            list(equality()),
            [Clause::new(val!(seq![1, 2, 3]), |_| "same")],
        );
        assert_eq!(result, Ok("same"));

        // A multiset compares regardless of order.
        let result = match_first(
            seq![1, 2, 3],
            multiset(equality()),
            [Clause::new(val!(seq![3, 1, 2]), |_| "same")],
        );
        assert_eq!(result, Ok("same"));

        // A set also ignores multiplicity.
        let result = match_first(
            seq![1, 2, 2],
            set(equality()),
            [Clause::new(val!(seq![2, 1]), |_| "same")],
        );
        assert_eq!(result, Ok("same"));
    }

    #[test]
    fn rows_match_with_nested_matchers() {
        // Pick a row whose first element is 3, in either row order.
        let target = seq![seq![1, 2], seq![3, 4]];
        let pattern = cons!(cons!(and!(val!(3), bind!(first)), bind!(rest)), wild!());
        let result = match_first(
            target,
            multiset(list(equality())),
            [Clause::new(pattern, head_and_tail)],
        );
        assert_eq!(result, Ok((3, vec![4])));
    }

    #[test]
    fn clauses_dispatch_in_order() {
        let clauses = |tag: &'static str| {
            vec![
                Clause::new(cons!(and!(val!(9), bind!(x)), wild!()), move |b| {
                    (tag, b.int(0))
                }),
                Clause::new(cons!(bind!(x), wild!()), move |b| ("any", b.int(0))),
            ]
        };
        // First clause can't match: fall through to the second.
        let result = match_first(seq![1, 2], multiset(equality()), clauses("nine"));
        assert_eq!(result, Ok(("any", 1)));

        // match_all concatenates both clauses' streams.
        let results = all(match_all(seq![9, 1], multiset(equality()), clauses("nine")));
        assert_eq!(results, vec![("nine", 9), ("any", 9), ("any", 1)]);
    }
}
