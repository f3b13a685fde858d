//! Run a demo scenario and print its solutions: every head of a small
//! multiset, pairs drawn fairly from all the positive integers, or the
//! twin primes.

use anyhow::{bail, Result};

use motif_engine::{equality, list, match_with, multiset, Clause, Matches, Strategy};
use motif_syntax::*;
use motif_tracer::Trace;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let demo = args.next().unwrap_or_else(|| String::from("pairs"));
    let count = match args.next() {
        Some(n) => n.parse()?,
        None => 10,
    };
    let solutions = match demo.as_str() {
        "heads" => heads(),
        "pairs" => pairs(),
        "twins" => twins(),
        other => bail!("unknown demo {other:?}; try heads, pairs, or twins"),
    };
    for solution in solutions.take(count) {
        println!("{}", solution?);
    }
    Ok(())
}

/// Every way of reading `[1, 2, 5, 9, 4]` as a head and a tail,
/// ignoring order.
fn heads() -> Matches<String> {
    match_with(
        seq![1, 2, 5, 9, 4],
        multiset(equality()),
        [Clause::new(cons!(bind!(x), bind!(xs)), |b| {
            format!("{} and {}", b.int(0), render(&b.seq(1)))
        })],
        Strategy::BreadthFirst,
        Trace::none(),
    )
}

/// Ordered pairs of distinct positive integers. The target is
/// unbounded, so only the fair strategy stays productive.
fn pairs() -> Matches<String> {
    match_with(
        Value::from(Seq::ints(1)),
        multiset(equality()),
        [Clause::new(cons!(bind!(x), cons!(bind!(y), wild!())), |b| {
            format!("({}, {})", b.int(0), b.int(1))
        })],
        Strategy::BreadthFirst,
        Trace::none(),
    )
}

/// Adjacent primes two apart, found by matching the suffixes of the
/// (unbounded) ordered sequence of primes.
fn twins() -> Matches<String> {
    let twin = Pattern::join(
        Pattern::Wildcard,
        Pattern::cons(
            Pattern::bind("p"),
            Pattern::cons(
                Pattern::lambda(|b| Value::from(b.int(0) + 2)),
                Pattern::Wildcard,
            ),
        ),
    );
    match_with(
        Value::from(primes()),
        list(equality()),
        [Clause::new(twin, |b| {
            format!("({}, {})", b.int(0), b.int(0) + 2)
        })],
        Strategy::BreadthFirst,
        Trace::none(),
    )
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

/// Collect a finite sequence into ordinary list notation.
fn render(seq: &Seq) -> String {
    format!(
        "[{}]",
        seq.values()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}
