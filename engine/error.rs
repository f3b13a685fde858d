//! Things that may go wrong posing or running a match.

use thiserror::Error;

use motif_syntax::Symbol;

/// `NoMatch` is an ordinary outcome of `match_first`. The others are
/// programmer errors in a pattern or matcher: they surface from the
/// solution stream and end the whole search.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MatchError {
    #[error("no pattern matched the target")]
    NoMatch,

    #[error("mismatched binding arities {left} and {right}")]
    ArityMismatch { left: usize, right: usize },

    #[error("matcher `{matcher}` does not support the `{former}` former")]
    UnsupportedPattern { matcher: String, former: Symbol },

    #[error("every remaining obligation is deferred on bindings that will never exist")]
    Deadlock,
}
