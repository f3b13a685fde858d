//! The protocol between the engine and matcher authors.

use std::fmt;
use std::rc::Rc;

use motif_syntax::{Bindings, Pattern, UserPattern, Value};

use crate::error::MatchError;

/// A unit of unresolved match obligation: this pattern, aimed at this
/// matcher, against this target.
#[derive(Clone, Debug)]
pub struct Atom {
    pub pattern: Pattern,
    pub matcher: Matcher,
    pub target: Value,

    /// How many times this obligation has been pushed back to wait for
    /// bindings it reads.
    pub(crate) deferrals: usize,
}

impl Atom {
    pub fn new(pattern: Pattern, matcher: Matcher, target: impl Into<Value>) -> Self {
        Self {
            pattern,
            matcher,
            target: target.into(),
            deferrals: 0,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Atom {
            pattern,
            matcher,
            target,
            ..
        } = self;
        f.write_fmt(format_args!("{pattern} @ {target} via {matcher}"))
    }
}

/// One way an obligation can hold: the conjunction of these atoms, in
/// order (later atoms see bindings made by earlier ones).
pub type Alternative = Vec<Atom>;

/// How targets of one shape come apart. A matcher translates a
/// structural former aimed at it into the alternative ways the former
/// can hold of the target, each a list of residual obligations.
///
/// Implementations must be total over values (a target of the wrong
/// shape decomposes into *no* alternatives, not an error) and
/// referentially transparent. A former the matcher does not understand
/// is an [`UnsupportedPattern`](MatchError::UnsupportedPattern) error.
///
/// Decomposition may recurse: an alternative may pose the same former
/// against a smaller target under a derived matcher instance. That is
/// how the bundled sequence matchers enumerate unboundedly many
/// decompositions while returning finitely many alternatives per call.
pub trait Match {
    /// The matcher's name, for diagnostics.
    fn name(&self) -> String;

    /// Decompose `target` under `former`, given the bindings so far.
    fn decompose(
        &self,
        former: &UserPattern,
        bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError>;

    /// This matcher's notion of value equality.
    fn equal(&self, x: &Value, y: &Value) -> bool {
        x == y
    }
}

/// A shared handle on a matcher instance. Cheap to clone; matchers are
/// immutable once built.
#[derive(Clone)]
pub struct Matcher(Rc<dyn Match>);

impl Matcher {
    pub fn new(matcher: impl Match + 'static) -> Self {
        Self(Rc::new(matcher))
    }

    pub fn name(&self) -> String {
        self.0.name()
    }

    pub fn decompose(
        &self,
        former: &UserPattern,
        bindings: &Bindings,
        target: &Value,
    ) -> Result<Vec<Alternative>, MatchError> {
        self.0.decompose(former, bindings, target)
    }

    pub fn equal(&self, x: &Value, y: &Value) -> bool {
        self.0.equal(x, y)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
