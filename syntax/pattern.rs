//! The pattern algebra: a recursive sum of pattern formers. Construction
//! evaluates nothing; expression and test closures are captured and run
//! by the engine as the match proceeds.

use std::fmt;
use std::rc::Rc;

use crate::{Bindings, Symbol, Value};

/// Compute a value from the bindings made so far.
pub type ValueFn = Rc<dyn Fn(&Bindings) -> Value>;

/// Test a target under the bindings made so far.
pub type PredFn = Rc<dyn Fn(&Bindings, &Value) -> bool>;

/// The former tag for head/tail decomposition of a sequence.
pub const CONS: &str = "cons";

/// The former tag for prefix/suffix decomposition of a sequence.
pub const JOIN: &str = "join";

/// A constraint on a target value and the variables it binds.
#[derive(Clone)]
pub enum Pattern {
    /// Matches anything, binds nothing.
    Wildcard,

    /// Binds the whole target to the next binding slot. The name is
    /// advisory: surface syntax and diagnostics only.
    Bind(Symbol),

    /// Matches iff the target equals the computed value.
    Equal(ValueFn),

    /// Matches iff the test holds of the target. Binds nothing.
    Test(PredFn),

    /// Both, left first; the right side sees the left side's bindings.
    And(Box<Pattern>, Box<Pattern>),

    /// Either side. Both must bind the same number of variables.
    Or(Box<Pattern>, Box<Pattern>),

    /// Matches iff the operand has no solution. The operand must bind
    /// nothing.
    Not(Box<Pattern>),

    /// An equality whose expression reads bindings made by patterns to
    /// its *right*: expansion waits until `needs` bindings exist.
    Later { needs: usize, expr: ValueFn },

    /// A computed value, matched by equality.
    Lambda(ValueFn),

    /// A structural former, interpreted by the matcher it is aimed at.
    User(UserPattern),
}

impl Pattern {
    pub fn bind(name: impl Into<Symbol>) -> Self {
        Self::Bind(name.into())
    }

    pub fn equal(expr: impl Fn(&Bindings) -> Value + 'static) -> Self {
        Self::Equal(Rc::new(expr))
    }

    /// Equality against a fixed value.
    pub fn equal_to(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::Equal(Rc::new(move |_: &Bindings| value.clone()))
    }

    pub fn test(test: impl Fn(&Bindings, &Value) -> bool + 'static) -> Self {
        Self::Test(Rc::new(test))
    }

    /// Boxing constructor.
    pub fn and(p: Pattern, q: Pattern) -> Self {
        Self::And(Box::new(p), Box::new(q))
    }

    /// Boxing constructor.
    pub fn or(p: Pattern, q: Pattern) -> Self {
        Self::Or(Box::new(p), Box::new(q))
    }

    /// Boxing constructor.
    pub fn not(p: Pattern) -> Self {
        Self::Not(Box::new(p))
    }

    /// A forward reference: `expr` may read binding slots up to
    /// `needs - 1`, which later siblings will fill.
    pub fn later(needs: usize, expr: impl Fn(&Bindings) -> Value + 'static) -> Self {
        Self::Later {
            needs,
            expr: Rc::new(expr),
        }
    }

    pub fn lambda(expr: impl Fn(&Bindings) -> Value + 'static) -> Self {
        Self::Lambda(Rc::new(expr))
    }

    pub fn user(tag: impl Into<Symbol>, args: impl IntoIterator<Item = Pattern>) -> Self {
        Self::User(UserPattern::new(tag, args))
    }

    /// Head and tail of a sequence, under whatever ordering the matcher
    /// gives those words.
    pub fn cons(head: Pattern, tail: Pattern) -> Self {
        Self::user(CONS, [head, tail])
    }

    /// Prefix and suffix of a sequence.
    pub fn join(front: Pattern, back: Pattern) -> Self {
        Self::user(JOIN, [front, back])
    }

    /// How many binding slots this pattern fills. Statically determined:
    /// every solution of a pattern binds exactly this many values.
    pub fn arity(&self) -> usize {
        use Pattern::*;
        match self {
            Wildcard | Equal(_) | Test(_) | Not(_) | Later { .. } | Lambda(_) => 0,
            Bind(_) => 1,
            And(p, q) => p.arity() + q.arity(),
            // Both branches must agree; the engine checks when it
            // expands the pattern.
            Or(p, _) => p.arity(),
            User(u) => u.arity(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Pattern::*;
        match self {
            Wildcard => f.write_str("_"),
            Bind(name) => f.write_fmt(format_args!("${name}")),
            Equal(_) => f.write_str("#<expr>"),
            Test(_) => f.write_str("?<test>"),
            And(p, q) => f.write_fmt(format_args!("({p} & {q})")),
            Or(p, q) => f.write_fmt(format_args!("({p} | {q})")),
            Not(p) => f.write_fmt(format_args!("!{p}")),
            Later { needs, .. } => f.write_fmt(format_args!("#<later/{needs}>")),
            Lambda(_) => f.write_str("#<fn>"),
            User(u) => u.fmt(f),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A matcher-level pattern former: a tag naming a decomposition and the
/// sub-patterns for the pieces it produces. Which tags mean anything is
/// up to the matcher the former is aimed at.
#[derive(Clone)]
pub struct UserPattern {
    tag: Symbol,
    args: Vec<Pattern>,
}

impl UserPattern {
    pub fn new(tag: impl Into<Symbol>, args: impl IntoIterator<Item = Pattern>) -> Self {
        Self {
            tag: tag.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn tag(&self) -> &Symbol {
        &self.tag
    }

    pub fn args(&self) -> &[Pattern] {
        &self.args
    }

    /// A former binds whatever its sub-patterns bind.
    pub fn arity(&self) -> usize {
        self.args.iter().map(Pattern::arity).sum()
    }
}

impl fmt::Display for UserPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.tag.name(), self.args.as_slice()) {
            (CONS, [head, tail]) => f.write_fmt(format_args!("({head} : {tail})")),
            (JOIN, [front, back]) => f.write_fmt(format_args!("({front} ++ {back})")),
            _ => f.write_fmt(format_args!(
                "{}({})",
                self.tag,
                self.args
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl fmt::Debug for UserPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
