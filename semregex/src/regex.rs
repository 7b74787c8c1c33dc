//! The regex term representation and the combinator surface that builds it.
//!
//! Internally a regex is an untyped tree of [`Node`]s whose semantic values
//! travel as erased handles; the public [`Regex<S, A>`] is a phantom-typed
//! wrapper around that tree. All type discipline lives in the constructors
//! here: they are the only code that wraps and unwraps values, so a tree
//! reachable through the public surface can never mix its types up.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::compile::ThreadId;
use crate::value::{take, value, Value};

/// Whether a repetition prefers to iterate once more or to stop, when both
/// choices can lead to a match.
///
/// Greediness only affects which of several accepting parses wins; it never
/// changes the language recognised. Since a match always spans the entire
/// input, a non-greedy repetition still iterates as often as the rest of the
/// regex requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Greediness {
    /// Prefer one more iteration of the body.
    Greedy,
    /// Prefer stopping the repetition.
    NonGreedy,
}

/// A symbol predicate that also produces the thread's semantic value.
pub(crate) type Pred<S> = Rc<dyn Fn(&S) -> Option<Value>>;

/// A unary transformation of an erased value.
pub(crate) type Xform = Rc<dyn Fn(Value) -> Value>;

/// A binary combination of erased values (concatenation merge, or a
/// repetition fold).
pub(crate) type Merge = Rc<dyn Fn(Value, Value) -> Value>;

/// The erased regex tree. Children are shared via `Rc`, so cloning a regex
/// and reusing a sub-regex in several places is cheap.
pub(crate) enum Node<S: 'static> {
    /// Matches the empty sequence, yields unit.
    Epsilon,
    /// Matches nothing at all.
    Fail,
    /// Consumes one symbol accepted by `pred`; the predicate's output is the
    /// thread's value. `id` is the NFA state identity, assigned by the
    /// numbering pass.
    Symbol { id: ThreadId, pred: Pred<S> },
    /// Left-biased alternation.
    Or(Rc<Node<S>>, Rc<Node<S>>),
    /// Sequencing; `merge` combines the two results.
    Concat {
        merge: Merge,
        left: Rc<Node<S>>,
        right: Rc<Node<S>>,
    },
    /// Result transformation.
    Map { xform: Xform, inner: Rc<Node<S>> },
    /// Zero-or-more repetitions of `body`, folding results onto `init`.
    Repeat {
        mode: Greediness,
        fold: Merge,
        init: Value,
        body: Rc<Node<S>>,
    },
    /// Matches `inner`, discards its result. Keeps discarded branches from
    /// building up values that nothing will read.
    Void(Rc<Node<S>>),
}

impl<S: 'static> fmt::Debug for Node<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Epsilon => write!(f, "Eps"),
            Node::Fail => write!(f, "Fail"),
            Node::Symbol { id, .. } if *id == ThreadId::UNNUMBERED => write!(f, "Sym(_)"),
            Node::Symbol { id, .. } => write!(f, "Sym({})", id.index()),
            Node::Or(l, r) => f.debug_tuple("Or").field(l).field(r).finish(),
            Node::Concat { left, right, .. } => {
                f.debug_tuple("Concat").field(left).field(right).finish()
            }
            Node::Map { inner, .. } => f.debug_tuple("Map").field(inner).finish(),
            Node::Repeat { mode, body, .. } => {
                f.debug_tuple("Repeat").field(mode).field(body).finish()
            }
            Node::Void(inner) => f.debug_tuple("Void").field(inner).finish(),
        }
    }
}

/// A regular expression over symbols of type `S` that, when it matches,
/// produces a result of type `A`.
///
/// Values of this type are immutable; all combinators consume their operands
/// and return a fresh regex. Cloning is cheap (the underlying tree is
/// shared), matching never mutates the regex, and the same regex can be
/// matched any number of times against different inputs.
pub struct Regex<S: 'static, A> {
    pub(crate) node: Rc<Node<S>>,
    marker: PhantomData<fn() -> A>,
}

impl<S: 'static, A> Clone for Regex<S, A> {
    fn clone(&self) -> Self {
        Regex {
            node: self.node.clone(),
            marker: PhantomData,
        }
    }
}

impl<S: 'static, A> fmt::Debug for Regex<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

impl<S: 'static, A> Regex<S, A> {
    pub(crate) fn from_node(node: Node<S>) -> Self {
        Regex {
            node: Rc::new(node),
            marker: PhantomData,
        }
    }
}

/// Matches the empty sequence and yields `()`.
pub fn eps<S: 'static>() -> Regex<S, ()> {
    Regex::from_node(Node::Epsilon)
}

/// Matches nothing: no input, not even the empty one, is accepted.
///
/// `fail` is the identity of [`Regex::or`] and absorbing for sequencing.
pub fn fail<S: 'static, A>() -> Regex<S, A> {
    Regex::from_node(Node::Fail)
}

/// Matches the empty sequence and yields `a`.
pub fn pure<S: 'static, A: Clone + 'static>(a: A) -> Regex<S, A> {
    eps().map(move |_| a.clone())
}

/// Matches one symbol for which `pred` returns a value; that value becomes
/// the result.
///
/// This is the general symbol matcher: it can classify and translate in one
/// step, e.g. `msym(|c: &char| c.to_digit(10))`.
pub fn msym<S: 'static, A: 'static>(pred: impl Fn(&S) -> Option<A> + 'static) -> Regex<S, A> {
    let pred: Pred<S> = Rc::new(move |s| pred(s).map(value));
    Regex::from_node(Node::Symbol {
        id: ThreadId::UNNUMBERED,
        pred,
    })
}

/// Matches one symbol satisfying `pred`; the symbol itself is the result.
pub fn psym<S: Clone + 'static>(pred: impl Fn(&S) -> bool + 'static) -> Regex<S, S> {
    msym(move |s| if pred(s) { Some(s.clone()) } else { None })
}

/// Matches exactly the symbol `expected`.
pub fn sym<S: PartialEq + Clone + 'static>(expected: S) -> Regex<S, S> {
    psym(move |s| *s == expected)
}

/// Matches any single symbol.
pub fn any_sym<S: Clone + 'static>() -> Regex<S, S> {
    psym(|_| true)
}

/// Matches the symbols of `expected` in order; the result is the matched
/// sequence.
///
/// ```
/// use semregex::string;
///
/// let greeting = string("hej".chars());
/// assert_eq!(greeting.match_iter("hej".chars()), Some(vec!['h', 'e', 'j']));
/// assert_eq!(greeting.match_iter("hej då".chars()), None);
/// ```
pub fn string<S, I>(expected: I) -> Regex<S, Vec<S>>
where
    S: PartialEq + Clone + 'static,
    I: IntoIterator<Item = S>,
{
    expected.into_iter().fold(pure(Vec::new()), |acc, x| {
        acc.then(sym(x)).map(|(mut xs, x)| {
            xs.push(x);
            xs
        })
    })
}

/// Sequencing under application: matches `f` then `x`, and applies `f`'s
/// resulting function to `x`'s result.
///
/// Together with [`Regex::map`] this is the applicative interface; the more
/// convenient [`Regex::then`] / [`Regex::ignore_then`] / [`Regex::then_ignore`]
/// cover the common cases without function-valued results.
pub fn app<S, A, B>(f: Regex<S, Rc<dyn Fn(A) -> B>>, x: Regex<S, A>) -> Regex<S, B>
where
    S: 'static,
    A: Clone + 'static,
    B: 'static,
{
    let merge: Merge = Rc::new(|fv: Value, xv: Value| {
        let func: Rc<dyn Fn(A) -> B> = take(fv);
        value(func(take(xv)))
    });
    Regex::from_node(Node::Concat {
        merge,
        left: f.node,
        right: x.node,
    })
}

impl<S: 'static, A: 'static> Regex<S, A> {
    /// Transforms the result of a match with `f`.
    pub fn map<B: 'static>(self, f: impl Fn(A) -> B + 'static) -> Regex<S, B>
    where
        A: Clone,
    {
        let xform: Xform = Rc::new(move |v| value(f(take::<A>(v))));
        Regex::from_node(Node::Map {
            xform,
            inner: self.node,
        })
    }

    /// Left-biased alternation: matches if either operand matches, and if
    /// both do, `self`'s result wins.
    pub fn or(self, other: Regex<S, A>) -> Regex<S, A> {
        Regex::from_node(Node::Or(self.node, other.node))
    }

    /// Matches `self`, discards its result.
    pub fn void(self) -> Regex<S, ()> {
        Regex::from_node(Node::Void(self.node))
    }

    /// Matches `self` followed by `other`; the result is the pair of both
    /// results.
    pub fn then<B: 'static>(self, other: Regex<S, B>) -> Regex<S, (A, B)>
    where
        A: Clone,
        B: Clone,
    {
        let merge: Merge = Rc::new(|l, r| value((take::<A>(l), take::<B>(r))));
        Regex::from_node(Node::Concat {
            merge,
            left: self.node,
            right: other.node,
        })
    }

    /// Matches `self` followed by `other`, keeping only `other`'s result.
    pub fn ignore_then<B: 'static>(self, other: Regex<S, B>) -> Regex<S, B> {
        let merge: Merge = Rc::new(|_, r| r);
        Regex::from_node(Node::Concat {
            merge,
            left: Rc::new(Node::Void(self.node)),
            right: other.node,
        })
    }

    /// Matches `self` followed by `other`, keeping only `self`'s result.
    pub fn then_ignore<B: 'static>(self, other: Regex<S, B>) -> Regex<S, A> {
        let merge: Merge = Rc::new(|l, _| l);
        Regex::from_node(Node::Concat {
            merge,
            left: self.node,
            right: Rc::new(Node::Void(other.node)),
        })
    }

    /// Matches zero or one occurrence of `self`, greedily.
    pub fn opt(self) -> Regex<S, Option<A>>
    where
        A: Clone,
    {
        self.map(Some).or(eps().map(|_| None))
    }

    /// Matches zero or more occurrences of `self`, greedily; the results are
    /// collected in input order.
    pub fn many(self) -> Regex<S, Vec<A>>
    where
        A: Clone,
    {
        self.fold_repeat(Greediness::Greedy, Vec::new(), |mut acc, a| {
            acc.push(a);
            acc
        })
    }

    /// Matches one or more occurrences of `self`, greedily.
    pub fn some(self) -> Regex<S, Vec<A>>
    where
        A: Clone,
    {
        // one-or-more is one followed by zero-or-more
        let rest = self.clone().many();
        self.then(rest).map(|(first, mut rest)| {
            rest.insert(0, first);
            rest
        })
    }

    /// General repetition: matches `self` zero or more times, folding every
    /// iteration's result onto `init` with `fold`, in input order.
    ///
    /// `mode` picks which parse wins when several repetition counts lead to
    /// a match of the whole input.
    ///
    /// ```
    /// use semregex::{sym, Greediness};
    ///
    /// let total = sym('x')
    ///     .map(|_| 1u32)
    ///     .fold_repeat(Greediness::Greedy, 0, |n, one| n + one);
    /// assert_eq!(total.match_iter("xxx".chars()), Some(3));
    /// ```
    pub fn fold_repeat<B>(
        self,
        mode: Greediness,
        init: B,
        fold: impl Fn(B, A) -> B + 'static,
    ) -> Regex<S, B>
    where
        A: Clone,
        B: Clone + 'static,
    {
        let fold: Merge = Rc::new(move |acc, a| value(fold(take::<B>(acc), take::<A>(a))));
        Regex::from_node(Node::Repeat {
            mode,
            fold,
            init: value(init),
            body: self.node,
        })
    }
}
