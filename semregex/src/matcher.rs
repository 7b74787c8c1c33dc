//! The thread-list NFA simulation and the match entry points.
//!
//! A match holds a list of [`Thread`]s in priority order: earliest is
//! preferred. Per input symbol every live thread is offered the symbol and
//! replaced by its successors, the list is deduplicated by thread id
//! (keeping the first, highest-priority occurrence), and accepting threads
//! survive only if no input remains. The priority order plus the
//! left-to-right construction in [`crate::compile`] is what implements both
//! alternation bias and greediness; the dedup is what keeps the live set
//! bounded by the number of symbol nodes in the regex.

use std::marker::PhantomData;
use std::rc::Rc;

use bitvec::vec::BitVec;
use log::trace;

use crate::compile::{emit, number, Cont, ThreadId};
use crate::regex::Regex;
use crate::value::{take, Value};

/// One NFA simulation thread.
pub(crate) enum Thread<S: 'static> {
    /// Waiting to consume one input symbol; `step` yields the successor
    /// threads for a symbol, or none if the symbol is rejected.
    Live {
        id: ThreadId,
        step: Rc<dyn Fn(&S) -> Vec<Thread<S>>>,
    },
    /// Done; carries the fully assembled result.
    Accept(Value),
}

/// The running state of a match: a regex compiled into live threads, fed
/// one symbol at a time.
///
/// Obtained from [`Regex::matcher`]. [`Regex::match_iter`] is the one-shot
/// convenience built on top of it; driving a `Matcher` directly is useful
/// when the input is produced incrementally, or to observe the thread list
/// between symbols.
///
/// ```
/// use semregex::sym;
///
/// let re = sym('a').or(sym('b')).many();
/// let mut m = re.matcher();
/// m.accept_many("ab".chars());
/// assert_eq!(m.result(), Some(vec!['a', 'b']));
/// m.accept(&'c');
/// assert!(m.is_dead());
/// ```
pub struct Matcher<S: 'static, A> {
    threads: Vec<Thread<S>>,
    seen: BitVec,
    marker: PhantomData<fn() -> A>,
}

impl<S: 'static, A: Clone + 'static> Matcher<S, A> {
    pub(crate) fn new(regex: &Regex<S, A>) -> Self {
        let mut next = 0;
        let numbered = number(&regex.node, &mut next);
        let accept: Cont<S> = Rc::new(|v| vec![Thread::Accept(v)]);
        let mut matcher = Matcher {
            threads: emit(&numbered, accept),
            seen: BitVec::repeat(false, next as usize),
            marker: PhantomData,
        };
        matcher.dedup();
        trace!(
            "compiled regex with {} symbol states, {} initial threads",
            next,
            matcher.threads.len()
        );
        matcher
    }

    /// Feeds one symbol to every live thread, in priority order.
    ///
    /// Accepting threads die here: input remains, and the match is anchored
    /// to the whole of it.
    pub fn accept(&mut self, symbol: &S) {
        let mut next = Vec::new();
        for thread in self.threads.drain(..) {
            if let Thread::Live { step, .. } = thread {
                next.extend(step(symbol));
            }
        }
        self.threads = next;
        self.dedup();
        trace!("consumed a symbol, {} live threads remain", self.live_count());
    }

    /// Feeds every symbol of `symbols` in order.
    pub fn accept_many(&mut self, symbols: impl IntoIterator<Item = S>) {
        for s in symbols {
            self.accept(&s);
        }
    }

    /// Whether the thread list is empty, i.e. no continuation of the input
    /// can lead to a match any more.
    pub fn is_dead(&self) -> bool {
        self.threads.is_empty()
    }

    /// The number of live (symbol-consuming) threads currently scheduled.
    /// Never exceeds the number of symbol nodes in the regex.
    pub fn live_count(&self) -> usize {
        self.threads
            .iter()
            .filter(|t| matches!(t, Thread::Live { .. }))
            .count()
    }

    /// The result of the highest-priority accepting thread, if the input
    /// fed so far matches the regex in its entirety.
    pub fn result(&self) -> Option<A> {
        self.threads.iter().find_map(|t| match t {
            Thread::Accept(v) => Some(take::<A>(v.clone())),
            Thread::Live { .. } => None,
        })
    }

    /// Walks the list in priority order and drops every live thread whose
    /// id was already seen. Must not reorder: priority is positional.
    fn dedup(&mut self) {
        self.seen.fill(false);
        let seen = &mut self.seen;
        self.threads.retain(|thread| match thread {
            Thread::Accept(_) => true,
            Thread::Live { id, .. } => {
                let idx = id.index();
                if seen[idx] {
                    false
                } else {
                    seen.set(idx, true);
                    true
                }
            }
        });
    }
}

impl<S: 'static, A: Clone + 'static> Regex<S, A> {
    /// Matches `input` in its entirety and returns the assembled result, or
    /// `None` if the regex does not match the whole input.
    ///
    /// The input is consumed once, in order; if the thread list dies before
    /// the input is exhausted no further symbols are drawn. The same regex
    /// value can be matched any number of times.
    pub fn match_iter(&self, input: impl IntoIterator<Item = S>) -> Option<A> {
        let mut matcher = Matcher::new(self);
        for symbol in input {
            matcher.accept(&symbol);
            if matcher.is_dead() {
                return None;
            }
        }
        matcher.result()
    }

    /// Compiles this regex into a [`Matcher`] that can be driven one symbol
    /// at a time.
    pub fn matcher(&self) -> Matcher<S, A> {
        Matcher::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regex::{any_sym, eps, fail, psym, sym, Greediness};

    #[test]
    fn eps_matches_only_empty() {
        assert_eq!(eps::<char>().match_iter("".chars()), Some(()));
        assert_eq!(eps::<char>().match_iter("a".chars()), None);
    }

    #[test]
    fn fail_matches_nothing() {
        assert_eq!(fail::<char, ()>().match_iter("".chars()), None);
        assert_eq!(fail::<char, ()>().match_iter("a".chars()), None);
    }

    #[test]
    fn symbol_matches_one() {
        let re = sym('a');
        assert_eq!(re.match_iter("a".chars()), Some('a'));
        assert_eq!(re.match_iter("b".chars()), None);
        assert_eq!(re.match_iter("".chars()), None);
        assert_eq!(re.match_iter("aa".chars()), None);
    }

    #[test]
    fn predicates_see_every_symbol() {
        let re = psym(|c: &char| c.is_ascii_digit()).some();
        assert_eq!(re.match_iter("007".chars()), Some(vec!['0', '0', '7']));
        assert_eq!(re.match_iter("0x7".chars()), None);
    }

    #[test]
    fn live_threads_never_exceed_symbol_count() {
        // three symbol nodes, heavily overlapping alternatives
        let re = sym('a').or(sym('a')).or(any_sym()).many();
        let mut m = re.matcher();
        for c in "aaaaaaab".chars() {
            m.accept(&c);
            assert!(m.live_count() <= 3);
        }
    }

    #[test]
    fn overlapping_alternatives_prefer_the_left() {
        let tagged = any_sym().map(|_| "left").or(any_sym().map(|_| "right"));
        assert_eq!(tagged.match_iter("x".chars()), Some("left"));
    }

    #[test]
    fn matcher_reports_intermediate_results() {
        let re = sym('a').many();
        let mut m = re.matcher();
        assert_eq!(m.result(), Some(vec![]));
        m.accept(&'a');
        assert_eq!(m.result(), Some(vec!['a']));
        m.accept(&'b');
        assert!(m.is_dead());
        assert_eq!(m.result(), None);
    }

    #[test]
    fn non_greedy_still_consumes_all_input() {
        let re = sym('a')
            .map(|_| 1u32)
            .fold_repeat(Greediness::NonGreedy, 0, |acc, n| acc + n);
        assert_eq!(re.match_iter("aaa".chars()), Some(3));
    }

    #[test]
    fn greedy_and_non_greedy_recognise_the_same_language() {
        for mode in [Greediness::Greedy, Greediness::NonGreedy] {
            let re = any_sym::<char>().void().fold_repeat(mode, 0u32, |n, _| n + 1);
            assert_eq!(re.match_iter("abc".chars()), Some(3));
            assert_eq!(re.match_iter("".chars()), Some(0));
        }
    }

    #[test]
    fn empty_matching_repetition_body_terminates() {
        let re = eps::<char>().many();
        assert_eq!(re.match_iter("".chars()), Some(vec![]));
        assert_eq!(re.match_iter("a".chars()), None);
    }

    #[test]
    fn nullable_repetition_body_still_matches_symbols() {
        // the body can match empty; those iterations are dropped, the
        // symbol-consuming ones are kept
        let re = sym('a').opt().many();
        assert_eq!(
            re.match_iter("aa".chars()),
            Some(vec![Some('a'), Some('a')])
        );
        assert_eq!(re.match_iter("".chars()), Some(vec![]));
    }

    #[test]
    fn nested_repetition_terminates() {
        let re = sym('a').many().many();
        let got = re.match_iter("aa".chars());
        assert_eq!(got, Some(vec![vec!['a', 'a']]));
    }
}
