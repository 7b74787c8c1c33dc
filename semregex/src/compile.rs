//! Numbering and thread compilation.
//!
//! Matching never interprets the term tree directly. It first runs the
//! numbering pass, which rebuilds the tree with every symbol node assigned a
//! [`ThreadId`], and then compiles the numbered tree into an initial list of
//! NFA threads. Compilation is continuation-passing: each node is turned
//! into threads given "what happens with my result once I am done", so
//! sequencing, mapping and repetition all reduce to wrapping the
//! continuation. Thread lists are built left-to-right and are therefore in
//! priority order by construction; nothing downstream may reorder them.

use std::cell::Cell;
use std::rc::Rc;

use crate::matcher::Thread;
use crate::regex::{Greediness, Merge, Node};
use crate::value::{value, Value};

/// The identity of a symbol-consuming NFA state.
///
/// Every symbol node of a numbered regex owns one, and live threads inherit
/// the id of the symbol node they are waiting on. Two live threads with the
/// same id are waiting on the same state, so only the higher-priority one
/// can ever win; the per-step deduplication this enables is what bounds the
/// live set by the regex size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(u32);

impl ThreadId {
    /// Placeholder carried by symbol nodes between construction and
    /// numbering. Never observable during a match: every entry point
    /// renumbers first.
    pub(crate) const UNNUMBERED: ThreadId = ThreadId(u32::MAX);

    /// The id as an index into per-step bookkeeping tables.
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rebuilds `node` with symbol ids assigned from `next` in pre-order.
///
/// The input tree is left untouched (sub-trees may be shared with other
/// regexes the user still holds), and identical tree structure always
/// receives identical ids.
pub(crate) fn number<S: 'static>(node: &Rc<Node<S>>, next: &mut u32) -> Rc<Node<S>> {
    match &**node {
        Node::Epsilon | Node::Fail => node.clone(),
        Node::Symbol { pred, .. } => {
            let id = ThreadId(*next);
            *next += 1;
            Rc::new(Node::Symbol {
                id,
                pred: pred.clone(),
            })
        }
        Node::Or(l, r) => {
            let l = number(l, next);
            let r = number(r, next);
            Rc::new(Node::Or(l, r))
        }
        Node::Concat { merge, left, right } => {
            let left = number(left, next);
            let right = number(right, next);
            Rc::new(Node::Concat {
                merge: merge.clone(),
                left,
                right,
            })
        }
        Node::Map { xform, inner } => Rc::new(Node::Map {
            xform: xform.clone(),
            inner: number(inner, next),
        }),
        Node::Repeat {
            mode,
            fold,
            init,
            body,
        } => Rc::new(Node::Repeat {
            mode: *mode,
            fold: fold.clone(),
            init: init.clone(),
            body: number(body, next),
        }),
        Node::Void(inner) => Rc::new(Node::Void(number(inner, next))),
    }
}

/// What to do with a finished sub-term's value: produces the successor
/// threads.
pub(crate) type Cont<S> = Rc<dyn Fn(Value) -> Vec<Thread<S>>>;

/// Compiles a numbered term into its thread list, given the continuation
/// for its result.
pub(crate) fn emit<S: 'static>(node: &Rc<Node<S>>, k: Cont<S>) -> Vec<Thread<S>> {
    match &**node {
        Node::Epsilon => k(value(())),
        Node::Fail => Vec::new(),
        Node::Symbol { id, pred } => {
            debug_assert!(
                *id != ThreadId::UNNUMBERED,
                "symbol node evaluated before numbering"
            );
            let pred = pred.clone();
            let step = move |s: &S| match pred(s) {
                Some(v) => k(v),
                None => Vec::new(),
            };
            vec![Thread::Live {
                id: *id,
                step: Rc::new(step),
            }]
        }
        Node::Or(l, r) => {
            let mut threads = emit(l, k.clone());
            threads.extend(emit(r, k));
            threads
        }
        Node::Concat { merge, left, right } => {
            let merge = merge.clone();
            let right = right.clone();
            emit(
                left,
                Rc::new(move |lv: Value| {
                    let merge = merge.clone();
                    let k = k.clone();
                    emit(&right, Rc::new(move |rv: Value| k(merge(lv.clone(), rv))))
                }),
            )
        }
        Node::Map { xform, inner } => {
            let xform = xform.clone();
            emit(inner, Rc::new(move |v| k(xform(v))))
        }
        Node::Void(inner) => emit(inner, Rc::new(move |_| k(value(())))),
        Node::Repeat {
            mode,
            fold,
            init,
            body,
        } => emit_repeat(body, *mode, fold.clone(), init.clone(), k),
    }
}

/// Compiles one entry into a repetition loop.
///
/// The loop is the alternation of *iterate* (threads of the body, whose
/// continuation folds the body's value into the accumulator and re-enters
/// the loop) and *stop* (the surrounding continuation applied to the
/// accumulator), ordered by the greediness mode.
fn emit_repeat<S: 'static>(
    body: &Rc<Node<S>>,
    mode: Greediness,
    fold: Merge,
    acc: Value,
    k: Cont<S>,
) -> Vec<Thread<S>> {
    // Set while the iterate branch below is being assembled. If the loop
    // continuation fires during that window, the body matched the empty
    // sequence; iterating again could never consume input either, so such
    // iterations contribute no threads. The stop branch already carries the
    // accumulator, which keeps `many(eps())` and friends from diverging.
    let compiling = Rc::new(Cell::new(true));

    let iterate = {
        let loop_body = body.clone();
        let fold = fold.clone();
        let acc = acc.clone();
        let k = k.clone();
        let guard = compiling.clone();
        let resume: Cont<S> = Rc::new(move |v: Value| {
            if guard.get() {
                return Vec::new();
            }
            emit_repeat(&loop_body, mode, fold.clone(), fold(acc.clone(), v), k.clone())
        });
        emit(body, resume)
    };
    compiling.set(false);

    let stop = k(acc);

    match mode {
        Greediness::Greedy => {
            let mut threads = iterate;
            threads.extend(stop);
            threads
        }
        Greediness::NonGreedy => {
            let mut threads = stop;
            threads.extend(iterate);
            threads
        }
    }
}
