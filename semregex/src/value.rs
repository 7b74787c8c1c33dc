//! Erased semantic values.
//!
//! Result types differ from node to node inside a single regex (a
//! concatenation combines an `A` and a `B` into a `C`), so the tree and the
//! threads that run it carry values as opaque shared handles. The typed
//! combinator surface in [`crate::regex`] is the only place where values are
//! wrapped and unwrapped, which is what makes the downcasts below
//! infallible for well-typed trees.

use std::any::Any;
use std::rc::Rc;

/// An opaque handle to a semantic value of some erased type.
pub(crate) type Value = Rc<dyn Any>;

/// Wraps a typed value into an opaque handle.
pub(crate) fn value<A: 'static>(a: A) -> Value {
    Rc::new(a)
}

/// Recovers a typed value from an opaque handle, cloning only if the handle
/// is still shared with another thread.
///
/// Panics if the handle does not hold an `A`. The combinator surface only
/// builds trees in which the types line up, so this is unreachable from
/// safe use of the crate.
pub(crate) fn take<A: Clone + 'static>(v: Value) -> A {
    let v = v
        .downcast::<A>()
        .unwrap_or_else(|_| panic!("semantic value carried an unexpected type"));
    Rc::try_unwrap(v).unwrap_or_else(|shared| (*shared).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let v = value(42u32);
        assert_eq!(take::<u32>(v), 42);
    }

    #[test]
    fn shared_handles_clone() {
        let v = value(String::from("shared"));
        let w = v.clone();
        assert_eq!(take::<String>(v), "shared");
        assert_eq!(take::<String>(w), "shared");
    }

    #[test]
    #[should_panic(expected = "unexpected type")]
    fn mismatched_take_panics() {
        take::<u8>(value(1u16));
    }
}
