use std::rc::Rc;

use semregex::{app, pure, string, sym, Greediness};

macro_rules! assert_matches {
    ($expression:expr, $pattern:pat $(if $guard:expr)? $(,)?) => {
        match $expression {
            $pattern $(if $guard)? => {}
            outcome => panic!(
                "expected {:?} to match {}",
                outcome,
                stringify!($pattern $(if $guard)?)
            ),
        }
    };
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Alphabet {
    A,
    B,
    C,
}

#[test]
fn tagged_literal_alternatives() {
    let re = string("two".chars())
        .ignore_then(pure(2))
        .or(string("one".chars()).ignore_then(pure(1)));
    assert_eq!(re.match_iter("one".chars()), Some(1));
    assert_eq!(re.match_iter("two".chars()), Some(2));
    assert_eq!(re.match_iter("three".chars()), None);
}

#[test]
fn many_collects_in_input_order() {
    let re = sym('a').many();
    assert_eq!(re.match_iter("aaaa".chars()), Some(vec!['a'; 4]));
    assert_eq!(re.match_iter("".chars()), Some(vec![]));
}

#[test]
fn left_branch_wins_when_both_accept() {
    // both branches recognise "ab"; the result tags the branch taken
    let re = string("ab".chars())
        .map(|_| "whole")
        .or(string("a".chars()).then(sym('b')).map(|_| "split"));
    assert_eq!(re.match_iter("ab".chars()), Some("whole"));

    let anchored = string("ab".chars()).or(string("a".chars())).void();
    assert_eq!(anchored.match_iter("ab".chars()), Some(()));
}

#[test]
fn first_of_two_greedy_repetitions_wins() {
    let pair = |xs: Vec<char>| -> Rc<dyn Fn(Vec<char>) -> (Vec<char>, Vec<char>)> {
        Rc::new(move |ys| (xs.clone(), ys))
    };
    let re = app(sym('a').many().map(pair), sym('a').many());
    assert_eq!(re.match_iter("aaaa".chars()), Some((vec!['a'; 4], vec![])));
}

#[test]
fn non_greedy_repetition_still_spans_the_input() {
    let re = sym('a')
        .map(|_| 1u32)
        .fold_repeat(Greediness::NonGreedy, 0, |acc, n| acc + n);
    assert_eq!(re.match_iter("aaa".chars()), Some(3));
}

#[test]
fn match_is_anchored_to_the_whole_input() {
    let re = sym('a').many();
    assert_eq!(re.match_iter("aab".chars()), None);
    assert_eq!(re.match_iter("ba".chars()), None);
}

#[test]
fn matches_over_a_token_alphabet() {
    use Alphabet::*;

    let re = sym(A).then(sym(B).or(sym(C)).many());
    assert_matches!(re.match_iter([A, B, C, B]), Some((A, seq)) if seq == vec![B, C, B]);
    assert_matches!(re.match_iter([A]), Some((A, seq)) if seq.is_empty());
    assert_matches!(re.match_iter([B]), None);
    assert_matches!(re.match_iter(std::iter::empty()), None);
}
