//! Property-based checks of invariants that must hold for arbitrary
//! input, independent of any one example: the consumption/merge rules
//! `Or` depends on, `Try`'s backtrack-on-failure/commit-on-success
//! contract, `Lookahead`'s no-progress guarantee, `Map`/`Return` acting
//! as identities, `Or`'s associativity, and `Sequence`'s prefix
//! commitment.

use proptest::prelude::*;

use comb::config::Configuration;
use comb::parser::{any as any_token, current_offset, pure, satisfy, sequence, token, Parser};
use comb::state::ParseState;

fn run<O>(p: &impl Parser<char, O>, input: &[char]) -> Result<O, comb::ParseError<char>> {
    let mut state = ParseState::from_slice(input, Configuration::for_chars());
    comb::parse(p, &mut state)
}

fn lowercase_char() -> impl Strategy<Value = char> {
    ('a'..='z').prop_filter("not NUL", |&c| c != '\0')
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A zero-consumption failure in the first branch hands control to
    /// the second branch at the same location.
    #[test]
    fn or_tries_second_branch_after_a_non_consuming_failure(c in lowercase_char()) {
        let p = token('\0').or(token(c));
        let input = [c];
        prop_assert_eq!(run(&p, &input).unwrap(), c);
    }

    /// A failure that consumed input commits: `Or` must not fall
    /// through to the second branch, even when that branch would have
    /// matched the raw input.
    #[test]
    fn or_does_not_try_second_branch_after_a_consuming_failure(second in lowercase_char().prop_filter("not b", |&c| c != 'b')) {
        let p = sequence(vec!['a', 'b']).or(pure(vec!['z']));
        let input = ['a', second];
        prop_assert!(run(&p, &input).is_err());
    }

    /// `Try` rewinds a failed attempt back to the entry location, so an
    /// `Or` sibling sees a zero-consumption failure regardless of how
    /// much the attempted branch actually consumed.
    #[test]
    fn attempt_lets_or_recover_from_a_would_be_commit(a in lowercase_char(), b in lowercase_char()) {
        prop_assume!((a, b) != ('a', 'b'));
        let p = sequence(vec!['a', 'b']).attempt().or(sequence(vec![a, b]));
        let input = [a, b];
        prop_assert_eq!(run(&p, &input).unwrap(), vec![a, b]);
    }

    /// `Try` commits on success exactly as the wrapped parser would.
    #[test]
    fn attempt_is_transparent_on_success(c in lowercase_char()) {
        let plain = token(c);
        let wrapped = token(c).attempt();
        let input = [c];
        prop_assert_eq!(run(&plain, &input).unwrap(), run(&wrapped, &input).unwrap());
    }

    /// `Lookahead` never advances the cursor, whether or not the
    /// wrapped parser would have.
    #[test]
    fn lookahead_leaves_the_cursor_where_it_found_it(c in lowercase_char()) {
        let p = (current_offset(), any_token().lookahead(), current_offset());
        let input = [c];
        let (before, _, after) = run(&p, &input).unwrap();
        prop_assert_eq!(before, after);
        prop_assert_eq!(before, 0);
    }

    /// `Map(x -> x, p)` behaves exactly like `p`: same value, same
    /// success/failure split.
    #[test]
    fn map_identity_matches_the_unmapped_parser(c in any::<char>().prop_filter("ascii", |c| c.is_ascii())) {
        let plain = satisfy(|c: &char| c.is_ascii_digit());
        let mapped = satisfy(|c: &char| c.is_ascii_digit()).map(|x| x);
        let input = [c];
        prop_assert_eq!(run(&plain, &input).is_ok(), run(&mapped, &input).is_ok());
        if let (Ok(p), Ok(m)) = (run(&plain, &input), run(&mapped, &input)) {
            prop_assert_eq!(p, m);
        }
    }

    /// `Return(v).Then(p)` is `p`, and `p.Before(Return(v))` is `p`:
    /// a non-consuming, always-succeeding parser is neutral in a chain.
    #[test]
    fn pure_is_neutral_on_either_side_of_then(c in any::<char>().prop_filter("ascii", |c| c.is_ascii())) {
        let plain = satisfy(|c: &char| c.is_ascii_digit());
        let lhs_neutral = pure(()).then(satisfy(|c: &char| c.is_ascii_digit()));
        let rhs_neutral = satisfy(|c: &char| c.is_ascii_digit()).before(pure(()));
        let input = [c];
        let expected = run(&plain, &input);
        prop_assert_eq!(expected.is_ok(), run(&lhs_neutral, &input).is_ok());
        prop_assert_eq!(expected.is_ok(), run(&rhs_neutral, &input).is_ok());
    }

    /// `Or` agrees on success/failure/consumption regardless of how a
    /// three-way choice is grouped.
    #[test]
    fn or_associates(c in lowercase_char()) {
        let grouped_left = token('a').or(token('b')).or(token('c'));
        let grouped_right = token('a').or(token('b').or(token('c')));
        let input = [c];
        prop_assert_eq!(run(&grouped_left, &input).is_ok(), run(&grouped_right, &input).is_ok());
        if c == 'a' || c == 'b' || c == 'c' {
            prop_assert_eq!(run(&grouped_left, &input).unwrap(), run(&grouped_right, &input).unwrap());
        }
    }

    /// A literal sequence that fails partway through leaves the cursor
    /// exactly at the shared prefix length, never further and never
    /// rewound.
    #[test]
    fn sequence_failure_commits_exactly_the_matched_prefix(
        tail in lowercase_char().prop_filter("not c", |&c| c != 'c'),
    ) {
        let p = sequence(vec!['a', 'b', 'c']).then(current_offset());
        let input = ['a', 'b', tail];
        let mut state = ParseState::from_slice(&input, Configuration::for_chars());
        let mut expected = state.rent_expectations();
        let result = p.try_parse(&mut state, &mut expected);
        prop_assert!(result.is_none());
        prop_assert_eq!(state.location(), 2);
    }

    /// Running the same parser over the same input twice produces
    /// identical results: parsers carry no hidden mutable state of
    /// their own.
    #[test]
    fn parsing_is_deterministic(c in lowercase_char()) {
        let p = token('a').or(token('b')).many();
        let input = vec![c; 3];
        let first = run(&p, &input);
        let second = run(&p, &input);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a, b);
        }
    }
}

/// `Many`/`AtLeastOnce` over a parser that succeeds without consuming
/// is a usage error (an infinite loop waiting to happen), not a silent
/// hang or an empty result.
#[test]
#[should_panic(expected = "loop forever")]
fn many_over_a_non_consuming_parser_panics() {
    let p = pure(()).many();
    let input: Vec<char> = Vec::new();
    let mut state = ParseState::from_slice(&input, Configuration::for_chars());
    let mut expected = state.rent_expectations();
    let _ = p.try_parse(&mut state, &mut expected);
}
