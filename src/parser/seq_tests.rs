use super::super::primitive::{any, fail, token};
use super::*;
use crate::config::Configuration;
use crate::state::ParseState;

fn state(data: &[char]) -> ParseState<'_, char> {
    ParseState::from_slice(data, Configuration::for_chars())
}

#[test]
fn map_transforms_value_and_leaves_consumption_alone() {
    let data: Vec<char> = "a".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&any().map(|c| c.to_ascii_uppercase()), &mut st).unwrap();
    assert_eq!(v, 'A');
    assert_eq!(st.location(), 1);
}

#[test]
fn then_keeps_second_value() {
    let data: Vec<char> = "ab".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&token('a').then(token('b')), &mut st).unwrap();
    assert_eq!(v, 'b');
}

#[test]
fn before_keeps_first_value() {
    let data: Vec<char> = "ab".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&token('a').before(token('b')), &mut st).unwrap();
    assert_eq!(v, 'a');
}

#[test]
fn bind_builds_the_next_parser_from_the_first_value() {
    let data: Vec<char> = "aa".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&any().bind(|c| token(c)), &mut st).unwrap();
    assert_eq!(v, 'a');
    assert_eq!(st.location(), 2);
}

#[test]
fn bind_context_sensitive_mismatch_fails() {
    let data: Vec<char> = "ab".chars().collect();
    let mut st = state(&data);
    let err = crate::parser::parse(&any().bind(|c| token(c)), &mut st).unwrap_err();
    assert_eq!(err.unexpected, Some('b'));
}

#[test]
fn labelled_replaces_expectations_on_failure() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let err = crate::parser::parse(&token('a').labelled("letter a"), &mut st).unwrap_err();
    assert_eq!(err.expected.len(), 1);
    assert_eq!(err.expected[0].to_string(), "letter a");
}

#[test]
fn labelled_leaves_success_untouched() {
    let data: Vec<char> = "a".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&token('a').labelled("letter a"), &mut st).unwrap();
    assert_eq!(v, 'a');
}

#[test]
fn tuple_sequences_in_order_and_collects_results() {
    let data: Vec<char> = "abc".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&(token('a'), token('b'), token('c')), &mut st).unwrap();
    assert_eq!(v, ('a', 'b', 'c'));
}

#[test]
fn tuple_bails_at_first_failing_element() {
    let data: Vec<char> = "ax".chars().collect();
    let mut st = state(&data);
    let err = crate::parser::parse(&(token('a'), token('b'), fail::<char>("unreached")), &mut st).unwrap_err();
    assert_eq!(err.unexpected, Some('x'));
    assert_eq!(st.location(), 1);
}
