use super::super::primitive::{any, token};
use super::*;
use crate::config::Configuration;
use crate::state::ParseState;

fn state(data: &[char]) -> ParseState<'_, char> {
    ParseState::from_slice(data, Configuration::for_chars())
}

#[test]
fn assert_keeps_value_when_predicate_holds() {
    let data: Vec<char> = "7".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(
        &any().assert(|c: &char| c.is_ascii_digit(), |c| format!("{c} is not a digit")),
        &mut st,
    )
    .unwrap();
    assert_eq!(v, '7');
}

#[test]
fn assert_fails_with_custom_message_when_predicate_fails() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let err = crate::parser::parse(
        &any().assert(|c: &char| c.is_ascii_digit(), |c| format!("{c} is not a digit")),
        &mut st,
    )
    .unwrap_err();
    assert_eq!(err.message.as_deref(), Some("x is not a digit"));
}

#[test]
fn recover_with_runs_the_handler_supplied_parser_on_failure() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(
        &token('a').recover_with(|_err| crate::parser::pure('!')),
        &mut st,
    )
    .unwrap();
    assert_eq!(v, '!');
}

#[test]
fn recover_with_sees_the_original_failure() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(
        &token('a').recover_with(|err| crate::parser::pure(err.unexpected)),
        &mut st,
    )
    .unwrap();
    assert_eq!(v, Some('x'));
}
