use super::super::primitive::{any, pure, token};
use super::*;
use crate::config::Configuration;
use crate::state::ParseState;

fn state(data: &[char]) -> ParseState<'_, char> {
    ParseState::from_slice(data, Configuration::for_chars())
}

#[test]
fn many_collects_zero_or_more() {
    let data: Vec<char> = "aaab".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&token('a').many(), &mut st).unwrap();
    assert_eq!(v, vec!['a', 'a', 'a']);
    assert_eq!(st.location(), 3);
}

#[test]
fn many_succeeds_with_empty_vec_on_immediate_failure() {
    let data: Vec<char> = "b".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&token('a').many(), &mut st).unwrap();
    assert!(v.is_empty());
}

#[test]
fn at_least_once_requires_one_success() {
    let data: Vec<char> = "b".chars().collect();
    let mut st = state(&data);
    assert!(crate::parser::parse(&token('a').at_least_once(), &mut st).is_err());
}

#[test]
#[should_panic(expected = "would loop forever")]
fn many_panics_on_zero_consumption_body() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let _ = crate::parser::parse(&pure(()).many(), &mut st);
}

#[test]
fn skip_many_discards_values() {
    let data: Vec<char> = "aaab".chars().collect();
    let mut st = state(&data);
    crate::parser::parse(&token('a').skip_many(), &mut st).unwrap();
    assert_eq!(st.location(), 3);
}

#[test]
fn repeat_runs_exactly_n_times() {
    let data: Vec<char> = "aaab".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&any().repeat(2), &mut st).unwrap();
    assert_eq!(v, vec!['a', 'a']);
    assert_eq!(st.location(), 2);
}

#[test]
fn repeat_fails_if_any_iteration_fails() {
    let data: Vec<char> = "a".chars().collect();
    let mut st = state(&data);
    assert!(crate::parser::parse(&any().repeat(2), &mut st).is_err());
}

#[test]
fn repeat_string_collects_into_a_string() {
    let data: Vec<char> = "abc".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&repeat_string(any(), 3), &mut st).unwrap();
    assert_eq!(v, "abc");
}

#[test]
fn until_collects_body_results_up_to_terminator() {
    let data: Vec<char> = "aab".chars().collect();
    let mut st = state(&data);
    let (body, term) = crate::parser::parse(&token('a').until(token('b')), &mut st).unwrap();
    assert_eq!(body, vec!['a', 'a']);
    assert_eq!(term, 'b');
}

#[test]
fn at_least_once_until_requires_a_body_hit_before_the_terminator() {
    let data: Vec<char> = "b".chars().collect();
    let mut st = state(&data);
    assert!(crate::parser::parse(&token('a').at_least_once_until(token('b')), &mut st).is_err());
}

#[test]
fn sep_by_parses_comma_separated_items() {
    let data: Vec<char> = "a,a,a".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&sep_by(token('a'), token(',')), &mut st).unwrap();
    assert_eq!(v, vec!['a', 'a', 'a']);
}

#[test]
fn sep_by_succeeds_empty_on_no_items() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&sep_by(token('a'), token(',')), &mut st).unwrap();
    assert!(v.is_empty());
}

#[test]
fn sep_by1_requires_at_least_one_item() {
    let data: Vec<char> = "x".chars().collect();
    let mut st = state(&data);
    assert!(crate::parser::parse(&sep_by1(token('a'), token(',')), &mut st).is_err());
}

#[test]
fn sep_end_by_allows_a_trailing_separator() {
    let data: Vec<char> = "a,a,".chars().collect();
    let mut st = state(&data);
    let v = crate::parser::parse(&sep_end_by(token('a'), token(',')), &mut st).unwrap();
    assert_eq!(v, vec!['a', 'a']);
    assert_eq!(st.location(), 4);
}
