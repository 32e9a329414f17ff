//! Token/Any/End/Return/Fail/CurrentPos/CurrentOffset and the literal
//! sequence matchers built on them.

use std::marker::PhantomData;

use super::seq::Map;
use super::Parser;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::position::Position;
use crate::state::ParseState;

/// Succeeds with a fixed, cloned value; consumes nothing, reports no
/// expectations.
pub struct Pure<O> {
    value: O,
}

impl<Tok, O: Clone> Parser<Tok, O> for Pure<O> {
    fn try_parse(&self, _state: &mut ParseState<'_, Tok>, _expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        Some(self.value.clone())
    }
}

pub fn pure<O: Clone>(value: O) -> Pure<O> {
    Pure { value }
}

/// Always fails with a custom message; consumes nothing.
pub struct Fail {
    message: String,
}

impl<Tok, O> Parser<Tok, O> for Fail {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        state.set_error(None, false, state.location(), Some(self.message.clone()));
        expected.add(Expectation::Tokens(Vec::new()));
        None
    }
}

pub fn fail(message: impl Into<String>) -> Fail {
    Fail {
        message: message.into(),
    }
}

/// Succeeds with the current token and advances by one; fails with
/// `at_eof` at the end of input.
pub struct Any;

impl<Tok: Clone> Parser<Tok, Tok> for Any {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Tok> {
        match state.current().cloned() {
            Some(tok) => {
                state.advance(1);
                Some(tok)
            }
            None => {
                state.set_error(None, true, state.location(), None);
                expected.add(Expectation::Eof);
                None
            }
        }
    }
}

pub fn any() -> Any {
    Any
}

/// Matches a single specific token.
pub struct TokenEq<Tok> {
    expected: Tok,
}

impl<Tok: Clone + PartialEq> Parser<Tok, Tok> for TokenEq<Tok> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Tok> {
        let loc = state.location();
        match state.current().cloned() {
            Some(tok) if tok == self.expected => {
                state.advance(1);
                Some(tok)
            }
            Some(tok) => {
                state.set_error(Some(tok), false, loc, None);
                expected.add(Expectation::Tokens(vec![self.expected.clone()]));
                None
            }
            None => {
                state.set_error(None, true, loc, None);
                expected.add(Expectation::Tokens(vec![self.expected.clone()]));
                None
            }
        }
    }
}

pub fn token<Tok: Clone + PartialEq>(expected: Tok) -> TokenEq<Tok> {
    TokenEq { expected }
}

/// Matches any token satisfying a predicate. Reports an empty token
/// expectation by default — pair with `.labelled(...)` for a readable
/// diagnostic.
pub struct Satisfy<Tok, F> {
    pred: F,
    _marker: PhantomData<fn(&Tok)>,
}

impl<Tok: Clone, F: Fn(&Tok) -> bool> Parser<Tok, Tok> for Satisfy<Tok, F> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Tok> {
        let loc = state.location();
        match state.current() {
            Some(tok) if (self.pred)(tok) => {
                let tok = tok.clone();
                state.advance(1);
                Some(tok)
            }
            Some(tok) => {
                let tok = tok.clone();
                state.set_error(Some(tok), false, loc, None);
                expected.add(Expectation::Tokens(Vec::new()));
                None
            }
            None => {
                state.set_error(None, true, loc, None);
                expected.add(Expectation::Tokens(Vec::new()));
                None
            }
        }
    }
}

pub fn satisfy<Tok: Clone, F: Fn(&Tok) -> bool>(pred: F) -> Satisfy<Tok, F> {
    Satisfy {
        pred,
        _marker: PhantomData,
    }
}

/// Matches a literal token sequence. On mismatch at index `i`, advances
/// by `i` (keeping whatever prefix matched) before failing — the
/// asymmetry `Or` relies on to know whether this alternative committed.
pub struct Sequence<Tok> {
    tokens: Vec<Tok>,
}

impl<Tok: Clone + PartialEq> Parser<Tok, Vec<Tok>> for Sequence<Tok> {
    fn try_parse(
        &self,
        state: &mut ParseState<'_, Tok>,
        expected: &mut PooledList<Expectation<Tok>>,
    ) -> Option<Vec<Tok>> {
        let mut matched = Vec::with_capacity(self.tokens.len());
        for want in &self.tokens {
            let loc = state.location();
            match state.current().cloned() {
                Some(tok) if tok == *want => {
                    state.advance(1);
                    matched.push(tok);
                }
                Some(tok) => {
                    state.set_error(Some(tok), false, loc, None);
                    expected.add(Expectation::Tokens(self.tokens.clone()));
                    return None;
                }
                None => {
                    state.set_error(None, true, loc, None);
                    expected.add(Expectation::Tokens(self.tokens.clone()));
                    return None;
                }
            }
        }
        Some(matched)
    }
}

pub fn seq<Tok: Clone + PartialEq>(tokens: Vec<Tok>) -> Sequence<Tok> {
    Sequence { tokens }
}

fn chars_to_string(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

/// Matches a literal string of `char` tokens, producing the matched
/// `String`.
pub fn string(s: &str) -> Map<Sequence<char>, fn(Vec<char>) -> String> {
    Map {
        parser: Sequence {
            tokens: s.chars().collect(),
        },
        f: chars_to_string,
    }
}

/// Case-insensitive (ASCII) literal match over `char` tokens.
pub struct CiString {
    expected: Vec<char>,
}

impl Parser<char, String> for CiString {
    fn try_parse(
        &self,
        state: &mut ParseState<'_, char>,
        expected: &mut PooledList<Expectation<char>>,
    ) -> Option<String> {
        let mut matched = Vec::with_capacity(self.expected.len());
        for want in &self.expected {
            let loc = state.location();
            match state.current().copied() {
                Some(tok) if tok.eq_ignore_ascii_case(want) => {
                    state.advance(1);
                    matched.push(tok);
                }
                Some(tok) => {
                    state.set_error(Some(tok), false, loc, None);
                    expected.add(Expectation::Tokens(self.expected.clone()));
                    return None;
                }
                None => {
                    state.set_error(None, true, loc, None);
                    expected.add(Expectation::Tokens(self.expected.clone()));
                    return None;
                }
            }
        }
        Some(matched.into_iter().collect())
    }
}

pub fn ci_string(s: &str) -> CiString {
    CiString {
        expected: s.chars().collect(),
    }
}

/// Succeeds with `()` iff there is no current token.
pub struct End;

impl<Tok: Clone> Parser<Tok, ()> for End {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<()> {
        if state.has_current() {
            let loc = state.location();
            let tok = state.current().cloned();
            state.set_error(tok, false, loc, None);
            expected.add(Expectation::Eof);
            None
        } else {
            Some(())
        }
    }
}

pub fn end() -> End {
    End
}

/// Succeeds with the raw cursor index, no side effects.
pub struct CurrentOffset;

impl<Tok> Parser<Tok, usize> for CurrentOffset {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, _expected: &mut PooledList<Expectation<Tok>>) -> Option<usize> {
        Some(state.location())
    }
}

pub fn current_offset() -> CurrentOffset {
    CurrentOffset
}

/// Succeeds with the `(1,1)`-based position at the cursor.
pub struct CurrentPos;

impl<Tok> Parser<Tok, Position> for CurrentPos {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, _expected: &mut PooledList<Expectation<Tok>>) -> Option<Position> {
        Some(Position::START + state.compute_source_pos_delta())
    }
}

pub fn current_pos() -> CurrentPos {
    CurrentPos
}
