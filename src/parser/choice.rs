//! Alternation: `Or`, `OneOf`, `Try`, `Lookahead`, `Not`.
//!
//! The rule every combinator here is built around: a parser that fails
//! *without* consuming input hasn't committed to anything, so a sibling
//! alternative gets a turn at the same position; a parser that fails
//! *having* consumed input has committed, and that failure propagates
//! instead of being swallowed. `state.location()` before and after a
//! branch's attempt is the only signal needed to tell the two apart.

use super::Parser;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

/// Try `p`; if it fails without consuming, try `q` at the same
/// position. If both fail at the same position, their expectations are
/// merged (either was viable). If `q` consumed before failing, `q`'s
/// error — being the deeper one — is reported alone.
pub struct Or<P, Q> {
    pub(crate) p: P,
    pub(crate) q: Q,
}

impl<Tok, O, P, Q> Parser<Tok, O> for Or<P, Q>
where
    P: Parser<Tok, O>,
    Q: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        let start = state.location();
        let mut p_expected = state.rent_expectations();
        if let Some(v) = self.p.try_parse(state, &mut p_expected) {
            return Some(v);
        }
        if state.location() != start {
            p_expected.drain_into(expected);
            return None;
        }

        let mut q_expected = state.rent_expectations();
        if let Some(v) = self.q.try_parse(state, &mut q_expected) {
            return Some(v);
        }
        if state.location() != start {
            q_expected.drain_into(expected);
        } else {
            p_expected.drain_into(expected);
            q_expected.drain_into(expected);
        }
        None
    }
}

/// `Or` generalized over any number of same-typed alternatives, tried
/// in order. Equivalent to folding `Or` over the list, but without the
/// nested-struct chain.
pub struct OneOf<Tok, O> {
    parsers: Vec<Box<dyn Parser<Tok, O>>>,
}

impl<Tok, O> OneOf<Tok, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<Tok, O>>>) -> Self {
        Self { parsers }
    }
}

impl<Tok: 'static, O> Parser<Tok, O> for OneOf<Tok, O> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        let start = state.location();
        let mut merged: Option<PooledList<Expectation<Tok>>> = None;

        for p in &self.parsers {
            let mut branch_expected = state.rent_expectations();
            if let Some(v) = p.try_parse(state, &mut branch_expected) {
                return Some(v);
            }
            if state.location() != start {
                branch_expected.drain_into(expected);
                return None;
            }
            match merged.as_mut() {
                Some(m) => branch_expected.drain_into(m),
                None => merged = Some(branch_expected),
            }
        }

        if let Some(mut m) = merged {
            m.drain_into(expected);
        }
        None
    }
}

pub fn one_of<Tok, O>(parsers: Vec<Box<dyn Parser<Tok, O>>>) -> OneOf<Tok, O> {
    OneOf::new(parsers)
}

/// Buffers `parser`'s progress: on failure, rewinds to the position
/// before the attempt, turning a committed failure into a
/// zero-consumption one. On success, the progress is kept.
pub struct Try<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P: Parser<Tok, O>> Parser<Tok, O> for Try<P> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        state.push_bookmark();
        match self.parser.try_parse(state, expected) {
            Some(v) => {
                state.pop_bookmark();
                Some(v)
            }
            None => {
                state.rewind();
                None
            }
        }
    }
}

/// Runs `parser`, rewinding only on success. A failed lookahead is
/// reported exactly as `parser` left it — consumed or not.
pub struct Lookahead<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P: Parser<Tok, O>> Parser<Tok, O> for Lookahead<P> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        state.push_bookmark();
        match self.parser.try_parse(state, expected) {
            Some(v) => {
                state.rewind();
                Some(v)
            }
            None => {
                state.pop_bookmark();
                None
            }
        }
    }
}

/// Negative lookahead: succeeds with `()` iff `parser` fails. Runs under
/// a bookmark to hold the buffer steady for position calculation, but
/// does *not* rewind location on its own. Compose with `.attempt()` for
/// a non-consuming negative lookahead.
pub struct Not<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P: Parser<Tok, O>> Parser<Tok, ()> for Not<P>
where
    Tok: Clone + 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<()> {
        let loc = state.location();
        let tok_at_loc = state.current().cloned();
        state.push_bookmark();
        let mut inner = state.rent_expectations();
        match self.parser.try_parse(state, &mut inner) {
            Some(_) => {
                state.pop_bookmark();
                state.set_error(tok_at_loc, false, loc, None);
                expected.add(Expectation::Label("not this".into()));
                None
            }
            None => {
                state.pop_bookmark();
                Some(())
            }
        }
    }
}
