//! Post-hoc value assertions and error-driven recovery.

use super::Parser;
use crate::error::ParseError;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

/// Keeps `parser`'s value only if `pred` holds; otherwise fails at the
/// position `parser` left the cursor at, with `msg(value)` as the
/// failure message.
pub struct Assert<P, Pred, Msg> {
    pub(crate) parser: P,
    pub(crate) pred: Pred,
    pub(crate) msg: Msg,
}

impl<Tok, O, P, Pred, Msg> Parser<Tok, O> for Assert<P, Pred, Msg>
where
    P: Parser<Tok, O>,
    Pred: Fn(&O) -> bool,
    Msg: Fn(&O) -> String,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        let value = self.parser.try_parse(state, expected)?;
        if (self.pred)(&value) {
            Some(value)
        } else {
            let loc = state.location();
            let message = (self.msg)(&value);
            expected.add(Expectation::Label("result satisfying assertion".into()));
            state.set_error(None, false, loc, Some(message));
            None
        }
    }
}

/// On `parser` failure, builds a [`ParseError`] from its private
/// expectation buffer, hands it to `handler`, and runs the recovery
/// parser it returns against the current, unrewound state.
pub struct RecoverWith<P, H> {
    pub(crate) parser: P,
    pub(crate) handler: H,
}

impl<Tok, O, P, H, Q> Parser<Tok, O> for RecoverWith<P, H>
where
    P: Parser<Tok, O>,
    H: Fn(ParseError<Tok>) -> Q,
    Q: Parser<Tok, O>,
    Tok: Clone + 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        let mut inner = state.rent_expectations();
        match self.parser.try_parse(state, &mut inner) {
            Some(v) => Some(v),
            None => {
                let err = state.build_error(&inner);
                (self.handler)(err).try_parse(state, expected)
            }
        }
    }
}
