//! The `Parser` trait: the uniform "try-parse" contract every combinator
//! in this crate honors, plus the chain-building methods used to compose
//! combinators fluently.
//!
//! # The contract
//!
//! `try_parse` returns `Some(value)` on success, `None` on failure.
//! Whether input was consumed is read off `state.location()` by the
//! caller (usually an alternation combinator) — it is never passed back
//! explicitly, because the location *is* the consumption bit. On
//! failure a parser must have either consumed no input at all, or
//! consumed strictly more than it had at entry; "succeeded a little,
//! then failed" is simply "failed having consumed", no automatic
//! rewind. On failure the parser must also have written the error slot
//! via [`ParseState::set_error`] and appended its expectations to
//! `expected`.

mod choice;
mod primitive;
mod recovery;
mod recursion;
mod repeat;
mod seq;

#[cfg(test)]
mod recovery_tests;
#[cfg(test)]
mod repeat_tests;
#[cfg(test)]
mod seq_tests;

pub use choice::{one_of, Lookahead, Not, OneOf, Or, Try};
pub use primitive::{
    any, ci_string, current_offset, current_pos, end, fail, pure, satisfy, seq as sequence,
    string, token,
};
pub use recovery::{Assert, RecoverWith};
pub use recursion::Rec;
pub use repeat::{
    repeat_string, sep_by, sep_by1, sep_end_by, AtLeastOnce, AtLeastOnceUntil, Many, Repeat,
    RepeatString, SkipAtLeastOnce, SkipMany, Until,
};
pub use seq::{Before, Bind, Labelled, Map, Then};

use crate::error::ParseError;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

/// A parser that, given a mutable cursor over `Tok`, either produces an
/// `O` and possibly advances the cursor, or fails and leaves the state's
/// error slot populated.
///
/// `Parser` values are pure, immutable descriptions of parsing intent —
/// build one once, run it as many times as you like, share it across
/// threads freely (see the crate's concurrency notes). The only mutable
/// state in the entire system lives in [`ParseState`].
pub trait Parser<Tok, O> {
    /// Attempt to parse starting at the current cursor.
    ///
    /// `expected` is a caller-owned buffer this parser appends to with
    /// expectations describing what *could* match here — used by a
    /// sibling alternative if it fails without consuming. On failure,
    /// the error slot (`state.set_error`) must also be populated.
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O>;

    /// Transform a successful result. Consumption, failure, and errors
    /// are unaffected — `Map(x -> x, p)` is exactly `p`.
    fn map<O2, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(O) -> O2,
    {
        Map { parser: self, f }
    }

    /// Run `self` then `q`, keeping `q`'s value.
    fn then<Q, O2>(self, q: Q) -> Then<Self, Q>
    where
        Self: Sized,
        Q: Parser<Tok, O2>,
    {
        Then { p: self, q }
    }

    /// Run `self` then `q`, keeping `self`'s value.
    fn before<Q, O2>(self, q: Q) -> Before<Self, Q>
    where
        Self: Sized,
        Q: Parser<Tok, O2>,
    {
        Before { p: self, q }
    }

    /// Run `self`, then use its value to construct and run the next
    /// parser. The escape hatch to context-sensitive grammars; no other
    /// combinator needs runtime grammar construction.
    fn bind<O2, Q, F>(self, f: F) -> Bind<Self, F>
    where
        Self: Sized,
        Q: Parser<Tok, O2>,
        F: Fn(O) -> Q,
    {
        Bind { parser: self, f }
    }

    /// Attach a human-readable label: at this choice point, replace
    /// whatever Tokens/Eof expectations `self` would have reported with
    /// a single `Label(name)`. `self`'s value and consumption behavior
    /// are unchanged.
    fn labelled(self, name: impl Into<String>) -> Labelled<Self>
    where
        Self: Sized,
    {
        Labelled {
            parser: self,
            name: name.into(),
        }
    }

    /// The heart of alternation: try `self`; if it fails without
    /// consuming, try `q` at the same position.
    fn or<Q>(self, q: Q) -> Or<Self, Q>
    where
        Self: Sized,
        Q: Parser<Tok, O>,
    {
        Or { p: self, q }
    }

    /// Buffer `self`'s progress: on failure, rewind as if nothing had
    /// been consumed, turning a committed failure into a zero-consumption
    /// one an enclosing `Or` can recover from. On success, keep the
    /// progress.
    fn attempt(self) -> Try<Self>
    where
        Self: Sized,
    {
        Try { parser: self }
    }

    /// Run `self`, then rewind regardless of outcome's location — except
    /// `Lookahead` only rewinds on *success* (failure is reported as-is,
    /// per the spec's asymmetric contract for assertions).
    fn lookahead(self) -> Lookahead<Self>
    where
        Self: Sized,
    {
        Lookahead { parser: self }
    }

    /// Negative lookahead: succeeds with `()` iff `self` fails, without
    /// rewinding location. Combine with `.attempt()` for a non-consuming
    /// negative lookahead.
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { parser: self }
    }

    /// Zero or more repetitions, stopping at the first failure that
    /// doesn't consume input.
    fn many(self) -> Many<Self>
    where
        Self: Sized,
    {
        Many { parser: self }
    }

    /// One or more repetitions.
    fn at_least_once(self) -> AtLeastOnce<Self>
    where
        Self: Sized,
    {
        AtLeastOnce { parser: self }
    }

    /// Like [`Parser::many`] but discards values.
    fn skip_many(self) -> SkipMany<Self>
    where
        Self: Sized,
    {
        SkipMany { parser: self }
    }

    /// Like [`Parser::at_least_once`] but discards values.
    fn skip_at_least_once(self) -> SkipAtLeastOnce<Self>
    where
        Self: Sized,
    {
        SkipAtLeastOnce { parser: self }
    }

    /// Run `self` exactly `n` times.
    fn repeat(self, n: usize) -> Repeat<Self>
    where
        Self: Sized,
    {
        Repeat { parser: self, n }
    }

    /// Alternately try `terminator`; stop on its success, else run
    /// `self` once more.
    fn until<T, OT>(self, terminator: T) -> Until<Self, T>
    where
        Self: Sized,
        T: Parser<Tok, OT>,
    {
        Until {
            parser: self,
            terminator,
        }
    }

    /// Like [`Parser::until`] but requires at least one `self` before the
    /// terminator can end the repetition.
    fn at_least_once_until<T, OT>(self, terminator: T) -> AtLeastOnceUntil<Self, T>
    where
        Self: Sized,
        T: Parser<Tok, OT>,
    {
        AtLeastOnceUntil {
            parser: self,
            terminator,
        }
    }

    /// On success, keep the value only if `pred` holds; otherwise fail
    /// at the *current* location with `msg(value)`.
    fn assert<Pred, Msg>(self, pred: Pred, msg: Msg) -> Assert<Self, Pred, Msg>
    where
        Self: Sized,
        Pred: Fn(&O) -> bool,
        Msg: Fn(&O) -> String,
    {
        Assert {
            parser: self,
            pred,
            msg,
        }
    }

    /// On failure, build a [`ParseError`] from `self`'s private
    /// expectation buffer, hand it to `handler`, and run the recovery
    /// parser it returns against the *current* (unrewound) state.
    fn recover_with<H, Q>(self, handler: H) -> RecoverWith<Self, H>
    where
        Self: Sized,
        H: Fn(ParseError<Tok>) -> Q,
        Q: Parser<Tok, O>,
    {
        RecoverWith {
            parser: self,
            handler,
        }
    }
}

impl<Tok, O, P: Parser<Tok, O> + ?Sized> Parser<Tok, O> for &P {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        (**self).try_parse(state, expected)
    }
}

impl<Tok, O, P: Parser<Tok, O> + ?Sized> Parser<Tok, O> for Box<P> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        (**self).try_parse(state, expected)
    }
}

impl<Tok, O, P: Parser<Tok, O> + ?Sized> Parser<Tok, O> for std::sync::Arc<P> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        (**self).try_parse(state, expected)
    }
}

/// Run `p` against `source`, never panicking: parse failures are
/// surfaced as a `ParseError` value.
pub fn parse<Tok, O>(
    p: &impl Parser<Tok, O>,
    state: &mut ParseState<'_, Tok>,
) -> Result<O, ParseError<Tok>>
where
    Tok: Clone + 'static,
{
    let mut expected = state.rent_expectations();
    match p.try_parse(state, &mut expected) {
        Some(value) => Ok(value),
        None => Err(state.build_error(&expected)),
    }
}

/// Like [`parse`], but wraps a failure in a [`crate::error::ParseException`]
/// instead of returning it as a value — a convenience for call sites that
/// want `?`-propagation through a single error type.
pub fn parse_or_throw<Tok, O>(
    p: &impl Parser<Tok, O>,
    state: &mut ParseState<'_, Tok>,
) -> Result<O, crate::error::ParseException<Tok>>
where
    Tok: Clone + std::fmt::Debug + std::fmt::Display + 'static,
{
    parse(p, state).map_err(crate::error::ParseException)
}
