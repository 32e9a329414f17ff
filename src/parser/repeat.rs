//! Repetition: `Many`, `AtLeastOnce`, their skip-variants, `Repeat`,
//! `RepeatString`, `Until`, `AtLeastOnceUntil`, and the `sep_by` family.
//!
//! Every unbounded loop here carries the same guard: a repetition body
//! that succeeds without advancing the cursor would otherwise spin
//! forever, so that case raises [`crate::error::UsageError::InfiniteLoop`]
//! as a panic rather than hanging — a grammar bug, not a parse failure.

use super::Parser;
use crate::error::UsageError;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

fn raise_infinite_loop(combinator: &'static str) -> ! {
    tracing::error!(combinator, "repetition body succeeded without consuming input");
    panic!("{}", UsageError::InfiniteLoop { combinator });
}

/// Zero or more repetitions of `parser`, stopping at the first failure
/// that doesn't consume input.
pub struct Many<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P> Parser<Tok, Vec<O>> for Many<P>
where
    P: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let mut results = Vec::new();
        loop {
            let start = state.location();
            let mut branch = state.rent_expectations();
            match self.parser.try_parse(state, &mut branch) {
                Some(v) => {
                    if state.location() == start {
                        raise_infinite_loop("many");
                    }
                    results.push(v);
                }
                None => {
                    if state.location() != start {
                        branch.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }
        }
        Some(results)
    }
}

/// One or more repetitions of `parser`.
pub struct AtLeastOnce<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P> Parser<Tok, Vec<O>> for AtLeastOnce<P>
where
    P: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let start = state.location();
        let first = self.parser.try_parse(state, expected)?;
        if state.location() == start {
            raise_infinite_loop("at_least_once");
        }
        let mut results = vec![first];
        loop {
            let iter_start = state.location();
            let mut branch = state.rent_expectations();
            match self.parser.try_parse(state, &mut branch) {
                Some(v) => {
                    if state.location() == iter_start {
                        raise_infinite_loop("at_least_once");
                    }
                    results.push(v);
                }
                None => {
                    if state.location() != iter_start {
                        branch.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }
        }
        Some(results)
    }
}

/// Like [`Many`] but discards values.
pub struct SkipMany<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P> Parser<Tok, ()> for SkipMany<P>
where
    P: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<()> {
        loop {
            let start = state.location();
            let mut branch = state.rent_expectations();
            match self.parser.try_parse(state, &mut branch) {
                Some(_) => {
                    if state.location() == start {
                        raise_infinite_loop("skip_many");
                    }
                }
                None => {
                    if state.location() != start {
                        branch.drain_into(expected);
                        return None;
                    }
                    return Some(());
                }
            }
        }
    }
}

/// Like [`AtLeastOnce`] but discards values.
pub struct SkipAtLeastOnce<P> {
    pub(crate) parser: P,
}

impl<Tok, O, P> Parser<Tok, ()> for SkipAtLeastOnce<P>
where
    P: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<()> {
        let start = state.location();
        self.parser.try_parse(state, expected)?;
        if state.location() == start {
            raise_infinite_loop("skip_at_least_once");
        }
        SkipMany {
            parser: &self.parser,
        }
        .try_parse(state, expected)
    }
}

/// Runs `parser` exactly `n` times, failing as soon as any iteration
/// does. Bounded by `n`, so no infinite-loop guard is needed.
pub struct Repeat<P> {
    pub(crate) parser: P,
    pub(crate) n: usize,
}

impl<Tok, O, P> Parser<Tok, Vec<O>> for Repeat<P>
where
    P: Parser<Tok, O>,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let mut results = Vec::with_capacity(self.n);
        for _ in 0..self.n {
            results.push(self.parser.try_parse(state, expected)?);
        }
        Some(results)
    }
}

/// `char`-specialized [`Repeat`] that collects the matched characters
/// directly into a `String`.
pub struct RepeatString<P> {
    parser: P,
    n: usize,
}

impl<P: Parser<char, char>> Parser<char, String> for RepeatString<P> {
    fn try_parse(&self, state: &mut ParseState<'_, char>, expected: &mut PooledList<Expectation<char>>) -> Option<String> {
        let mut out = String::with_capacity(self.n);
        for _ in 0..self.n {
            out.push(self.parser.try_parse(state, expected)?);
        }
        Some(out)
    }
}

pub fn repeat_string<P: Parser<char, char>>(parser: P, n: usize) -> RepeatString<P> {
    RepeatString { parser, n }
}

/// Alternately tries `terminator`; on its success, stops and returns the
/// elements collected so far together with the terminator's value. On
/// its (zero-consumption) failure, runs `parser` once and loops.
pub struct Until<P, T> {
    pub(crate) parser: P,
    pub(crate) terminator: T,
}

impl<Tok, O, OT, P, T> Parser<Tok, (Vec<O>, OT)> for Until<P, T>
where
    P: Parser<Tok, O>,
    T: Parser<Tok, OT>,
    Tok: 'static,
{
    fn try_parse(
        &self,
        state: &mut ParseState<'_, Tok>,
        expected: &mut PooledList<Expectation<Tok>>,
    ) -> Option<(Vec<O>, OT)> {
        let mut results = Vec::new();
        loop {
            let start = state.location();
            let mut term_expected = state.rent_expectations();
            if let Some(tv) = self.terminator.try_parse(state, &mut term_expected) {
                return Some((results, tv));
            }
            if state.location() != start {
                term_expected.drain_into(expected);
                return None;
            }

            let mut body_expected = state.rent_expectations();
            match self.parser.try_parse(state, &mut body_expected) {
                Some(v) => {
                    if state.location() == start {
                        raise_infinite_loop("until");
                    }
                    results.push(v);
                }
                None => {
                    if state.location() != start {
                        body_expected.drain_into(expected);
                    } else {
                        term_expected.drain_into(expected);
                        body_expected.drain_into(expected);
                    }
                    return None;
                }
            }
        }
    }
}

/// Like [`Until`] but requires at least one `parser` success before the
/// terminator is even attempted.
pub struct AtLeastOnceUntil<P, T> {
    pub(crate) parser: P,
    pub(crate) terminator: T,
}

impl<Tok, O, OT, P, T> Parser<Tok, (Vec<O>, OT)> for AtLeastOnceUntil<P, T>
where
    P: Parser<Tok, O>,
    T: Parser<Tok, OT>,
    Tok: 'static,
{
    fn try_parse(
        &self,
        state: &mut ParseState<'_, Tok>,
        expected: &mut PooledList<Expectation<Tok>>,
    ) -> Option<(Vec<O>, OT)> {
        let start = state.location();
        let first = self.parser.try_parse(state, expected)?;
        if state.location() == start {
            raise_infinite_loop("at_least_once_until");
        }

        let rest = Until {
            parser: &self.parser,
            terminator: &self.terminator,
        }
        .try_parse(state, expected)?;
        let (mut body, terminator_value) = rest;
        let mut all = vec![first];
        all.append(&mut body);
        Some((all, terminator_value))
    }
}

/// Zero or more `item`s separated by `sep`.
pub struct SepBy<P, S> {
    item: P,
    sep: S,
}

impl<Tok, O, OS, P, S> Parser<Tok, Vec<O>> for SepBy<P, S>
where
    P: Parser<Tok, O>,
    S: Parser<Tok, OS>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let start = state.location();
        let mut first_expected = state.rent_expectations();
        let first = match self.item.try_parse(state, &mut first_expected) {
            Some(v) => v,
            None => {
                if state.location() != start {
                    first_expected.drain_into(expected);
                    return None;
                }
                first_expected.drain_into(expected);
                return Some(Vec::new());
            }
        };

        let mut results = vec![first];
        loop {
            let iter_start = state.location();
            let mut sep_expected = state.rent_expectations();
            match self.sep.try_parse(state, &mut sep_expected) {
                Some(_) => match self.item.try_parse(state, expected) {
                    Some(v) => results.push(v),
                    None => return None,
                },
                None => {
                    if state.location() != iter_start {
                        sep_expected.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }
        }
        Some(results)
    }
}

/// One or more `item`s separated by `sep`.
pub struct SepBy1<P, S> {
    item: P,
    sep: S,
}

impl<Tok, O, OS, P, S> Parser<Tok, Vec<O>> for SepBy1<P, S>
where
    P: Parser<Tok, O>,
    S: Parser<Tok, OS>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let mut results = vec![self.item.try_parse(state, expected)?];
        loop {
            let iter_start = state.location();
            let mut sep_expected = state.rent_expectations();
            match self.sep.try_parse(state, &mut sep_expected) {
                Some(_) => match self.item.try_parse(state, expected) {
                    Some(v) => results.push(v),
                    None => return None,
                },
                None => {
                    if state.location() != iter_start {
                        sep_expected.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }
        }
        Some(results)
    }
}

/// Zero or more `item`s separated by `sep`, with an optional trailing
/// `sep`.
pub struct SepEndBy<P, S> {
    item: P,
    sep: S,
}

impl<Tok, O, OS, P, S> Parser<Tok, Vec<O>> for SepEndBy<P, S>
where
    P: Parser<Tok, O>,
    S: Parser<Tok, OS>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Vec<O>> {
        let mut results = Vec::new();
        loop {
            let start = state.location();
            let mut item_expected = state.rent_expectations();
            match self.item.try_parse(state, &mut item_expected) {
                Some(v) => results.push(v),
                None => {
                    if state.location() != start {
                        item_expected.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }

            let sep_start = state.location();
            let mut sep_expected = state.rent_expectations();
            match self.sep.try_parse(state, &mut sep_expected) {
                Some(_) => continue,
                None => {
                    if state.location() != sep_start {
                        sep_expected.drain_into(expected);
                        return None;
                    }
                    break;
                }
            }
        }
        Some(results)
    }
}

pub fn sep_by<P, S>(item: P, sep: S) -> SepBy<P, S> {
    SepBy { item, sep }
}

pub fn sep_by1<P, S>(item: P, sep: S) -> SepBy1<P, S> {
    SepBy1 { item, sep }
}

pub fn sep_end_by<P, S>(item: P, sep: S) -> SepEndBy<P, S> {
    SepEndBy { item, sep }
}
