//! Value transformation and sequencing: `Map`, `Then`, `Before`, `Bind`,
//! `Labelled`, and the tuple-based variadic sequencer.

use super::Parser;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

/// Transforms a successful result with `f`. Failure, consumption, and
/// the error slot are all untouched — `p.map(|x| x)` behaves exactly
/// like `p`.
pub struct Map<P, F> {
    pub(crate) parser: P,
    pub(crate) f: F,
}

impl<Tok, O, O2, P, F> Parser<Tok, O2> for Map<P, F>
where
    P: Parser<Tok, O>,
    F: Fn(O) -> O2,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O2> {
        self.parser.try_parse(state, expected).map(&self.f)
    }
}

/// Runs `p` then `q`, keeping `q`'s value.
pub struct Then<P, Q> {
    pub(crate) p: P,
    pub(crate) q: Q,
}

impl<Tok, O1, O2, P, Q> Parser<Tok, O2> for Then<P, Q>
where
    P: Parser<Tok, O1>,
    Q: Parser<Tok, O2>,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O2> {
        self.p.try_parse(state, expected)?;
        self.q.try_parse(state, expected)
    }
}

/// Runs `p` then `q`, keeping `p`'s value.
pub struct Before<P, Q> {
    pub(crate) p: P,
    pub(crate) q: Q,
}

impl<Tok, O1, O2, P, Q> Parser<Tok, O1> for Before<P, Q>
where
    P: Parser<Tok, O1>,
    Q: Parser<Tok, O2>,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O1> {
        let value = self.p.try_parse(state, expected)?;
        self.q.try_parse(state, expected)?;
        Some(value)
    }
}

/// Runs `parser`, then builds and runs the next parser from its value.
/// The only combinator that can construct grammar at parse time.
pub struct Bind<P, F> {
    pub(crate) parser: P,
    pub(crate) f: F,
}

impl<Tok, O1, O2, P, Q, F> Parser<Tok, O2> for Bind<P, F>
where
    P: Parser<Tok, O1>,
    Q: Parser<Tok, O2>,
    F: Fn(O1) -> Q,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O2> {
        let value = self.parser.try_parse(state, expected)?;
        (self.f)(value).try_parse(state, expected)
    }
}

/// Attaches a human-readable name: on failure, discards whatever
/// expectations `parser` would have reported and reports a single
/// `Expectation::Label` instead. Value and consumption are unaffected.
pub struct Labelled<P> {
    pub(crate) parser: P,
    pub(crate) name: String,
}

impl<Tok, O, P> Parser<Tok, O> for Labelled<P>
where
    P: Parser<Tok, O>,
    Tok: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        let mut inner = state.rent_expectations();
        let result = self.parser.try_parse(state, &mut inner);
        if result.is_none() {
            expected.add(Expectation::Label(self.name.clone()));
        }
        result
    }
}

/// Implements `Parser<Tok, (O0, .., On)>` for an `n`-tuple of parsers,
/// running each in order and bailing at the first failure. This is the
/// variadic sequencer spec'd as `n`-ary `Map`; `winnow`'s
/// `impl_parser_for_tuple!` is the pattern this generalizes from.
macro_rules! impl_parser_for_tuple {
    ($($P:ident $O:ident $idx:tt),+) => {
        impl<Tok, $($O,)+ $($P),+> Parser<Tok, ($($O,)+)> for ($($P,)+)
        where
            $($P: Parser<Tok, $O>),+
        {
            fn try_parse(
                &self,
                state: &mut ParseState<'_, Tok>,
                expected: &mut PooledList<Expectation<Tok>>,
            ) -> Option<($($O,)+)> {
                Some(($(self.$idx.try_parse(state, expected)?,)+))
            }
        }
    };
}

impl_parser_for_tuple!(P0 O0 0, P1 O1 1);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4, P5 O5 5);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4, P5 O5 5, P6 O6 6);
impl_parser_for_tuple!(P0 O0 0, P1 O1 1, P2 O2 2, P3 O3 3, P4 O4 4, P5 O5 5, P6 O6 6, P7 O7 7);
