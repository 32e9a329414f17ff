//! Order-insensitive composition: run a fixed set of parsers, each at
//! most once, in whatever order they show up in the input.
//!
//! `Permutation::new().add(p0).add(p1).add_optional(p2, default).build(..)`
//! compiles, per round, to "try every not-yet-matched slot's parser in
//! declaration order; on a hit, retire that slot and go again; if none
//! of the remaining slots match without consuming, fill defaults for
//! the optional ones and fail if a required slot is still unmatched" —
//! the `OneOf(branches).Or(Return(exit))` forest collapsed into a loop
//! over a shrinking candidate set rather than literal nested `Parser`
//! trees, since the values involved have no common static type.
//!
//! Required slots that can succeed without consuming a token make the
//! round's outcome among the zero-consumption branches order-dependent
//! rather than looping forever — each slot is attempted at most once
//! ever, so non-termination isn't possible here, but which slot "wins"
//! a simultaneous zero-width match is unspecified. Don't build grammars
//! that rely on it.

use std::any::Any;
use std::marker::PhantomData;

use crate::expectation::Expectation;
use crate::parser::Parser;
use crate::pool::PooledList;
use crate::state::ParseState;

/// Type-erases a typed parser's output so heterogeneous slots can live
/// side by side in one `Vec` without an arity-indexed family of structs.
struct Erased<P, O> {
    parser: P,
    _marker: PhantomData<fn() -> O>,
}

impl<Tok, O, P> Parser<Tok, Box<dyn Any>> for Erased<P, O>
where
    P: Parser<Tok, O>,
    O: 'static,
{
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Box<dyn Any>> {
        self.parser
            .try_parse(state, expected)
            .map(|v| Box::new(v) as Box<dyn Any>)
    }
}

fn downcast<T: 'static>(value: Box<dyn Any>) -> T {
    *value
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("permutation slot produced an unexpected type"))
}

struct Slot<Tok> {
    parser: Box<dyn Parser<Tok, Box<dyn Any>>>,
    default: Option<Box<dyn Fn() -> Box<dyn Any>>>,
}

/// Builder for a permutation of parsers with heterogeneous output
/// types. Immutable once built: `add`/`add_optional` return new
/// instances, matching the value semantics every other combinator in
/// this crate has.
pub struct Permutation<Tok> {
    slots: Vec<Slot<Tok>>,
}

impl<Tok> Default for Permutation<Tok> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tok: 'static> Permutation<Tok> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Add a required slot: the built parser fails unless this parser
    /// matches exactly once, somewhere among the others.
    pub fn add<O: 'static>(mut self, parser: impl Parser<Tok, O> + 'static) -> Self {
        self.slots.push(Slot {
            parser: Box::new(Erased {
                parser,
                _marker: PhantomData,
            }),
            default: None,
        });
        self
    }

    /// Add an optional slot: if this parser never matches, `default`
    /// supplies the value instead. Called fresh on every parse that
    /// needs it, not memoized.
    pub fn add_optional<O: 'static>(
        mut self,
        parser: impl Parser<Tok, O> + 'static,
        default: impl Fn() -> O + 'static,
    ) -> Self {
        self.slots.push(Slot {
            parser: Box::new(Erased {
                parser,
                _marker: PhantomData,
            }),
            default: Some(Box::new(move || Box::new(default()) as Box<dyn Any>)),
        });
        self
    }

    /// Finish the builder, assembling each round's type-erased results
    /// into `Out` via `assemble`. `assemble` receives the slot values in
    /// declaration order and is responsible for downcasting them back
    /// (see [`downcast`] usage in this module's typed `permutation2`
    /// / `permutation3` helpers for the idiom).
    pub fn build<Out: 'static>(
        self,
        assemble: impl Fn(Vec<Box<dyn Any>>) -> Out + 'static,
    ) -> PermutationParser<Tok, Out> {
        PermutationParser {
            slots: self.slots,
            assemble: Box::new(assemble),
        }
    }
}

/// The parser `Permutation::build` produces.
pub struct PermutationParser<Tok, Out> {
    slots: Vec<Slot<Tok>>,
    assemble: Box<dyn Fn(Vec<Box<dyn Any>>) -> Out>,
}

impl<Tok: 'static, Out> Parser<Tok, Out> for PermutationParser<Tok, Out> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<Out> {
        let mut results: Vec<Option<Box<dyn Any>>> = (0..self.slots.len()).map(|_| None).collect();
        let mut remaining: Vec<usize> = (0..self.slots.len()).collect();

        while !remaining.is_empty() {
            let start = state.location();
            let mut merged: Option<PooledList<Expectation<Tok>>> = None;
            let mut matched: Option<(usize, Box<dyn Any>)> = None;

            for &idx in &remaining {
                let mut branch_expected = state.rent_expectations();
                if let Some(v) = self.slots[idx].parser.try_parse(state, &mut branch_expected) {
                    matched = Some((idx, v));
                    break;
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

            match matched {
                Some((idx, v)) => {
                    results[idx] = Some(v);
                    remaining.retain(|&i| i != idx);
                }
                None => {
                    if let Some(mut m) = merged {
                        m.drain_into(expected);
                    }
                    if remaining.iter().all(|&i| self.slots[i].default.is_some()) {
                        for &idx in &remaining {
                            let default = self.slots[idx].default.as_ref().unwrap();
                            results[idx] = Some(default());
                        }
                        remaining.clear();
                    } else {
                        return None;
                    }
                }
            }
        }

        let values: Vec<Box<dyn Any>> = results.into_iter().map(|v| v.unwrap()).collect();
        Some((self.assemble)(values))
    }
}

/// Typed convenience wrapper for the common two-required-parsers case,
/// sparing callers the `Permutation::build` downcasting dance.
pub fn permutation2<Tok, A, B>(
    a: impl Parser<Tok, A> + 'static,
    b: impl Parser<Tok, B> + 'static,
) -> impl Parser<Tok, (A, B)>
where
    Tok: 'static,
    A: 'static,
    B: 'static,
{
    Permutation::new().add(a).add(b).build(|mut values| {
        let b = downcast::<B>(values.pop().unwrap());
        let a = downcast::<A>(values.pop().unwrap());
        (a, b)
    })
}

/// Typed convenience wrapper for three required parsers, e.g. a set of
/// order-insensitive modifier keywords.
pub fn permutation3<Tok, A, B, C>(
    a: impl Parser<Tok, A> + 'static,
    b: impl Parser<Tok, B> + 'static,
    c: impl Parser<Tok, C> + 'static,
) -> impl Parser<Tok, (A, B, C)>
where
    Tok: 'static,
    A: 'static,
    B: 'static,
    C: 'static,
{
    Permutation::new().add(a).add(b).add(c).build(|mut values| {
        let c = downcast::<C>(values.pop().unwrap());
        let b = downcast::<B>(values.pop().unwrap());
        let a = downcast::<A>(values.pop().unwrap());
        (a, b, c)
    })
}
