//! The buffered token cursor every combinator reads and mutates.

use crate::config::Configuration;
use crate::error::ParseError;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::position::PositionDelta;
use crate::source::TokenSource;

/// How tokens reach the state. `Direct` indexes a borrowed slice the
/// caller already holds. `Buffered` owns a pull-based source; if that
/// source's `random_access()` later reports a resident slice of its own
/// (see `ParseState::random_slice`), it's read the same way `Direct` is
/// and `buf` stays empty — `buf` only fills for sources with no such
/// slice to offer.
enum Backing<'src, Tok> {
    Buffered {
        source: Box<dyn TokenSource<Tok> + 'src>,
        buf: Vec<Tok>,
    },
    Direct(&'src [Tok]),
}

/// The mutable half of a parse: everything the immutable `Parser` tree
/// reads and writes as it descends. Lives for exactly one top-level
/// `parse`/`parse_or_throw` call.
pub struct ParseState<'src, Tok> {
    backing: Backing<'src, Tok>,
    /// Index of `backing`'s first buffered element, for the `Buffered`
    /// case; always `0` for `Direct` (nothing is ever evicted from a
    /// borrowed slice).
    buffer_base: usize,
    /// Cumulative position delta from the very start of input to
    /// `buffer_base`. Updated only when the buffer's front is evicted.
    base_delta: PositionDelta,
    location: usize,
    /// Snapshot stack for `push_bookmark`/`rewind`/`pop_bookmark`: each
    /// entry is the `(location, position_delta)` pair at the moment the
    /// bookmark was pushed.
    bookmarks: Vec<(usize, PositionDelta)>,
    /// Cumulative position delta from input start to `location`.
    position_delta: PositionDelta,
    config: Configuration<Tok>,
    error_unexpected: Option<Tok>,
    error_at_eof: bool,
    error_location: usize,
    error_message: Option<String>,
    error_set: bool,
}

impl<'src, Tok> ParseState<'src, Tok> {
    /// Build a state that pulls tokens one at a time from `source`,
    /// buffering only the window spanned by active bookmarks.
    ///
    /// `source` is taken by value, so there's no borrowed slice to hand a
    /// `Backing::Direct` at construction time even when `source` could
    /// offer one. Instead, every access checks `source.random_access()`
    /// itself (see [`ParseState::random_slice`]) and reads straight
    /// through it when present, so a random-access source still never
    /// gets copied into `buf`. Callers who already hold a `&'src [Tok]`
    /// can skip the indirection entirely via [`ParseState::from_slice`].
    pub fn new(source: impl TokenSource<Tok> + 'src, config: Configuration<Tok>) -> Self {
        Self {
            backing: Backing::Buffered {
                source: Box::new(source),
                buf: Vec::new(),
            },
            buffer_base: 0,
            base_delta: PositionDelta::ZERO,
            location: 0,
            bookmarks: Vec::new(),
            position_delta: PositionDelta::ZERO,
            config,
            error_unexpected: None,
            error_at_eof: false,
            error_location: 0,
            error_message: None,
            error_set: false,
        }
    }

    /// Construct a state directly over an in-memory slice, bypassing the
    /// owned buffer entirely.
    pub fn from_slice(slice: &'src [Tok], config: Configuration<Tok>) -> Self {
        Self {
            backing: Backing::Direct(slice),
            buffer_base: 0,
            base_delta: PositionDelta::ZERO,
            location: 0,
            bookmarks: Vec::new(),
            position_delta: PositionDelta::ZERO,
            config,
            error_unexpected: None,
            error_at_eof: false,
            error_location: 0,
            error_message: None,
            error_set: false,
        }
    }

    /// The in-memory slice currently backing this state, if one's
    /// available: always for `Direct`, and for `Buffered` whenever the
    /// underlying source reports `random_access()`. Checked fresh on
    /// every access rather than cached once, since the borrow it returns
    /// is tied to `&self` and can't be stashed across calls.
    fn random_slice(&self) -> Option<&[Tok]> {
        match &self.backing {
            Backing::Direct(slice) => Some(slice),
            Backing::Buffered { source, .. } => source.random_access(),
        }
    }

    fn ensure_filled(&mut self, upto_exclusive: usize) {
        if self.random_slice().is_some() {
            return;
        }
        if let Backing::Buffered { source, buf } = &mut self.backing {
            while self.buffer_base + buf.len() < upto_exclusive {
                match source.next_token() {
                    Some(tok) => buf.push(tok),
                    None => break,
                }
            }
        }
    }

    fn get(&mut self, index: usize) -> Option<&Tok> {
        match self.random_slice() {
            Some(slice) => slice.get(index),
            None => {
                self.ensure_filled(index + 1);
                match &self.backing {
                    Backing::Buffered { buf, .. } => buf.get(index - self.buffer_base),
                    Backing::Direct(_) => unreachable!(),
                }
            }
        }
    }

    pub fn has_current(&mut self) -> bool {
        self.get(self.location).is_some()
    }

    pub fn current(&mut self) -> Option<&Tok> {
        let loc = self.location;
        self.get(loc)
    }

    pub fn location(&self) -> usize {
        self.location
    }

    /// Up to `n` tokens beginning at the cursor.
    pub fn look_ahead(&mut self, n: usize) -> Vec<&Tok>
    where
        Tok: Clone,
    {
        let start = self.location;
        self.ensure_filled(start + n);
        let mut out = Vec::with_capacity(n);
        for i in start..start + n {
            match self.get(i) {
                Some(tok) => out.push(tok),
                None => break,
            }
        }
        out
    }

    fn delta_of(&self, tok: &Tok) -> PositionDelta {
        self.config.position_calculator.delta_for(tok)
    }

    /// Advance the cursor by `n` tokens, folding each token's position
    /// delta via the configured calculator.
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            let loc = self.location;
            let delta = match self.get(loc) {
                Some(tok) => self.delta_of(tok),
                None => break,
            };
            self.position_delta = self.position_delta + delta;
            self.location += 1;
        }
        self.maybe_evict();
    }

    pub fn push_bookmark(&mut self) {
        self.bookmarks.push((self.location, self.position_delta));
    }

    /// Restore the most recently pushed bookmark and drop it.
    pub fn rewind(&mut self) {
        if let Some((loc, delta)) = self.bookmarks.pop() {
            self.location = loc;
            self.position_delta = delta;
        }
        self.maybe_evict();
    }

    /// Discard the most recently pushed bookmark without restoring.
    pub fn pop_bookmark(&mut self) {
        self.bookmarks.pop();
        self.maybe_evict();
    }

    fn maybe_evict(&mut self) {
        if self.random_slice().is_some() {
            return;
        }
        let earliest = self
            .bookmarks
            .iter()
            .map(|(loc, _)| *loc)
            .min()
            .unwrap_or(self.location);
        if let Backing::Buffered { buf, .. } = &mut self.backing {
            if earliest > self.buffer_base {
                let drop_count = earliest - self.buffer_base;
                for tok in buf.drain(..drop_count.min(buf.len())) {
                    self.base_delta = self.base_delta + self.config.position_calculator.delta_for(&tok);
                }
                self.buffer_base = earliest;
            }
        }
    }

    pub fn set_error(&mut self, unexpected: Option<Tok>, at_eof: bool, location: usize, message: Option<String>) {
        self.error_unexpected = unexpected;
        self.error_at_eof = at_eof;
        self.error_location = location;
        self.error_message = message;
        self.error_set = true;
    }

    /// Whether the error slot has ever been written. Intermediate
    /// combinators may overwrite it; it is only meaningful once the
    /// top-level call has returned failure.
    pub fn has_error(&self) -> bool {
        self.error_set
    }

    /// Rent a fresh private expectation buffer from this state's
    /// configured pool. Every combinator that needs a buffer it can
    /// merge or discard independently of its caller's (`Or`, `Until`,
    /// `Assert`, `RecoverWith`, ...) rents one of these.
    pub fn rent_expectations(&self) -> PooledList<Expectation<Tok>>
    where
        Tok: 'static,
    {
        PooledList::new(self.config.array_pool.clone())
    }

    /// Materialize a [`ParseError`] from the current error slot, the
    /// given expectation buffer, and the position delta *at the error
    /// location* (not necessarily the current cursor).
    pub fn build_error(&mut self, expecteds: &PooledList<Expectation<Tok>>) -> ParseError<Tok>
    where
        Tok: Clone,
    {
        let position_delta = self.compute_source_pos_delta_at(self.error_location);
        ParseError {
            unexpected: self.error_unexpected.clone(),
            at_eof: self.error_at_eof,
            expected: expecteds.as_slice().to_vec(),
            position_delta,
            message: self.error_message.clone(),
        }
    }

    pub fn compute_source_pos_delta(&mut self) -> PositionDelta {
        self.compute_source_pos_delta_at(self.location)
    }

    pub fn compute_source_pos_delta_at(&mut self, loc: usize) -> PositionDelta {
        if loc <= self.buffer_base {
            return self.base_delta;
        }
        self.ensure_filled(loc);
        let mut delta = self.base_delta;
        match self.random_slice() {
            Some(slice) => {
                for tok in &slice[self.buffer_base..loc.min(slice.len())] {
                    delta = delta + self.config.position_calculator.delta_for(tok);
                }
            }
            None => {
                if let Backing::Buffered { buf, .. } = &self.backing {
                    let end = (loc - self.buffer_base).min(buf.len());
                    for tok in &buf[..end] {
                        delta = delta + self.config.position_calculator.delta_for(tok);
                    }
                }
            }
        }
        delta
    }
}

#[cfg(test)]
mod state_tests;
