//! Per-parse configuration: how a token advances position, and where
//! transient expectation buffers are rented from.

use std::sync::Arc;

use crate::expectation::Expectation;
use crate::pool::{ArrayPoolProvider, DefaultArrayPool};
use crate::position::PositionDelta;

/// How a single consumed token advances the source position.
///
/// The default is "every token is one column wide", which is correct for
/// most non-textual token streams (e.g. a lexer's own token kinds, where
/// the *lexer* already tracked text positions and `comb` is just walking
/// its output). Textual streams over `char` typically override this to
/// special-case `'\n'`.
pub trait PositionCalculator<Tok>: Send + Sync {
    fn delta_for(&self, token: &Tok) -> PositionDelta;
}

/// Every token counts as one column, regardless of kind.
pub struct OneColPerToken;

impl<Tok> PositionCalculator<Tok> for OneColPerToken {
    fn delta_for(&self, _token: &Tok) -> PositionDelta {
        PositionDelta::ONE_COL
    }
}

/// Newline-aware calculator for `char` streams: `'\n'` advances a line,
/// any other character advances one column. Tabs are *not* expanded —
/// callers who need tab-aware columns should supply their own
/// [`PositionCalculator`].
pub struct NewlineAwareChars;

impl PositionCalculator<char> for NewlineAwareChars {
    fn delta_for(&self, token: &char) -> PositionDelta {
        if *token == '\n' {
            PositionDelta::NEW_LINE
        } else {
            PositionDelta::ONE_COL
        }
    }
}

impl<Tok, F> PositionCalculator<Tok> for F
where
    F: Fn(&Tok) -> PositionDelta + Send + Sync,
{
    fn delta_for(&self, token: &Tok) -> PositionDelta {
        self(token)
    }
}

/// Configuration threaded through a single top-level parse.
///
/// Cheap to clone: both fields are `Arc`-backed, so a `Configuration` can
/// be built once and reused across many `parse` calls, mirroring how the
/// `Parser` values that consult it are built once and reused.
#[derive(Clone)]
pub struct Configuration<Tok> {
    pub(crate) position_calculator: Arc<dyn PositionCalculator<Tok>>,
    pub(crate) array_pool: Arc<dyn ArrayPoolProvider<Expectation<Tok>>>,
}

impl<Tok: Send + Sync + 'static> Configuration<Tok> {
    pub fn new(position_calculator: Arc<dyn PositionCalculator<Tok>>) -> Self {
        Self {
            position_calculator,
            array_pool: Arc::new(DefaultArrayPool::new()),
        }
    }

    pub fn with_array_pool(
        mut self,
        array_pool: Arc<dyn ArrayPoolProvider<Expectation<Tok>>>,
    ) -> Self {
        self.array_pool = array_pool;
        self
    }
}

impl<Tok: Send + Sync + 'static> Default for Configuration<Tok> {
    fn default() -> Self {
        Self::new(Arc::new(OneColPerToken))
    }
}

impl Configuration<char> {
    /// Convenience constructor for textual grammars: one column per
    /// character, with `'\n'` advancing a line.
    pub fn for_chars() -> Self {
        Self::new(Arc::new(NewlineAwareChars))
    }
}

#[cfg(test)]
mod config_tests;
