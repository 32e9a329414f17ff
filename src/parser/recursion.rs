//! Self-referential grammars via a cell filled once, right after
//! construction, with a clone of its own handle already available to
//! the grammar it holds.

use std::sync::{Arc, OnceLock};

use super::Parser;
use crate::error::UsageError;
use crate::expectation::Expectation;
use crate::pool::PooledList;
use crate::state::ParseState;

/// A recursive grammar rule.
///
/// Built via [`Rec::new`], which hands the constructor closure an
/// `Arc<Rec<Tok, O>>` clone of the value being built *before* it is
/// filled in, so the closure can embed that clone anywhere in the
/// parser tree it returns as the recursive occurrence of the rule.
/// Calling `try_parse` on that clone from inside the constructor
/// closure itself — before the cell is ever filled — is the one usage
/// error this type can raise.
pub struct Rec<Tok, O> {
    inner: OnceLock<Box<dyn Parser<Tok, O> + Send + Sync>>,
}

impl<Tok, O> Rec<Tok, O>
where
    Tok: 'static,
    O: 'static,
{
    pub fn new<F>(build: F) -> Arc<Self>
    where
        F: FnOnce(Arc<Rec<Tok, O>>) -> Box<dyn Parser<Tok, O> + Send + Sync>,
    {
        let placeholder = Arc::new(Rec {
            inner: OnceLock::new(),
        });
        let built = build(placeholder.clone());
        if placeholder.inner.set(built).is_err() {
            tracing::error!("Rec cell was already filled by a reentrant call");
            panic!("{}", UsageError::RecCycle);
        }
        placeholder
    }
}

impl<Tok, O> Parser<Tok, O> for Rec<Tok, O> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<O> {
        match self.inner.get() {
            Some(p) => p.try_parse(state, expected),
            None => {
                tracing::error!("Rec forced before its constructor finished caching the parser");
                panic!("{}", UsageError::RecCycle);
            }
        }
    }
}
