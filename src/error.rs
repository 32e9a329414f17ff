//! Structured parse failures.

use std::hash::{Hash, Hasher};

use crate::expectation::Expectation;
use crate::position::{Position, PositionDelta};

/// A structured, value-comparable parse failure.
///
/// `expected` is conceptually a *set* — two errors that differ only in
/// the order their expectations were collected are the same error. The
/// source this crate is grounded on left its error type's `Hash` order
/// sensitive while its `Eq` was order-insensitive (a latent bug noted as
/// an open question); this type picks one policy throughout: equality
/// and hashing both treat `expected` as an order-independent multiset.
#[derive(Debug, Clone)]
pub struct ParseError<Tok> {
    pub unexpected: Option<Tok>,
    pub at_eof: bool,
    pub expected: Vec<Expectation<Tok>>,
    pub position_delta: PositionDelta,
    pub message: Option<String>,
}

impl<Tok> ParseError<Tok> {
    pub fn position(&self) -> Position {
        Position::START + self.position_delta
    }
}

impl<Tok: PartialEq + Clone + Ord> PartialEq for ParseError<Tok> {
    fn eq(&self, other: &Self) -> bool {
        self.unexpected == other.unexpected
            && self.at_eof == other.at_eof
            && self.position_delta == other.position_delta
            && self.message == other.message
            && multiset_eq(&self.expected, &other.expected)
    }
}

impl<Tok: PartialEq + Clone + Ord> Eq for ParseError<Tok> {}

fn multiset_eq<Tok: Ord + Clone>(a: &[Expectation<Tok>], b: &[Expectation<Tok>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

impl<Tok: Hash> Hash for ParseError<Tok> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unexpected.hash(state);
        self.at_eof.hash(state);
        self.position_delta.hash(state);
        self.message.hash(state);
        // Commutative: XOR the independently-hashed contribution of each
        // expectation so insertion order never affects the final hash,
        // matching the order-independent `Eq` above.
        let mut acc: u64 = 0;
        for e in &self.expected {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            e.hash(&mut h);
            acc ^= h.finish();
        }
        acc.hash(state);
    }
}

impl<Tok: std::fmt::Display> std::fmt::Display for ParseError<Tok> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Parse error.")?;
        if let Some(msg) = &self.message {
            writeln!(f, "    {msg}")?;
        }
        if self.at_eof {
            writeln!(f, "    unexpected end of input")?;
        } else if let Some(tok) = &self.unexpected {
            writeln!(f, "    unexpected {tok}")?;
        }
        if !self.expected.is_empty() {
            write!(f, "    expected ")?;
            let rendered: Vec<String> = self.expected.iter().map(|e| e.to_string()).collect();
            match rendered.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    writeln!(f, "{}, or {}", rest.join(", "), last)?;
                }
                Some((last, _)) => writeln!(f, "{last}")?,
                None => {}
            }
        }
        write!(f, "    at {}", self.position())
    }
}

/// A programmer-error class distinct from ordinary parse failure: a
/// combinator's contract was violated in a way no input could ever
/// satisfy (see [`crate::parser::repeat`] for the canonical case — a
/// parser inside `Many`/`AtLeastOnce`/`Until` that succeeds without
/// consuming).
#[derive(Debug, Clone, thiserror::Error)]
pub enum UsageError {
    #[error("`{combinator}` body succeeded without consuming input; this would loop forever")]
    InfiniteLoop { combinator: &'static str },
    #[error("`Rec` factory was re-entered recursively before its first parser could be cached")]
    RecCycle,
}

/// Wraps a [`ParseError`] as a Rust error, for callers that want
/// `parse_or_throw`'s `?`-friendly panic-free failure path.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ParseException<Tok: std::fmt::Debug + std::fmt::Display>(pub ParseError<Tok>);

#[cfg(test)]
mod error_tests;
