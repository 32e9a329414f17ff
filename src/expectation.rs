//! Expectations: what a parser wanted at the point it failed.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A single thing a parser expected to see at some input position.
///
/// Three variants, each carrying enough to render a helpful diagnostic:
/// a human label attached via [`crate::parser::Parser::labelled`], a
/// literal token sequence a matcher was trying to consume, or "end of
/// input".
#[derive(Debug, Clone, Eq)]
pub enum Expectation<Tok> {
    Label(String),
    Tokens(Vec<Tok>),
    Eof,
}

impl<Tok: PartialEq> PartialEq for Expectation<Tok> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expectation::Label(a), Expectation::Label(b)) => a == b,
            (Expectation::Tokens(a), Expectation::Tokens(b)) => a == b,
            (Expectation::Eof, Expectation::Eof) => true,
            _ => false,
        }
    }
}

/// Discriminant used for the `Label < Tokens < Eof` total order from the
/// spec; kept separate from `PartialOrd`/`Ord` derives so the ordering
/// stays explicit about *why* each variant ranks where it does.
fn rank<Tok>(e: &Expectation<Tok>) -> u8 {
    match e {
        Expectation::Label(_) => 0,
        Expectation::Tokens(_) => 1,
        Expectation::Eof => 2,
    }
}

impl<Tok: Ord> PartialOrd for Expectation<Tok> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Tok: Ord> Ord for Expectation<Tok> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Expectation::Label(a), Expectation::Label(b)) => a.cmp(b),
            (Expectation::Tokens(a), Expectation::Tokens(b)) => a.cmp(b),
            (Expectation::Eof, Expectation::Eof) => Ordering::Equal,
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl<Tok: Hash> Hash for Expectation<Tok> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Expectation::Label(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Expectation::Tokens(t) => {
                1u8.hash(state);
                t.hash(state);
            }
            Expectation::Eof => 2u8.hash(state),
        }
    }
}

impl<Tok: std::fmt::Display> std::fmt::Display for Expectation<Tok> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::Label(s) => write!(f, "{s}"),
            Expectation::Eof => write!(f, "end of input"),
            Expectation::Tokens(toks) => {
                write!(f, "\"")?;
                for t in toks {
                    write!(f, "{t}")?;
                }
                write!(f, "\"")
            }
        }
    }
}
