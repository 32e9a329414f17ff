#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parser combinators over arbitrary token streams.
//!
//! The core abstraction is [`parser::Parser`]: a trait with one method,
//! `try_parse`, that either produces a value and possibly advances a
//! [`state::ParseState`] cursor, or fails and leaves the cursor wherever
//! it stopped. Combinators are built by composing `Parser` values —
//! `.map`, `.then`, `.or`, `.many`, and friends on the trait itself, plus
//! the free functions in [`parser`] for primitives like [`parser::token`]
//! and [`parser::satisfy`].
//!
//! Two larger building blocks sit alongside the primitive/structural
//! combinators: [`expression::ExpressionParser`] for Pratt-style
//! operator-precedence grammars, and [`permutation::Permutation`] for
//! order-insensitive composition (parse a fixed set of things, each once,
//! in whatever order they appear).
//!
//! ```
//! use comb::config::Configuration;
//! use comb::parser::{parse, satisfy, Parser};
//! use comb::state::ParseState;
//!
//! let digits: Vec<char> = "42".chars().collect();
//! let mut state = ParseState::from_slice(&digits, Configuration::for_chars());
//! let two_digits = satisfy(|c: &char| c.is_ascii_digit())
//!     .then(satisfy(|c: &char| c.is_ascii_digit()));
//! assert_eq!(parse(&two_digits, &mut state), Ok('2'));
//! ```

pub mod config;
pub mod error;
pub mod expectation;
pub mod expression;
pub mod parser;
pub mod permutation;
pub mod pool;
pub mod position;
pub mod source;
pub mod state;

pub use error::{ParseError, ParseException, UsageError};
pub use expectation::Expectation;
pub use parser::{parse, parse_or_throw, Parser};
pub use state::ParseState;
