//! Operator-precedence expression building (Pratt-style, over an
//! explicit row table).
//!
//! [`ExpressionParser::build`] folds a term parser outward through a
//! list of [`Row`]s, lowest precedence first, exactly per the
//! `build`/`mk_level`/`apply_infix` algorithm: each row wraps the
//! previous level with its own prefix/postfix unary operators and
//! infix binary operators (non-, left-, and right-associative), so the
//! outermost row ends up binding the loosest.

use crate::expectation::Expectation;
use crate::error::UsageError;
use crate::parser::Parser;
use crate::pool::PooledList;
use crate::state::ParseState;

/// A unary fold: consumes an operator token, produces a function from
/// operand to operand.
pub type UnaryFn<T> = Box<dyn Fn(T) -> T>;
/// A binary fold: consumes an operator token, produces a function
/// combining two operands into one.
pub type BinaryFn<T> = Box<dyn Fn(T, T) -> T>;

type BoxedUnary<Tok, T> = Box<dyn Parser<Tok, UnaryFn<T>>>;
type BoxedBinary<Tok, T> = Box<dyn Parser<Tok, BinaryFn<T>>>;

fn raise_infinite_loop(combinator: &'static str) -> ! {
    tracing::error!(combinator, "expression operator succeeded without consuming input");
    panic!("{}", UsageError::InfiniteLoop { combinator });
}

/// Wraps an operator-matching parser so it yields a ready-to-apply fold
/// function instead of its own match value — the Rust equivalent of
/// spec's `Char('+').ThenReturn((x,y) -> x+y)`.
pub fn binary_fold<Tok, M, MOut, T, F>(matcher: M, fold: F) -> impl Parser<Tok, BinaryFn<T>>
where
    M: Parser<Tok, MOut>,
    F: Fn(T, T) -> T + Clone + 'static,
{
    matcher.map(move |_| Box::new(fold.clone()) as BinaryFn<T>)
}

/// Wraps an operator-matching parser so it yields a ready-to-apply
/// unary fold function, for `prefix`/`postfix` rows.
pub fn unary_fold<Tok, M, MOut, T, F>(matcher: M, fold: F) -> impl Parser<Tok, UnaryFn<T>>
where
    M: Parser<Tok, MOut>,
    F: Fn(T) -> T + Clone + 'static,
{
    matcher.map(move |_| Box::new(fold.clone()) as UnaryFn<T>)
}

/// One precedence level: any of its five operator groups may be empty.
/// Alternatives within the same group are tried in declaration order.
pub struct Row<Tok, T> {
    infix_n: Vec<BoxedBinary<Tok, T>>,
    infix_l: Vec<BoxedBinary<Tok, T>>,
    infix_r: Vec<BoxedBinary<Tok, T>>,
    prefix: Vec<BoxedUnary<Tok, T>>,
    postfix: Vec<BoxedUnary<Tok, T>>,
    chain_prefix: bool,
    chain_postfix: bool,
}

impl<Tok, T> Default for Row<Tok, T> {
    fn default() -> Self {
        Self {
            infix_n: Vec::new(),
            infix_l: Vec::new(),
            infix_r: Vec::new(),
            prefix: Vec::new(),
            postfix: Vec::new(),
            chain_prefix: false,
            chain_postfix: false,
        }
    }
}

impl<Tok: 'static, T: 'static> Row<Tok, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-associative infix operator: at most one may appear at this
    /// level; a second occurrence is a parse failure, not a fold.
    pub fn infix_n(mut self, op: impl Parser<Tok, BinaryFn<T>> + 'static) -> Self {
        self.infix_n.push(Box::new(op));
        self
    }

    /// Left-associative infix operator: `x (op y)*` folding
    /// `((x op y) op y) ...`.
    pub fn infix_l(mut self, op: impl Parser<Tok, BinaryFn<T>> + 'static) -> Self {
        self.infix_l.push(Box::new(op));
        self
    }

    /// Right-associative infix operator: `x (op y)*` folding
    /// `x op (y op (y op y))`.
    pub fn infix_r(mut self, op: impl Parser<Tok, BinaryFn<T>> + 'static) -> Self {
        self.infix_r.push(Box::new(op));
        self
    }

    /// Prefix unary operator. Accepts at most one occurrence per term
    /// unless [`Row::chainable_prefix`] is also called.
    pub fn prefix(mut self, op: impl Parser<Tok, UnaryFn<T>> + 'static) -> Self {
        self.prefix.push(Box::new(op));
        self
    }

    /// Postfix unary operator. Accepts at most one occurrence per term
    /// unless [`Row::chainable_postfix`] is also called.
    pub fn postfix(mut self, op: impl Parser<Tok, UnaryFn<T>> + 'static) -> Self {
        self.postfix.push(Box::new(op));
        self
    }

    /// Allow `prefix` operators to repeat (`≥1`), folding right-to-left
    /// (the first-parsed operator ends up outermost): `--x` is
    /// `-(-(x))`.
    pub fn chainable_prefix(mut self) -> Self {
        self.chain_prefix = true;
        self
    }

    /// Allow `postfix` operators to repeat (`≥1`), folding
    /// left-to-right (the first-parsed operator is applied first).
    pub fn chainable_postfix(mut self) -> Self {
        self.chain_postfix = true;
        self
    }
}

/// Builds a precedence-climbing parser from a term parser and an
/// ordered list of [`Row`]s, lowest precedence first.
pub struct ExpressionParser<Tok, T> {
    term: Box<dyn Parser<Tok, T>>,
}

impl<Tok: 'static, T: 'static> ExpressionParser<Tok, T> {
    pub fn new(term: impl Parser<Tok, T> + 'static) -> Self {
        Self {
            term: Box::new(term),
        }
    }

    /// Fold `term` outward through `table`, one [`Level`] per row.
    pub fn build(self, table: Vec<Row<Tok, T>>) -> Box<dyn Parser<Tok, T>> {
        let mut term = self.term;
        for row in table {
            term = Box::new(Level { inner: term, row });
        }
        term
    }
}

/// Tries each boxed parser in `parsers` in order, behaving exactly like
/// [`crate::parser::OneOf`] — success stops the scan and merges only
/// the winning branch's expectations; a zero-consumption failure merges
/// and moves on; a consuming failure commits and propagates.
fn try_one_of<Tok: 'static, O>(
    parsers: &[Box<dyn Parser<Tok, O>>],
    state: &mut ParseState<'_, Tok>,
    expected: &mut PooledList<Expectation<Tok>>,
) -> Option<O> {
    let start = state.location();
    let mut merged: Option<PooledList<Expectation<Tok>>> = None;
    for p in parsers {
        let mut branch = state.rent_expectations();
        if let Some(v) = p.try_parse(state, &mut branch) {
            branch.drain_into(expected);
            return Some(v);
        }
        if state.location() != start {
            branch.drain_into(expected);
            return None;
        }
        match merged.as_mut() {
            Some(m) => branch.drain_into(m),
            None => merged = Some(branch),
        }
    }
    if let Some(mut m) = merged {
        m.drain_into(expected);
    }
    None
}

struct Level<Tok, T> {
    inner: Box<dyn Parser<Tok, T>>,
    row: Row<Tok, T>,
}

impl<Tok: 'static, T: 'static> Level<Tok, T> {
    /// `(prefixOp or identity) then inner then (postfixOp or identity)`.
    fn parse_operand(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<T> {
        let prefixes = self.collect_unary(&self.row.prefix, self.row.chain_prefix, "prefix", state, expected)?;
        let mut value = self.inner.try_parse(state, expected)?;
        for op in prefixes.into_iter().rev() {
            value = op(value);
        }

        let postfixes = self.collect_unary(&self.row.postfix, self.row.chain_postfix, "postfix", state, expected)?;
        for op in postfixes {
            value = op(value);
        }
        Some(value)
    }

    fn collect_unary(
        &self,
        ops: &[BoxedUnary<Tok, T>],
        chainable: bool,
        combinator: &'static str,
        state: &mut ParseState<'_, Tok>,
        expected: &mut PooledList<Expectation<Tok>>,
    ) -> Option<Vec<UnaryFn<T>>> {
        let mut collected = Vec::new();
        loop {
            let start = state.location();
            let mut branch = state.rent_expectations();
            match try_one_of(ops, state, &mut branch) {
                Some(f) => {
                    if state.location() == start {
                        raise_infinite_loop(combinator);
                    }
                    branch.drain_into(expected);
                    collected.push(f);
                    if !chainable {
                        break;
                    }
                }
                None => {
                    if state.location() != start {
                        branch.drain_into(expected);
                        return None;
                    }
                    branch.drain_into(expected);
                    break;
                }
            }
        }
        Some(collected)
    }

    /// `applyInfix`: at most one `infixN`, then zero-or-more `infixL`
    /// folding left, then zero-or-more `infixR` folding right, else the
    /// operand is returned unmodified (the `Return(x)` branch).
    fn apply_infix(&self, lhs: T, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<T> {
        let start = state.location();
        let mut n_expected = state.rent_expectations();
        if let Some(f) = try_one_of(&self.row.infix_n, state, &mut n_expected) {
            if state.location() == start {
                raise_infinite_loop("infix_n");
            }
            n_expected.drain_into(expected);
            let rhs = self.parse_operand(state, expected)?;
            return Some(f(lhs, rhs));
        }
        if state.location() != start {
            n_expected.drain_into(expected);
            return None;
        }
        n_expected.drain_into(expected);

        let mut value = lhs;
        loop {
            let iter_start = state.location();
            let mut l_expected = state.rent_expectations();
            match try_one_of(&self.row.infix_l, state, &mut l_expected) {
                Some(f) => {
                    if state.location() == iter_start {
                        raise_infinite_loop("infix_l");
                    }
                    l_expected.drain_into(expected);
                    let rhs = self.parse_operand(state, expected)?;
                    value = f(value, rhs);
                }
                None => {
                    if state.location() != iter_start {
                        l_expected.drain_into(expected);
                        return None;
                    }
                    l_expected.drain_into(expected);
                    break;
                }
            }
        }

        let mut ops: Vec<BinaryFn<T>> = Vec::new();
        let mut rhss: Vec<T> = Vec::new();
        loop {
            let iter_start = state.location();
            let mut r_expected = state.rent_expectations();
            match try_one_of(&self.row.infix_r, state, &mut r_expected) {
                Some(f) => {
                    if state.location() == iter_start {
                        raise_infinite_loop("infix_r");
                    }
                    r_expected.drain_into(expected);
                    let rhs = self.parse_operand(state, expected)?;
                    ops.push(f);
                    rhss.push(rhs);
                }
                None => {
                    if state.location() != iter_start {
                        r_expected.drain_into(expected);
                        return None;
                    }
                    r_expected.drain_into(expected);
                    break;
                }
            }
        }
        if !ops.is_empty() {
            let mut acc = rhss.pop().expect("ops non-empty implies rhss non-empty");
            for i in (1..ops.len()).rev() {
                let y = rhss.pop().expect("one rhs per op");
                acc = ops[i](y, acc);
            }
            value = ops[0](value, acc);
        }

        Some(value)
    }
}

impl<Tok: 'static, T: 'static> Parser<Tok, T> for Level<Tok, T> {
    fn try_parse(&self, state: &mut ParseState<'_, Tok>, expected: &mut PooledList<Expectation<Tok>>) -> Option<T> {
        let operand = self.parse_operand(state, expected)?;
        self.apply_infix(operand, state, expected)
    }
}

#[cfg(test)]
mod expression_tests {
    use super::*;
    use crate::config::Configuration;
    use crate::parser::{satisfy, token};
    use crate::state::ParseState;

    fn digit() -> impl Parser<char, i64> {
        satisfy(|c: &char| c.is_ascii_digit()).map(|c| (c as u8 - b'0') as i64)
    }

    fn run(p: &impl Parser<char, i64>, input: &str) -> i64 {
        let chars: Vec<char> = input.chars().collect();
        let mut state = ParseState::from_slice(&chars, Configuration::for_chars());
        crate::parser::parse(p, &mut state).unwrap()
    }

    fn arith_table() -> Vec<Row<char, i64>> {
        vec![
            Row::new().infix_l(binary_fold(token('+'), |a, b| a + b)),
            Row::new().infix_l(binary_fold(token('*'), |a, b| a * b)),
        ]
    }

    #[test]
    fn left_assoc_precedence_climbing() {
        let p = ExpressionParser::new(digit()).build(arith_table());
        assert_eq!(run(&p, "2+3*4"), 14);
        assert_eq!(run(&p, "2*3+4"), 10);
        assert_eq!(run(&p, "1+2+3"), 6);
    }

    #[test]
    fn right_assoc_differs_observably_via_string_concat() {
        fn letter() -> impl Parser<char, String> {
            satisfy(|c: &char| c.is_ascii_alphabetic()).map(|c| c.to_string())
        }
        let left_table = vec![Row::new().infix_l(binary_fold(token('.'), |a: String, b: String| format!("({a}.{b})")))];
        let right_table = vec![Row::new().infix_r(binary_fold(token('.'), |a: String, b: String| format!("({a}.{b})")))];

        let left_p = ExpressionParser::new(letter()).build(left_table);
        let right_p = ExpressionParser::new(letter()).build(right_table);

        let chars: Vec<char> = "a.b.c".chars().collect();
        let mut st_left = ParseState::from_slice(&chars, Configuration::for_chars());
        let mut st_right = ParseState::from_slice(&chars, Configuration::for_chars());
        let left = crate::parser::parse(&left_p, &mut st_left).unwrap();
        let right = crate::parser::parse(&right_p, &mut st_right).unwrap();
        assert_eq!(left, "((a.b).c)");
        assert_eq!(right, "(a.(b.c))");
    }

    #[test]
    fn prefix_and_postfix_single_occurrence() {
        let table = vec![Row::new()
            .prefix(unary_fold(token('-'), |x: i64| -x))
            .postfix(unary_fold(token('!'), |x: i64| (1..=x.max(1)).product()))];
        let p = ExpressionParser::new(digit()).build(table);
        assert_eq!(run(&p, "-3"), -3);
        assert_eq!(run(&p, "4!"), 24);
    }

    #[test]
    fn chainable_prefix_folds_right_to_left() {
        let table = vec![Row::new().prefix(unary_fold(token('-'), |x: i64| -x)).chainable_prefix()];
        let p = ExpressionParser::new(digit()).build(table);
        assert_eq!(run(&p, "--3"), 3);
        assert_eq!(run(&p, "---3"), -3);
    }

    #[test]
    fn infix_n_allows_at_most_one_occurrence() {
        use crate::parser::end;

        let table = vec![Row::new().infix_n(binary_fold(token('='), |_a: i64, b: i64| b))];
        let p = ExpressionParser::new(digit()).build(table).before(end());
        let chars: Vec<char> = "1=2=3".chars().collect();
        let mut state = ParseState::from_slice(&chars, Configuration::for_chars());
        // Only the first `=` is consumed at this level; the trailing
        // `=3` is left over, so the `.before(end())` check fails.
        assert!(crate::parser::parse(&p, &mut state).is_err());

        let chars: Vec<char> = "1=2".chars().collect();
        let mut state = ParseState::from_slice(&chars, Configuration::for_chars());
        assert_eq!(crate::parser::parse(&p, &mut state).unwrap(), 2);
    }
}
