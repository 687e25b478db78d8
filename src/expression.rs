//! Operator-precedence expressions.
//!
//! An [`OperatorTable`] lists operator parsers with an associativity and a
//! precedence. [`build`] turns a term parser and a table into a parser for
//! whole expressions by wrapping the term in one fold per
//! (precedence, associativity) suite, tightest-binding first.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::parser::{Element, Parser, alt};

/// Operator function for prefix and postfix operators.
pub type UnaryOp<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Operator function for infix operators.
pub type BinaryOp<T> = Arc<dyn Fn(T, T) -> T + Send + Sync>;

pub fn unary<T>(f: impl Fn(T) -> T + Send + Sync + 'static) -> UnaryOp<T> {
    Arc::new(f)
}

pub fn binary<T>(f: impl Fn(T, T) -> T + Send + Sync + 'static) -> BinaryOp<T> {
    Arc::new(f)
}

/// How operators of one suite combine with their operands.
///
/// When two suites share a precedence they are applied in declaration order
/// of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Associativity {
    Prefix,
    Postfix,
    /// Non-associative: `a < b < c` stops after `a < b`.
    InfixN,
    InfixR,
    InfixL,
}

enum Operator<I: Element, T> {
    Unary(Parser<I, UnaryOp<T>>),
    Binary(Parser<I, BinaryOp<T>>),
}

/// Operators grouped by associativity and precedence. A higher precedence
/// binds tighter.
pub struct OperatorTable<I: Element, T> {
    entries: Vec<(Associativity, Operator<I, T>, i32)>,
}

impl<I: Element, T> Default for OperatorTable<I, T> {
    fn default() -> Self {
        OperatorTable {
            entries: Vec::new(),
        }
    }
}

impl<I: Element, T: 'static> OperatorTable<I, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, op: Parser<I, UnaryOp<T>>, precedence: i32) -> Self {
        self.entries
            .push((Associativity::Prefix, Operator::Unary(op), precedence));
        self
    }

    pub fn postfix(mut self, op: Parser<I, UnaryOp<T>>, precedence: i32) -> Self {
        self.entries
            .push((Associativity::Postfix, Operator::Unary(op), precedence));
        self
    }

    pub fn infixl(mut self, op: Parser<I, BinaryOp<T>>, precedence: i32) -> Self {
        self.entries
            .push((Associativity::InfixL, Operator::Binary(op), precedence));
        self
    }

    pub fn infixr(mut self, op: Parser<I, BinaryOp<T>>, precedence: i32) -> Self {
        self.entries
            .push((Associativity::InfixR, Operator::Binary(op), precedence));
        self
    }

    pub fn infixn(mut self, op: Parser<I, BinaryOp<T>>, precedence: i32) -> Self {
        self.entries
            .push((Associativity::InfixN, Operator::Binary(op), precedence));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Operators of one suite, unioned.
enum Suite<I: Element, T> {
    Unary(Parser<I, UnaryOp<T>>),
    Binary(Parser<I, BinaryOp<T>>),
}

type SuiteKey = (Reverse<i32>, Associativity);

/// Suites ordered tightest-binding first.
fn suites<I: Element, T: 'static>(table: &OperatorTable<I, T>) -> Vec<(SuiteKey, Suite<I, T>)> {
    let mut unary: BTreeMap<SuiteKey, Vec<Parser<I, UnaryOp<T>>>> = BTreeMap::new();
    let mut binary: BTreeMap<SuiteKey, Vec<Parser<I, BinaryOp<T>>>> = BTreeMap::new();
    for (associativity, op, precedence) in &table.entries {
        let key = (Reverse(*precedence), *associativity);
        match op {
            Operator::Unary(op) => unary.entry(key).or_default().push(op.clone()),
            Operator::Binary(op) => binary.entry(key).or_default().push(op.clone()),
        }
    }

    let mut suites: Vec<_> = unary
        .into_iter()
        .map(|(key, ops)| (key, Suite::Unary(union(ops))))
        .chain(
            binary
                .into_iter()
                .map(|(key, ops)| (key, Suite::Binary(union(ops)))),
        )
        .collect();
    suites.sort_by_key(|(key, _)| *key);
    suites
}

fn union<I: Element, T: 'static>(mut ops: Vec<Parser<I, T>>) -> Parser<I, T> {
    if ops.len() == 1 {
        ops.remove(0)
    } else {
        alt(ops)
    }
}

fn trimmed<I: Element, T: 'static>(parser: Parser<I, T>, skip: &Option<Parser<I, ()>>) -> Parser<I, T> {
    match skip {
        Some(skip) => parser.skip(skip.clone()),
        None => parser,
    }
}

/// An expression parser over `term` and the operators in `table`.
///
/// When `delim` is given, any run of it is skipped after every term and
/// every operator.
pub fn build<I, T, D>(
    term: Parser<I, T>,
    table: &OperatorTable<I, T>,
    delim: Option<Parser<I, D>>,
) -> Parser<I, T>
where
    I: Element,
    T: 'static,
    D: 'static,
{
    let skip = delim.map(|d| d.skip_many(0));
    let term = trimmed(term, &skip);

    suites(table)
        .into_iter()
        .fold(term, |expr, ((Reverse(precedence), associativity), suite)| {
            debug!("operator suite {associativity:?} at precedence {precedence}");
            match (associativity, suite) {
                (Associativity::Prefix, Suite::Unary(op)) => expr.prefix(trimmed(op, &skip)),
                (_, Suite::Unary(op)) => expr.postfix(trimmed(op, &skip)),
                (Associativity::InfixN, Suite::Binary(op)) => expr.infixn(trimmed(op, &skip)),
                (Associativity::InfixR, Suite::Binary(op)) => expr.infixr(trimmed(op, &skip)),
                (_, Suite::Binary(op)) => expr.infixl(trimmed(op, &skip)),
            }
        })
}

impl<I: Element, T: 'static> Parser<I, T> {
    /// Any number of prefix operators applied to self, innermost last.
    pub fn prefix(self, op: Parser<I, UnaryOp<T>>) -> Parser<I, T> {
        op.many(0)
            .seq(self)
            .map(|(ops, v)| ops.iter().rev().fold(v, |v, f| f(v)))
    }

    /// Self followed by any number of postfix operators, applied in order.
    pub fn postfix(self, op: Parser<I, UnaryOp<T>>) -> Parser<I, T> {
        self.seq(op.many(0))
            .map(|(v, ops)| ops.iter().fold(v, |v, f| f(v)))
    }

    /// Left-associative chain: `a op b op c` is `(a op b) op c`.
    pub fn infixl(self, op: Parser<I, BinaryOp<T>>) -> Parser<I, T> {
        self.clone()
            .seq(op.seq(self).many(0))
            .map(|(v, rest)| rest.into_iter().fold(v, |acc, (f, x)| f(acc, x)))
    }

    /// Right-associative chain: `a op b op c` is `a op (b op c)`.
    pub fn infixr(self, op: Parser<I, BinaryOp<T>>) -> Parser<I, T> {
        self.clone().seq(op.seq(self).many(0)).map(|(v, rest)| {
            let mut rest = rest.into_iter().rev();
            let Some((mut f, mut seed)) = rest.next() else {
                return v;
            };
            for (g, x) in rest {
                seed = f(x, seed);
                f = g;
            }
            f(v, seed)
        })
    }

    /// At most one operator: `a op b`, or just `a`.
    pub fn infixn(self, op: Parser<I, BinaryOp<T>>) -> Parser<I, T> {
        self.clone()
            .seq(op.seq(self).optional())
            .map(|(v, rest)| match rest {
                Some((f, x)) => f(v, x),
                None => v,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ch, integer, value};

    fn num() -> Parser<char, i64> {
        integer().map(|s| s.parse().unwrap_or_default())
    }

    fn op(c: char, f: fn(i64, i64) -> i64) -> Parser<char, BinaryOp<i64>> {
        ch(c) * value(binary(f))
    }

    #[test]
    fn fold_combinators() {
        let neg = ch('-') * value(unary(|x: i64| -x));
        assert_eq!(num().prefix(neg.clone()).parse("--3").unwrap(), 3);
        assert_eq!(num().prefix(neg).parse("-3").unwrap(), -3);

        let sub = || op('-', |a, b| a - b);
        assert_eq!(num().infixl(sub()).parse("10-3-2").unwrap(), 5);
        assert_eq!(num().infixr(sub()).parse("10-3-2").unwrap(), 9);

        let double = ch('!') * value(unary(|x: i64| x * 2));
        assert_eq!(num().postfix(double).parse("3!!").unwrap(), 12);
    }

    #[test]
    fn same_precedence_suites_are_unioned() {
        let table = OperatorTable::new()
            .infixl(op('+', |a, b| a + b), 10)
            .infixl(op('-', |a, b| a - b), 10);
        assert_eq!(table.len(), 2);
        let expr = build::<_, _, ()>(num(), &table, None);
        assert_eq!(expr.parse("1-2+3").unwrap(), 2);
    }

    #[test]
    fn delimiter_is_skipped_after_terms_and_operators() {
        let table = OperatorTable::new().infixl(op('*', |a, b| a * b), 10);
        let expr = build(num(), &table, Some(ch(' ')));
        assert_eq!(expr.parse("2 *  3 ").unwrap(), 6);
    }
}
