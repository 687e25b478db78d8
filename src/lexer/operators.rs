use std::collections::HashMap;

use log::debug;

use super::{Token, token};
use crate::parser::{GrammarError, Parser, alt, ch, string};

/// Operator lexemes of a language.
///
/// Each operator is lexed into a token whose kind is the operator itself.
/// The combined [lexer](Operators::lexer) always tries a longer operator
/// before any operator that is a prefix of it.
#[derive(Debug, Clone)]
pub struct Operators {
    lexers: HashMap<String, Parser<char, Token>>,
    lexer: Parser<char, Token>,
}

impl Operators {
    pub fn new<S: AsRef<str>>(ops: &[S]) -> Self {
        let sorted = Self::sort(ops);
        debug!("operator table: {}", sorted.join(" "));

        let mut lexers = HashMap::with_capacity(sorted.len());
        let mut ordered = Vec::with_capacity(sorted.len());
        for op in sorted {
            let mut chars = op.chars();
            let lexer = match (chars.next(), chars.next()) {
                (Some(c), None) => ch(c).token(op.as_str()),
                _ => string(&op).token(op.as_str()),
            };
            ordered.push(lexer.clone());
            lexers.insert(op, lexer);
        }

        Operators {
            lexers,
            lexer: alt(ordered),
        }
    }

    /// Orders `ops` so that no operator comes after one of its prefixes.
    ///
    /// Operators are taken longest first and placed into suites: an operator
    /// goes right behind the last member of the first suite that has it as a
    /// prefix, or opens a new suite. Suites are emitted newest first.
    /// Duplicates are dropped.
    pub fn sort<S: AsRef<str>>(ops: &[S]) -> Vec<String> {
        let mut ordered: Vec<&str> = ops.iter().map(AsRef::as_ref).collect();
        ordered.sort_by_key(|op| std::cmp::Reverse(op.chars().count()));

        let mut suites: Vec<Vec<&str>> = Vec::new();
        for op in ordered {
            if !suites.iter_mut().any(|suite| place(suite, op)) {
                suites.push(vec![op]);
            }
        }
        suites
            .into_iter()
            .rev()
            .flatten()
            .map(str::to_owned)
            .collect()
    }

    /// All operators, as tokens.
    pub fn lexer(&self) -> Parser<char, Token> {
        self.lexer.clone()
    }

    /// The lexer for the single operator `op`.
    pub fn lexer_for(&self, op: &str) -> Result<Parser<char, Token>, GrammarError> {
        self.lexers
            .get(op)
            .cloned()
            .ok_or_else(|| GrammarError::UnknownOperator(op.to_owned()))
    }

    /// A token-level parser for `op`.
    pub fn parser(&self, op: &str) -> Result<Parser<Token, Token>, GrammarError> {
        if !self.lexers.contains_key(op) {
            return Err(GrammarError::UnknownOperator(op.to_owned()));
        }
        Ok(token(op))
    }
}

fn place<'a>(suite: &mut Vec<&'a str>, op: &'a str) -> bool {
    match suite.iter().rposition(|placed| placed.starts_with(op)) {
        Some(at) => {
            if suite[at] != op {
                suite.insert(at + 1, op);
            }
            true
        }
        None => false,
    }
}
