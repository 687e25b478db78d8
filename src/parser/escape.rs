//! Non-local escape.
//!
//! `throw` halts with [`Halt::Escaped`], which every other combinator passes
//! straight through. The nearest enclosing `catch` for the same symbol turns
//! it back into a success.

use super::primitives::value_with;
use super::{Element, Halt, Parse, ParseResult, ParseState, Parser, Symbol};

/// Symbol thrown by [`Parser::delimited1`] when no element follows a delimiter.
pub const END_DELIMITER: Symbol = "end_delimiter";

struct Throw {
    symbol: Symbol,
}

impl<I: Element, T> Parse<I, T> for Throw {
    fn run(&self, _state: &mut ParseState<'_, I>) -> ParseResult<T> {
        Err(Halt::Escaped(self.symbol))
    }
}

/// Escapes to the nearest enclosing `catch(symbol, ..)`.
pub fn throw<I: Element, T: 'static>(symbol: Symbol) -> Parser<I, T> {
    Parser::from_node(Throw { symbol }).named(format!("throw({symbol})"))
}

struct Catch<I: Element, T> {
    parser: Parser<I, T>,
    symbol: Symbol,
}

impl<I: Element, T: 'static> Parse<I, Option<T>> for Catch<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Option<T>> {
        let start = state.position();
        match self.parser.run(state) {
            Ok(value) => Ok(Some(value)),
            Err(Halt::Escaped(symbol)) if symbol == self.symbol => {
                state.restore(start);
                Ok(None)
            }
            Err(halt) => Err(halt),
        }
    }
}

/// `Some(result)` from `parser`, or `None` when it escaped with `symbol`.
///
/// An escape rewinds the index to where the catch started.
pub fn catch<I: Element, T: 'static>(symbol: Symbol, parser: Parser<I, T>) -> Parser<I, Option<T>> {
    Parser::from_node(Catch { parser, symbol })
}

impl<I: Element, T: 'static> Parser<I, T> {
    pub fn catch(self, symbol: Symbol) -> Parser<I, Option<T>> {
        catch(symbol, self)
    }

    /// One or more of self separated by `delim`, tolerating one trailing
    /// delimiter. The trailing delimiter is left unconsumed.
    pub fn delimited1<D: 'static>(self, delim: Parser<I, D>) -> Parser<I, Vec<T>> {
        let element = self.clone().or(throw(END_DELIMITER));
        let rest = delim.then(element).catch(END_DELIMITER).many(0);
        self.seq(rest).map(|(first, rest)| {
            std::iter::once(first)
                .chain(rest.into_iter().flatten())
                .collect()
        })
    }

    /// Zero or more of self separated by `delim`, tolerating one trailing
    /// delimiter.
    pub fn delimited<D: 'static>(self, delim: Parser<I, D>) -> Parser<I, Vec<T>> {
        self.delimited1(delim).or(value_with(Vec::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ch, word};

    #[test]
    fn catch_intercepts_matching_symbol() {
        let p = ch('a').then(throw::<char, char>("stop")).catch("stop");
        let mut state = ParseState::from_text("ab");
        assert_eq!(p.run(&mut state), Ok(None));
        assert_eq!(state.position(), 0);
    }

    #[test]
    fn catch_passes_other_symbols_through() {
        let p = throw::<char, char>("inner").catch("outer");
        let mut state = ParseState::from_text("");
        assert_eq!(p.run(&mut state), Err(Halt::Escaped("inner")));
    }

    #[test]
    fn escape_skips_alternatives() {
        let p = (throw::<char, char>("out") | ch('a')).catch("out");
        assert_eq!(p.parse("a").unwrap(), None);
    }

    #[test]
    #[should_panic(expected = "outside of any matching catch")]
    fn uncaught_escape_panics() {
        let _ = throw::<char, ()>("lost").parse("");
    }

    #[test]
    fn trailing_delimiter_is_tolerated() {
        let p = word().delimited(ch(','));
        let mut state = ParseState::from_text("a,b,");
        assert_eq!(p.run(&mut state), Ok(vec!["a".to_owned(), "b".to_owned()]));
        assert_eq!(state.position(), 3);

        assert_eq!(p.parse("a,b").unwrap().len(), 2);
        assert_eq!(p.parse("").unwrap(), Vec::<String>::new());
    }
}
