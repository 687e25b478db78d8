//! Tokens and the lexer-table builders.
//!
//! A grammar is usually written in two stages: a character-level lexer that
//! produces a `Vec<Token>` (see [`Parser::lexeme`]), and a token-level
//! grammar that matches on [`Token::kind`] (see [`token`]). The two are joined
//! with [`Parser::nested`], which keeps error positions in source
//! coordinates.

mod keywords;
mod operators;

use std::fmt;

pub use keywords::Keywords;
pub use operators::Operators;

use crate::parser::{Element, Encountered, Parser, satisfies, throw};

/// A classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: String,
    pub text: String,
    /// Where the token starts in the input it was lexed from.
    pub index: usize,
}

impl Token {
    pub fn new(kind: impl Into<String>, text: impl Into<String>, index: usize) -> Self {
        Token {
            kind: kind.into(),
            text: text.into(),
            index,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

impl Element for Token {
    type Fragment = Vec<Token>;

    fn describe(&self) -> Encountered {
        Encountered::Text(self.text.clone())
    }

    fn fragment(items: &[Token]) -> Vec<Token> {
        items.to_vec()
    }

    fn text(items: &[Token]) -> String {
        items.iter().map(|token| token.text.as_str()).collect()
    }

    fn offset(&self) -> Option<usize> {
        Some(self.index)
    }
}

/// Matches one token of `kind`.
pub fn token(kind: impl Into<String>) -> Parser<Token, Token> {
    let kind = kind.into();
    let expected = format!("{kind} expected");
    let name = kind.clone();
    satisfies(move |t: &Token| t.kind == kind, expected).named(name)
}

const END_OF_INPUT: &str = "end_of_lexemes";

impl<I: Element, T: 'static> Parser<I, T> {
    /// Every match of self in the input, with any run of `delim` allowed
    /// before, between and after them.
    ///
    /// Stops quietly at the first position where self does not match; follow
    /// it with `eof()` to insist on the whole input.
    pub fn lexeme<D: 'static>(self, delim: Parser<I, D>) -> Parser<I, Vec<T>> {
        let skip = delim.skip_many(0);
        let element = self.clone().or(throw(END_OF_INPUT));
        let rest = skip.clone().then(element.clone()).catch(END_OF_INPUT).many(0);
        let tokens = element.seq(rest).map(|(first, rest)| {
            std::iter::once(first)
                .chain(rest.into_iter().flatten())
                .collect::<Vec<_>>()
        });
        skip.clone()
            .then(tokens.catch(END_OF_INPUT))
            .map(Option::unwrap_or_default)
            .skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseState, ch, eof, integer, whitespace, word};
    use pretty_assertions::assert_eq;

    fn lexer() -> Parser<char, Vec<Token>> {
        (word().token("word") | integer().token("int") | ch('+').token("+"))
            .lexeme(whitespace())
            .skip(eof())
    }

    #[test]
    fn lexeme_collects_tokens_with_source_offsets() {
        let tokens = lexer().parse(" ab + 12 ").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("word", "ab", 1),
                Token::new("+", "+", 4),
                Token::new("int", "12", 6),
            ]
        );
    }

    #[test]
    fn lexeme_accepts_blank_input() {
        assert_eq!(lexer().parse("   ").unwrap(), Vec::new());
        assert_eq!(lexer().parse("").unwrap(), Vec::new());
    }

    #[test]
    fn lexeme_leaves_unknown_input() {
        let p = word().token("word").lexeme(whitespace());
        let mut state = ParseState::from_text("a b $");
        assert_eq!(p.run(&mut state).map(|t| t.len()), Ok(2));
        assert_eq!(state.position(), 4);
    }

    #[test]
    fn token_matches_on_kind_only() {
        let tokens = vec![Token::new("int", "7", 0), Token::new("word", "x", 2)];
        let p = token("int") * token("word");
        assert_eq!(p.parse(&tokens).unwrap().text, "x");

        let err = token("word").parse(&tokens).unwrap_err();
        assert_eq!(err.message, "word expected, 7 at line 1, col 1.");
    }

    #[test]
    fn token_errors_use_source_positions() {
        let source = "x\n  y";
        let tokens = vec![Token::new("word", "x", 0), Token::new("word", "y", 4)];
        let p = token("word") * token("int");
        let err = p.parse((tokens.as_slice(), source)).unwrap_err();
        assert_eq!(err.message, "int expected, y at line 2, col 3.");
    }

    #[test]
    fn display_shows_kind_and_text() {
        assert_eq!(Token::new("word", "abc", 0).to_string(), "word: abc");
    }
}
