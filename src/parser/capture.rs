//! Parsers that look at what was consumed rather than at what was produced:
//! token capture, raw fragments, and parsing a sub-input.

use std::sync::Arc;

use super::{Element, Halt, Parse, ParseResult, ParseState, Parser};
use crate::lexer::Token;

// === Tokens ===

struct Capture<I: Element, T> {
    parser: Parser<I, T>,
    kind: Arc<str>,
}

impl<I: Element, T: 'static> Parse<I, Token> for Capture<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Token> {
        let start = state.position();
        self.parser.run(state)?;
        let consumed = state.slice(start, state.position());
        let index = consumed.first().and_then(Element::offset).unwrap_or(start);
        Ok(Token::new(&*self.kind, I::text(consumed), index))
    }
}

struct TextCapture<I: Element, T> {
    parser: Parser<I, T>,
    kind: Arc<str>,
}

impl<I: Element, T: Into<String> + 'static> Parse<I, Token> for TextCapture<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Token> {
        let start = state.position();
        let text = self.parser.run(state)?.into();
        Ok(Token::new(&*self.kind, text, start))
    }
}

// === Fragments ===

struct Fragment<I: Element, T> {
    parser: Parser<I, T>,
}

impl<I: Element, T: 'static> Parse<I, I::Fragment> for Fragment<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<I::Fragment> {
        let start = state.position();
        self.parser.run(state)?;
        Ok(I::fragment(state.slice(start, state.position())))
    }
}

// === Nested inputs ===

/// A parse result that can itself be parsed.
pub trait SubInput<J: Element> {
    /// A fresh state over this value.
    fn open(&self) -> ParseState<'_, J>;

    /// Map `index` in this sub-input back to the enclosing source text,
    /// given the enclosing span `start..end` this value was parsed from.
    fn lift(&self, index: usize, start: usize, end: usize) -> usize;
}

impl SubInput<char> for String {
    fn open(&self) -> ParseState<'_, char> {
        ParseState::from_text(self)
    }

    fn lift(&self, index: usize, start: usize, _end: usize) -> usize {
        start + index
    }
}

/// Elements carrying their own offsets (such as lexed tokens) report those;
/// past the last element the failure sits at the end of the enclosing span.
impl<J: Element> SubInput<J> for Vec<J> {
    fn open(&self) -> ParseState<'_, J> {
        ParseState::new(self)
    }

    fn lift(&self, index: usize, start: usize, end: usize) -> usize {
        match self.get(index) {
            Some(element) => element.offset().unwrap_or(start + index),
            None => end,
        }
    }
}

impl SubInput<Token> for Token {
    fn open(&self) -> ParseState<'_, Token> {
        ParseState::new(std::slice::from_ref(self))
    }

    fn lift(&self, _index: usize, start: usize, _end: usize) -> usize {
        start
    }
}

/// A single character as its own input. It carries no source text, so
/// pattern-scanning primitives such as `regex` never match inside it.
impl SubInput<char> for char {
    fn open(&self) -> ParseState<'_, char> {
        ParseState::new(std::slice::from_ref(self))
    }

    fn lift(&self, _index: usize, start: usize, _end: usize) -> usize {
        start
    }
}

struct Nested<I: Element, S, J: Element, U> {
    outer: Parser<I, S>,
    inner: Parser<J, U>,
}

impl<I, S, J, U> Parse<I, U> for Nested<I, S, J, U>
where
    I: Element,
    S: SubInput<J> + 'static,
    J: Element,
    U: 'static,
{
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<U> {
        let start = state.position();
        let sub = self.outer.run(state)?;
        let end = state.position();
        let mut inner = sub.open();
        match self.inner.run(&mut inner) {
            Ok(value) => Ok(value),
            Err(Halt::Failed) => {
                let lift = |index: usize| {
                    if I::IS_SOURCE {
                        sub.lift(index, start, end)
                    } else {
                        (start + index).min(end)
                    }
                };
                let error = inner.finalize_error();
                if !inner.is_eof() {
                    state.restore(lift(inner.position()));
                }
                state.set_error(Some(error.relocate(lift)));
                Err(Halt::Failed)
            }
            Err(escape) => Err(escape),
        }
    }
}

impl<I: Element, T: 'static> Parser<I, T> {
    /// Capture the consumed elements as a [`Token`] of `kind`.
    pub fn token(self, kind: impl Into<String>) -> Parser<I, Token> {
        Parser::from_node(Capture {
            parser: self,
            kind: Arc::from(kind.into()),
        })
    }

    /// The raw consumed elements instead of the parsed result.
    pub fn fragment(self) -> Parser<I, I::Fragment> {
        Parser::from_node(Fragment { parser: self })
    }

    /// Run `inner` over the value self produces.
    ///
    /// Failures inside `inner` are reported at the matching position of this
    /// parser's input.
    pub fn nested<J: Element, U: 'static>(self, inner: Parser<J, U>) -> Parser<I, U>
    where
        T: SubInput<J>,
    {
        Parser::from_node(Nested {
            outer: self,
            inner,
        })
    }
}

impl<I: Element, T: Into<String> + 'static> Parser<I, T> {
    /// Like [`Parser::token`], with the parsed result as the token text.
    pub fn text_token(self, kind: impl Into<String>) -> Parser<I, Token> {
        Parser::from_node(TextCapture {
            parser: self,
            kind: Arc::from(kind.into()),
        })
    }
}
