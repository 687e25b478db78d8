use std::borrow::Cow;

use regex::Regex;

use super::error::{Encountered, ErrorKind, Failure, ParseError, ParserException};
use super::{Halt, ParseResult};
use crate::location::locate;

/// An element of a parser's input: a character or a token.
pub trait Element: Clone + PartialEq + Send + Sync + 'static {
    /// What `fragment` returns for a run of these elements.
    type Fragment: Send + 'static;

    /// Whether an input of these elements is the source text itself, so that
    /// source offsets are also input positions.
    const IS_SOURCE: bool = false;

    /// How the element is shown in error messages.
    fn describe(&self) -> Encountered;

    fn fragment(items: &[Self]) -> Self::Fragment;

    /// Raw text of a run of elements, used for token capture.
    fn text(items: &[Self]) -> String;

    /// Position of this element in the source it was lexed from, if known.
    fn offset(&self) -> Option<usize> {
        None
    }
}

impl Element for char {
    type Fragment = String;

    const IS_SOURCE: bool = true;

    fn describe(&self) -> Encountered {
        Encountered::Char(*self)
    }

    fn fragment(items: &[char]) -> String {
        items.iter().collect()
    }

    fn text(items: &[char]) -> String {
        items.iter().collect()
    }
}

/// Cursor over one parse call's input.
///
/// Holds the current index and the latched error of the last failure. The
/// index only moves backwards through [`ParseState::restore`].
pub struct ParseState<'a, I: Element> {
    input: Cow<'a, [I]>,
    source: Option<&'a str>,
    byte_offsets: Vec<usize>,
    index: usize,
    error: Option<ParseError>,
}

impl<'a> ParseState<'a, char> {
    pub fn from_text(text: &'a str) -> Self {
        let mut byte_offsets: Vec<usize> = text.char_indices().map(|(at, _)| at).collect();
        byte_offsets.push(text.len());
        Self {
            input: Cow::Owned(text.chars().collect()),
            source: Some(text),
            byte_offsets,
            index: 0,
            error: None,
        }
    }

    /// Match `pattern` at the current index, advancing past the match.
    ///
    /// `pattern` must be anchored with `\A`; an unanchored match further
    /// ahead is treated as no match.
    pub fn scan(&mut self, pattern: &Regex) -> Option<String> {
        let text = self.source?;
        let start = *self.byte_offsets.get(self.index)?;
        let found = pattern.find(&text[start..])?;
        if found.start() != 0 {
            return None;
        }
        let matched = found.as_str().to_owned();
        self.advance_by(matched.chars().count());
        Some(matched)
    }
}

impl<'a, I: Element> ParseState<'a, I> {
    pub fn new(items: &'a [I]) -> Self {
        Self {
            input: Cow::Borrowed(items),
            source: None,
            byte_offsets: Vec::new(),
            index: 0,
            error: None,
        }
    }

    /// A token stream together with the text it was lexed from, so that
    /// failures can be located by line and column.
    pub fn with_source(items: &'a [I], source: &'a str) -> Self {
        Self {
            source: Some(source),
            ..Self::new(items)
        }
    }

    pub fn input(&self) -> &[I] {
        &self.input
    }

    pub fn source(&self) -> Option<&'a str> {
        self.source
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    pub fn has_next(&self) -> bool {
        self.index < self.input.len()
    }

    pub fn is_eof(&self) -> bool {
        !self.has_next()
    }

    pub fn available(&self) -> usize {
        self.input.len().saturating_sub(self.index)
    }

    pub fn peek(&self) -> Option<&I> {
        self.input.get(self.index)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&I> {
        self.input.get(self.index + offset)
    }

    pub fn advance(&mut self) -> Option<I> {
        let element = self.peek().cloned()?;
        self.index += 1;
        Some(element)
    }

    pub fn advance_by(&mut self, n: usize) {
        self.index = (self.index + n).min(self.input.len());
    }

    pub fn slice(&self, start: usize, end: usize) -> &[I] {
        &self.input[start..end]
    }

    /// Whether the cursor is still inside the lookahead window opened at
    /// `start`.
    pub fn within(&self, start: usize, lookahead: usize) -> bool {
        self.index.saturating_sub(start) < lookahead
    }

    pub fn encountered(&self) -> Encountered {
        self.peek().map_or(Encountered::Eof, Element::describe)
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    pub fn set_error(&mut self, error: Option<ParseError>) {
        self.error = error;
    }

    pub fn record_error(&mut self, failure: Failure) {
        self.error = Some(ParseError::new(failure));
    }

    fn record<T>(&mut self, kind: ErrorKind, message: impl Into<String>) -> ParseResult<T> {
        let failure = Failure::new(kind, self.index, self.encountered(), message);
        self.record_error(failure);
        Err(Halt::Failed)
    }

    /// Fail with a generic message at the current index.
    pub fn fail<T>(&mut self, message: impl Into<String>) -> ParseResult<T> {
        self.record(ErrorKind::Failure, message)
    }

    /// Fail with an "expected" message at the current index.
    pub fn expecting<T>(&mut self, message: impl Into<String>) -> ParseResult<T> {
        self.record(ErrorKind::Expected, message)
    }

    /// The error to report after the root parser failed. Moves the cursor to
    /// the error's index.
    pub fn finalize_error(&mut self) -> ParseError {
        let error = self.error.take().unwrap_or_else(|| {
            ParseError::new(Failure::new(
                ErrorKind::Failure,
                self.index,
                self.encountered(),
                "syntax error",
            ))
        });
        self.index = error.index();
        error
    }

    /// 1-based line and column of the element at `index`.
    ///
    /// Without source text the column is simply the element position.
    pub fn locate(&self, index: usize) -> (usize, usize) {
        let Some(source) = self.source else {
            return (1, index + 1);
        };
        let offset = match self.input.get(index) {
            Some(element) => element.offset().unwrap_or(index),
            None if self.input.first().and_then(Element::offset).is_some() => {
                source.chars().count()
            }
            None => index,
        };
        locate(source, offset)
    }

    pub fn exception(&mut self) -> ParserException {
        let error = self.finalize_error();
        let index = error.index();
        let (line, column) = self.locate(index);
        ParserException {
            index,
            line,
            column,
            message: format!("{} at line {line}, col {column}.", error.describe()),
        }
    }
}
