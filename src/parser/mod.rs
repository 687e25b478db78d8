//! The combinator engine.
//!
//! A [`Parser`] is an immutable node in a grammar graph. Running it against a
//! [`ParseState`] either returns a value or halts: [`Halt::Failed`] means the
//! failure is latched in the state, [`Halt::Escaped`] is a non-local exit
//! travelling to the nearest matching `catch`.

mod capture;
mod combinators;
mod error;
mod escape;
mod lazy;
mod longest;
mod primitives;
mod repeat;
mod state;

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

pub use capture::SubInput;
pub use combinators::alt;
pub use error::{Encountered, ErrorKind, Failure, GrammarError, ParseError, ParserException};
pub use lazy::{Rule, lazy};
pub use longest::{longest, shortest};
pub use primitives::*;
pub use state::{Element, ParseState};

pub use combinators::{sequence, sequence_with};
pub use escape::{END_DELIMITER, catch, throw};

/// How far a failing alternative may advance before an alternation commits
/// to its failure instead of trying the next one.
pub const DEFAULT_LOOKAHEAD: usize = 1;

/// Name of a non-local escape channel.
pub type Symbol = &'static str;

/// Why a parser stopped without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Ordinary failure; the error is latched in the parse state.
    Failed,
    /// A `throw` looking for the `catch` with this symbol.
    Escaped(Symbol),
}

pub type ParseResult<T> = Result<T, Halt>;

/// Implemented by every node kind in this crate and nowhere else.
pub(crate) trait Parse<I: Element, T>: Send + Sync {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T>;

    /// A copy of this node with a different lookahead window, for node kinds
    /// that have one.
    fn with_lookahead(&self, _lookahead: usize) -> Option<Parser<I, T>> {
        None
    }

    /// The branches and window of an alternation, so that chained `or`s
    /// build one flat alternation.
    fn alternatives(&self) -> Option<(Vec<Parser<I, T>>, usize)> {
        None
    }
}

/// A parser over elements `I` producing `T`.
///
/// Cheap to clone; clones share the same node.
pub struct Parser<I: Element, T> {
    node: Arc<dyn Parse<I, T>>,
    name: Option<Arc<str>>,
}

impl<I: Element, T> Clone for Parser<I, T> {
    fn clone(&self) -> Self {
        Parser {
            node: Arc::clone(&self.node),
            name: self.name.clone(),
        }
    }
}

impl<I: Element, T> fmt::Debug for Parser<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Parser({name})"),
            None => f.write_str("Parser"),
        }
    }
}

impl<I: Element, T: 'static> Parser<I, T> {
    pub(crate) fn from_node<N: Parse<I, T> + 'static>(node: N) -> Self {
        Parser {
            node: Arc::new(node),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Arc::from(name.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run against an existing state. This is what combinators call on their
    /// children; grammar authors usually want [`Parser::parse`].
    pub fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        self.node.run(state)
    }

    /// Parse a whole input with a fresh state.
    pub fn parse<'a>(&self, input: impl IntoState<'a, I>) -> Result<T, ParserException> {
        let mut state = input.into_state();
        self.parse_state(&mut state)
    }

    /// Like [`Parser::parse`] but on a caller-built state, which stays
    /// inspectable afterwards.
    pub fn parse_state(&self, state: &mut ParseState<'_, I>) -> Result<T, ParserException> {
        trace!(
            "parsing {} elements with {:?}",
            state.available(),
            self
        );
        match self.run(state) {
            Ok(value) => {
                trace!("parse succeeded at index {}", state.position());
                Ok(value)
            }
            Err(Halt::Failed) => {
                let exception = state.exception();
                debug!("parse failed: {}", exception.message);
                Err(exception)
            }
            Err(Halt::Escaped(symbol)) => {
                panic!("escape `{symbol}` was thrown outside of any matching catch")
            }
        }
    }

    /// Change the lookahead window of an alternation or `not`.
    ///
    /// Other parsers have no window and are returned unchanged.
    pub fn lookahead(self, lookahead: usize) -> Result<Self, GrammarError> {
        if lookahead == 0 {
            return Err(GrammarError::InvalidLookahead(lookahead));
        }
        Ok(match self.node.with_lookahead(lookahead) {
            Some(mut parser) => {
                parser.name = self.name;
                parser
            }
            None => self,
        })
    }
}

/// Anything a fresh [`ParseState`] can be built from.
pub trait IntoState<'a, I: Element> {
    fn into_state(self) -> ParseState<'a, I>;
}

impl<'a> IntoState<'a, char> for &'a str {
    fn into_state(self) -> ParseState<'a, char> {
        ParseState::from_text(self)
    }
}

impl<'a> IntoState<'a, char> for &'a String {
    fn into_state(self) -> ParseState<'a, char> {
        ParseState::from_text(self)
    }
}

impl<'a, I: Element> IntoState<'a, I> for &'a [I] {
    fn into_state(self) -> ParseState<'a, I> {
        ParseState::new(self)
    }
}

impl<'a, I: Element> IntoState<'a, I> for &'a Vec<I> {
    fn into_state(self) -> ParseState<'a, I> {
        ParseState::new(self)
    }
}

impl<'a, I: Element> IntoState<'a, I> for (&'a [I], &'a str) {
    fn into_state(self) -> ParseState<'a, I> {
        ParseState::with_source(self.0, self.1)
    }
}
