use std::ops::{Add, BitOr, Mul, Shr, Sub};

use super::primitives::value_with;
use super::{DEFAULT_LOOKAHEAD, Element, Halt, ParseError, Parse, ParseResult, ParseState, Parser};

// === Sequencing ===

struct Map<I: Element, T, F> {
    parser: Parser<I, T>,
    f: F,
}

impl<I: Element, T: 'static, U, F: Fn(T) -> U + Send + Sync> Parse<I, U> for Map<I, T, F> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<U> {
        let value = self.parser.run(state)?;
        Ok((self.f)(value))
    }
}

struct Bind<I: Element, T, F> {
    parser: Parser<I, T>,
    f: F,
}

impl<I, T, U, F> Parse<I, U> for Bind<I, T, F>
where
    I: Element,
    T: 'static,
    U: 'static,
    F: Fn(T) -> Parser<I, U> + Send + Sync,
{
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<U> {
        let value = self.parser.run(state)?;
        (self.f)(value).run(state)
    }
}

struct Pair<I: Element, A, B> {
    left: Parser<I, A>,
    right: Parser<I, B>,
}

impl<I: Element, A: 'static, B: 'static> Parse<I, (A, B)> for Pair<I, A, B> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<(A, B)> {
        let a = self.left.run(state)?;
        let b = self.right.run(state)?;
        Ok((a, b))
    }
}

struct Sequence<I: Element, T> {
    parsers: Vec<Parser<I, T>>,
}

impl<I: Element, T: 'static> Parse<I, Vec<T>> for Sequence<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Vec<T>> {
        let mut results = Vec::with_capacity(self.parsers.len());
        for parser in &self.parsers {
            results.push(parser.run(state)?);
        }
        Ok(results)
    }
}

/// Runs every parser in order and collects their results.
///
/// There is no backtracking: a failing step leaves the index wherever that
/// step left it.
pub fn sequence<I: Element, T: 'static>(parsers: Vec<Parser<I, T>>) -> Parser<I, Vec<T>> {
    Parser::from_node(Sequence { parsers })
}

/// [`sequence`] followed by `combine` on the collected results.
pub fn sequence_with<I: Element, T: 'static, U: 'static>(
    parsers: Vec<Parser<I, T>>,
    combine: impl Fn(Vec<T>) -> U + Send + Sync + 'static,
) -> Parser<I, U> {
    sequence(parsers).map(combine)
}

// === Alternation ===

struct Alternation<I: Element, T> {
    alternatives: Vec<Parser<I, T>>,
    lookahead: usize,
}

impl<I: Element, T: 'static> Parse<I, T> for Alternation<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        let start = state.position();
        let mut error = state.take_error();
        for alternative in &self.alternatives {
            state.restore(start);
            match alternative.run(state) {
                Ok(value) => return Ok(value),
                Err(Halt::Failed) => {
                    // Progressed past the window: commit to this failure.
                    if !state.within(start, self.lookahead) {
                        return Err(Halt::Failed);
                    }
                    error = ParseError::combine(error, state.take_error());
                }
                Err(escape) => return Err(escape),
            }
        }
        state.set_error(error);
        Err(Halt::Failed)
    }

    fn with_lookahead(&self, lookahead: usize) -> Option<Parser<I, T>> {
        Some(Parser::from_node(Alternation {
            alternatives: self.alternatives.clone(),
            lookahead,
        }))
    }

    fn alternatives(&self) -> Option<(Vec<Parser<I, T>>, usize)> {
        Some((self.alternatives.clone(), self.lookahead))
    }
}

/// Tries each alternative from the same start, left to right.
pub fn alt<I: Element, T: 'static>(alternatives: Vec<Parser<I, T>>) -> Parser<I, T> {
    Parser::from_node(Alternation {
        alternatives,
        lookahead: DEFAULT_LOOKAHEAD,
    })
}

// === Backtracking control ===

struct Atom<I: Element, T> {
    parser: Parser<I, T>,
}

impl<I: Element, T: 'static> Parse<I, T> for Atom<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        let start = state.position();
        let result = self.parser.run(state);
        if matches!(result, Err(Halt::Failed)) {
            state.restore(start);
        }
        result
    }
}

struct Peek<I: Element, T> {
    parser: Parser<I, T>,
}

impl<I: Element, T: 'static> Parse<I, T> for Peek<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        let start = state.position();
        let result = self.parser.run(state);
        if !matches!(result, Err(Halt::Escaped(_))) {
            state.restore(start);
        }
        result
    }
}

struct Not<I: Element, T> {
    parser: Parser<I, T>,
    message: String,
    lookahead: usize,
}

impl<I: Element, T: 'static> Parse<I, ()> for Not<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<()> {
        let start = state.position();
        match self.parser.run(state) {
            Ok(_) => {
                state.restore(start);
                state.expecting(self.message.clone())
            }
            Err(Halt::Failed) if state.within(start, self.lookahead) => {
                state.restore(start);
                Ok(())
            }
            Err(halt) => Err(halt),
        }
    }

    fn with_lookahead(&self, lookahead: usize) -> Option<Parser<I, ()>> {
        Some(Parser::from_node(Not {
            parser: self.parser.clone(),
            message: self.message.clone(),
            lookahead,
        }))
    }
}

struct Expect<I: Element, T> {
    parser: Parser<I, T>,
    message: String,
}

impl<I: Element, T: 'static> Parse<I, T> for Expect<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        let start = state.position();
        match self.parser.run(state) {
            Err(Halt::Failed) if state.position() == start => state.expecting(self.message.clone()),
            result => result,
        }
    }
}

// === Combinators as methods ===

impl<I: Element, T: 'static> Parser<I, T> {
    /// Transform the result.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Parser<I, U> {
        Parser::from_node(Map { parser: self, f })
    }

    /// Feed the result into `f` and run the parser it returns.
    pub fn bind<U: 'static>(
        self,
        f: impl Fn(T) -> Parser<I, U> + Send + Sync + 'static,
    ) -> Parser<I, U> {
        Parser::from_node(Bind { parser: self, f })
    }

    /// Sequence: parse self then other, return both results.
    pub fn seq<U: 'static>(self, other: Parser<I, U>) -> Parser<I, (T, U)> {
        Parser::from_node(Pair {
            left: self,
            right: other,
        })
    }

    /// Keep right: parse self then other, discard self's result.
    pub fn then<U: 'static>(self, other: Parser<I, U>) -> Parser<I, U> {
        self.seq(other).map(|(_, b)| b)
    }

    /// Keep left: parse self then other, discard other's result.
    pub fn skip<U: 'static>(self, other: Parser<I, U>) -> Parser<I, T> {
        self.seq(other).map(|(a, _)| a)
    }

    /// Alias of [`Parser::skip`].
    pub fn followed<U: 'static>(self, other: Parser<I, U>) -> Parser<I, T> {
        self.skip(other)
    }

    /// Choice: try self, then other if self failed inside the lookahead window.
    pub fn or(self, other: Parser<I, T>) -> Parser<I, T> {
        let Some((mut alternatives, lookahead)) = self.node.alternatives() else {
            return alt(vec![self, other]);
        };
        alternatives.push(other);
        let mut parser = Parser::from_node(Alternation {
            alternatives,
            lookahead,
        });
        parser.name = self.name;
        parser
    }

    /// `Some(result)`, or `None` when self fails without consuming.
    pub fn optional(self) -> Parser<I, Option<T>> {
        self.map(Some).or(value_with(|| None))
    }

    /// On failure, rewind to where this parser started however far it got.
    pub fn atomize(self) -> Parser<I, T> {
        let name = self.name.clone();
        let mut parser = Parser::from_node(Atom { parser: self });
        parser.name = name;
        parser
    }

    /// Run without consuming anything, whatever the outcome.
    pub fn peek(self) -> Parser<I, T> {
        let name = self.name.clone();
        let mut parser = Parser::from_node(Peek { parser: self });
        parser.name = name;
        parser
    }

    /// Succeeds without consuming iff self fails inside the lookahead window.
    pub fn not(self, message: impl Into<String>) -> Parser<I, ()> {
        let name = self.name.as_deref().map(|n| format!("~{n}"));
        let parser = Parser::from_node(Not {
            parser: self,
            message: message.into(),
            lookahead: DEFAULT_LOOKAHEAD,
        });
        match name {
            Some(name) => parser.named(name),
            None => parser,
        }
    }

    /// Replace the error with `message` when self fails without consuming.
    pub fn expect(self, message: impl Into<String>) -> Parser<I, T> {
        let message = message.into();
        Parser::from_node(Expect {
            parser: self,
            message: message.clone(),
        })
        .named(message)
    }

    /// One or more of self separated by `delim`.
    pub fn separated1<D: 'static>(self, delim: Parser<I, D>) -> Parser<I, Vec<T>> {
        let rest = delim.then(self.clone()).many(0);
        self.seq(rest).map(|(first, rest)| {
            let mut items = Vec::with_capacity(rest.len() + 1);
            items.push(first);
            items.extend(rest);
            items
        })
    }

    /// Zero or more of self separated by `delim`.
    pub fn separated<D: 'static>(self, delim: Parser<I, D>) -> Parser<I, Vec<T>> {
        self.separated1(delim).or(value_with(Vec::new))
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<I: Element, T: 'static, U: 'static> Add<Parser<I, U>> for Parser<I, T> {
    type Output = Parser<I, (T, U)>;

    fn add(self, rhs: Parser<I, U>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<I: Element, T: 'static, U: 'static> Sub<Parser<I, U>> for Parser<I, T> {
    type Output = Parser<I, T>;

    fn sub(self, rhs: Parser<I, U>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<I: Element, T: 'static, U: 'static> Mul<Parser<I, U>> for Parser<I, T> {
    type Output = Parser<I, U>;

    fn mul(self, rhs: Parser<I, U>) -> Self::Output {
        self.then(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<I: Element, T: 'static> BitOr<Parser<I, T>> for Parser<I, T> {
    type Output = Parser<I, T>;

    fn bitor(self, rhs: Parser<I, T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<I, T, U, F> Shr<F> for Parser<I, T>
where
    I: Element,
    T: 'static,
    U: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    type Output = Parser<I, U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}
