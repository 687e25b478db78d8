//! The repetition family.
//!
//! Every form runs `min` mandatory iterations, then keeps going until the
//! parser fails without consuming, `max` is reached, or an iteration
//! succeeds without consuming (which would otherwise loop forever).

use super::{Element, GrammarError, Halt, Parse, ParseResult, ParseState, Parser};

fn drive<I: Element, T: 'static>(
    parser: &Parser<I, T>,
    min: usize,
    max: Option<usize>,
    state: &mut ParseState<'_, I>,
    mut sink: impl FnMut(T),
) -> ParseResult<()> {
    for _ in 0..min {
        sink(parser.run(state)?);
    }
    let mut count = min;
    while max.is_none_or(|max| count < max) {
        let start = state.position();
        match parser.run(state) {
            Ok(value) => {
                sink(value);
                if state.position() == start {
                    break;
                }
                count += 1;
            }
            Err(Halt::Failed) if state.position() == start => break,
            Err(halt) => return Err(halt),
        }
    }
    Ok(())
}

struct Repeat<I: Element, T> {
    parser: Parser<I, T>,
    min: usize,
    max: Option<usize>,
}

impl<I: Element, T: 'static> Parse<I, Vec<T>> for Repeat<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Vec<T>> {
        let mut results = Vec::new();
        drive(&self.parser, self.min, self.max, state, |v| results.push(v))?;
        Ok(results)
    }
}

struct SkipRepeat<I: Element, T> {
    parser: Parser<I, T>,
    min: usize,
    max: Option<usize>,
}

impl<I: Element, T: 'static> Parse<I, ()> for SkipRepeat<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<()> {
        drive(&self.parser, self.min, self.max, state, drop)
    }
}

fn check_bounds(min: usize, max: usize) -> Result<(), GrammarError> {
    if min > max {
        return Err(GrammarError::InvalidRepetition { min, max });
    }
    Ok(())
}

impl<I: Element, T: 'static> Parser<I, T> {
    fn collect(self, min: usize, max: Option<usize>) -> Parser<I, Vec<T>> {
        Parser::from_node(Repeat {
            parser: self,
            min,
            max,
        })
    }

    fn discard(self, min: usize, max: Option<usize>) -> Parser<I, ()> {
        Parser::from_node(SkipRepeat {
            parser: self,
            min,
            max,
        })
    }

    /// Exactly `n` times.
    pub fn repeat(self, n: usize) -> Parser<I, Vec<T>> {
        self.collect(n, Some(n))
    }

    /// Between `min` and `max` times.
    pub fn repeat_range(self, min: usize, max: usize) -> Result<Parser<I, Vec<T>>, GrammarError> {
        check_bounds(min, max)?;
        Ok(self.collect(min, Some(max)))
    }

    /// At least `min` times.
    pub fn many(self, min: usize) -> Parser<I, Vec<T>> {
        self.collect(min, None)
    }

    /// At most `max` times.
    pub fn some(self, max: usize) -> Parser<I, Vec<T>> {
        self.collect(0, Some(max))
    }

    pub fn skip_repeat(self, n: usize) -> Parser<I, ()> {
        self.discard(n, Some(n))
    }

    pub fn skip_repeat_range(self, min: usize, max: usize) -> Result<Parser<I, ()>, GrammarError> {
        check_bounds(min, max)?;
        Ok(self.discard(min, Some(max)))
    }

    pub fn skip_many(self, min: usize) -> Parser<I, ()> {
        self.discard(min, None)
    }

    pub fn skip_some(self, max: usize) -> Parser<I, ()> {
        self.discard(0, Some(max))
    }
}
