use super::{Element, Halt, ParseError, Parse, ParseResult, ParseState, Parser};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pick {
    Longest,
    Shortest,
}

impl Pick {
    fn prefers(self, candidate: usize, best: usize) -> bool {
        match self {
            Pick::Longest => candidate > best,
            Pick::Shortest => candidate < best,
        }
    }
}

/// Runs every alternative from the same start and keeps the one whose end
/// index is the most (or least) advanced. Ties go to the earlier alternative.
struct Best<I: Element, T> {
    alternatives: Vec<Parser<I, T>>,
    pick: Pick,
}

impl<I: Element, T: 'static> Parse<I, T> for Best<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        let start = state.position();
        let mut best: Option<(usize, T)> = None;
        let mut error = None;
        for alternative in &self.alternatives {
            state.restore(start);
            match alternative.run(state) {
                Ok(value) => {
                    let end = state.position();
                    if best
                        .as_ref()
                        .is_none_or(|(best_end, _)| self.pick.prefers(end, *best_end))
                    {
                        best = Some((end, value));
                    }
                }
                Err(Halt::Failed) => error = ParseError::combine(error, state.take_error()),
                Err(escape) => return Err(escape),
            }
        }
        match best {
            Some((end, value)) => {
                state.restore(end);
                Ok(value)
            }
            None => {
                state.restore(error.as_ref().map_or(start, ParseError::index));
                state.set_error(error);
                Err(Halt::Failed)
            }
        }
    }
}

/// The alternative that consumes the most input.
pub fn longest<I: Element, T: 'static>(alternatives: Vec<Parser<I, T>>) -> Parser<I, T> {
    Parser::from_node(Best {
        alternatives,
        pick: Pick::Longest,
    })
}

/// The alternative that consumes the least input.
pub fn shortest<I: Element, T: 'static>(alternatives: Vec<Parser<I, T>>) -> Parser<I, T> {
    Parser::from_node(Best {
        alternatives,
        pick: Pick::Shortest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ch, string};

    fn candidates() -> Vec<Parser<char, usize>> {
        vec![
            string("a").map(|_| 1),
            string("abc").map(|_| 3),
            string("ab").map(|_| 2),
        ]
    }

    #[test]
    fn longest_and_shortest_match() {
        let mut state = ParseState::from_text("abcd");
        assert_eq!(longest(candidates()).run(&mut state), Ok(3));
        assert_eq!(state.position(), 3);
        assert_eq!(shortest(candidates()).parse("abcd").unwrap(), 1);
    }

    #[test]
    fn ties_go_to_the_first_alternative() {
        let p = longest(vec![ch('a').map(|_| "first"), ch('a').map(|_| "second")]);
        assert_eq!(p.parse("a").unwrap(), "first");
    }

    #[test]
    fn deep_failures_do_not_stop_the_search() {
        let p = longest(vec![
            ch('a').then(ch('b')).then(ch('c')).map(|_| 3),
            ch('a').map(|_| 1),
        ]);
        assert_eq!(p.parse("abx").unwrap(), 1);
    }

    #[test]
    fn total_failure_reports_furthest_error() {
        let p = longest(vec![ch('a').then(ch('b')), ch('x')]);
        let mut state = ParseState::from_text("ac");
        assert!(p.run(&mut state).is_err());
        assert_eq!(state.position(), 1);
        assert_eq!(state.error().unwrap().reason(), "'b' expected");
    }
}
