//! Deferred parsers for recursive grammars.

use std::fmt;
use std::sync::{Arc, OnceLock};

use log::debug;

use super::{Element, GrammarError, Parse, ParseResult, ParseState, Parser};

struct Lazy<I: Element, T, F> {
    supplier: F,
    resolved: OnceLock<Parser<I, T>>,
}

impl<I, T, F> Parse<I, T> for Lazy<I, T, F>
where
    I: Element,
    T: 'static,
    F: Fn() -> Parser<I, T> + Send + Sync,
{
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        self.resolved.get_or_init(&self.supplier).run(state)
    }
}

/// A parser built by `supplier` the first time it runs.
///
/// ```
/// use descent::parser::{Parser, ch, lazy};
///
/// fn nested() -> Parser<char, usize> {
///     (ch('(') * lazy(nested) - ch(')')).map(|depth| depth + 1) | ch('x').map(|_| 0)
/// }
///
/// assert_eq!(nested().parse("((x))").unwrap(), 2);
/// ```
pub fn lazy<I: Element, T: 'static>(
    supplier: impl Fn() -> Parser<I, T> + Send + Sync + 'static,
) -> Parser<I, T> {
    Parser::from_node(Lazy {
        supplier,
        resolved: OnceLock::new(),
    })
}

struct RuleRef<I: Element, T> {
    name: Arc<str>,
    cell: Arc<OnceLock<Parser<I, T>>>,
}

impl<I: Element, T: 'static> Parse<I, T> for RuleRef<I, T> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        match self.cell.get() {
            Some(parser) => parser.run(state),
            None => panic!("rule `{}` was run before it was defined", self.name),
        }
    }
}

/// A named placeholder that can be referenced before it is defined.
///
/// Build the recursive structure with [`Rule::parser`], then bind it once
/// with [`Rule::define`]. Running a reference to an unbound rule panics.
pub struct Rule<I: Element, T> {
    name: Arc<str>,
    cell: Arc<OnceLock<Parser<I, T>>>,
}

impl<I: Element, T: 'static> Rule<I, T> {
    pub fn new(name: impl Into<String>) -> Self {
        Rule {
            name: Arc::from(name.into()),
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// A parser that delegates to whatever this rule is bound to.
    pub fn parser(&self) -> Parser<I, T> {
        Parser::from_node(RuleRef {
            name: Arc::clone(&self.name),
            cell: Arc::clone(&self.cell),
        })
        .named(self.name.to_string())
    }

    pub fn define(&self, parser: Parser<I, T>) -> Result<(), GrammarError> {
        self.cell
            .set(parser)
            .map_err(|_| GrammarError::AlreadyBound(self.name.to_string()))?;
        debug!("rule `{}` defined", self.name);
        Ok(())
    }

    pub fn is_defined(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<I: Element, T> fmt::Debug for Rule<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("defined", &self.cell.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ch, value};

    #[test]
    fn rule_supports_recursion() {
        let list: Rule<char, usize> = Rule::new("list");
        let body = (ch('a') * list.parser()).map(|n| n + 1) | value(0);
        list.define(body).unwrap();
        assert!(list.is_defined());
        assert_eq!(list.parser().parse("aaa").unwrap(), 3);
    }

    #[test]
    fn rule_binds_once() {
        let rule: Rule<char, char> = Rule::new("once");
        rule.define(ch('a')).unwrap();
        assert_eq!(
            rule.define(ch('b')),
            Err(GrammarError::AlreadyBound("once".into()))
        );
        assert_eq!(rule.parser().parse("a").unwrap(), 'a');
    }

    #[test]
    #[should_panic(expected = "before it was defined")]
    fn unbound_rule_panics() {
        let rule: Rule<char, char> = Rule::new("missing");
        let _ = rule.parser().parse("a");
    }
}
