//! Leaf parsers: values, failures and element matchers.

use regex::Regex;

use super::{Element, GrammarError, Parse, ParseResult, ParseState, Parser};

struct Value<T> {
    make: Box<dyn Fn() -> T + Send + Sync>,
}

impl<I: Element, T> Parse<I, T> for Value<T> {
    fn run(&self, _state: &mut ParseState<'_, I>) -> ParseResult<T> {
        Ok((self.make)())
    }
}

/// Always succeeds with `v`, consuming nothing.
pub fn value<I: Element, T: Clone + Send + Sync + 'static>(v: T) -> Parser<I, T> {
    value_with(move || v.clone())
}

pub(crate) fn value_with<I: Element, T: 'static>(
    make: impl Fn() -> T + Send + Sync + 'static,
) -> Parser<I, T> {
    Parser::from_node(Value {
        make: Box::new(make),
    })
}

/// Always succeeds with `()`.
pub fn one<I: Element>() -> Parser<I, ()> {
    value(())
}

struct Fail {
    message: String,
}

impl<I: Element, T> Parse<I, T> for Fail {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<T> {
        state.fail(self.message.clone())
    }
}

/// Always fails with `message` at the current index.
pub fn failure<I: Element, T: 'static>(message: impl Into<String>) -> Parser<I, T> {
    Parser::from_node(Fail {
        message: message.into(),
    })
}

/// Always fails, without a message of its own.
pub fn zero<I: Element, T: 'static>() -> Parser<I, T> {
    failure("")
}

struct Satisfies<F> {
    predicate: F,
    expected: String,
}

impl<I: Element, F: Fn(&I) -> bool + Send + Sync> Parse<I, I> for Satisfies<F> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<I> {
        match state.peek() {
            Some(element) if (self.predicate)(element) => {
                let element = element.clone();
                state.advance_by(1);
                Ok(element)
            }
            _ => state.expecting(self.expected.clone()),
        }
    }
}

/// Consumes one element if `predicate` holds for it.
pub fn satisfies<I: Element>(
    predicate: impl Fn(&I) -> bool + Send + Sync + 'static,
    expected: impl Into<String>,
) -> Parser<I, I> {
    Parser::from_node(Satisfies {
        predicate,
        expected: expected.into(),
    })
}

/// Any single element.
pub fn any<I: Element>() -> Parser<I, I> {
    satisfies(|_| true, "any element expected")
}

pub fn is<I: Element>(v: I, expected: impl Into<String>) -> Parser<I, I> {
    satisfies(move |e| *e == v, expected)
}

pub fn isnt<I: Element>(v: I, expected: impl Into<String>) -> Parser<I, I> {
    satisfies(move |e| *e != v, expected)
}

pub fn among<I: Element>(values: Vec<I>, expected: impl Into<String>) -> Parser<I, I> {
    satisfies(move |e| values.contains(e), expected)
}

pub fn not_among<I: Element>(values: Vec<I>, expected: impl Into<String>) -> Parser<I, I> {
    satisfies(move |e| !values.contains(e), expected)
}

pub fn ch(c: char) -> Parser<char, char> {
    is(c, format!("'{c}' expected")).named(c.to_string())
}

pub fn not_ch(c: char) -> Parser<char, char> {
    isnt(c, format!("'{c}' unexpected")).named(format!("~{c}"))
}

/// A character in `from..=to`.
pub fn range(from: char, to: char) -> Parser<char, char> {
    satisfies(move |c| (from..=to).contains(c), format!("{from}..{to} expected"))
}

fn is_blank(c: &char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// A space, tab, carriage return or newline.
pub fn whitespace() -> Parser<char, char> {
    satisfies(is_blank, "whitespace expected")
}

/// One or more whitespace characters.
pub fn whitespaces() -> Parser<char, ()> {
    satisfies(is_blank, "whitespace(s) expected").skip_many(1)
}

struct Eof {
    expected: String,
}

impl<I: Element> Parse<I, ()> for Eof {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<()> {
        if state.is_eof() {
            Ok(())
        } else {
            state.expecting(self.expected.clone())
        }
    }
}

pub fn eof<I: Element>() -> Parser<I, ()> {
    eof_with("EOF expected")
}

pub fn eof_with<I: Element>(expected: impl Into<String>) -> Parser<I, ()> {
    Parser::from_node(Eof {
        expected: expected.into(),
    })
    .named("EOF")
}

struct Are<I> {
    items: Vec<I>,
    expected: String,
}

impl<I: Element> Parse<I, Vec<I>> for Are<I> {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<Vec<I>> {
        if self.items.len() > state.available() {
            return state.expecting(self.expected.clone());
        }
        let matches = self
            .items
            .iter()
            .enumerate()
            .all(|(offset, item)| state.peek_at(offset) == Some(item));
        if !matches {
            return state.expecting(self.expected.clone());
        }
        state.advance_by(self.items.len());
        Ok(self.items.clone())
    }
}

/// The exact run of elements `items`.
pub fn are<I: Element>(items: Vec<I>, expected: impl Into<String>) -> Parser<I, Vec<I>> {
    Parser::from_node(Are {
        items,
        expected: expected.into(),
    })
}

/// Any single element, unless `items` starts here.
pub fn arent<I: Element>(items: Vec<I>, expected: impl Into<String>) -> Parser<I, I> {
    are(items, "").not(expected).then(any())
}

struct Literal {
    text: String,
    chars: Vec<char>,
    case_sensitive: bool,
    expected: String,
}

impl Parse<char, String> for Literal {
    fn run(&self, state: &mut ParseState<'_, char>) -> ParseResult<String> {
        if self.chars.len() > state.available() {
            return state.expecting(self.expected.clone());
        }
        let matches = self.chars.iter().enumerate().all(|(offset, c)| {
            state.peek_at(offset).is_some_and(|found| {
                if self.case_sensitive {
                    found == c
                } else {
                    found.eq_ignore_ascii_case(c)
                }
            })
        });
        if !matches {
            return state.expecting(self.expected.clone());
        }
        let start = state.position();
        state.advance_by(self.chars.len());
        if self.case_sensitive {
            Ok(self.text.clone())
        } else {
            Ok(state.slice(start, state.position()).iter().collect())
        }
    }
}

fn literal(text: &str, case_sensitive: bool, expected: String) -> Parser<char, String> {
    Parser::from_node(Literal {
        text: text.to_owned(),
        chars: text.chars().collect(),
        case_sensitive,
        expected,
    })
    .named(text)
}

pub fn string(text: &str) -> Parser<char, String> {
    literal(text, true, format!("\"{text}\" expected"))
}

/// Matches `text` ignoring ASCII case; yields the text as written in the
/// input.
pub fn string_nocase(text: &str) -> Parser<char, String> {
    literal(text, false, format!("'{text}' expected"))
}

/// Any single character, unless `text` starts here.
pub fn not_string(text: &str) -> Parser<char, char> {
    string(text)
        .not(format!("\"{text}\" unexpected"))
        .then(any())
}

struct Scan {
    pattern: Regex,
    expected: String,
}

impl Parse<char, String> for Scan {
    fn run(&self, state: &mut ParseState<'_, char>) -> ParseResult<String> {
        match state.scan(&self.pattern) {
            Some(matched) => Ok(matched),
            None => state.expecting(self.expected.clone()),
        }
    }
}

/// Text matching `pattern` at the cursor.
pub fn regex(pattern: &str, expected: impl Into<String>) -> Result<Parser<char, String>, GrammarError> {
    let anchored = Regex::new(&format!(r"\A(?:{pattern})"))
        .map_err(|err| GrammarError::InvalidPattern(err.to_string()))?;
    let expected = expected.into();
    Ok(Parser::from_node(Scan {
        pattern: anchored,
        expected: expected.clone(),
    })
    .named(expected))
}

fn is_word_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || *c == '_'
}

/// `[a-zA-Z_]\w*`
pub fn word() -> Parser<char, String> {
    let expected = "word expected";
    let head = satisfies(|c: &char| c.is_ascii_alphabetic() || *c == '_', expected);
    head.then(satisfies(is_word_char, expected).skip_many(0))
        .fragment()
        .named("word")
}

/// A run of digits not followed by a word character. Fails where it
/// started, whatever it looked at.
pub fn integer() -> Parser<char, String> {
    let expected = "integer expected";
    let digits = satisfies(|c: &char| c.is_ascii_digit(), expected).skip_many(1);
    digits
        .skip(satisfies(is_word_char, "").not(expected))
        .fragment()
        .atomize()
        .expect(expected)
        .named("integer")
}

/// Digits with an optional fraction.
pub fn number() -> Parser<char, String> {
    let expected = "number expected";
    let digits = || satisfies(|c: &char| c.is_ascii_digit(), expected).skip_many(1);
    let fraction = ch('.').then(digits()).atomize();
    digits()
        .then(fraction.optional())
        .fragment()
        .named("number")
}

/// `start` up to and including the end of the line.
pub fn comment_line(start: &str) -> Parser<char, ()> {
    string(start)
        .then(not_ch('\n').skip_many(0))
        .then(ch('\n').optional())
        .map(|_| ())
}

/// `open`, anything, then `close`.
pub fn comment_block(open: &str, close: &str) -> Parser<char, ()> {
    string(open)
        .then(not_string(close).skip_many(0))
        .then(string(close))
        .map(|_| ())
}

struct GetIndex;

impl<I: Element> Parse<I, usize> for GetIndex {
    fn run(&self, state: &mut ParseState<'_, I>) -> ParseResult<usize> {
        Ok(state.position())
    }
}

/// The current index, consuming nothing.
pub fn index<I: Element>() -> Parser<I, usize> {
    Parser::from_node(GetIndex).named("index")
}
