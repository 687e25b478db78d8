use descent::parser::{
    Encountered, ParseState, ParserException, ch, eof, failure, string, string_nocase, zero,
};
use rstest::rstest;

#[test]
fn alternatives_at_the_deepest_index_are_listed_once() {
    let p = (ch('a') * ch('b')).atomize()
        | (ch('a') * ch('c')).atomize()
        | (ch('a') * ch('b')).atomize();
    let err = p.parse("ax").unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(
        err.message,
        "'b' expected or 'c' expected, 'x' at line 1, col 2."
    );
}

#[test]
fn deeper_failure_beats_shallow_alternatives() {
    let p = (ch('a') * ch('b') * ch('c')).atomize() | ch('x') | ch('y');
    let err = p.parse("abz").unwrap_err();
    assert_eq!(err.message, "'c' expected, 'z' at line 1, col 3.");
}

#[test]
fn location_spans_lines() {
    let p = string("let") * ch('\n') * string("in") * ch(' ') * string("x");
    let err = p.parse("let\nin y").unwrap_err();
    assert_eq!((err.line, err.column), (2, 4));
    assert_eq!(err.message, "\"x\" expected, 'y' at line 2, col 4.");
}

#[rstest]
#[case::plain(failure("bad input"), "bad input, 'q' at line 1, col 1.")]
#[case::sentence(failure("bad input."), "bad input.'q' at line 1, col 1.")]
#[case::silent(zero(), "'q' at line 1, col 1.")]
#[case::eof(eof().map(|_| 'e'), "EOF expected, 'q' at line 1, col 1.")]
fn rendering(#[case] p: descent::Parser<char, char>, #[case] message: &str) {
    assert_eq!(p.parse("q").unwrap_err().message, message);
}

#[test]
fn end_of_input_is_described_as_eof() {
    let err = string_nocase("select").parse("SEL").unwrap_err();
    assert_eq!(err.message, "'select' expected, 'S' at line 1, col 1.");

    let err = (ch('a') * ch('b')).parse("a").unwrap_err();
    assert_eq!(err.message, "'b' expected, EOF at line 1, col 2.");
}

#[test]
fn expect_relabels_a_rule() {
    let digit = ch('0') | ch('1');
    let p = digit.expect("binary digit");
    assert_eq!(
        p.parse("7").unwrap_err().message,
        "binary digit, '7' at line 1, col 1."
    );
}

#[test]
fn exception_is_a_std_error() {
    let err: ParserException = ch('a').parse("b").unwrap_err();
    let boxed: Box<dyn std::error::Error> = Box::new(err.clone());
    assert_eq!(boxed.to_string(), err.message);
}

#[test]
fn parse_state_keeps_the_latched_error() {
    let p = ch('a') * ch('b');
    let mut state = ParseState::from_text("ac");
    assert!(p.parse_state(&mut state).is_err());
    assert_eq!(state.position(), 1);
    assert_eq!(state.take_error(), None);

    let mut state = ParseState::from_text("ac");
    assert!(p.run(&mut state).is_err());
    let error = state.error().expect("failure is latched");
    assert_eq!(error.index(), 1);
    assert_eq!(error.encountered(), &Encountered::Char('c'));
    assert_eq!(error.reason(), "'b' expected");
}
