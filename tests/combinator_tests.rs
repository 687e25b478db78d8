use descent::parser::{
    ParseState, Parser, Rule, alt, ch, eof, failure, integer, lazy, longest, sequence, shortest,
    string, value, word,
};

fn letters(n: usize) -> Parser<char, usize> {
    string(&"a".repeat(n)).map(move |_| n)
}

#[test]
fn left_bias() {
    let p = value::<char, _>(1) | value(2);
    assert_eq!(p.parse("").unwrap(), 1);
    assert_eq!(p.parse("xyz").unwrap(), 1);
}

#[test]
fn alternation_commits_after_two_consumed_elements() {
    let a = ch('a') * ch('b') * ch('c');
    let b = string("abx").map(|_| 'x');
    let p = a | b;

    let mut state = ParseState::from_text("abx");
    assert!(p.run(&mut state).is_err());
    assert_eq!(state.position(), 2);
}

#[test]
fn alternation_commits_once_a_branch_consumed() {
    let p = (ch('a') * ch('b')) | ch('a') * ch('c');
    assert!(p.parse("ac").is_err());

    let p = (ch('a') * ch('b')).atomize() | ch('a') * ch('c');
    assert_eq!(p.parse("ac").unwrap(), 'c');

    let p = ((ch('a') * ch('b')) | ch('a') * ch('c')).lookahead(2).unwrap();
    assert_eq!(p.parse("ac").unwrap(), 'c');
}

#[test]
fn atomize_restores_the_index() {
    let p = sequence(vec![ch('x'), ch('y'), ch('z')]).atomize();
    let mut state = ParseState::from_text("xyq");
    assert!(p.run(&mut state).is_err());
    assert_eq!(state.position(), 0);
}

#[test]
fn many_stops_after_one_zero_width_iteration() {
    let p = ch('a').optional().many(0);
    assert_eq!(p.parse("b").unwrap(), vec![None]);
    assert_eq!(p.parse("aab").unwrap(), vec![Some('a'), Some('a'), None]);
}

#[test]
fn longest_and_shortest_pick_by_consumption() {
    let alternatives = vec![letters(1), letters(3), letters(2)];

    let mut state = ParseState::from_text("aaaa");
    assert_eq!(longest(alternatives.clone()).run(&mut state), Ok(3));
    assert_eq!(state.position(), 3);

    let mut state = ParseState::from_text("aaaa");
    assert_eq!(shortest(alternatives).run(&mut state), Ok(1));
    assert_eq!(state.position(), 1);
}

#[test]
fn delimited_list_tolerates_trailing_separator() {
    let p = word().delimited(ch(','));
    let mut state = ParseState::from_text("a,b,");
    assert_eq!(
        p.run(&mut state),
        Ok(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(state.position(), 3);

    let strict = word().separated(ch(',')).skip(eof());
    assert!(strict.parse("a,b,").is_err());
}

#[test]
fn escape_does_not_leak_between_parses() {
    let p = word().delimited1(ch(','));
    assert_eq!(p.parse("x,").unwrap(), vec!["x".to_string()]);
    assert_eq!(p.parse("x,y").unwrap().len(), 2);
    assert!(p.parse(",").is_err());
}

fn balanced() -> Parser<char, usize> {
    let nested = (ch('(') * lazy(balanced) - ch(')')).map(|depth| depth + 1);
    nested.many(0).map(|depths| depths.into_iter().max().unwrap_or(0))
}

#[test]
fn lazy_parsers_recurse() {
    let p = balanced().skip(eof());
    assert_eq!(p.parse("(()(()))()").unwrap(), 3);
    assert_eq!(p.parse("").unwrap(), 0);
    assert!(p.parse("(()").is_err());
}

#[test]
fn rules_allow_mutual_recursion() {
    // even := 'a' odd | ε ; odd := 'a' even
    let even: Rule<char, usize> = Rule::new("even");
    let odd: Rule<char, usize> = Rule::new("odd");
    even.define((ch('a') * odd.parser()).map(|n| n + 1) | value(0))
        .unwrap();
    odd.define((ch('a') * even.parser()).map(|n| n + 1))
        .unwrap();

    let p = even.parser().skip(eof());
    assert_eq!(p.parse("aaaa").unwrap(), 4);
    assert!(p.parse("aaa").is_err());
}

#[test]
fn bind_chooses_the_next_parser_from_a_result() {
    // a length-prefixed run of characters
    let p = integer().skip(ch(':')).bind(|n| {
        let n: usize = n.parse().unwrap_or(0);
        ch('x').repeat(n)
    });
    assert_eq!(p.parse("3:xxx").unwrap().len(), 3);
    assert!(p.parse("3:xx").is_err());
}

#[test]
fn grammar_is_reusable_across_threads() {
    let p = word().separated1(ch(' '));
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let p = p.clone();
            scope.spawn(move || {
                assert_eq!(p.parse("one two three").unwrap().len(), 3);
            });
        }
    });
}

#[test]
fn empty_alternation_reports_a_syntax_error() {
    let p: Parser<char, char> = alt(vec![]);
    assert_eq!(
        p.parse("a").unwrap_err().message,
        "syntax error, 'a' at line 1, col 1."
    );
}

#[test]
fn failure_keeps_its_message() {
    let p = ch('a') * failure::<char, char>("no more input wanted");
    assert_eq!(
        p.parse("ab").unwrap_err().message,
        "no more input wanted, 'b' at line 1, col 2."
    );
}
