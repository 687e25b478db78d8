use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::{Token, token};
use crate::parser::{GrammarError, Parser, word};

/// Reserved words of a language.
///
/// The table owns a character-level [lexer](Keywords::lexer) that runs the
/// identifier lexer and re-labels reserved words with their own token kind,
/// plus one token-level [parser](Keywords::parser) per word.
#[derive(Debug, Clone)]
pub struct Keywords {
    case_sensitive: bool,
    kinds: Arc<HashMap<String, String>>,
    lexer: Parser<char, Token>,
}

impl Keywords {
    pub fn case_sensitive<S: AsRef<str>>(words: &[S]) -> Self {
        Self::with_lexer(words, true, word().token("word"), "keyword")
    }

    /// Words match in any letter case; tokens keep the text as written.
    pub fn case_insensitive<S: AsRef<str>>(words: &[S]) -> Self {
        Self::with_lexer(words, false, word().token("word"), "keyword")
    }

    /// A table over a custom identifier lexer. Reserved words get the kind
    /// `"{prefix}:{word}"`.
    pub fn with_lexer<S: AsRef<str>>(
        words: &[S],
        case_sensitive: bool,
        default_lexer: Parser<char, Token>,
        prefix: &str,
    ) -> Self {
        let kinds: HashMap<String, String> = words
            .iter()
            .map(|w| {
                let w = canonical(w.as_ref(), case_sensitive);
                let kind = format!("{prefix}:{w}");
                (w, kind)
            })
            .collect();
        debug!(
            "keyword table with {} words (case sensitive: {case_sensitive})",
            kinds.len()
        );
        let kinds = Arc::new(kinds);

        let table = Arc::clone(&kinds);
        let lexer = default_lexer.map(move |tok| {
            match table.get(&canonical(&tok.text, case_sensitive)) {
                Some(kind) => Token::new(kind.as_str(), tok.text, tok.index),
                None => tok,
            }
        });

        Keywords {
            case_sensitive,
            kinds,
            lexer,
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Identifiers and keywords, as tokens.
    pub fn lexer(&self) -> Parser<char, Token> {
        self.lexer.clone()
    }

    /// The token kind assigned to `word`, if it is reserved.
    pub fn kind_of(&self, word: &str) -> Option<&str> {
        self.kinds
            .get(&canonical(word, self.case_sensitive))
            .map(String::as_str)
    }

    /// A token-level parser for the reserved `word`.
    pub fn parser(&self, word: &str) -> Result<Parser<Token, Token>, GrammarError> {
        self.kind_of(word)
            .map(|kind| token(kind).named(word))
            .ok_or_else(|| GrammarError::UnknownKeyword(word.to_owned()))
    }
}

fn canonical(word: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        word.to_owned()
    } else {
        word.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{eof, whitespace};
    use rstest::rstest;

    fn lex(keywords: &Keywords, input: &str) -> Vec<Token> {
        keywords
            .lexer()
            .lexeme(whitespace())
            .skip(eof())
            .parse(input)
            .unwrap()
    }

    #[rstest]
    #[case(true, "select", Some("keyword:select"))]
    #[case(true, "SELECT", None)]
    #[case(false, "SELECT", Some("keyword:select"))]
    #[case(false, "selected", None)]
    fn classification(#[case] sensitive: bool, #[case] word: &str, #[case] kind: Option<&str>) {
        let words = ["select", "from"];
        let keywords = if sensitive {
            Keywords::case_sensitive(&words)
        } else {
            Keywords::case_insensitive(&words)
        };
        assert_eq!(keywords.kind_of(word), kind);
        let tokens = lex(&keywords, word);
        assert_eq!(tokens[0].kind, kind.unwrap_or("word"));
        assert_eq!(tokens[0].text, word);
    }

    #[test]
    fn keyword_parser_matches_reserved_tokens() {
        let keywords = Keywords::case_insensitive(&["from"]);
        let tokens = lex(&keywords, "FROM t");
        let p = keywords.parser("from").unwrap() * super::token("word");
        assert_eq!(p.parse(&tokens).unwrap().text, "t");
    }

    #[test]
    fn unknown_keyword_is_a_grammar_error() {
        let keywords = Keywords::case_sensitive(&["if"]);
        assert_eq!(
            keywords.parser("else").unwrap_err(),
            GrammarError::UnknownKeyword("else".into())
        );
    }

    #[test]
    fn custom_prefix() {
        let keywords = Keywords::with_lexer(&["let"], true, word().token("id"), "kw");
        assert_eq!(keywords.kind_of("let"), Some("kw:let"));
        assert_eq!(lex(&keywords, "x")[0].kind, "id");
    }
}
