//! # Descent - Parser Combinators with Bounded Backtracking
//!
//! Descent builds parsers by composing small parser values. A grammar is
//! described once, as an immutable graph of [`Parser`]s, and can then be run
//! any number of times (also from several threads) against characters or
//! tokens.
//!
//! ## Architecture Overview
//!
//! 1. **Engine** (`parser`) - The parse state, the error model and the
//!    combinator catalogue
//! 2. **Lexer** (`lexer`) - Tokens, keyword tables and operator tables for
//!    two-stage grammars
//! 3. **Expressions** (`expression`) - Compiles a term parser plus an operator
//!    precedence table into an expression parser
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (&str)
//!     ↓
//! [Lexer: Parser<char, Vec<Token>>] → Token Stream
//!     ↓  (Parser::nested)
//! [Grammar: Parser<Token, T>] → Value
//! ```
//!
//! A single-stage grammar directly over `char` works just as well.
//!
//! ## Key Design Decisions
//!
//! ### Limited Backtracking
//! Sequences never backtrack. An alternation restores the input before each
//! alternative, but gives up on the remaining alternatives once a failing one
//! consumed [`DEFAULT_LOOKAHEAD`](parser::DEFAULT_LOOKAHEAD) or more elements.
//! `atomize` opts a parser back into full backtracking and `lookahead(n)`
//! widens the window.
//!
//! ### Deepest Error Wins
//! Failures are latched in the parse state and merged: the failure that got
//! furthest is reported, together with every other failure at that same
//! position.
//!
//! ```
//! use descent::parser::{ch, string};
//!
//! let greeting = string("hello") | string("hi") | ch('!').map(|c| c.to_string());
//! let err = greeting.parse("hey").unwrap_err();
//! assert_eq!(
//!     err.message,
//!     "\"hello\" expected or \"hi\" expected or '!' expected, 'h' at line 1, col 1."
//! );
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - Parse state, errors and combinators
//! - [`lexer`] - Tokens and lexer-table builders
//! - [`expression`] - Operator-precedence expression builder
//! - [`location`] - Line and column lookup for error messages

pub mod expression;
pub mod lexer;
pub mod location;
pub mod parser;

pub use expression::{Associativity, OperatorTable};
pub use lexer::{Keywords, Operators, Token};
pub use parser::{GrammarError, ParseState, Parser, ParserException};
