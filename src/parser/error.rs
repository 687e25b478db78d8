use std::fmt;

/// The two built-in failure flavours.
///
/// Both share one precedence tier; [`ErrorKind::precedence`] is the seam a
/// future kind would use to outrank the others at an equal index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A plain failure, e.g. from `failure(msg)`.
    Failure,
    /// An "expected X" failure, e.g. from `satisfies` or `expect`.
    Expected,
}

impl ErrorKind {
    pub const fn precedence(self) -> u8 {
        match self {
            ErrorKind::Failure | ErrorKind::Expected => 100,
        }
    }
}

/// What the parser was looking at when a failure was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Encountered {
    Eof,
    Char(char),
    Text(String),
}

impl fmt::Display for Encountered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encountered::Eof => f.write_str("EOF"),
            Encountered::Char(c) => write!(f, "'{c}'"),
            Encountered::Text(text) => f.write_str(text),
        }
    }
}

/// A single failure record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub index: usize,
    pub encountered: Encountered,
    pub message: String,
    pub kind: ErrorKind,
}

impl Failure {
    pub fn new(
        kind: ErrorKind,
        index: usize,
        encountered: Encountered,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index,
            encountered,
            message: message.into(),
            kind,
        }
    }
}

/// The latched error of a parse: one or more failures at the same depth.
///
/// Invariant: never empty, every record shares one index, and no two records
/// carry the same message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    alternatives: Vec<Failure>,
}

impl ParseError {
    pub fn new(failure: Failure) -> Self {
        Self {
            alternatives: vec![failure],
        }
    }

    pub fn index(&self) -> usize {
        self.alternatives[0].index
    }

    pub fn encountered(&self) -> &Encountered {
        &self.alternatives[0].encountered
    }

    pub fn alternatives(&self) -> &[Failure] {
        &self.alternatives
    }

    fn depth(&self) -> (usize, u8) {
        let precedence = self
            .alternatives
            .iter()
            .map(|f| f.kind.precedence())
            .max()
            .unwrap_or_default();
        (self.index(), precedence)
    }

    /// Merge two errors: the deeper one wins outright, equally deep ones
    /// pool their alternatives (first occurrence order, no duplicates).
    pub fn merge(self, other: ParseError) -> ParseError {
        match self.depth().cmp(&other.depth()) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => {
                let mut merged = self;
                for failure in other.alternatives {
                    if !merged
                        .alternatives
                        .iter()
                        .any(|f| f.message == failure.message)
                    {
                        merged.alternatives.push(failure);
                    }
                }
                merged
            }
        }
    }

    /// Merge where either side may be absent.
    pub fn combine(left: Option<ParseError>, right: Option<ParseError>) -> Option<ParseError> {
        match (left, right) {
            (Some(l), Some(r)) => Some(l.merge(r)),
            (l, None) => l,
            (None, r) => r,
        }
    }

    /// Rewrite every record's index, used when lifting a nested failure into
    /// the enclosing input's coordinates.
    pub(crate) fn relocate(mut self, map: impl Fn(usize) -> usize) -> ParseError {
        for failure in &mut self.alternatives {
            failure.index = map(failure.index);
        }
        self
    }

    /// The reason part of a rendered message: distinct messages joined by "or".
    pub fn reason(&self) -> String {
        self.alternatives
            .iter()
            .map(|f| f.message.as_str())
            .filter(|m| !m.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// "<reason>, <encountered>" with the comma dropped when the reason is
    /// empty or already ends in punctuation.
    pub fn describe(&self) -> String {
        let mut message = self.reason();
        let trimmed = message.trim_end();
        if !trimmed.is_empty() && !trimmed.ends_with('.') && !trimmed.ends_with(',') {
            message.push_str(", ");
        }
        message.push_str(&self.encountered().to_string());
        message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Raised by [`Parser::parse`](super::Parser::parse) when the root parser fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParserException {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Defects detected while a grammar is being built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid repetition bounds: min={min}, max={max}")]
    InvalidRepetition { min: usize, max: usize },

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("lookahead number {0} should be positive")]
    InvalidLookahead(usize),

    #[error("parser not found for keyword {0}")]
    UnknownKeyword(String),

    #[error("parser not found for operator {0}")]
    UnknownOperator(String),

    #[error("rule `{0}` is already bound")]
    AlreadyBound(String),
}
