//! Error types for argus

/// Characters of query text kept on each side of a parse error location.
const CONTEXT_LEN: usize = 23;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid posting list: {0}")]
    Posting(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong while parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("empty query")]
    EmptyQuery,

    #[error("operator has no operands")]
    EmptyOperator,

    #[error("expected an operator keyword after '('")]
    ExpectedOperator,

    #[error("unknown operator {0:?}")]
    UnknownOperator(String),

    #[error("unmatched '('")]
    UnmatchedOpenParen,

    #[error("unmatched ')'")]
    UnmatchedCloseParen,

    #[error("diff takes exactly 2 operands, got {0}")]
    DiffArity(usize),

    #[error("operator already has a tag")]
    DuplicateTag,

    #[error("a tag is not allowed at the top level")]
    TopLevelTag,

    #[error("multiple top-level expressions")]
    MultipleExpressions,
}

/// A structured query parse failure: the kind of violation, the 0-based
/// byte offset of the offending token, and a short whitespace-sanitized
/// snippet of the query text on each side of that offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}, preceding text {before:?}, following text {after:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub before: String,
    pub after: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize, query: &str) -> Self {
        let mut start = offset.saturating_sub(CONTEXT_LEN);
        while !query.is_char_boundary(start) {
            start += 1;
        }
        let mut end = usize::min(offset + CONTEXT_LEN, query.len());
        while !query.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            kind,
            offset,
            before: sanitize(&query[start..offset]),
            after: sanitize(&query[offset..end]),
        }
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect()
}
