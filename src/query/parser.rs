//! Query-string compilation.
//!
//! The query language is a parenthesized prefix syntax:
//!
//! ```text
//! query  := term | sexpr
//! sexpr  := '(' op [tag:NAME] expr+ ')'      op one of: and, or, diff
//! expr   := term | sexpr
//! ```
//!
//! `and`, `or`, and `diff` are reserved only in operator position, right
//! after `(`; anywhere else they are ordinary terms. Parsing uses an
//! explicit stack of partial operator frames, so nesting depth is bounded
//! by memory rather than the call stack, and compiles directly into a
//! cursor tree with no intermediate AST.

use crate::Result;
use crate::error::{ParseError, ParseErrorKind};
use crate::query::{DifferenceDocSet, DocSet, IntersectionDocSet, UnionDocSet};

const TAG_PREFIX: &str = "tag:";

/// Source of per-term posting cursors, implemented by index readers.
///
/// Returns a cursor over the posting list of `term`, or an exhausted
/// cursor when the term is unknown. Ownership of the cursor transfers to
/// the caller.
pub trait TermSource {
    fn term_docs(&self, term: &str) -> Box<dyn DocSet>;
}

/// Compiles query strings into cursor trees against a term source.
pub struct QueryParser<'a> {
    source: &'a dyn TermSource,
}

// ── Tokenizer ────────────────────────────────────────────────────────────

/// A token and its byte offset in the query string.
struct Token<'q> {
    offset: usize,
    text: &'q str,
}

/// ASCII whitespace separates tokens; parentheses are always their own
/// single-character token, even glued to neighbors. Multibyte characters
/// pass through untouched (every delimiter is ASCII).
fn tokenize(query: &str) -> Vec<Token<'_>> {
    let bytes = query.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
        } else if b == b'(' || b == b')' {
            tokens.push(Token {
                offset: i,
                text: &query[i..i + 1],
            });
            i += 1;
        } else {
            let start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && bytes[i] != b'('
                && bytes[i] != b')'
            {
                i += 1;
            }
            tokens.push(Token {
                offset: start,
                text: &query[start..i],
            });
        }
    }
    tokens
}

// ── Partial operator frames ──────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum OpKind {
    And,
    Or,
    Diff,
    Root,
}

struct Frame {
    /// Offset of the frame's `(` token; points error messages at the
    /// opener when it is left unmatched.
    start: usize,
    op: OpKind,
    children: Vec<Box<dyn DocSet>>,
    /// Empty means untagged, matching the surface syntax where `tag:`
    /// with no name is a no-op.
    tag: String,
}

impl Frame {
    fn root() -> Self {
        Self {
            start: 0,
            op: OpKind::Root,
            children: Vec::new(),
            tag: String::new(),
        }
    }

    /// Validates and builds the cursor for this frame. `end` is the offset
    /// of the closing token (or end of input for the root frame).
    fn close(self, end: usize, query: &str) -> std::result::Result<Box<dyn DocSet>, ParseError> {
        let Frame { op, children, tag, .. } = self;
        if children.is_empty() {
            let kind = match op {
                OpKind::Root => ParseErrorKind::EmptyQuery,
                _ => ParseErrorKind::EmptyOperator,
            };
            return Err(ParseError::new(kind, end, query));
        }
        let tag = (!tag.is_empty()).then_some(tag);
        match op {
            OpKind::Diff => {
                if children.len() != 2 {
                    return Err(ParseError::new(
                        ParseErrorKind::DiffArity(children.len()),
                        end,
                        query,
                    ));
                }
                let mut children = children.into_iter();
                let left = children.next().unwrap();
                let right = children.next().unwrap();
                Ok(Box::new(DifferenceDocSet::with_tag(left, right, tag)))
            }
            OpKind::And => match single_untagged(children, &tag) {
                Ok(child) => Ok(child),
                Err(children) => Ok(Box::new(IntersectionDocSet::with_tag(children, tag))),
            },
            OpKind::Or => match single_untagged(children, &tag) {
                Ok(child) => Ok(child),
                Err(children) => Ok(Box::new(UnionDocSet::with_tag(children, tag))),
            },
            OpKind::Root => {
                if children.len() > 1 {
                    return Err(ParseError::new(
                        ParseErrorKind::MultipleExpressions,
                        end,
                        query,
                    ));
                }
                Ok(children.into_iter().next().unwrap())
            }
        }
    }
}

/// Identity simplification: an untagged AND/OR of one child is that child.
/// A tagged one still needs the operator node so the tag can fire.
fn single_untagged(
    mut children: Vec<Box<dyn DocSet>>,
    tag: &Option<String>,
) -> std::result::Result<Box<dyn DocSet>, Vec<Box<dyn DocSet>>> {
    if children.len() == 1 && tag.is_none() {
        Ok(children.pop().unwrap())
    } else {
        Err(children)
    }
}

// ── Parser ───────────────────────────────────────────────────────────────

impl<'a> QueryParser<'a> {
    pub fn new(source: &'a dyn TermSource) -> Self {
        Self { source }
    }

    /// Compiles `query` into a cursor tree.
    ///
    /// Any token beginning with `tag:` is read as a tag, so a term whose
    /// literal text starts with that prefix cannot be queried.
    pub fn parse(&self, query: &str) -> Result<Box<dyn DocSet>> {
        self.parse_inner(query).map_err(|err| {
            log::debug!("rejected query: {err}");
            err.into()
        })
    }

    fn parse_inner(&self, query: &str) -> std::result::Result<Box<dyn DocSet>, ParseError> {
        let tokens = tokenize(query);
        let mut stack = vec![Frame::root()];

        let mut idx = 0;
        while idx < tokens.len() {
            let token = &tokens[idx];
            match token.text {
                "(" => {
                    let op = match tokens.get(idx + 1).map(|t| t.text) {
                        Some("and") => OpKind::And,
                        Some("or") => OpKind::Or,
                        Some("diff") => OpKind::Diff,
                        Some(other) => {
                            return Err(ParseError::new(
                                ParseErrorKind::UnknownOperator(other.to_string()),
                                token.offset,
                                query,
                            ));
                        }
                        None => {
                            return Err(ParseError::new(
                                ParseErrorKind::ExpectedOperator,
                                token.offset,
                                query,
                            ));
                        }
                    };
                    stack.push(Frame {
                        start: token.offset,
                        op,
                        children: Vec::new(),
                        tag: String::new(),
                    });
                    // The operator keyword is consumed along with the paren.
                    idx += 1;
                }
                ")" => {
                    if stack.last().is_some_and(|top| top.op == OpKind::Root) {
                        return Err(ParseError::new(
                            ParseErrorKind::UnmatchedCloseParen,
                            token.offset,
                            query,
                        ));
                    }
                    let frame = stack.pop().expect("root frame always present");
                    let docset = frame.close(token.offset, query)?;
                    stack
                        .last_mut()
                        .expect("root frame always present")
                        .children
                        .push(docset);
                }
                text if text.starts_with(TAG_PREFIX) => {
                    let top = stack.last_mut().expect("root frame always present");
                    if !top.tag.is_empty() {
                        return Err(ParseError::new(
                            ParseErrorKind::DuplicateTag,
                            token.offset,
                            query,
                        ));
                    }
                    if top.op == OpKind::Root {
                        return Err(ParseError::new(
                            ParseErrorKind::TopLevelTag,
                            token.offset,
                            query,
                        ));
                    }
                    top.tag = text[TAG_PREFIX.len()..].to_string();
                }
                term => {
                    let top = stack.last_mut().expect("root frame always present");
                    top.children.push(self.source.term_docs(term));
                }
            }
            idx += 1;
        }

        if stack.len() > 1 {
            let unmatched = stack.last().expect("checked non-empty");
            return Err(ParseError::new(
                ParseErrorKind::UnmatchedOpenParen,
                unmatched.start,
                query,
            ));
        }
        let root = stack.pop().expect("root frame always present");
        root.close(query.len(), query)
    }
}
