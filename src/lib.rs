//! Argus - a boolean query evaluation engine over sorted posting lists
//!
//! The core of a small, embeddable full-text-search library:
//! - Lazy, seekable cursors over ascending document IDs (`DocSet`)
//! - Leap-frog intersection, min-heap union, and set-difference operators
//! - Tag propagation reporting which labeled sub-expressions matched
//! - A parenthesized prefix query language, e.g. `(or (and t:a t:b) t:c)`,
//!   compiled straight into a cursor tree via a term-lookup factory
//!
//! The inverted index itself is external: callers supply posting lists
//! through the [`TermSource`] callback. [`MemoryIndex`] is a minimal
//! in-memory implementation for tests and small corpora.

pub mod error;
pub mod index;
pub mod postings;
pub mod query;

pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use index::MemoryIndex;
pub use postings::PostingList;
pub use query::{
    DifferenceDocSet, DocSet, Drain, EmptyDocSet, IntersectionDocSet, PostingDocSet, QueryParser,
    TERMINATED, TermSource, UnionDocSet,
};

/// Document identifier. The maximum value is reserved as the
/// exhausted-cursor sentinel and never appears in a posting list.
pub type DocId = u32;
