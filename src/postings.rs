//! Validated posting lists
//!
//! A posting list is a strictly ascending, duplicate-free sequence of
//! document IDs. The backing vector is shared behind an `Arc`, so cursors
//! over the same list are cheap to create and may run on separate threads.

use std::sync::Arc;

use crate::query::TERMINATED;
use crate::{DocId, Error, Result};

/// Immutable sorted list of document IDs matching one term.
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    docs: Arc<Vec<DocId>>,
}

impl PostingList {
    /// Validates that `docs` is strictly ascending and free of the
    /// reserved sentinel. Empty lists are fine.
    pub fn new(docs: Vec<DocId>) -> Result<Self> {
        for (i, pair) in docs.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(Error::Posting(format!(
                    "doc ids must be strictly ascending, got {} before {} at index {}",
                    pair[0],
                    pair[1],
                    i + 1,
                )));
            }
        }
        if docs.last() == Some(&TERMINATED) {
            return Err(Error::Posting(format!(
                "doc id {TERMINATED} is reserved as the exhausted sentinel"
            )));
        }
        Ok(Self {
            docs: Arc::new(docs),
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn as_slice(&self) -> &[DocId] {
        &self.docs
    }
}

impl TryFrom<Vec<DocId>> for PostingList {
    type Error = Error;

    fn try_from(docs: Vec<DocId>) -> Result<Self> {
        Self::new(docs)
    }
}
