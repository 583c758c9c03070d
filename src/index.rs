//! In-memory inverted index.
//!
//! A minimal term-to-posting-list map for tests, examples, and small
//! corpora. Real deployments implement [`TermSource`] over their own
//! storage; the engine only ever sees the factory callback.

use rustc_hash::FxHashMap;

use crate::postings::PostingList;
use crate::query::{DocSet, EmptyDocSet, PostingDocSet, TermSource};
use crate::{DocId, Result};

/// Term dictionary mapping each term to its posting list.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    postings: FxHashMap<String, PostingList>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the posting list for `term`, replacing any previous one.
    /// The doc IDs must be strictly ascending.
    pub fn insert(&mut self, term: impl Into<String>, docs: Vec<DocId>) -> Result<()> {
        self.postings.insert(term.into(), PostingList::new(docs)?);
        Ok(())
    }

    pub fn posting_list(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl TermSource for MemoryIndex {
    fn term_docs(&self, term: &str) -> Box<dyn DocSet> {
        match self.postings.get(term) {
            Some(list) => Box::new(PostingDocSet::new(list.clone())),
            None => Box::new(EmptyDocSet),
        }
    }
}
