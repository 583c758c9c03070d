//! Set-difference of two cursors.

use crate::DocId;
use crate::query::{DocSet, TERMINATED};

/// DocSet yielding the documents of `left` that are absent from `right`.
///
/// The right side is a pure filter: it never produces values and never
/// contributes tags.
pub struct DifferenceDocSet {
    left: Box<dyn DocSet>,
    right: Box<dyn DocSet>,
    tag: Option<String>,
}

impl DifferenceDocSet {
    pub fn new(left: Box<dyn DocSet>, right: Box<dyn DocSet>) -> Self {
        Self::with_tag(left, right, None)
    }

    pub fn with_tag(left: Box<dyn DocSet>, right: Box<dyn DocSet>, tag: Option<String>) -> Self {
        let mut docset = Self { left, right, tag };
        docset.next_agreement();
        docset
    }

    /// Walks `left` forward to its next doc the right side cannot match.
    fn next_agreement(&mut self) {
        loop {
            let doc = self.left.doc();
            if doc == TERMINATED || self.right.seek(doc) > doc {
                return;
            }
            self.left.advance();
        }
    }
}

impl DocSet for DifferenceDocSet {
    #[inline]
    fn doc(&self) -> DocId {
        self.left.doc()
    }

    fn advance(&mut self) -> DocId {
        if self.left.doc() == TERMINATED {
            return TERMINATED;
        }
        self.left.advance();
        self.next_agreement();
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.left.seek(target) != TERMINATED {
            self.next_agreement();
        }
        self.doc()
    }

    fn size_hint(&self) -> u32 {
        self.left.size_hint().saturating_sub(self.right.size_hint())
    }

    fn has_tag(&self) -> bool {
        self.tag.is_some() || self.left.has_tag()
    }

    fn tags(&self) -> Vec<String> {
        if !self.has_tag() || self.doc() == TERMINATED {
            return Vec::new();
        }
        let mut tags = self.left.tags();
        if let Some(tag) = &self.tag {
            tags.push(tag.clone());
        }
        tags
    }
}
