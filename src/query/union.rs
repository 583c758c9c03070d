//! Min-heap union of k cursors.

use crate::DocId;
use crate::query::{DocSet, TERMINATED};

/// DocSet yielding each document present in any child, once, in order.
///
/// Children live in a binary min-heap laid out in the vector, keyed by
/// current doc. The heap is hand-rolled because tag collection recurses
/// over heap positions and `advance` sift-downs the root in place.
pub struct UnionDocSet {
    children: Vec<Box<dyn DocSet>>,
    children_have_tags: bool,
    tag: Option<String>,
}

impl UnionDocSet {
    pub fn new(children: Vec<Box<dyn DocSet>>) -> Self {
        Self::with_tag(children, None)
    }

    pub fn with_tag(children: Vec<Box<dyn DocSet>>, tag: Option<String>) -> Self {
        assert!(!children.is_empty(), "a union needs at least one child");
        let children_have_tags = children.iter().any(|c| c.has_tag());
        let mut docset = Self {
            children,
            children_have_tags,
            tag,
        };
        docset.heapify();
        docset
    }

    fn heapify(&mut self) {
        for pos in (0..self.children.len() / 2).rev() {
            self.sift_down(pos);
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let mut min = pos * 2 + 1;
            if min >= self.children.len() {
                break;
            }
            if min + 1 < self.children.len()
                && self.children[min + 1].doc() < self.children[min].doc()
            {
                min += 1;
            }
            if self.children[min].doc() < self.children[pos].doc() {
                self.children.swap(pos, min);
                pos = min;
            } else {
                break;
            }
        }
    }

    /// Appends the tags of every heap node sitting on `current`, pre-order.
    /// Children below a larger-valued node cannot match (heap property).
    fn collect_tags(&self, pos: usize, current: DocId, out: &mut Vec<String>) {
        if pos >= self.children.len() || self.children[pos].doc() != current {
            return;
        }
        out.extend(self.children[pos].tags());
        self.collect_tags(pos * 2 + 1, current, out);
        self.collect_tags(pos * 2 + 2, current, out);
    }
}

impl DocSet for UnionDocSet {
    #[inline]
    fn doc(&self) -> DocId {
        match self.children.first() {
            Some(root) => root.doc(),
            None => TERMINATED,
        }
    }

    fn advance(&mut self) -> DocId {
        let current = self.doc();
        if current == TERMINATED {
            return TERMINATED;
        }
        // Step every child sitting on the current doc, dropping the ones
        // that exhaust, until the root moves past it.
        while !self.children.is_empty() && self.children[0].doc() == current {
            if self.children[0].advance() == TERMINATED {
                let last = self.children.len() - 1;
                self.children.swap(0, last);
                self.children.pop();
            }
            self.sift_down(0);
        }
        debug_assert!(self.doc() > current);
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        // The target may exceed several children, not just the root. Seek
        // them all, drop the exhausted ones, and rebuild the heap in one
        // O(k) pass rather than sifting each survivor.
        for child in &mut self.children {
            child.seek(target);
        }
        self.children.retain(|c| c.doc() != TERMINATED);
        self.heapify();
        self.doc()
    }

    fn size_hint(&self) -> u32 {
        if self.doc() == TERMINATED {
            return 0;
        }
        self.children.iter().map(|c| c.size_hint()).max().unwrap_or(0)
    }

    fn has_tag(&self) -> bool {
        self.tag.is_some() || self.children_have_tags
    }

    fn tags(&self) -> Vec<String> {
        let current = self.doc();
        if !self.has_tag() || current == TERMINATED {
            return Vec::new();
        }
        let mut tags = Vec::new();
        if self.children_have_tags {
            self.collect_tags(0, current, &mut tags);
        }
        if let Some(tag) = &self.tag {
            tags.push(tag.clone());
        }
        tags
    }
}
