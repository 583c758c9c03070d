//! Leap-frog intersection of k cursors.

use crate::DocId;
use crate::query::{DocSet, TERMINATED};

/// DocSet yielding the documents present in every child.
///
/// Slot 0 always holds the candidate: the child whose current doc is the
/// running maximum. Alignment forces the other children to catch up; any
/// child that overshoots becomes the new candidate.
pub struct IntersectionDocSet {
    children: Vec<Box<dyn DocSet>>,
    children_have_tags: bool,
    tag: Option<String>,
}

impl IntersectionDocSet {
    pub fn new(children: Vec<Box<dyn DocSet>>) -> Self {
        Self::with_tag(children, None)
    }

    pub fn with_tag(mut children: Vec<Box<dyn DocSet>>, tag: Option<String>) -> Self {
        assert!(!children.is_empty(), "an intersection needs at least one child");
        let children_have_tags = children.iter().any(|c| c.has_tag());
        // Starting from the largest current doc shortens the first alignment.
        let max = (0..children.len())
            .max_by_key(|&i| children[i].doc())
            .unwrap();
        children.swap(0, max);
        let mut docset = Self {
            children,
            children_have_tags,
            tag,
        };
        docset.next_agreement();
        docset
    }

    /// Repositions all children onto the candidate in slot 0, rotating a
    /// new candidate to the front whenever a child skips past it. Ends
    /// aligned on a common doc or with slot 0 exhausted.
    fn next_agreement(&mut self) {
        let k = self.children.len();
        let mut pos = 1;
        while pos < k && self.children[0].doc() != TERMINATED {
            let candidate = self.children[0].doc();
            while pos < k {
                debug_assert!(self.children[pos].doc() <= candidate);
                if self.children[pos].doc() < candidate
                    && self.children[pos].seek(candidate) > candidate
                {
                    // Overshot (or exhausted): new candidate, restart the
                    // catch-up round against it.
                    self.children.swap(0, pos);
                    pos = 1;
                    break;
                }
                pos += 1;
            }
        }
    }
}

impl DocSet for IntersectionDocSet {
    #[inline]
    fn doc(&self) -> DocId {
        self.children[0].doc()
    }

    fn advance(&mut self) -> DocId {
        if self.children[0].doc() == TERMINATED {
            return TERMINATED;
        }
        self.children[0].advance();
        self.next_agreement();
        self.doc()
    }

    fn seek(&mut self, target: DocId) -> DocId {
        if self.children[0].doc() == TERMINATED {
            return TERMINATED;
        }
        self.children[0].seek(target);
        self.next_agreement();
        self.doc()
    }

    fn size_hint(&self) -> u32 {
        if self.doc() == TERMINATED {
            return 0;
        }
        self.children.iter().map(|c| c.size_hint()).min().unwrap_or(0)
    }

    fn has_tag(&self) -> bool {
        self.tag.is_some() || self.children_have_tags
    }

    fn tags(&self) -> Vec<String> {
        if !self.has_tag() || self.doc() == TERMINATED {
            return Vec::new();
        }
        let mut tags = Vec::new();
        if self.children_have_tags {
            // All children sit on the same doc, so all of them contribute.
            for child in &self.children {
                tags.extend(child.tags());
            }
        }
        if let Some(tag) = &self.tag {
            tags.push(tag.clone());
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postings::PostingList;
    use crate::query::{Drain, EmptyDocSet, PostingDocSet};

    fn posting(docs: &[DocId]) -> Box<dyn DocSet> {
        Box::new(PostingDocSet::new(PostingList::new(docs.to_vec()).unwrap()))
    }

    fn intersect(lists: &[&[DocId]]) -> IntersectionDocSet {
        IntersectionDocSet::new(lists.iter().map(|l| posting(l)).collect())
    }

    #[test]
    fn test_three_way_intersection() {
        let mut ds = intersect(&[
            &[0, 3, 8, 11, 20, 21],
            &[0, 4, 8, 21, 31],
            &[0, 8, 21, 22, 31, 41],
        ]);
        assert_eq!(Drain::new(&mut ds).collect::<Vec<_>>(), vec![0, 8, 21]);
        assert_eq!(ds.doc(), TERMINATED);
    }

    #[test]
    fn test_seek() {
        let mut ds = intersect(&[
            &[0, 3, 8, 11, 20, 21],
            &[0, 4, 8, 21, 31],
            &[0, 8, 21, 22, 31, 41],
        ]);
        assert_eq!(ds.doc(), 0);
        assert_eq!(ds.seek(9), 21);
        assert_eq!(ds.seek(9), 21);
        assert_eq!(ds.advance(), TERMINATED);
        assert_eq!(ds.seek(50), TERMINATED);
    }

    #[test]
    fn test_single_child() {
        let mut ds = intersect(&[&[1, 5, 9]]);
        assert_eq!(Drain::new(&mut ds).collect::<Vec<_>>(), vec![1, 5, 9]);
    }

    #[test]
    fn test_disjoint_children() {
        let ds = intersect(&[&[1, 3, 5], &[2, 4, 6]]);
        assert_eq!(ds.doc(), TERMINATED);
        assert_eq!(ds.size_hint(), 0);
    }

    #[test]
    fn test_empty_child_exhausts_all() {
        let ds = IntersectionDocSet::new(vec![posting(&[1, 2, 3]), Box::new(EmptyDocSet)]);
        assert_eq!(ds.doc(), TERMINATED);
    }

    #[test]
    fn test_size_hint_is_min_of_children() {
        let ds = intersect(&[&[0, 1, 2, 3, 4], &[0, 2, 4]]);
        assert_eq!(ds.size_hint(), 3);
    }

    #[test]
    fn test_commutative() {
        let forward: Vec<_> = {
            let mut ds = intersect(&[&[0, 3, 8, 21], &[0, 8, 21, 31]]);
            Drain::new(&mut ds).collect()
        };
        let backward: Vec<_> = {
            let mut ds = intersect(&[&[0, 8, 21, 31], &[0, 3, 8, 21]]);
            Drain::new(&mut ds).collect()
        };
        assert_eq!(forward, backward);
        assert_eq!(forward, vec![0, 8, 21]);
    }

    #[test]
    fn test_tag_fires_on_every_match() {
        let mut ds = IntersectionDocSet::with_tag(
            vec![posting(&[1, 4, 7]), posting(&[4, 7, 9])],
            Some("both".to_string()),
        );
        assert!(ds.has_tag());
        assert_eq!(ds.doc(), 4);
        assert_eq!(ds.tags(), vec!["both"]);
        ds.advance();
        assert_eq!(ds.tags(), vec!["both"]);
        ds.advance();
        assert!(ds.tags().is_empty());
    }

    #[test]
    fn test_child_tags_come_before_own() {
        let inner = IntersectionDocSet::with_tag(vec![posting(&[2, 4])], Some("inner".into()));
        let mut ds = IntersectionDocSet::with_tag(
            vec![Box::new(inner), posting(&[2, 3, 4])],
            Some("outer".into()),
        );
        assert_eq!(ds.doc(), 2);
        assert_eq!(ds.tags(), vec!["inner", "outer"]);
        assert_eq!(ds.advance(), 4);
        assert_eq!(ds.tags(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_untagged_reports_nothing() {
        let ds = intersect(&[&[1, 2], &[2, 3]]);
        assert!(!ds.has_tag());
        assert!(ds.tags().is_empty());
    }
}
