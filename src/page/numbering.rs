//! Page numbering
//!
//! A [`PageNumberer`] hands out [`PageNumber`]s in order. Every number it
//! issued keeps a read-only view of the numberer's counter, so a footer
//! painted once layout has finished reports the final count of its lineage
//! rather than the count at the time the page was laid out.
//!
//! Copying a numberer starts a new lineage with its own counter. Numbers
//! issued by the copy are never seen by numbers issued before the copy.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Issues sequential page numbers
#[derive(Debug, Default)]
pub struct PageNumberer {
    count: Rc<Cell<usize>>,
}

impl PageNumberer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next page number
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PageNumber {
        let index = self.count.get();
        self.count.set(index + 1);
        PageNumber {
            index,
            total_so_far: index + 1,
            lineage: Rc::clone(&self.count),
        }
    }

    /// Independent numberer starting where this one is
    pub fn copy(&self) -> Self {
        Self {
            count: Rc::new(Cell::new(self.count.get())),
        }
    }

    /// Number of pages issued so far in this lineage
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Clone for PageNumberer {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Identity of one page within a numbering lineage
#[derive(Clone)]
pub struct PageNumber {
    index: usize,
    total_so_far: usize,
    lineage: Rc<Cell<usize>>,
}

impl PageNumber {
    /// Stand-alone number for measuring decorations
    pub fn sample(index: usize, count: usize) -> Self {
        Self {
            index,
            total_so_far: count,
            lineage: Rc::new(Cell::new(count)),
        }
    }

    /// Zero-based page index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Page count of the lineage when this number was issued
    pub fn total_so_far(&self) -> usize {
        self.total_so_far
    }

    /// Current page count of the lineage.
    ///
    /// Provisional while layout is still running.
    pub fn page_count(&self) -> usize {
        self.lineage.get()
    }
}

impl PartialEq for PageNumber {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.total_so_far == other.total_so_far
    }
}

impl Eq for PageNumber {}

impl fmt::Debug for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageNumber")
            .field("index", &self.index)
            .field("total_so_far", &self.total_so_far)
            .field("page_count", &self.page_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_indices() {
        let mut numberer = PageNumberer::new();
        for k in 1..=5 {
            let number = numberer.next();
            assert_eq!(number.index(), k - 1);
            assert_eq!(number.total_so_far(), k);
        }
        assert_eq!(numberer.count(), 5);
    }

    #[test]
    fn test_page_count_follows_lineage() {
        let mut numberer = PageNumberer::new();
        let first = numberer.next();
        assert_eq!(first.page_count(), 1);

        numberer.next();
        numberer.next();
        assert_eq!(first.total_so_far(), 1);
        assert_eq!(first.page_count(), 3);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = PageNumberer::new();
        let first = original.next();

        let mut copy = original.copy();
        assert_eq!(copy.count(), 1);
        assert_eq!(copy.next().index(), 1);
        assert_eq!(copy.next().index(), 2);

        // Neither the original nor its numbers see the copy's pages
        assert_eq!(original.count(), 1);
        assert_eq!(first.page_count(), 1);
        assert_eq!(original.next().index(), 1);
    }

    #[test]
    fn test_clone_forks_lineage() {
        let mut original = PageNumberer::new();
        let mut cloned = original.clone();
        cloned.next();
        assert_eq!(original.count(), 0);
        assert_eq!(original.next().index(), 0);
    }

    #[test]
    fn test_sample() {
        let sample = PageNumber::sample(9998, 9999);
        assert_eq!(sample.index(), 9998);
        assert_eq!(sample.page_count(), 9999);
        assert_eq!(sample, PageNumber::sample(9998, 9999));
        assert_ne!(sample, PageNumber::sample(0, 1));
    }
}
