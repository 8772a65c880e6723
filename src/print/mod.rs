//! Content iterator protocol
//!
//! A [`Print`] is an immutable description of some content. Laying it out on
//! a device yields a [`PrintIterator`], which hands out [`PrintPiece`]s one
//! bounded box at a time until the content is exhausted.
//!
//! Fit failures are reported as `None`, never as errors. An iterator whose
//! `next` returns `None` must be left exactly where it was, so the caller can
//! retry with a different box. Callers that need to try a multi-step layout
//! take a [`copy`](IteratorCopy::copy) first and keep whichever instance wins.
//!
//! Pieces release whatever they hold when dropped. A piece that is produced
//! but not handed back to the caller is simply dropped on that path.

pub mod column;
mod composite;
mod empty;
mod text;

pub use column::{ColumnPrint, MAX_COLUMNS};
pub use composite::{CompositeEntry, CompositePiece};
pub use empty::EmptyPrint;
pub use text::TextPrint;

use crate::device::{Device, Surface};
use crate::Size;
use std::fmt;
use std::rc::Rc;

/// Description of content that can be laid out on a device
pub trait Print {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator>;
}

impl<P: Print + ?Sized> Print for Rc<P> {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        (**self).iterator(device)
    }
}

impl<P: Print + ?Sized> Print for Box<P> {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        (**self).iterator(device)
    }
}

/// Resumable producer of pieces
pub trait PrintIterator: IteratorCopy {
    /// Whether any content remains
    fn has_next(&self) -> bool;

    /// Lay out the next piece within `width` x `height`.
    ///
    /// Returns `None` when nothing fits; the iterator is unchanged in that case.
    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>>;

    /// Smallest box in which the next piece could possibly be laid out
    fn minimum_size(&self) -> Size;

    /// Box in which the content would lay out without any wrapping
    fn preferred_size(&self) -> Size;
}

/// Snapshot support for iterators
pub trait IteratorCopy {
    /// Independent iterator positioned at the same cursor
    fn copy(&self) -> Box<dyn PrintIterator>;
}

impl<T> IteratorCopy for T
where
    T: 'static + PrintIterator + Clone,
{
    fn copy(&self) -> Box<dyn PrintIterator> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn PrintIterator> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Laid-out content, ready to paint
pub trait PrintPiece {
    fn size(&self) -> Size;

    /// Paint with the top-left corner at (x, y)
    fn paint(&self, surface: &mut dyn Surface, x: i32, y: i32);

    /// Child entries, for composite pieces only
    fn entries(&self) -> Option<&[CompositeEntry]> {
        None
    }
}

impl fmt::Debug for dyn PrintPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintPiece")
            .field("size", &self.size())
            .field("entries", &self.entries().map(<[_]>::len))
            .finish()
    }
}

/// Which size query to use when measuring nested content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeStrategy {
    Minimum,
    Preferred,
}

impl SizeStrategy {
    pub fn size_of(self, iter: &dyn PrintIterator) -> Size {
        match self {
            SizeStrategy::Minimum => iter.minimum_size(),
            SizeStrategy::Preferred => iter.preferred_size(),
        }
    }
}

/// Ask `iter` for its next piece, rejecting pieces larger than the box.
///
/// An oversized piece means the iterator broke its contract; it is dropped and
/// reported as a fit failure.
pub fn next_piece(
    iter: &mut dyn PrintIterator,
    width: i32,
    height: i32,
) -> Option<Box<dyn PrintPiece>> {
    let piece = iter.next(width, height)?;
    let size = piece.size();
    if size.width > width || size.height > height {
        tracing::warn!(
            target: "mini_pager::print",
            piece_width = size.width,
            piece_height = size.height,
            width,
            height,
            "iterator produced a piece larger than requested, discarding"
        );
        return None;
    }
    Some(piece)
}
