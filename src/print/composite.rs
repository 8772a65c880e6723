//! Pieces assembled from other pieces

use super::PrintPiece;
use crate::device::Surface;
use crate::{Point, Size};
use smallvec::SmallVec;
use std::fmt;

/// A child piece placed at an offset within its parent
pub struct CompositeEntry {
    piece: Box<dyn PrintPiece>,
    offset: Point,
}

impl CompositeEntry {
    pub fn new(piece: Box<dyn PrintPiece>, offset: Point) -> Self {
        Self { piece, offset }
    }

    pub fn piece(&self) -> &dyn PrintPiece {
        &*self.piece
    }

    pub fn offset(&self) -> Point {
        self.offset
    }
}

impl fmt::Debug for CompositeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeEntry")
            .field("offset", &self.offset)
            .field("size", &self.piece.size())
            .finish()
    }
}

/// Piece made of child pieces; sized to their bounding box.
///
/// Pages hold at most a header, body and footer, so three entries stay inline.
#[derive(Debug)]
pub struct CompositePiece {
    entries: SmallVec<[CompositeEntry; 3]>,
    size: Size,
}

impl CompositePiece {
    pub fn new(entries: impl IntoIterator<Item = CompositeEntry>) -> Self {
        let entries: SmallVec<[CompositeEntry; 3]> = entries.into_iter().collect();
        let size = entries.iter().fold(Size::default(), |acc, entry| {
            let child = entry.piece.size();
            Size::new(
                acc.width.max(entry.offset.x + child.width),
                acc.height.max(entry.offset.y + child.height),
            )
        });
        Self { entries, size }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PrintPiece for CompositePiece {
    fn size(&self) -> Size {
        self.size
    }

    fn paint(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        for entry in &self.entries {
            entry
                .piece
                .paint(surface, x + entry.offset.x, y + entry.offset.y);
        }
    }

    fn entries(&self) -> Option<&[CompositeEntry]> {
        Some(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingSurface;
    use crate::print::testing::{DropCounter, LabelPiece};

    fn label(text: &str, width: i32, height: i32, drops: &DropCounter) -> Box<dyn PrintPiece> {
        Box::new(LabelPiece {
            label: text.into(),
            size: Size::new(width, height),
            drops: drops.clone(),
        })
    }

    #[test]
    fn test_bounding_box() {
        let drops = DropCounter::new();
        let piece = CompositePiece::new([
            CompositeEntry::new(label("a", 30, 10, &drops), Point::new(0, 0)),
            CompositeEntry::new(label("b", 50, 20, &drops), Point::new(10, 40)),
        ]);
        assert_eq!(piece.size(), Size::new(60, 60));
        assert_eq!(piece.len(), 2);
    }

    #[test]
    fn test_paint_offsets() {
        let drops = DropCounter::new();
        let piece = CompositePiece::new([
            CompositeEntry::new(label("a", 1, 1, &drops), Point::new(0, 0)),
            CompositeEntry::new(label("b", 1, 1, &drops), Point::new(3, 7)),
        ]);

        let mut surface = RecordingSurface::new();
        piece.paint(&mut surface, 100, 200);

        assert_eq!(surface.texts(), vec!["a", "b"]);
        assert_eq!(surface.ops()[0].position(), (100, 200));
        assert_eq!(surface.ops()[1].position(), (103, 207));
    }

    #[test]
    fn test_drop_releases_children_once() {
        let drops = DropCounter::new();
        let piece = CompositePiece::new([
            CompositeEntry::new(label("a", 1, 1, &drops), Point::new(0, 0)),
            CompositeEntry::new(label("b", 1, 1, &drops), Point::new(0, 1)),
        ]);
        assert_eq!(drops.count(), 0);
        drop(piece);
        assert_eq!(drops.count(), 2);
    }

    #[test]
    fn test_empty_composite() {
        let piece = CompositePiece::new(std::iter::empty());
        assert!(piece.is_empty());
        assert_eq!(piece.size(), Size::default());
    }
}
