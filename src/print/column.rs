//! Multi-column layout
//!
//! Content flows down the first column, then the next, left to right. When
//! the content runs out part-way through a page, a compressing
//! [`ColumnPrint`] searches for the shortest column height that still holds
//! everything that is left, so the final page is balanced instead of
//! leaving the first column full and the others empty.

use super::{next_piece, CompositeEntry, CompositePiece, Print, PrintIterator, PrintPiece};
use crate::device::{points_to_pixels_rounded, Device};
use crate::error::{LayoutError, LayoutResult};
use crate::{Point, Size};
use std::rc::Rc;

/// Most columns a single [`ColumnPrint`] accepts
pub const MAX_COLUMNS: u32 = 256;

/// Lays out a target print in `columns` side-by-side columns
#[derive(Clone)]
pub struct ColumnPrint {
    target: Rc<dyn Print>,
    columns: u32,
    spacing: i32,
    compressed: bool,
}

impl ColumnPrint {
    /// `spacing` is the gap between columns, in points. Compression is on by default.
    pub fn new(target: impl Print + 'static, columns: u32, spacing: i32) -> LayoutResult<Self> {
        Self::from_shared(Rc::new(target), columns, spacing)
    }

    pub fn from_shared(target: Rc<dyn Print>, columns: u32, spacing: i32) -> LayoutResult<Self> {
        if spacing < 0 {
            return Err(LayoutError::InvalidSpacing { value: spacing });
        }
        if !(2..=MAX_COLUMNS).contains(&columns) {
            return Err(LayoutError::InvalidColumnCount { value: columns });
        }
        Ok(Self {
            target,
            columns,
            spacing,
            compressed: true,
        })
    }

    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    pub fn target(&self) -> &Rc<dyn Print> {
        &self.target
    }

    pub fn column_count(&self) -> u32 {
        self.columns
    }

    pub fn column_spacing(&self) -> i32 {
        self.spacing
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

impl Print for ColumnPrint {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        Box::new(ColumnIterator {
            target: self.target.iterator(device),
            columns: self.columns as usize,
            spacing: points_to_pixels_rounded(self.spacing, device.dpi().x),
            compressed: self.compressed,
        })
    }
}

#[derive(Clone)]
struct ColumnIterator {
    target: Box<dyn PrintIterator>,
    columns: usize,
    /// Device units
    spacing: i32,
    compressed: bool,
}

type Columns = Vec<Box<dyn PrintPiece>>;

impl ColumnIterator {
    /// Column count as device arithmetic; bounded by `MAX_COLUMNS`
    fn column_count(&self) -> i32 {
        i32::try_from(self.columns).unwrap_or(i32::MAX)
    }

    /// Total spacing between the columns
    fn total_spacing(&self) -> i32 {
        self.spacing.saturating_mul(self.column_count() - 1)
    }

    fn compute_size(&self, target: Size) -> Size {
        Size::new(
            target
                .width
                .saturating_mul(self.column_count())
                .saturating_add(self.total_spacing()),
            target.height,
        )
    }

    /// Split `width` between the columns; later columns absorb the remainder
    fn column_widths(&self, width: i32) -> Vec<i32> {
        let columns = self.column_count();
        let mut available = width.saturating_sub(self.total_spacing());
        (0..columns)
            .map(|i| {
                let column = available / (columns - i);
                available -= column;
                column
            })
            .collect()
    }

    /// Fill columns left to right from `iter`.
    ///
    /// Stops early once the content runs out. `None` if any column fails;
    /// the pieces laid out so far are dropped.
    fn next_columns(iter: &mut dyn PrintIterator, widths: &[i32], height: i32) -> Option<Columns> {
        let mut pieces = Vec::with_capacity(widths.len());
        for &width in widths {
            if !iter.has_next() {
                break;
            }
            pieces.push(next_piece(iter, width, height)?);
        }
        Some(pieces)
    }

    fn next_compressed(
        &mut self,
        widths: &[i32],
        iter: Box<dyn PrintIterator>,
        columns: Columns,
    ) -> Box<dyn PrintPiece> {
        let mut highest_invalid = 0;
        let mut lowest_valid = max_height(&columns);
        let mut best = (iter, columns);

        while lowest_valid > highest_invalid + 1 {
            let test_height = (lowest_valid + highest_invalid + 1) / 2;
            let mut attempt = self.target.copy();

            match Self::next_columns(&mut *attempt, widths, test_height) {
                Some(columns) if !attempt.has_next() => {
                    lowest_valid = max_height(&columns);
                    best = (attempt, columns);
                }
                _ => highest_invalid = test_height,
            }

            tracing::debug!(
                target: "mini_pager::print",
                test_height,
                lowest_valid,
                highest_invalid,
                "column compression step"
            );
        }

        let (iter, columns) = best;
        self.target = iter;
        self.create_result(columns, widths)
    }

    fn create_result(&self, columns: Columns, widths: &[i32]) -> Box<dyn PrintPiece> {
        let mut x = 0;
        let entries = columns.into_iter().zip(widths).map(|(piece, &width)| {
            let entry = CompositeEntry::new(piece, Point::new(x, 0));
            x = x.saturating_add(width).saturating_add(self.spacing);
            entry
        });
        Box::new(CompositePiece::new(entries))
    }
}

fn max_height(pieces: &[Box<dyn PrintPiece>]) -> i32 {
    pieces.iter().map(|p| p.size().height).max().unwrap_or(0)
}

impl PrintIterator for ColumnIterator {
    fn has_next(&self) -> bool {
        self.target.has_next()
    }

    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>> {
        let widths = self.column_widths(width);

        // Lay out on a copy so a failed column leaves the target untouched
        let mut iter = self.target.copy();
        let Some(columns) = Self::next_columns(&mut *iter, &widths, height) else {
            tracing::debug!(target: "mini_pager::print", width, height, "columns do not fit");
            return None;
        };

        if !iter.has_next() && self.compressed {
            return Some(self.next_compressed(&widths, iter, columns));
        }

        self.target = iter;
        Some(self.create_result(columns, &widths))
    }

    fn minimum_size(&self) -> Size {
        self.compute_size(self.target.minimum_size())
    }

    fn preferred_size(&self) -> Size {
        self.compute_size(self.target.preferred_size())
    }
}
