//! Mini-Pager: a toolkit-independent pagination engine
//!
//! This crate lays out content onto pages:
//! - Resumable content iterators with copy/rollback for speculative layout
//! - Page composition (header, body, footer) with fixed gaps
//! - Page numbering with provisional "page X of Y" totals
//! - Column layout that searches for the tightest final page
//!
//! Text is measured through a [`device::Device`]; finished pages paint onto a
//! [`device::Surface`]. Everything runs single-threaded and synchronously.

pub mod device;
pub mod error;
pub mod job;
pub mod page;
pub mod print;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPager;

// Re-export primary types
pub use device::{Device, FixedMetricsDevice, FontId, FontLibrary, FontMetrics, Surface};
pub use error::{LayoutError, LayoutResult};
pub use job::{JobConfig, Page, PageSetup, PrintJob, RenderedJob, RenderedPage};
pub use page::{
    Alignment, DefaultPageNumberFormat, PageDecoration, PageIterator, PageNumber,
    PageNumberDecoration, PageNumberFormat, PageNumberPrint, PageNumberer, PagePrint,
    TextDecoration,
};
pub use print::{
    next_piece, ColumnPrint, CompositeEntry, CompositePiece, EmptyPrint, Print, PrintIterator,
    PrintPiece, TextPrint,
};

/// Position in device units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Extent in device units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether this size fits within a `width` x `height` box
    pub fn fits_in(&self, width: i32, height: i32) -> bool {
        self.width <= width && self.height <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_size_fits_in() {
        let size = Size::new(10, 20);
        assert!(size.fits_in(10, 20));
        assert!(!size.fits_in(9, 20));
        assert!(!size.fits_in(10, -1));
    }

    #[test]
    fn test_page_x_of_y_end_to_end() {
        let device: Rc<dyn Device> = Rc::new(FixedMetricsDevice::monospace(10.0, 20.0, 72));
        let body = TextPrint::new("one\ntwo\nthree\nfour\nfive");
        let print = PagePrint::new(body)
            .with_footer(PageNumberDecoration::new())
            .with_footer_gap(0)
            .unwrap();

        // 40 units per page: one body line plus the footer line
        let job = PrintJob::new("report", print)
            .with_page_setup(PageSetup {
                page_width: 300.0,
                page_height: 40.0,
                margin_top: 0.0,
                margin_bottom: 0.0,
                margin_left: 0.0,
                margin_right: 0.0,
            })
            .unwrap();

        let pages = job.paginate(&device).unwrap();
        assert_eq!(pages.len(), 5);

        let last = pages[4].record();
        assert_eq!(last.texts(), vec!["five", "Page 5 of 5"]);
        let first = pages[0].record();
        assert_eq!(first.texts(), vec!["one", "Page 1 of 5"]);
    }
}
