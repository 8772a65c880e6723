//! Page composition: header, body and footer
//!
//! Each page is laid out top to bottom:
//! - header at the top, followed by the header gap
//! - body in whatever height remains
//! - footer pinned to the bottom edge, preceded by the footer gap
//!
//! Headers and footers are created per page from the page's [`PageNumber`],
//! so they can show "Page 3 of 12". The number for a page is taken once and
//! reused for every attempt at laying out that page, until a page succeeds.

use super::decoration::PageDecoration;
use super::numbering::{PageNumber, PageNumberer};
use crate::device::{points_to_pixels, Device};
use crate::error::{LayoutError, LayoutResult};
use crate::print::{
    next_piece, CompositeEntry, CompositePiece, Print, PrintIterator, PrintPiece, SizeStrategy,
};
use crate::{Point, Size};
use std::rc::Rc;

/// Gap between the body and a header or footer, in points
pub const DEFAULT_GAP: i32 = 1;

/// Print that splits its body into pages with optional headers and footers.
///
/// # Page counts under speculative layout
///
/// Page totals are provisional: a footer shows the number of pages its
/// numbering lineage had reached when it is painted. Copying the iterator
/// forks the lineage. When a `PagePrint` is wrapped by a print that lays out
/// on copies and keeps the best one (such as a compressing
/// [`ColumnPrint`](crate::print::ColumnPrint)), pages produced before the
/// fork stop seeing new pages and keep a smaller total.
#[derive(Clone)]
pub struct PagePrint {
    header: Option<Rc<dyn PageDecoration>>,
    header_gap: i32,
    body: Rc<dyn Print>,
    footer_gap: i32,
    footer: Option<Rc<dyn PageDecoration>>,
}

impl PagePrint {
    pub fn new(body: impl Print + 'static) -> Self {
        Self::from_shared(Rc::new(body))
    }

    pub fn from_shared(body: Rc<dyn Print>) -> Self {
        Self {
            header: None,
            header_gap: DEFAULT_GAP,
            body,
            footer_gap: DEFAULT_GAP,
            footer: None,
        }
    }

    pub fn with_header(mut self, header: impl PageDecoration + 'static) -> Self {
        self.header = Some(Rc::new(header));
        self
    }

    pub fn with_footer(mut self, footer: impl PageDecoration + 'static) -> Self {
        self.footer = Some(Rc::new(footer));
        self
    }

    pub fn with_header_gap(mut self, gap: i32) -> LayoutResult<Self> {
        self.set_header_gap(gap)?;
        Ok(self)
    }

    pub fn with_footer_gap(mut self, gap: i32) -> LayoutResult<Self> {
        self.set_footer_gap(gap)?;
        Ok(self)
    }

    pub fn set_header(&mut self, header: Option<Rc<dyn PageDecoration>>) {
        self.header = header;
    }

    pub fn set_footer(&mut self, footer: Option<Rc<dyn PageDecoration>>) {
        self.footer = footer;
    }

    /// Gap below the header, in points
    pub fn set_header_gap(&mut self, gap: i32) -> LayoutResult<()> {
        self.header_gap = check_gap("header_gap", gap)?;
        Ok(())
    }

    /// Gap above the footer, in points
    pub fn set_footer_gap(&mut self, gap: i32) -> LayoutResult<()> {
        self.footer_gap = check_gap("footer_gap", gap)?;
        Ok(())
    }

    pub fn header(&self) -> Option<&Rc<dyn PageDecoration>> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&Rc<dyn PageDecoration>> {
        self.footer.as_ref()
    }

    pub fn header_gap(&self) -> i32 {
        self.header_gap
    }

    pub fn footer_gap(&self) -> i32 {
        self.footer_gap
    }

    pub fn body(&self) -> &Rc<dyn Print> {
        &self.body
    }
}

fn check_gap(field: &str, gap: i32) -> LayoutResult<i32> {
    if gap < 0 {
        return Err(LayoutError::invalid_gap(field, gap));
    }
    Ok(gap)
}

impl Print for PagePrint {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        if self.header.is_none() && self.footer.is_none() {
            return self.body.iterator(device);
        }
        Box::new(PageIterator::new(self, Rc::clone(device)))
    }
}

/// Outcome of laying out a header or footer
enum DecorationPiece {
    /// No decoration on this page
    Absent,
    Placed(Box<dyn PrintPiece>),
    DoesNotFit,
}

/// Lays out one page per call.
///
/// Cloning copies the body iterator and forks the numbering lineage.
#[derive(Clone)]
pub struct PageIterator {
    device: Rc<dyn Device>,
    header: Option<Rc<dyn PageDecoration>>,
    /// Device units
    header_gap: i32,
    body: Box<dyn PrintIterator>,
    /// Device units
    footer_gap: i32,
    footer: Option<Rc<dyn PageDecoration>>,
    numberer: PageNumberer,
    page_number: Option<PageNumber>,
    minimum_size: Size,
    preferred_size: Size,
}

impl PageIterator {
    pub fn new(print: &PagePrint, device: Rc<dyn Device>) -> Self {
        let dpi_y = device.dpi().y;
        let gap = |decoration: &Option<Rc<dyn PageDecoration>>, points: i32| {
            if decoration.is_some() {
                points_to_pixels(points, dpi_y)
            } else {
                0
            }
        };

        let mut iter = Self {
            header: print.header.clone(),
            header_gap: gap(&print.header, print.header_gap),
            body: print.body.iterator(&device),
            footer_gap: gap(&print.footer, print.footer_gap),
            footer: print.footer.clone(),
            device,
            numberer: PageNumberer::new(),
            page_number: None,
            minimum_size: Size::default(),
            preferred_size: Size::default(),
        };
        iter.minimum_size = iter.compute_size(SizeStrategy::Minimum);
        iter.preferred_size = iter.compute_size(SizeStrategy::Preferred);
        iter
    }

    /// Number of the page being laid out.
    ///
    /// Taken from the numberer on first use and kept until a page succeeds.
    pub fn current_page_number(&mut self) -> PageNumber {
        self.page_number
            .get_or_insert_with(|| self.numberer.next())
            .clone()
    }

    /// Pages issued so far by this iterator's lineage
    pub fn page_count(&self) -> usize {
        self.numberer.count()
    }

    fn compute_size(&self, strategy: SizeStrategy) -> Size {
        let mut size = strategy.size_of(&*self.body);
        let sample = PageNumber::sample(0, 1);

        for (decoration, gap) in [
            (&self.header, self.header_gap),
            (&self.footer, self.footer_gap),
        ] {
            if let Some(print) = decoration.as_ref().and_then(|d| d.create_print(&sample)) {
                let decoration_size = strategy.size_of(&*print.iterator(&self.device));
                size.width = size.width.max(decoration_size.width);
                size.height = size
                    .height
                    .saturating_add(gap)
                    .saturating_add(decoration_size.height);
            }
        }
        size
    }

    /// Lay out a decoration in a single piece
    fn decoration_piece(
        &self,
        decoration: Option<&Rc<dyn PageDecoration>>,
        page_number: &PageNumber,
        width: i32,
        height: i32,
    ) -> DecorationPiece {
        let Some(print) = decoration.and_then(|d| d.create_print(page_number)) else {
            return DecorationPiece::Absent;
        };

        let mut iter = print.iterator(&self.device);
        match next_piece(&mut *iter, width, height) {
            Some(piece) if !iter.has_next() => DecorationPiece::Placed(piece),
            _ => DecorationPiece::DoesNotFit,
        }
    }

    fn create_result(
        &self,
        height: i32,
        header: Option<Box<dyn PrintPiece>>,
        body: Box<dyn PrintPiece>,
        footer: Option<Box<dyn PrintPiece>>,
    ) -> Box<dyn PrintPiece> {
        if header.is_none() && footer.is_none() {
            return body;
        }

        let mut entries = Vec::with_capacity(3);
        let mut body_y = 0;
        if let Some(header) = header {
            body_y = header.size().height.saturating_add(self.header_gap);
            entries.push(CompositeEntry::new(header, Point::new(0, 0)));
        }
        entries.push(CompositeEntry::new(body, Point::new(0, body_y)));
        if let Some(footer) = footer {
            let footer_y = height - footer.size().height;
            entries.push(CompositeEntry::new(footer, Point::new(0, footer_y)));
        }
        Box::new(CompositePiece::new(entries))
    }
}

impl PrintIterator for PageIterator {
    fn has_next(&self) -> bool {
        self.body.has_next()
    }

    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>> {
        let page_number = self.current_page_number();
        let mut available = height;

        let header = match self.decoration_piece(self.header.as_ref(), &page_number, width, available)
        {
            DecorationPiece::Absent => None,
            DecorationPiece::Placed(piece) => {
                available = available
                    .saturating_sub(piece.size().height)
                    .saturating_sub(self.header_gap);
                Some(piece)
            }
            DecorationPiece::DoesNotFit => {
                tracing::debug!(
                    target: "mini_pager::page",
                    page = page_number.index(),
                    width,
                    height,
                    "header does not fit"
                );
                return None;
            }
        };

        let footer = match self.decoration_piece(self.footer.as_ref(), &page_number, width, available)
        {
            DecorationPiece::Absent => None,
            DecorationPiece::Placed(piece) => {
                available = available
                    .saturating_sub(piece.size().height)
                    .saturating_sub(self.footer_gap);
                Some(piece)
            }
            DecorationPiece::DoesNotFit => {
                tracing::debug!(
                    target: "mini_pager::page",
                    page = page_number.index(),
                    available,
                    "footer does not fit"
                );
                return None;
            }
        };

        // The body gets its turn even when nothing is left for it
        let Some(body) = next_piece(&mut *self.body, width, available) else {
            tracing::debug!(
                target: "mini_pager::page",
                page = page_number.index(),
                available,
                "body does not fit"
            );
            return None;
        };

        let result = self.create_result(height, header, body, footer);
        self.page_number = None;

        tracing::debug!(
            target: "mini_pager::page",
            page = page_number.index(),
            total_so_far = page_number.total_so_far(),
            body_height = available,
            "page composed"
        );
        Some(result)
    }

    fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    fn preferred_size(&self) -> Size {
        self.preferred_size
    }
}
