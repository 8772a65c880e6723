//! Print jobs: running a print to completion, one page at a time

mod config;

pub use config::{JobConfig, PageSetup};

use crate::device::{Device, PaintOp, RecordingSurface, Surface};
use crate::error::{LayoutError, LayoutResult};
use crate::print::{next_piece, Print, PrintIterator, PrintPiece};
use crate::{Point, Size};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Upper bound on pages when none is configured
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// A named print with a page setup
#[derive(Clone)]
pub struct PrintJob {
    name: String,
    print: Rc<dyn Print>,
    page_setup: PageSetup,
    max_pages: usize,
}

impl PrintJob {
    pub fn new(name: impl Into<String>, print: impl Print + 'static) -> Self {
        Self::from_shared(name, Rc::new(print))
    }

    pub fn from_shared(name: impl Into<String>, print: Rc<dyn Print>) -> Self {
        Self {
            name: name.into(),
            print,
            page_setup: PageSetup::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Build a job for `text` from a validated configuration
    pub fn from_config(config: &JobConfig, text: &str) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self::from_shared(config.name.clone(), config.build_print(text)?)
            .with_page_setup(config.page)?
            .with_max_pages(config.max_pages))
    }

    pub fn with_page_setup(mut self, page_setup: PageSetup) -> LayoutResult<Self> {
        page_setup.validate()?;
        self.page_setup = page_setup;
        Ok(self)
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_setup(&self) -> &PageSetup {
        &self.page_setup
    }

    /// Lay out every page.
    ///
    /// Fails if a page cannot take any content at all, or if content is still
    /// left after `max_pages` pages. No pages are returned in either case.
    pub fn paginate(&self, device: &Rc<dyn Device>) -> LayoutResult<Vec<Page>> {
        let dpi = device.dpi();
        let page_size = self.page_setup.page_size(dpi);
        let (origin, content) = self.page_setup.content_box(dpi);

        tracing::debug!(
            target: "mini_pager::job",
            job = %self.name,
            width = content.width,
            height = content.height,
            "paginating"
        );

        let mut iter = self.print.iterator(device);
        let mut pages = Vec::new();

        while iter.has_next() {
            if pages.len() >= self.max_pages {
                return Err(LayoutError::PageLimitExceeded {
                    limit: self.max_pages,
                });
            }

            let index = pages.len();
            let Some(piece) = next_piece(&mut *iter, content.width, content.height) else {
                tracing::warn!(
                    target: "mini_pager::job",
                    job = %self.name,
                    page = index,
                    "content does not fit on an empty page"
                );
                return Err(LayoutError::PageDoesNotFit {
                    page_index: index,
                    width: content.width,
                    height: content.height,
                });
            };

            tracing::debug!(target: "mini_pager::job", page = index, "page laid out");
            pages.push(Page {
                index,
                offset: origin,
                page_size,
                piece,
            });
        }

        tracing::info!(
            target: "mini_pager::job",
            job = %self.name,
            pages = pages.len(),
            "pagination complete"
        );
        Ok(pages)
    }
}

impl fmt::Debug for PrintJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintJob")
            .field("name", &self.name)
            .field("page_setup", &self.page_setup)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

/// One laid-out page
#[derive(Debug)]
pub struct Page {
    index: usize,
    /// Top-left of the content area
    offset: Point,
    page_size: Size,
    piece: Box<dyn PrintPiece>,
}

impl Page {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whole page, margins included
    pub fn size(&self) -> Size {
        self.page_size
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn piece(&self) -> &dyn PrintPiece {
        &*self.piece
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        self.piece.paint(surface, self.offset.x, self.offset.y);
    }

    /// Paint onto a fresh recording surface
    pub fn record(&self) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        self.paint(&mut surface);
        surface
    }

    pub fn render(&self) -> RenderedPage {
        RenderedPage {
            index: self.index,
            width: self.page_size.width,
            height: self.page_size.height,
            ops: self.record().into_ops(),
        }
    }
}

/// Serializable paint list for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub index: usize,
    pub width: i32,
    pub height: i32,
    pub ops: Vec<PaintOp>,
}

/// Serializable result of a whole job
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedJob {
    pub name: String,
    pub page_count: usize,
    pub pages: Vec<RenderedPage>,
}

impl RenderedJob {
    pub fn new(name: impl Into<String>, pages: &[Page]) -> Self {
        Self {
            name: name.into(),
            page_count: pages.len(),
            pages: pages.iter().map(Page::render).collect(),
        }
    }
}
