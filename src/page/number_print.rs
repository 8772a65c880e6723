//! Page number text ("Page 3 of 12")

use super::decoration::PageDecoration;
use super::numbering::PageNumber;
use crate::device::{Device, FontId, Surface};
use crate::error::LayoutError;
use crate::print::{Print, PrintIterator, PrintPiece};
use crate::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Horizontal alignment within the offered width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Horizontal offset of `content` within `total`
    pub fn offset(self, content: i32, total: i32) -> i32 {
        match self {
            Alignment::Left => 0,
            Alignment::Center => (total - content) / 2,
            Alignment::Right => total - content,
        }
    }
}

impl FromStr for Alignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(LayoutError::InvalidAlignment {
                value: s.to_string(),
            }),
        }
    }
}

/// Turns a page number into display text
pub trait PageNumberFormat {
    fn format(&self, page_number: &PageNumber) -> String;
}

impl<F> PageNumberFormat for F
where
    F: Fn(&PageNumber) -> String,
{
    fn format(&self, page_number: &PageNumber) -> String {
        self(page_number)
    }
}

/// "Page {n} of {count}", one-based
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPageNumberFormat;

impl PageNumberFormat for DefaultPageNumberFormat {
    fn format(&self, page_number: &PageNumber) -> String {
        format!(
            "Page {} of {}",
            page_number.index() + 1,
            page_number.page_count()
        )
    }
}

/// Displays one page number.
///
/// Sized for the widest number it is ever expected to show, so layout does
/// not depend on the final page count. The text itself is formatted when the
/// piece is painted.
#[derive(Clone)]
pub struct PageNumberPrint {
    page_number: PageNumber,
    font: FontId,
    align: Alignment,
    format: Rc<dyn PageNumberFormat>,
}

impl PageNumberPrint {
    pub fn new(page_number: PageNumber) -> Self {
        Self {
            page_number,
            font: FontId::DEFAULT,
            align: Alignment::default(),
            format: Rc::new(DefaultPageNumberFormat),
        }
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_format(mut self, format: Rc<dyn PageNumberFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn page_number(&self) -> &PageNumber {
        &self.page_number
    }

    pub fn align(&self) -> Alignment {
        self.align
    }
}

impl fmt::Debug for PageNumberPrint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageNumberPrint")
            .field("page_number", &self.page_number)
            .field("font", &self.font)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

impl Print for PageNumberPrint {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        let widest = self.format.format(&PageNumber::sample(9998, 9999));
        Box::new(PageNumberIterator {
            print: self.clone(),
            device: Rc::clone(device),
            size: device.text_extent(&widest, self.font),
            has_next: true,
        })
    }
}

#[derive(Clone)]
struct PageNumberIterator {
    print: PageNumberPrint,
    device: Rc<dyn Device>,
    size: Size,
    has_next: bool,
}

impl PrintIterator for PageNumberIterator {
    fn has_next(&self) -> bool {
        self.has_next
    }

    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>> {
        if !self.has_next || !self.size.fits_in(width, height) {
            return None;
        }

        let mut size = self.size;
        if self.print.align != Alignment::Left {
            size.width = width;
        }

        self.has_next = false;
        Some(Box::new(PageNumberPiece {
            print: self.print.clone(),
            device: Rc::clone(&self.device),
            size,
        }))
    }

    fn minimum_size(&self) -> Size {
        self.size
    }

    fn preferred_size(&self) -> Size {
        self.size
    }
}

struct PageNumberPiece {
    print: PageNumberPrint,
    device: Rc<dyn Device>,
    size: Size,
}

impl PrintPiece for PageNumberPiece {
    fn size(&self) -> Size {
        self.size
    }

    fn paint(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        let text = self.print.format.format(&self.print.page_number);
        let text_width = self.device.text_extent(&text, self.print.font).width;
        let dx = self.print.align.offset(text_width, self.size.width);
        surface.draw_text(&text, x + dx, y, self.print.font);
    }
}

/// Page number on every page, as a header or footer
#[derive(Clone)]
pub struct PageNumberDecoration {
    font: FontId,
    align: Alignment,
    format: Rc<dyn PageNumberFormat>,
}

impl PageNumberDecoration {
    pub fn new() -> Self {
        Self {
            font: FontId::DEFAULT,
            align: Alignment::default(),
            format: Rc::new(DefaultPageNumberFormat),
        }
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_format(mut self, format: impl PageNumberFormat + 'static) -> Self {
        self.format = Rc::new(format);
        self
    }
}

impl Default for PageNumberDecoration {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDecoration for PageNumberDecoration {
    fn create_print(&self, page_number: &PageNumber) -> Option<Box<dyn Print>> {
        Some(Box::new(
            PageNumberPrint::new(page_number.clone())
                .with_font(self.font)
                .with_align(self.align)
                .with_format(Rc::clone(&self.format)),
        ))
    }
}
