//! Per-page headers and footers

use super::numbering::PageNumber;
use crate::device::FontId;
use crate::print::{Print, TextPrint};

/// Produces the header or footer content for a page.
///
/// `None` leaves that page without the decoration.
pub trait PageDecoration {
    fn create_print(&self, page_number: &PageNumber) -> Option<Box<dyn Print>>;
}

impl<F> PageDecoration for F
where
    F: Fn(&PageNumber) -> Option<Box<dyn Print>>,
{
    fn create_print(&self, page_number: &PageNumber) -> Option<Box<dyn Print>> {
        self(page_number)
    }
}

/// Same line of text on every page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDecoration {
    text: String,
    font: FontId,
}

impl TextDecoration {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontId::DEFAULT,
        }
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = font;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PageDecoration for TextDecoration {
    fn create_print(&self, _page_number: &PageNumber) -> Option<Box<dyn Print>> {
        Some(Box::new(TextPrint::new(self.text.clone()).with_font(self.font)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::testing::device;
    use crate::print::PrintIterator;

    #[test]
    fn test_closure_decoration() {
        let odd_pages_only = |number: &PageNumber| -> Option<Box<dyn Print>> {
            (number.index() % 2 == 1).then(|| Box::new(TextPrint::new("odd")) as Box<dyn Print>)
        };

        assert!(odd_pages_only.create_print(&PageNumber::sample(0, 1)).is_none());
        assert!(odd_pages_only.create_print(&PageNumber::sample(1, 2)).is_some());
    }

    #[test]
    fn test_text_decoration() {
        let decoration = TextDecoration::new("Quarterly report");
        let print = decoration.create_print(&PageNumber::sample(0, 1)).unwrap();
        let iter = print.iterator(&device());
        assert_eq!(iter.preferred_size().width, 160);
    }
}
