//! Blank space of a fixed size

use super::{Print, PrintIterator, PrintPiece};
use crate::device::{points_to_pixels, Device, Surface};
use crate::Size;
use std::rc::Rc;

/// Blank box, sized in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyPrint {
    width: u32,
    height: u32,
}

impl EmptyPrint {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Print for EmptyPrint {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        let dpi = device.dpi();
        Box::new(EmptyIterator {
            size: Size::new(
                points_to_pixels(saturating_i32(self.width), dpi.x),
                points_to_pixels(saturating_i32(self.height), dpi.y),
            ),
            has_next: true,
        })
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone)]
struct EmptyIterator {
    size: Size,
    has_next: bool,
}

impl PrintIterator for EmptyIterator {
    fn has_next(&self) -> bool {
        self.has_next
    }

    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>> {
        if !self.has_next || !self.size.fits_in(width, height) {
            return None;
        }
        self.has_next = false;
        Some(Box::new(EmptyPiece { size: self.size }))
    }

    fn minimum_size(&self) -> Size {
        self.size
    }

    fn preferred_size(&self) -> Size {
        self.size
    }
}

#[derive(Debug)]
struct EmptyPiece {
    size: Size,
}

impl PrintPiece for EmptyPiece {
    fn size(&self) -> Size {
        self.size
    }

    fn paint(&self, _surface: &mut dyn Surface, _x: i32, _y: i32) {}
}
