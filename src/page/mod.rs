//! Pages: numbering, decorations and composition

mod composer;
mod decoration;
mod number_print;
mod numbering;

pub use composer::{PageIterator, PagePrint, DEFAULT_GAP};
pub use decoration::{PageDecoration, TextDecoration};
pub use number_print::{
    Alignment, DefaultPageNumberFormat, PageNumberDecoration, PageNumberFormat, PageNumberPrint,
};
pub use numbering::{PageNumber, PageNumberer};
