//! Device capability: measuring text and painting pieces
//!
//! The pagination engine never draws directly. It asks a [`Device`] how large
//! some text is and later hands finished pieces a [`Surface`] to paint on.

pub mod font;
mod surface;

pub use font::{FixedMetricsDevice, FontId, FontLibrary, FontMetrics};
pub use surface::{PaintOp, RecordingSurface};

use crate::{Point, Size};

/// Points per inch; configuration lengths are expressed in points
pub const POINTS_PER_INCH: i32 = 72;

/// Measuring side of an output device
pub trait Device {
    /// Resolution in device units per inch
    fn dpi(&self) -> Point;

    /// Extent of a single line of text
    fn text_extent(&self, text: &str, font: FontId) -> Size;

    /// Height of one line of text
    fn line_height(&self, font: FontId) -> i32;
}

/// Painting side of an output device
pub trait Surface {
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: FontId);
}

/// Convert points to device units, truncating.
///
/// Saturates at the `i32` range.
pub fn points_to_pixels(points: i32, dpi: i32) -> i32 {
    let pixels = i64::from(points) * i64::from(dpi) / i64::from(POINTS_PER_INCH);
    pixels.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Convert points to device units, rounding to nearest
pub fn points_to_pixels_rounded(points: i32, dpi: i32) -> i32 {
    (points as f32 * dpi as f32 / POINTS_PER_INCH as f32).round() as i32
}
