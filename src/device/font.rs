//! Font metrics and a fixed-metrics measuring device

use super::Device;
use crate::error::{LayoutError, LayoutResult};
use crate::{Point, Size};
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Metrics needed for text measurement
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Line height in device units
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 12pt monospace-ish at 72 dpi
        Self::monospace(7.0, 14.0)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character has the same advance width
    pub fn monospace(char_width: f32, line_height: f32) -> Self {
        Self {
            line_height,
            char_widths: vec![char_width; 128],
            default_width: char_width,
        }
    }

    /// Line height must be finite and positive; widths finite and >= 0
    pub fn validate(&self) -> LayoutResult<()> {
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(LayoutError::invalid_font_metrics(format!(
                "line height must be positive, got {}",
                self.line_height
            )));
        }
        let widths = self.char_widths.iter().chain([&self.default_width]);
        if let Some(width) = widths.copied().find(|w| !w.is_finite() || *w < 0.0) {
            return Err(LayoutError::invalid_font_metrics(format!(
                "advance widths must be >= 0, got {width}"
            )));
        }
        Ok(())
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of a grapheme cluster
    pub fn grapheme_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            grapheme.chars().map(|c| self.width(c)).sum()
        }
    }

    /// Width of a run of text (no line breaks)
    pub fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true).map(|g| self.grapheme_width(g)).sum()
    }
}

/// Unique identifier for a loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u32);

impl FontId {
    /// The font every library starts with
    pub const DEFAULT: FontId = FontId(0);
}

/// Library of loaded fonts
#[derive(Debug, Clone)]
pub struct FontLibrary {
    fonts: FxHashMap<FontId, FontMetrics>,
    next_id: u32,
}

impl Default for FontLibrary {
    fn default() -> Self {
        let mut fonts = FxHashMap::default();
        fonts.insert(FontId::DEFAULT, FontMetrics::default());

        Self { fonts, next_id: 1 }
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new font and return its ID
    pub fn add(&mut self, metrics: FontMetrics) -> FontId {
        let id = FontId(self.next_id);
        self.next_id += 1;
        self.fonts.insert(id, metrics);
        id
    }

    /// Set font metrics for a specific ID
    pub fn set(&mut self, id: FontId, metrics: FontMetrics) {
        self.fonts.insert(id, metrics);
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    /// Get font metrics by ID
    pub fn get(&self, id: FontId) -> Option<&FontMetrics> {
        self.fonts.get(&id)
    }

    /// Metrics for `id`, falling back to the default font
    pub fn resolve(&self, id: FontId) -> &FontMetrics {
        self.fonts
            .get(&id)
            .or_else(|| self.fonts.get(&FontId::DEFAULT))
            .unwrap_or(&FALLBACK_METRICS)
    }
}

static FALLBACK_METRICS: FontMetrics = FontMetrics {
    line_height: 14.0,
    char_widths: Vec::new(),
    default_width: 7.0,
};

/// Device that measures text with per-character advance widths
#[derive(Debug, Clone)]
pub struct FixedMetricsDevice {
    fonts: FontLibrary,
    dpi: Point,
}

impl Default for FixedMetricsDevice {
    fn default() -> Self {
        Self::new(FontLibrary::default(), 72)
    }
}

impl FixedMetricsDevice {
    pub fn new(fonts: FontLibrary, dpi: i32) -> Self {
        Self {
            fonts,
            dpi: Point::new(dpi, dpi),
        }
    }

    /// Monospace default font at the given resolution
    pub fn monospace(char_width: f32, line_height: f32, dpi: i32) -> Self {
        let mut fonts = FontLibrary::new();
        fonts.set(FontId::DEFAULT, FontMetrics::monospace(char_width, line_height));
        Self::new(fonts, dpi)
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }
}

impl Device for FixedMetricsDevice {
    fn dpi(&self) -> Point {
        self.dpi
    }

    fn text_extent(&self, text: &str, font: FontId) -> Size {
        let metrics = self.fonts.resolve(font);
        Size::new(
            metrics.text_width(text).ceil() as i32,
            metrics.line_height.ceil() as i32,
        )
    }

    fn line_height(&self, font: FontId) -> i32 {
        self.fonts.resolve(font).line_height.ceil() as i32
    }
}
