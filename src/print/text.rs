//! Wrapped text

use super::{Print, PrintIterator, PrintPiece};
use crate::device::{Device, FontId, Surface};
use crate::Size;
use std::ops::Range;
use std::rc::Rc;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Plain text in a single font, wrapped to the width it is given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrint {
    text: Rc<str>,
    font: FontId,
}

impl TextPrint {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Rc::from(text.into()),
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

    pub fn font(&self) -> FontId {
        self.font
    }
}

impl Print for TextPrint {
    fn iterator(&self, device: &Rc<dyn Device>) -> Box<dyn PrintIterator> {
        Box::new(TextIterator::new(self, Rc::clone(device)))
    }
}

/// A line chosen by the breaker, as byte offsets into the source text
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineBreak {
    /// Text to paint (trailing whitespace excluded)
    painted: Range<usize>,
    /// Where the following line starts
    next: usize,
    width: i32,
}

/// Greedy line breaker over UAX #14 break opportunities
struct LineBreaker<'a> {
    device: &'a dyn Device,
    font: FontId,
}

impl LineBreaker<'_> {
    fn width(&self, text: &str) -> i32 {
        self.device.text_extent(text, self.font).width
    }

    /// Longest line starting at `start` that fits in `max_width`
    fn next_line(&self, text: &str, start: usize, max_width: i32) -> Option<LineBreak> {
        let rest = &text[start..];
        if rest.is_empty() {
            // Empty text still occupies one line
            return (max_width >= 0).then_some(LineBreak {
                painted: start..start,
                next: start,
                width: 0,
            });
        }

        let mut fitted = None;
        // A soft break that paints nothing; used only if no grapheme fits
        let mut blank = None;
        for (pos, opportunity) in linebreaks(rest) {
            let painted = trim_line_end(&rest[..pos]);
            let width = self.width(painted);
            if width > max_width {
                break;
            }

            let line = LineBreak {
                painted: start..start + painted.len(),
                next: start + pos,
                width,
            };
            if matches!(opportunity, BreakOpportunity::Mandatory) {
                return Some(line);
            }
            if painted.is_empty() {
                blank = Some(line);
            } else {
                fitted = Some(line);
            }
        }

        fitted
            .or_else(|| self.break_graphemes(text, start, max_width))
            .or(blank)
    }

    /// Emergency break inside a word that is wider than the line
    fn break_graphemes(&self, text: &str, start: usize, max_width: i32) -> Option<LineBreak> {
        let rest = &text[start..];
        let mut end = 0;
        let mut width = 0;

        for (idx, grapheme) in rest.grapheme_indices(true) {
            let candidate = idx + grapheme.len();
            let candidate_width = self.width(&rest[..candidate]);
            if candidate_width > max_width {
                break;
            }
            end = candidate;
            width = candidate_width;
        }

        (end > 0).then(|| LineBreak {
            painted: start..start + end,
            next: start + end,
            width,
        })
    }
}

fn trim_line_end(text: &str) -> &str {
    text.trim_end_matches(char::is_whitespace)
}

/// Position within the text; copied wholesale for rollback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextCursor {
    offset: usize,
    finished: bool,
}

#[derive(Clone)]
struct TextIterator {
    device: Rc<dyn Device>,
    text: Rc<str>,
    font: FontId,
    line_height: i32,
    minimum_size: Size,
    preferred_size: Size,
    cursor: TextCursor,
}

impl TextIterator {
    fn new(print: &TextPrint, device: Rc<dyn Device>) -> Self {
        let text = Rc::clone(&print.text);
        let font = print.font;
        let line_height = device.line_height(font);

        let breaker = LineBreaker {
            device: &*device,
            font,
        };

        // Widest segment between two break opportunities
        let mut min_width = 0;
        let mut segment_start = 0;
        for (pos, _) in linebreaks(&text) {
            min_width = min_width.max(breaker.width(trim_line_end(&text[segment_start..pos])));
            segment_start = pos;
        }

        let mut hard_lines = 0;
        let mut max_line_width = 0;
        for line in text.lines() {
            hard_lines += 1;
            max_line_width = max_line_width.max(breaker.width(line));
        }

        Self {
            minimum_size: Size::new(min_width, line_height),
            preferred_size: Size::new(max_line_width, line_height * hard_lines.max(1)),
            device,
            text,
            font,
            line_height,
            cursor: TextCursor {
                offset: 0,
                finished: false,
            },
        }
    }
}

impl PrintIterator for TextIterator {
    fn has_next(&self) -> bool {
        !self.cursor.finished
    }

    fn next(&mut self, width: i32, height: i32) -> Option<Box<dyn PrintPiece>> {
        if self.cursor.finished || height < self.line_height {
            return None;
        }

        let breaker = LineBreaker {
            device: &*self.device,
            font: self.font,
        };

        // Work on a copy of the cursor; commit only if at least one line fits
        let mut cursor = self.cursor;
        let mut lines = Vec::new();
        let mut y = 0;
        let mut max_width = 0;

        while !cursor.finished && y + self.line_height <= height {
            let Some(line) = breaker.next_line(&self.text, cursor.offset, width) else {
                break;
            };

            lines.push(TextLine {
                text: self.text[line.painted].to_string(),
                y,
            });
            max_width = max_width.max(line.width);
            y += self.line_height;

            cursor.offset = line.next;
            cursor.finished = cursor.offset >= self.text.len();
        }

        if lines.is_empty() {
            return None;
        }

        self.cursor = cursor;
        Some(Box::new(TextPiece {
            lines,
            size: Size::new(max_width, y),
            font: self.font,
        }))
    }

    fn minimum_size(&self) -> Size {
        self.minimum_size
    }

    fn preferred_size(&self) -> Size {
        self.preferred_size
    }
}

#[derive(Debug, Clone)]
struct TextLine {
    text: String,
    y: i32,
}

#[derive(Debug)]
struct TextPiece {
    lines: Vec<TextLine>,
    size: Size,
    font: FontId,
}

impl PrintPiece for TextPiece {
    fn size(&self) -> Size {
        self.size
    }

    fn paint(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        for line in &self.lines {
            surface.draw_text(&line.text, x, y + line.y, self.font);
        }
    }
}
