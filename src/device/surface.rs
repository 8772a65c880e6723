//! Recording surface: render-ready list of paint operations

use super::{FontId, Surface};
use serde::{Deserialize, Serialize};

/// A single paint operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PaintOp {
    /// Text run with its top-left corner at (x, y)
    Text {
        x: i32,
        y: i32,
        text: String,
        font: u32,
    },
}

impl PaintOp {
    pub fn text(&self) -> &str {
        match self {
            PaintOp::Text { text, .. } => text,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        match self {
            PaintOp::Text { x, y, .. } => (*x, *y),
        }
    }
}

/// Surface that keeps every operation painted on it
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PaintOp> {
        self.ops
    }

    /// Text of every operation, in paint order
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().map(PaintOp::text).collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: FontId) {
        self.ops.push(PaintOp::Text {
            x,
            y,
            text: text.to_string(),
            font: font.0,
        });
    }
}
