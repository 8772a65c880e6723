//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for paginated output:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x4D504752 = "MPGR" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     text_buffer_len
//! [4]     op_count (all pages)
//! [5..]   page data...
//!
//! Per-page:
//!   page_index
//!   op_count
//!   per-op: [text_offset, text_len, text_utf16_offset, text_utf16_len, font_id]
//!     text_offset/text_len: byte offsets in text_data (UTF-8)
//!     text_utf16_offset/text_utf16_len: offsets for JS substring (after single decode)
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-page: [width, height]
//! Per-op: [x, y]
//! ```

use crate::device::PaintOp;
use crate::job::RenderedPage;

/// Magic number for format validation: "MPGR" (Mini PaGeR)
pub const MAGIC: u32 = 0x4D504752;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 5;

/// u32 values per page header: [page_index, op_count]
pub const U32_PER_PAGE: usize = 2;

/// u32 values per paint op: [text_offset, text_len, text_utf16_offset, text_utf16_len, font_id]
pub const U32_PER_OP: usize = 5;

/// f32 values per page: [width, height]
pub const F32_PER_PAGE: usize = 2;

/// f32 values per paint op: [x, y]
pub const F32_PER_OP: usize = 2;

/// Render buffer for zero-copy WASM transfer
pub struct RenderBuffer {
    /// Integer data (indices, counts, offsets)
    pub u32_data: Vec<u32>,
    /// Float data (positions, dimensions)
    pub f32_data: Vec<f32>,
    /// UTF-8 text buffer
    pub text_data: Vec<u8>,

    // Track cumulative UTF-16 offset for efficient JS decoding
    utf16_text_offset: usize,
    op_count: usize,
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(1024),
            f32_data: Vec::with_capacity(1024),
            text_data: Vec::with_capacity(4096),
            utf16_text_offset: 0,
            op_count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
        self.utf16_text_offset = 0;
        self.op_count = 0;
    }

    /// Pre-allocate buffers to avoid reallocation while writing.
    /// JS holds pointers to these buffers, so a realloc would leave them dangling.
    ///
    /// Call this before write_header() with estimated sizes:
    /// - u32_needed: HEADER_SIZE + pages * U32_PER_PAGE + ops * U32_PER_OP
    /// - f32_needed: pages * F32_PER_PAGE + ops * F32_PER_OP
    /// - text_needed: sum of text bytes
    pub fn prepare(&mut self, u32_needed: usize, f32_needed: usize, text_needed: usize) {
        // Target capacities with headroom
        let u32_target = u32_needed + 32;
        let f32_target = f32_needed + 32;
        let text_target = text_needed + 256;

        // Reuse buffers if capacity is sufficient
        if self.u32_data.capacity() < u32_target {
            self.u32_data = Vec::with_capacity(u32_target);
        } else {
            self.u32_data.clear();
        }

        if self.f32_data.capacity() < f32_target {
            self.f32_data = Vec::with_capacity(f32_target);
        } else {
            self.f32_data.clear();
        }

        if self.text_data.capacity() < text_target {
            self.text_data = Vec::with_capacity(text_target);
        } else {
            self.text_data.clear();
        }

        self.utf16_text_offset = 0;
        self.op_count = 0;
    }

    /// Write header; counts are filled in by finalize()
    pub fn write_header(&mut self, page_count: u32) {
        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(page_count); // [2] page_count
        self.u32_data.push(0); // [3] text_buffer_len (placeholder)
        self.u32_data.push(0); // [4] op_count (placeholder)
    }

    /// Synchronize header counts. Must be called after all pages are written.
    pub fn finalize(&mut self) {
        if self.u32_data.len() < HEADER_SIZE {
            return;
        }

        self.u32_data[3] = self.text_data.len() as u32;
        self.u32_data[4] = self.op_count as u32;

        #[cfg(debug_assertions)]
        self.validate_text_offsets();
    }

    /// Validate that all text offsets are within bounds (debug builds only)
    #[cfg(debug_assertions)]
    fn validate_text_offsets(&self) {
        let page_count = self.u32_data[2] as usize;
        let text_len = self.text_data.len();
        let mut idx = HEADER_SIZE;

        for page_idx in 0..page_count {
            if idx + 1 >= self.u32_data.len() {
                break;
            }

            let op_count = self.u32_data[idx + 1] as usize;
            idx += U32_PER_PAGE;

            for op_idx in 0..op_count {
                if idx + U32_PER_OP > self.u32_data.len() {
                    break;
                }

                let text_offset = self.u32_data[idx] as usize;
                let text_length = self.u32_data[idx + 1] as usize;
                debug_assert!(
                    text_offset + text_length <= text_len,
                    "Invalid text range for page {}, op {}: offset {} + length {} > text buffer size {}",
                    page_idx,
                    op_idx,
                    text_offset,
                    text_length,
                    text_len
                );

                idx += U32_PER_OP;
            }
        }
    }

    /// Write page header, returns index where op_count should be written
    pub fn begin_page(&mut self, page_index: usize, width: f32, height: f32) -> usize {
        self.u32_data.push(page_index as u32);
        let op_count_idx = self.u32_data.len();
        self.u32_data.push(0); // op_count placeholder

        self.f32_data.push(width);
        self.f32_data.push(height);

        op_count_idx
    }

    /// Update op count for a page
    pub fn set_op_count(&mut self, idx: usize, count: u32) {
        if idx < self.u32_data.len() {
            self.u32_data[idx] = count;
        }
    }

    /// Write a text run
    pub fn write_text(&mut self, x: f32, y: f32, text: &str, font_id: u32) {
        let text_offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(text.as_bytes());
        let text_len = text.len() as u32;

        // UTF-16 offset and length for JS substring
        let text_utf16_offset = self.utf16_text_offset as u32;
        let text_utf16_len = text.chars().map(|c| c.len_utf16()).sum::<usize>() as u32;
        self.utf16_text_offset += text_utf16_len as usize;

        debug_assert!(
            (text_offset as u64) + (text_len as u64) <= u32::MAX as u64,
            "Text offset + length overflow: {} + {} > u32::MAX",
            text_offset,
            text_len
        );

        self.u32_data.push(text_offset);
        self.u32_data.push(text_len);
        self.u32_data.push(text_utf16_offset);
        self.u32_data.push(text_utf16_len);
        self.u32_data.push(font_id);

        self.f32_data.push(x);
        self.f32_data.push(y);

        self.op_count += 1;
    }

    /// Encode rendered pages, replacing any previous content
    pub fn write_pages(&mut self, pages: &[RenderedPage]) {
        let op_total: usize = pages.iter().map(|p| p.ops.len()).sum();
        let text_total: usize = pages
            .iter()
            .flat_map(|p| &p.ops)
            .map(|op| op.text().len())
            .sum();

        self.prepare(
            HEADER_SIZE + pages.len() * U32_PER_PAGE + op_total * U32_PER_OP,
            pages.len() * F32_PER_PAGE + op_total * F32_PER_OP,
            text_total,
        );
        self.write_header(pages.len() as u32);

        for page in pages {
            let op_count_idx = self.begin_page(page.index, page.width as f32, page.height as f32);
            for op in &page.ops {
                match op {
                    PaintOp::Text { x, y, text, font } => {
                        self.write_text(*x as f32, *y as f32, text, *font)
                    }
                }
            }
            self.set_op_count(op_count_idx, page.ops.len() as u32);
        }

        self.finalize();
    }

    // Accessors for WASM
    // Return u32 instead of usize for explicit WASM contract (wasm32 linear memory uses u32 offsets)

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }

    pub fn f32_ptr(&self) -> u32 {
        self.f32_data.as_ptr() as u32
    }

    pub fn f32_len(&self) -> u32 {
        self.f32_data.len() as u32
    }

    pub fn text_ptr(&self) -> u32 {
        self.text_data.as_ptr() as u32
    }

    pub fn text_len(&self) -> u32 {
        self.text_data.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_op(x: i32, y: i32, text: &str) -> PaintOp {
        PaintOp::Text {
            x,
            y,
            text: text.into(),
            font: 0,
        }
    }

    #[test]
    fn test_render_buffer_basic() {
        let mut buf = RenderBuffer::new();
        buf.write_header(1);

        let op_idx = buf.begin_page(0, 816.0, 1056.0);
        buf.write_text(96.0, 96.0, "Hello", 0);
        buf.set_op_count(op_idx, 1);
        buf.finalize();

        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.u32_data[1], SCHEMA_VERSION);
        assert_eq!(buf.u32_data[2], 1); // page_count
        assert_eq!(buf.u32_data[3], 5); // text_buffer_len
        assert_eq!(buf.u32_data[4], 1); // op_count
        assert_eq!(buf.text_data, b"Hello");
        assert_eq!(buf.f32_data, vec![816.0, 1056.0, 96.0, 96.0]);
    }

    #[test]
    fn test_magic_spells_mpgr() {
        assert_eq!(&MAGIC.to_be_bytes(), b"MPGR");
    }

    #[test]
    fn test_write_pages_layout() {
        let pages = vec![
            RenderedPage {
                index: 0,
                width: 300,
                height: 400,
                ops: vec![text_op(10, 20, "one"), text_op(10, 380, "Page 1 of 2")],
            },
            RenderedPage {
                index: 1,
                width: 300,
                height: 400,
                ops: vec![text_op(10, 20, "two")],
            },
        ];

        let mut buf = RenderBuffer::new();
        buf.write_pages(&pages);

        assert_eq!(buf.u32_data[2], 2);
        assert_eq!(buf.u32_data[4], 3);
        assert_eq!(
            buf.u32_len() as usize,
            HEADER_SIZE + 2 * U32_PER_PAGE + 3 * U32_PER_OP
        );
        assert_eq!(buf.f32_len() as usize, 2 * F32_PER_PAGE + 3 * F32_PER_OP);

        // Second page header follows the first page's two ops
        let second_page = HEADER_SIZE + U32_PER_PAGE + 2 * U32_PER_OP;
        assert_eq!(buf.u32_data[second_page], 1);
        assert_eq!(buf.u32_data[second_page + 1], 1);

        // "two" starts after "one" + "Page 1 of 2"
        let op = second_page + U32_PER_PAGE;
        assert_eq!(buf.u32_data[op], 14);
        assert_eq!(buf.u32_data[op + 1], 3);
        assert_eq!(&buf.text_data[14..17], b"two");
    }

    #[test]
    fn test_write_pages_replaces_previous_content() {
        let page = RenderedPage {
            index: 0,
            width: 10,
            height: 10,
            ops: vec![text_op(0, 0, "x")],
        };

        let mut buf = RenderBuffer::new();
        buf.write_pages(std::slice::from_ref(&page));
        buf.write_pages(std::slice::from_ref(&page));

        assert_eq!(buf.u32_data[0], MAGIC);
        assert_eq!(buf.text_data, b"x");
        assert_eq!(buf.u32_data[4], 1);
    }

    #[test]
    fn test_prepare_prevents_reallocation() {
        let mut buf = RenderBuffer::new();

        let page_count = 2;
        let op_count = 100;
        let avg_text_len = 50;

        let u32_needed = HEADER_SIZE + page_count * U32_PER_PAGE + op_count * U32_PER_OP;
        let f32_needed = page_count * F32_PER_PAGE + op_count * F32_PER_OP;
        let text_needed = op_count * avg_text_len;

        buf.prepare(u32_needed, f32_needed, text_needed);

        let u32_capacity = buf.u32_data.capacity();
        let f32_capacity = buf.f32_data.capacity();
        let text_capacity = buf.text_data.capacity();

        buf.write_header(page_count as u32);
        for p in 0..page_count {
            let op_idx = buf.begin_page(p, 816.0, 1056.0);
            for _ in 0..50 {
                buf.write_text(96.0, 96.0, "Hello, World! This is a test line with some text.", 0);
            }
            buf.set_op_count(op_idx, 50);
        }
        buf.finalize();

        assert_eq!(buf.u32_data.capacity(), u32_capacity, "u32_data was reallocated");
        assert_eq!(buf.f32_data.capacity(), f32_capacity, "f32_data was reallocated");
        assert_eq!(buf.text_data.capacity(), text_capacity, "text_data was reallocated");
    }

    #[test]
    fn test_utf16_offsets_for_batch_decode() {
        let mut buf = RenderBuffer::new();
        buf.write_header(1);

        let op_count_idx = buf.begin_page(0, 800.0, 1200.0);

        // ASCII text (1 byte = 1 UTF-16 code unit)
        buf.write_text(0.0, 0.0, "Hello World", 0);

        // "Test 😀 emoji" = "Test " (5) + 😀 (2 UTF-16) + " emoji" (6) = 13 UTF-16 units
        buf.write_text(0.0, 20.0, "Test 😀 emoji", 0);

        // "Привет мир" = 10 chars, each 1 UTF-16 unit
        buf.write_text(0.0, 40.0, "Привет мир", 1);

        buf.set_op_count(op_count_idx, 3);
        buf.finalize();

        let first = HEADER_SIZE + U32_PER_PAGE;
        assert_eq!(buf.u32_data[first + 2], 0, "Op 1 utf16 offset");
        assert_eq!(buf.u32_data[first + 3], 11, "Op 1 utf16 len");

        assert_eq!(buf.u32_data[first + U32_PER_OP + 2], 11, "Op 2 utf16 offset");
        assert_eq!(buf.u32_data[first + U32_PER_OP + 3], 13, "Op 2 utf16 len (emoji is 2 UTF-16 units)");

        assert_eq!(buf.u32_data[first + U32_PER_OP * 2 + 2], 24, "Op 3 utf16 offset");
        assert_eq!(buf.u32_data[first + U32_PER_OP * 2 + 3], 10, "Op 3 utf16 len");
        assert_eq!(buf.u32_data[first + U32_PER_OP * 2 + 4], 1, "Op 3 font id");

        assert_eq!(buf.utf16_text_offset, 34, "Total UTF-16 offset should be 11 + 13 + 10");
    }
}
