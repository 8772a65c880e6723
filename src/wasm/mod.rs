//! WASM bindings for the pager

mod flat_buffer;

pub use flat_buffer::{
    RenderBuffer, F32_PER_OP, F32_PER_PAGE, HEADER_SIZE, MAGIC, SCHEMA_VERSION, U32_PER_OP,
    U32_PER_PAGE,
};

use crate::device::{Device, FixedMetricsDevice, FontId, FontLibrary, FontMetrics};
use crate::error::{LayoutError, LayoutResult};
use crate::job::{JobConfig, PageSetup, PrintJob, RenderedJob, RenderedPage};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Screen resolution used for all measurements
pub const SCREEN_DPI: i32 = 96;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed pager
#[wasm_bindgen]
pub struct WasmPager {
    config: JobConfig,
    fonts: FontLibrary,
    pages: Vec<RenderedPage>,
    buffer: RenderBuffer,
}

#[wasm_bindgen]
impl WasmPager {
    /// Create a pager with default page size (US Letter, 1" margins)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_config(JobConfig::default())
    }

    /// Create pager with custom page dimensions, in points
    #[wasm_bindgen(js_name = withDimensions)]
    pub fn with_dimensions(
        page_width: f32,
        page_height: f32,
        margin_top: f32,
        margin_bottom: f32,
        margin_left: f32,
        margin_right: f32,
    ) -> Result<WasmPager, JsError> {
        let page = PageSetup {
            page_width,
            page_height,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
        };
        page.validate()?;

        Ok(Self::with_config(JobConfig {
            page,
            ..JobConfig::default()
        }))
    }

    /// Create pager from a JSON job configuration
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<WasmPager, JsError> {
        Ok(Self::with_config(JobConfig::from_json(json)?))
    }

    /// Register per-character advance widths for a font
    #[wasm_bindgen(js_name = setFontMetrics)]
    pub fn set_font_metrics(
        &mut self,
        font_id: u32,
        line_height: f32,
        char_widths: Vec<f32>,
        default_width: f32,
    ) -> Result<(), JsError> {
        Ok(self.update_font_metrics(
            FontId(font_id),
            FontMetrics::new(line_height, char_widths, default_width),
        )?)
    }

    /// Text repeated at the top of every page; empty removes the header
    #[wasm_bindgen(js_name = setHeaderText)]
    pub fn set_header_text(&mut self, text: &str) {
        self.config.header_text = (!text.is_empty()).then(|| text.to_string());
    }

    /// Toggle the "Page X of Y" footer
    #[wasm_bindgen(js_name = setPageNumbers)]
    pub fn set_page_numbers(&mut self, enabled: bool, align: &str) -> Result<(), JsError> {
        Ok(self.update_page_numbers(enabled, align)?)
    }

    /// Lay the body out in columns; spacing in points
    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&mut self, columns: u32, spacing: i32) -> Result<(), JsError> {
        Ok(self.update_columns(Some(columns), spacing)?)
    }

    /// Back to a single body column
    #[wasm_bindgen(js_name = clearColumns)]
    pub fn clear_columns(&mut self) {
        self.config.columns = None;
    }

    /// Paginate `text`, returning the page count
    pub fn paginate(&mut self, text: &str) -> Result<usize, JsError> {
        Ok(self.run(text)?)
    }

    /// Get page count of the last pagination
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get render data of the last pagination as JSON
    #[wasm_bindgen(js_name = getRenderData)]
    pub fn get_render_data(&self) -> Result<String, JsError> {
        Ok(self.render_json()?)
    }

    // Zero-copy accessors: JS reads the buffers straight out of linear memory

    #[wasm_bindgen(js_name = u32Ptr)]
    pub fn u32_ptr(&self) -> u32 {
        self.buffer.u32_ptr()
    }

    #[wasm_bindgen(js_name = u32Len)]
    pub fn u32_len(&self) -> u32 {
        self.buffer.u32_len()
    }

    #[wasm_bindgen(js_name = f32Ptr)]
    pub fn f32_ptr(&self) -> u32 {
        self.buffer.f32_ptr()
    }

    #[wasm_bindgen(js_name = f32Len)]
    pub fn f32_len(&self) -> u32 {
        self.buffer.f32_len()
    }

    #[wasm_bindgen(js_name = textPtr)]
    pub fn text_ptr(&self) -> u32 {
        self.buffer.text_ptr()
    }

    #[wasm_bindgen(js_name = textLen)]
    pub fn text_len(&self) -> u32 {
        self.buffer.text_len()
    }

    // Copying accessors, for callers that cannot view linear memory

    #[wasm_bindgen(js_name = getU32Data)]
    pub fn get_u32_data(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(&self.buffer.u32_data[..])
    }

    #[wasm_bindgen(js_name = getF32Data)]
    pub fn get_f32_data(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.buffer.f32_data[..])
    }

    #[wasm_bindgen(js_name = getTextData)]
    pub fn get_text_data(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.buffer.text_data[..])
    }
}

impl Default for WasmPager {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmPager {
    pub fn with_config(config: JobConfig) -> Self {
        Self {
            config,
            fonts: FontLibrary::default(),
            pages: Vec::new(),
            buffer: RenderBuffer::new(),
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    pub fn pages(&self) -> &[RenderedPage] {
        &self.pages
    }

    fn update_page_numbers(&mut self, enabled: bool, align: &str) -> LayoutResult<()> {
        self.config.page_number_align = align.parse()?;
        self.config.page_numbers = enabled;
        Ok(())
    }

    fn update_font_metrics(&mut self, id: FontId, metrics: FontMetrics) -> LayoutResult<()> {
        metrics.validate()?;
        self.fonts.set(id, metrics);
        Ok(())
    }

    /// Last pagination as a [`RenderedJob`] JSON document
    pub fn render_json(&self) -> serde_json::Result<String> {
        let rendered = RenderedJob {
            name: self.config.name.clone(),
            page_count: self.pages.len(),
            pages: self.pages.clone(),
        };
        serde_json::to_string(&rendered)
    }

    fn update_columns(&mut self, columns: Option<u32>, spacing: i32) -> LayoutResult<()> {
        if let Some(count) = columns {
            if !(2..=crate::print::MAX_COLUMNS).contains(&count) {
                return Err(LayoutError::InvalidColumnCount { value: count });
            }
        }
        if spacing < 0 {
            return Err(LayoutError::InvalidSpacing { value: spacing });
        }
        self.config.columns = columns;
        self.config.column_spacing = spacing;
        Ok(())
    }

    /// Paginate and encode the result into the flat buffer.
    ///
    /// On error the previous result is kept.
    pub fn run(&mut self, text: &str) -> LayoutResult<usize> {
        let started = current_timestamp();
        let device: Rc<dyn Device> =
            Rc::new(FixedMetricsDevice::new(self.fonts.clone(), SCREEN_DPI));

        let job = PrintJob::from_config(&self.config, text)?;
        let pages: Vec<RenderedPage> = job.paginate(&device)?.iter().map(|p| p.render()).collect();

        self.buffer.write_pages(&pages);
        self.pages = pages;

        tracing::debug!(
            target: "mini_pager::wasm",
            pages = self.pages.len(),
            elapsed_ms = current_timestamp().saturating_sub(started),
            "paginated"
        );
        Ok(self.pages.len())
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
