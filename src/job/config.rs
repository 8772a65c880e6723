//! Page setup and job configuration

use crate::device::{Device, POINTS_PER_INCH};
use crate::error::{LayoutError, LayoutResult};
use crate::page::{Alignment, PageNumberDecoration, PagePrint, TextDecoration, DEFAULT_GAP};
use crate::print::{ColumnPrint, Print, TextPrint, MAX_COLUMNS};
use crate::{Point, Size};
use serde::{Deserialize, Deserializer, Serialize};
use std::rc::Rc;

/// Physical page size and margins, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSetup {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            page_width: 612.0, // US Letter
            page_height: 792.0,
            margin_top: 72.0, // 1 inch
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
        }
    }
}

impl PageSetup {
    /// Usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.page_width.is_finite() && self.page_height.is_finite())
            || self.page_width <= 0.0
            || self.page_height <= 0.0
        {
            return Err(LayoutError::invalid_page_setup(format!(
                "page size must be positive, got {}x{}",
                self.page_width, self.page_height
            )));
        }

        let margins = [
            ("top", self.margin_top),
            ("bottom", self.margin_bottom),
            ("left", self.margin_left),
            ("right", self.margin_right),
        ];
        for (side, margin) in margins {
            if !margin.is_finite() || margin < 0.0 {
                return Err(LayoutError::invalid_page_setup(format!(
                    "{side} margin must be >= 0, got {margin}"
                )));
            }
        }

        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(LayoutError::invalid_page_setup(format!(
                "margins leave no content area ({}x{})",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }

    /// Whole page in device units
    pub fn page_size(&self, dpi: Point) -> Size {
        Size::new(
            to_pixels(self.page_width, dpi.x),
            to_pixels(self.page_height, dpi.y),
        )
    }

    /// Content area origin and size in device units
    pub fn content_box(&self, dpi: Point) -> (Point, Size) {
        let origin = Point::new(
            to_pixels(self.margin_left, dpi.x),
            to_pixels(self.margin_top, dpi.y),
        );
        let size = Size::new(
            to_pixels(self.content_width(), dpi.x),
            to_pixels(self.content_height(), dpi.y),
        );
        (origin, size)
    }
}

fn to_pixels(points: f32, dpi: i32) -> i32 {
    (points * dpi as f32 / POINTS_PER_INCH as f32) as i32
}

/// Alignment names are matched case-insensitively
fn deserialize_alignment<'de, D>(deserializer: D) -> Result<Alignment, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Everything needed to paginate a plain text document.
///
/// ```json
/// {
///   "name": "report",
///   "page": { "pageWidth": 595, "pageHeight": 842 },
///   "headerText": "Quarterly report",
///   "pageNumberAlign": "right",
///   "columns": 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobConfig {
    pub name: String,
    pub page: PageSetup,
    /// Same line at the top of every page
    pub header_text: Option<String>,
    /// Points
    pub header_gap: i32,
    /// Points
    pub footer_gap: i32,
    /// "Page X of Y" footer
    pub page_numbers: bool,
    #[serde(deserialize_with = "deserialize_alignment")]
    pub page_number_align: Alignment,
    /// Body columns; a single column when unset
    pub columns: Option<u32>,
    /// Points
    pub column_spacing: i32,
    /// Stop with an error past this many pages
    pub max_pages: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: "document".to_string(),
            page: PageSetup::default(),
            header_text: None,
            header_gap: DEFAULT_GAP,
            footer_gap: DEFAULT_GAP,
            page_numbers: true,
            page_number_align: Alignment::Left,
            columns: None,
            column_spacing: 12,
            max_pages: super::DEFAULT_MAX_PAGES,
        }
    }
}

impl JobConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let config: JobConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting against the page it will be laid out on.
    ///
    /// Gaps may not exceed the content height and column spacing may not
    /// exceed the content width. Each column needs at least one point.
    pub fn validate(&self) -> LayoutResult<()> {
        self.page.validate()?;
        let width = self.page.content_width();
        let height = self.page.content_height();

        for (field, gap) in [("headerGap", self.header_gap), ("footerGap", self.footer_gap)] {
            if gap < 0 || gap as f32 > height {
                return Err(LayoutError::invalid_gap(field, gap));
            }
        }
        if let Some(columns) = self.columns {
            if !(2..=MAX_COLUMNS).contains(&columns) || columns as f32 > width {
                return Err(LayoutError::InvalidColumnCount { value: columns });
            }
        }
        if self.column_spacing < 0 || self.column_spacing as f32 > width {
            return Err(LayoutError::InvalidSpacing {
                value: self.column_spacing,
            });
        }
        if self.max_pages == 0 {
            return Err(LayoutError::invalid_config("maxPages must be at least 1"));
        }
        Ok(())
    }

    /// Assemble the print tree for `text`
    pub fn build_print(&self, text: &str) -> LayoutResult<Rc<dyn Print>> {
        let body: Rc<dyn Print> = match self.columns {
            Some(columns) => Rc::new(ColumnPrint::new(
                TextPrint::new(text),
                columns,
                self.column_spacing,
            )?),
            None => Rc::new(TextPrint::new(text)),
        };

        let mut print = PagePrint::from_shared(body);
        if let Some(header) = &self.header_text {
            print = print
                .with_header(TextDecoration::new(header.as_str()))
                .with_header_gap(self.header_gap)?;
        }
        if self.page_numbers {
            print = print
                .with_footer(PageNumberDecoration::new().with_align(self.page_number_align))
                .with_footer_gap(self.footer_gap)?;
        }
        Ok(Rc::new(print))
    }

    /// Content box of the configured page on `device`
    pub fn content_box(&self, device: &dyn Device) -> (Point, Size) {
        self.page.content_box(device.dpi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::testing::device;
    use crate::print::{PrintIterator, PrintPiece};

    #[test]
    fn test_page_setup_default() {
        let setup = PageSetup::default();
        assert_eq!(setup.content_width(), 468.0);
        assert_eq!(setup.content_height(), 648.0);
        assert!(setup.validate().is_ok());
    }

    #[test]
    fn test_content_box_scales_with_dpi() {
        let setup = PageSetup::default();
        let (origin, size) = setup.content_box(Point::new(144, 144));
        assert_eq!(origin, Point::new(144, 144));
        assert_eq!(size, Size::new(936, 1296));
        assert_eq!(setup.page_size(Point::new(96, 96)), Size::new(816, 1056));
    }

    #[test]
    fn test_page_setup_validation() {
        let mut setup = PageSetup::default();
        setup.page_height = 0.0;
        assert!(matches!(setup.validate(), Err(LayoutError::InvalidPageSetup { .. })));

        let mut setup = PageSetup::default();
        setup.margin_left = -1.0;
        assert!(setup.validate().is_err());

        let mut setup = PageSetup::default();
        setup.margin_left = 300.0;
        setup.margin_right = 312.0;
        assert!(setup.validate().is_err());
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config = JobConfig::from_json("{}").unwrap();
        assert_eq!(config, JobConfig::default());
        assert!(config.page_numbers);
        assert_eq!(config.page_number_align, Alignment::Left);
    }

    #[test]
    fn test_config_camel_case() {
        let config = JobConfig::from_json(
            r#"{
                "name": "report",
                "page": { "pageWidth": 595, "pageHeight": 842 },
                "headerText": "Quarterly report",
                "pageNumberAlign": "right",
                "columns": 2,
                "maxPages": 50
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "report");
        assert_eq!(config.page.page_width, 595.0);
        assert_eq!(config.page.margin_top, 72.0);
        assert_eq!(config.header_text.as_deref(), Some("Quarterly report"));
        assert_eq!(config.page_number_align, Alignment::Right);
        assert_eq!(config.columns, Some(2));
        assert_eq!(config.max_pages, 50);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(matches!(
            JobConfig::from_json(r#"{"headerGap": -1}"#),
            Err(LayoutError::InvalidGap { .. })
        ));
        let err = JobConfig::from_json(r#"{"pageNumberAlign": "justify"}"#).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig { .. }));
        assert!(err.to_string().contains("'justify'"));
        assert!(matches!(
            JobConfig::from_json(r#"{"columns": 1}"#),
            Err(LayoutError::InvalidColumnCount { value: 1 })
        ));
        assert!(matches!(
            JobConfig::from_json(r#"{"maxPages": 0}"#),
            Err(LayoutError::InvalidConfig { .. })
        ));
        assert!(matches!(
            JobConfig::from_json("not json"),
            Err(LayoutError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_config_rejects_values_larger_than_page() {
        // Default page: 468 x 648 points of content
        assert_eq!(
            JobConfig::from_json(r#"{"headerText": "T", "headerGap": 30000000}"#),
            Err(LayoutError::invalid_gap("headerGap", 30_000_000))
        );
        assert!(JobConfig::from_json(r#"{"footerGap": 649}"#).is_err());
        assert!(JobConfig::from_json(r#"{"footerGap": 648}"#).is_ok());

        assert_eq!(
            JobConfig::from_json(r#"{"columns": 2, "columnSpacing": 2000000000}"#),
            Err(LayoutError::InvalidSpacing {
                value: 2_000_000_000
            })
        );
        assert_eq!(
            JobConfig::from_json(r#"{"columns": 4000000000}"#),
            Err(LayoutError::InvalidColumnCount {
                value: 4_000_000_000
            })
        );
        assert!(JobConfig::from_json(r#"{"columns": 300}"#).is_err());

        let narrow = r#"{"page": {"pageWidth": 100, "marginLeft": 0, "marginRight": 0}, "columns": 101}"#;
        assert!(matches!(
            JobConfig::from_json(narrow),
            Err(LayoutError::InvalidColumnCount { value: 101 })
        ));
    }

    #[test]
    fn test_huge_gap_rejected_before_layout() {
        let config = JobConfig {
            header_text: Some("T".into()),
            header_gap: i32::MAX,
            ..JobConfig::default()
        };
        assert!(matches!(
            crate::job::PrintJob::from_config(&config, "body"),
            Err(LayoutError::InvalidGap { .. })
        ));
    }

    #[test]
    fn test_alignment_name_is_case_insensitive() {
        let config = JobConfig::from_json(r#"{"pageNumberAlign": "Center"}"#).unwrap();
        assert_eq!(config.page_number_align, Alignment::Center);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["pageNumberAlign"], "center");
    }

    #[test]
    fn test_build_print_without_decorations() {
        let config = JobConfig {
            page_numbers: false,
            ..JobConfig::default()
        };
        let print = config.build_print("hello").unwrap();
        let mut iter = print.iterator(&device());

        // Body comes back unwrapped
        let piece = iter.next(500, 500).unwrap();
        assert!(piece.entries().is_none());
    }

    #[test]
    fn test_build_print_with_header_and_footer() {
        let config = JobConfig {
            header_text: Some("Title".into()),
            ..JobConfig::default()
        };
        let print = config.build_print("hello").unwrap();
        let mut iter = print.iterator(&device());

        let piece = iter.next(500, 500).unwrap();
        assert_eq!(piece.entries().unwrap().len(), 3);
    }
}
