//! Error types
//!
//! Fit failures are not errors: an iterator that cannot lay out content in the
//! space given returns `None`. `LayoutError` covers the two other cases:
//! configuration that is rejected up front, and a print job that cannot be
//! paginated at all.

use thiserror::Error;

/// Result type alias for fallible pagination APIs
pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// A gap between page regions was negative or taller than the page
    #[error("Invalid gap for '{field}': {value} - gap must be >= 0 and fit on the page")]
    InvalidGap { field: String, value: i32 },

    /// Column layouts need at least two columns, each at least a point wide
    #[error("Invalid column count: {value} - columns must be >= 2 and fit across the page")]
    InvalidColumnCount { value: u32 },

    /// Column spacing was negative or wider than the page
    #[error("Invalid column spacing: {value} - spacing must be >= 0 and fit across the page")]
    InvalidSpacing { value: i32 },

    /// Unknown horizontal alignment name
    #[error("Invalid alignment: '{value}' (expected left, center or right)")]
    InvalidAlignment { value: String },

    /// Page dimensions or margins leave no usable content box
    #[error("Invalid page setup: {reason}")]
    InvalidPageSetup { reason: String },

    /// Font metrics that cannot measure text
    #[error("Invalid font metrics: {reason}")]
    InvalidFontMetrics { reason: String },

    /// Job configuration could not be read
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Content remains but cannot be laid out on an empty page
    #[error("Page {page_index} does not fit: no content fits in {width}x{height}")]
    PageDoesNotFit {
        page_index: usize,
        width: i32,
        height: i32,
    },

    /// Content kept producing pages past the configured limit
    #[error("Page limit exceeded: content remains after {limit} pages")]
    PageLimitExceeded { limit: usize },
}

impl LayoutError {
    pub fn invalid_gap(field: impl Into<String>, value: i32) -> Self {
        LayoutError::InvalidGap {
            field: field.into(),
            value,
        }
    }

    pub fn invalid_page_setup(reason: impl Into<String>) -> Self {
        LayoutError::InvalidPageSetup {
            reason: reason.into(),
        }
    }

    pub fn invalid_font_metrics(reason: impl Into<String>) -> Self {
        LayoutError::InvalidFontMetrics {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        LayoutError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Whether this error was raised while validating configuration
    pub fn is_config_error(&self) -> bool {
        !matches!(
            self,
            LayoutError::PageDoesNotFit { .. } | LayoutError::PageLimitExceeded { .. }
        )
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::invalid_config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::invalid_gap("header_gap", -3);
        assert_eq!(
            err.to_string(),
            "Invalid gap for 'header_gap': -3 - gap must be >= 0 and fit on the page"
        );

        let err = LayoutError::PageDoesNotFit {
            page_index: 2,
            width: 100,
            height: 40,
        };
        assert_eq!(
            err.to_string(),
            "Page 2 does not fit: no content fits in 100x40"
        );
    }

    #[test]
    fn test_config_error_classification() {
        assert!(LayoutError::InvalidColumnCount { value: 1 }.is_config_error());
        assert!(!LayoutError::PageLimitExceeded { limit: 10 }.is_config_error());
    }

    #[test]
    fn test_from_json_error() {
        let err: LayoutError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, LayoutError::InvalidConfig { .. }));
    }
}
