//! Configuration options for extraction.
//!
//! The `Options` struct selects the extraction mode and the optional
//! post-processing applied to the produced lines.

use serde::{Deserialize, Serialize};

/// What to extract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Text nodes under the elements matching `Options::selector`.
    #[default]
    Text,
    /// `src`/`href` values of every element.
    Links,
}

/// Configuration options for extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for plain text extraction of the whole document.
///
/// # Example
///
/// ```rust
/// use rs_html_extract::{ExtractMode, Options};
///
/// let options = Options {
///     selector: Some("article p".to_string()),
///     skip_empty: true,
///     ..Options::default()
/// };
/// assert_eq!(options.mode, ExtractMode::Text);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Extraction mode.
    ///
    /// Default: `ExtractMode::Text`
    pub mode: ExtractMode,

    /// Selector for text mode. `None` selects the whole document.
    /// Ignored in link mode.
    ///
    /// Default: `None`
    pub selector: Option<String>,

    /// Absolute URL that relative links are resolved against in link mode.
    ///
    /// Default: `None` (links are returned as written)
    pub base_url: Option<String>,

    /// Drop lines that reference images, stylesheets or fonts.
    ///
    /// Default: `false`
    pub filter_assets: bool,

    /// Sort lines bytewise and remove duplicates.
    ///
    /// Default: `false`
    pub sort_unique: bool,

    /// Drop lines that are empty or whitespace-only.
    ///
    /// Default: `false`
    pub skip_empty: bool,
}

impl Options {
    /// Text mode restricted to `selector`.
    #[must_use]
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            mode: ExtractMode::Text,
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    /// Link mode.
    #[must_use]
    pub fn links() -> Self {
        Self {
            mode: ExtractMode::Links,
            ..Self::default()
        }
    }

    /// `mode` with every post-processing step enabled: the shape a page
    /// monitor diffs between crawls.
    #[must_use]
    pub fn crawler(mode: ExtractMode) -> Self {
        Self {
            mode,
            filter_assets: true,
            sort_unique: true,
            skip_empty: true,
            ..Self::default()
        }
    }

    /// Whether any post-processing step is enabled.
    #[must_use]
    pub fn has_postprocessing(&self) -> bool {
        self.filter_assets || self.sort_unique || self.skip_empty
    }
}
