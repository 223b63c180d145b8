//! # rs-html-extract
//!
//! Fault-tolerant HTML text and link extraction.
//!
//! Markup is tokenized, built into an arena-backed tree with lenient
//! recovery for malformed input, optionally queried with a CSS selector
//! subset, and flattened into lines of text or a list of `src`/`href`
//! references.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_html_extract::{extract_links, extract_text};
//!
//! let html = r#"<div class="item"><span>One</span></div>
//! <a href="/next">Next</a><img src="/logo.png">"#;
//!
//! assert_eq!(extract_text(html, Some("div.item > span"))?, vec!["One"]);
//! assert_eq!(extract_links(html), vec!["/next", "/logo.png"]);
//! # Ok::<(), rs_html_extract::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Lenient parsing**: malformed markup never fails; unclosed, stray and
//!   misnested tags are recovered
//! - **Selectors**: type, class, id, attribute filters, descendant, child and
//!   sibling combinators, selector lists
//! - **Crawler post-processing**: asset filtering, sort and dedupe, blank
//!   line removal
//! - **Charset detection** for raw bytes

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// Arena-backed document tree.
pub mod dom;

/// Character reference decoding.
pub mod entities;

/// Lazy HTML tokenizer.
pub mod tokenizer;

/// Tree construction with error recovery.
pub mod tree_builder;

/// CSS selector parsing and matching.
pub mod selector;

/// Text and link collection plus line post-processing.
pub mod extractor;

/// URL utilities for resolving extracted links.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use options::{ExtractMode, Options};
pub use result::ExtractResult;
pub use selector::Selector;
pub use tree_builder::parse;

/// Extracts the text under every element matching `selector`.
///
/// Each text node becomes one entry, in document order. With no selector the
/// whole document is used. An element matched inside another matched
/// element contributes its text once per match.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] if `selector` cannot be parsed.
/// Malformed markup is never an error.
///
/// # Example
///
/// ```rust
/// use rs_html_extract::extract_text;
///
/// let lines = extract_text("<p>Hello <b>World</b></p>", Some("p"))?;
/// assert_eq!(lines, vec!["Hello ", "World"]);
/// # Ok::<(), rs_html_extract::Error>(())
/// ```
pub fn extract_text(html: &str, selector: Option<&str>) -> Result<Vec<String>> {
    let options = Options {
        selector: selector.map(str::to_string),
        ..Options::default()
    };
    extract::extract_content(html, &options).map(|result| result.lines)
}

/// Extracts the `src` (or, failing that, `href`) of every element in
/// document order.
///
/// # Example
///
/// ```rust
/// use rs_html_extract::extract_links;
///
/// let links = extract_links(r#"<a href="/x">x</a><img src="/y.png">"#);
/// assert_eq!(links, vec!["/x", "/y.png"]);
/// ```
#[must_use]
pub fn extract_links(html: &str) -> Vec<String> {
    extractor::collect_links(&parse(html), None)
}

/// Extracts text or links with custom options.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] for an unparseable selector in text
/// mode and [`Error::InvalidBaseUrl`] for an unusable base URL in link mode.
///
/// # Example
///
/// ```rust
/// use rs_html_extract::{extract_with_options, ExtractMode, Options};
///
/// let html = r#"<a href="/b">b</a><a href="/a">a</a><img src="/a.png"><a href="/b">b</a>"#;
/// let result = extract_with_options(html, &Options::crawler(ExtractMode::Links))?;
/// assert_eq!(result.joined(), "/a\n/b");
/// # Ok::<(), rs_html_extract::Error>(())
/// ```
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractResult> {
    extract::extract_content(html, options)
}

/// Extracts from raw bytes, detecting the character encoding first.
///
/// See [`encoding::detect_encoding`] for how the encoding is chosen. Invalid
/// byte sequences are replaced with U+FFFD rather than causing errors.
///
/// # Errors
///
/// Same as [`extract_with_options`].
///
/// # Example
///
/// ```rust
/// use rs_html_extract::{extract_bytes, Options};
///
/// let html = b"<meta charset=\"ISO-8859-1\"><p>Caf\xE9</p>";
/// let result = extract_bytes(html, &Options::text("p"))?;
/// assert_eq!(result.lines, vec!["Caf\u{e9}"]);
/// # Ok::<(), rs_html_extract::Error>(())
/// ```
pub fn extract_bytes(html: &[u8], options: &Options) -> Result<ExtractResult> {
    let html = encoding::transcode_to_utf8(html);
    extract_with_options(&html, options)
}
