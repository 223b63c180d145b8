//! Extraction pipeline: validate configuration, build the tree, collect
//! lines, post-process.

use crate::error::Result;
use crate::extractor::{collect_links, collect_text, postprocess};
use crate::options::{ExtractMode, Options};
use crate::result::ExtractResult;
use crate::selector::Selector;
use crate::tree_builder;
use crate::url_utils;

/// Main entry point for extraction.
///
/// Configuration is validated before the markup is parsed, so an invalid
/// selector or base URL fails fast without touching the document.
pub(crate) fn extract_content(html: &str, options: &Options) -> Result<ExtractResult> {
    let (lines, matched) = match options.mode {
        ExtractMode::Text => {
            let selector = options.selector.as_deref().map(Selector::parse).transpose()?;
            let doc = tree_builder::parse(html);
            let nodes = match &selector {
                Some(selector) => doc.select(selector),
                None => vec![doc.root()],
            };
            (collect_text(&doc, &nodes), nodes.len())
        }
        ExtractMode::Links => {
            let base = options
                .base_url
                .as_deref()
                .map(url_utils::parse_base_url)
                .transpose()?;
            let doc = tree_builder::parse(html);
            (collect_links(&doc, base.as_ref()), 0)
        }
    };

    let lines = postprocess::apply(lines, options);
    tracing::debug!(
        mode = ?options.mode,
        matched,
        lines = lines.len(),
        "extraction finished"
    );

    Ok(ExtractResult {
        lines,
        mode: options.mode,
        matched,
    })
}
