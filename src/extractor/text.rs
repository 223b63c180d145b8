//! Text flattening.

use crate::dom::{Document, NodeId};

/// Text of every text node under each of `nodes`, in document order.
///
/// Each text node yields its own entry; entries are never merged across
/// elements, and a node without text contributes nothing. When one selected
/// node contains another, the inner node's text appears once for each.
///
/// # Examples
///
/// ```
/// use rs_html_extract::{extractor::collect_text, parse};
///
/// let doc = parse("<p>Hello <b>World</b></p>");
/// assert_eq!(collect_text(&doc, &[doc.root()]), vec!["Hello ", "World"]);
/// ```
#[must_use]
pub fn collect_text(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .flat_map(|&node| doc.text_nodes(node))
        .map(str::to_string)
        .collect()
}
