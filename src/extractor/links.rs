//! Link collection.

use url::Url;

use crate::dom::{Document, Element};
use crate::url_utils;

/// The reference an element contributes: `src` when present, otherwise
/// `href`.
#[must_use]
pub fn link_of(element: &Element) -> Option<&str> {
    element.attr("src").or_else(|| element.attr("href"))
}

/// Every element's reference in document order.
///
/// With a `base`, relative references are resolved against it; see
/// [`url_utils::resolve`].
///
/// # Examples
///
/// ```
/// use rs_html_extract::{extractor::collect_links, parse};
///
/// let doc = parse(r#"<a href="/x">x</a><img src="/y.png"><a href="/z" src="/w">"#);
/// assert_eq!(collect_links(&doc, None), vec!["/x", "/y.png", "/w"]);
/// ```
#[must_use]
pub fn collect_links(doc: &Document, base: Option<&Url>) -> Vec<String> {
    let links: Vec<String> = doc
        .elements()
        .filter_map(|(_, element)| link_of(element))
        .map(|link| match base {
            Some(base) => url_utils::resolve(link, base),
            None => link.to_string(),
        })
        .collect();
    tracing::debug!(links = links.len(), resolved = base.is_some(), "collected links");
    links
}
