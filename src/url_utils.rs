//! URL utilities for resolving extracted references.

use url::Url;

use crate::error::{Error, Result};

/// Schemes whose references are not locations relative to the page.
const OPAQUE_SCHEMES: &[&str] = &["data:", "javascript:", "mailto:", "tel:"];

/// Check if a string is an absolute http(s) URL with a host.
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    let s = s.trim();
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return false;
    }
    Url::parse(s).is_ok_and(|url| url.host().is_some())
}

/// Parse the base URL that relative links are resolved against.
///
/// # Errors
///
/// Returns [`Error::InvalidBaseUrl`] when `base` does not parse or cannot
/// act as a base (for example `mailto:` URLs).
pub fn parse_base_url(base: &str) -> Result<Url> {
    Url::parse(base.trim())
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| Error::InvalidBaseUrl(base.to_string()))
}

/// Resolve `reference` against `base`.
///
/// Empty references, fragment-only references, `data:`/`javascript:`/
/// `mailto:`/`tel:` references and references that fail to join are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use rs_html_extract::url_utils::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/a/b.html").unwrap();
/// assert_eq!(resolve("c.html", &base), "https://example.com/a/c.html");
/// assert_eq!(resolve("javascript:void(0)", &base), "javascript:void(0)");
/// ```
#[must_use]
pub fn resolve(reference: &str, base: &Url) -> String {
    let trimmed = reference.trim();

    if trimmed.is_empty() || trimmed.starts_with('#') || is_opaque(trimmed) {
        return reference.to_string();
    }
    if is_absolute_url(trimmed) {
        return trimmed.to_string();
    }

    base.join(trimmed)
        .map_or_else(|_| reference.to_string(), |resolved| resolved.to_string())
}

fn is_opaque(reference: &str) -> bool {
    OPAQUE_SCHEMES.iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}
