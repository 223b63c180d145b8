//! Character encoding detection and transcoding.
//!
//! Raw bytes from a crawler can be in any legacy charset. The encoding is
//! taken from a byte-order mark when there is one, otherwise from the first
//! `<meta>` declaration in the head of the document, otherwise UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::CONTENT_CHARSET;
use crate::tokenizer::{Token, Tokenizer};

/// Bytes examined for a `<meta>` charset declaration.
const PRESCAN_LIMIT: usize = 1024;

/// Detect character encoding from HTML bytes.
///
/// Looks, in order, for:
/// 1. a UTF-8 or UTF-16 byte-order mark
/// 2. `<meta charset="...">`
/// 3. `<meta http-equiv="Content-Type" content="...; charset=...">`
///
/// and defaults to UTF-8. Only the first 1024 bytes are examined. A `<meta>`
/// declaring UTF-16 is taken as UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(PRESCAN_LIMIT)]);
    // A declaration readable as ASCII cannot be UTF-16; `output_encoding`
    // maps UTF-16 and the replacement encoding to UTF-8.
    declared_charset(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .map_or(UTF_8, Encoding::output_encoding)
}

/// Charset label declared by the first `<meta>` that declares one.
fn declared_charset(head: &str) -> Option<String> {
    Tokenizer::new(head).find_map(|token| {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            return None;
        };
        if name != "meta" {
            return None;
        }

        if let Some(charset) = attributes.get("charset") {
            let charset = charset.trim();
            return (!charset.is_empty()).then(|| charset.to_string());
        }

        let is_content_type = attributes
            .get("http-equiv")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("content-type"));
        if !is_content_type {
            return None;
        }
        attributes
            .get("content")
            .and_then(|content| CONTENT_CHARSET.captures(content))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences are replaced with U+FFFD rather than rejected.
///
/// # Examples
///
/// ```
/// use rs_html_extract::encoding::transcode_to_utf8;
///
/// let html = b"<meta charset=\"windows-1252\"><p>Caf\xE9</p>";
/// assert!(transcode_to_utf8(html).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        let body = html.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(html);
        return String::from_utf8_lossy(body).into_owned();
    }

    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!(encoding = used.name(), "replaced malformed byte sequences");
    }
    decoded.into_owned()
}
