//! Character reference decoding for text runs and attribute values.
//!
//! Only a small table of named references is recognised, plus every numeric
//! reference. Anything unrecognised is copied through verbatim, so decoding
//! cannot fail.

use std::borrow::Cow;

/// Named references understood by [`decode`], without the leading `&` and
/// trailing `;`.
const NAMED_REFERENCES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("copy", "\u{a9}"),
    ("reg", "\u{ae}"),
    ("trade", "\u{2122}"),
    ("hellip", "\u{2026}"),
    ("mdash", "\u{2014}"),
    ("ndash", "\u{2013}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201c}"),
    ("rdquo", "\u{201d}"),
    ("laquo", "\u{ab}"),
    ("raquo", "\u{bb}"),
    ("middot", "\u{b7}"),
    ("bull", "\u{2022}"),
    ("times", "\u{d7}"),
    ("euro", "\u{20ac}"),
];

const REPLACEMENT: char = '\u{fffd}';

/// Decode character references in `input`.
///
/// Borrows when the input contains no `&`.
///
/// # Examples
///
/// ```
/// use rs_html_extract::entities::decode;
///
/// assert_eq!(decode("a &amp; b"), "a & b");
/// assert_eq!(decode("&lt;p&gt;"), "<p>");
/// assert_eq!(decode("&#65;&#x42;"), "AB");
/// assert_eq!(decode("&unknown;"), "&unknown;");
/// ```
#[must_use]
pub fn decode(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let consumed = push_reference(tail, &mut out).unwrap_or_else(|| {
            out.push('&');
            1
        });
        rest = &tail[consumed..];
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Decode the reference at the start of `tail` (which begins with `&`) into
/// `out`, returning the number of bytes consumed.
fn push_reference(tail: &str, out: &mut String) -> Option<usize> {
    let bytes = tail.as_bytes();

    if bytes.get(1) == Some(&b'#') {
        let (radix, digits_start) = match bytes.get(2) {
            Some(b'x' | b'X') => (16, 3),
            _ => (10, 2),
        };
        let digits_len = bytes[digits_start..]
            .iter()
            .take_while(|b| if radix == 16 { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
            .count();
        if digits_len == 0 {
            return None;
        }
        let digits_end = digits_start + digits_len;
        let ch = u32::from_str_radix(&tail[digits_start..digits_end], radix)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or(REPLACEMENT);
        out.push(ch);
        let consumed = if bytes.get(digits_end) == Some(&b';') {
            digits_end + 1
        } else {
            digits_end
        };
        return Some(consumed);
    }

    let name_len = bytes[1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 || bytes.get(1 + name_len) != Some(&b';') {
        return None;
    }
    let name = &tail[1..=name_len];
    let (_, replacement) = NAMED_REFERENCES.iter().find(|(known, _)| *known == name)?;
    out.push_str(replacement);
    Some(name_len + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrows_when_nothing_to_decode() {
        assert!(matches!(decode("plain text"), Cow::Borrowed("plain text")));
    }

    #[test]
    fn decodes_the_four_standard_references() {
        assert_eq!(decode("&amp;&lt;&gt;&quot;"), "&<>\"");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode("&#169; &#xA9; &#XA9;"), "\u{a9} \u{a9} \u{a9}");
        assert_eq!(decode("&#65B"), "AB");
    }

    #[test]
    fn invalid_code_points_become_replacement_char() {
        assert_eq!(decode("&#0;"), "\u{fffd}");
        assert_eq!(decode("&#xD800;"), "\u{fffd}");
        assert_eq!(decode("&#99999999999;"), "\u{fffd}");
    }

    #[test]
    fn unknown_or_unterminated_references_pass_through() {
        assert_eq!(decode("&bogus; &amp"), "&bogus; &amp");
        assert_eq!(decode("AT&T"), "AT&T");
        assert_eq!(decode("&#;"), "&#;");
        assert_eq!(decode("trailing &"), "trailing &");
    }

    #[test]
    fn decodes_non_ascii_neighbours() {
        assert_eq!(decode("caf\u{e9} &amp; cr\u{e8}me"), "caf\u{e9} & cr\u{e8}me");
    }
}
