//! HTML tokenizer.
//!
//! [`Tokenizer`] is a lazy iterator over [`Token`]s. It never fails: every
//! byte of input ends up in exactly one token (or in a construct that is
//! deliberately dropped, such as `</>`), and malformed markup degrades into
//! best-effort tokens:
//!
//! - a tag cut off by end of input is complete at the truncation point
//! - an unterminated quoted attribute value runs to end of input
//! - an unterminated comment runs to end of input
//! - a `<` that does not open a tag is literal text
//!
//! `script` and `style` contents are raw text: nothing inside them is
//! treated as markup until the matching close tag.

use std::borrow::Cow;

use crate::dom::Attributes;
use crate::entities;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Opening tag. Names are lowercase and attribute values are decoded.
    StartTag {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    /// Closing tag with a lowercase name.
    EndTag { name: String },
    /// Character data with references decoded (raw inside `script`/`style`).
    Text(Cow<'a, str>),
    /// Body of a `<![CDATA[...]]>` section, verbatim.
    CData(&'a str),
    /// Comment body, or the body of a `<?...>` / unknown `<!...>` construct.
    Comment(&'a str),
    /// Body of a `<!DOCTYPE ...>` declaration.
    Doctype(&'a str),
}

/// Lazy tokenizer over a markup string.
///
/// Restarting means constructing a new tokenizer; no state is shared between
/// instances.
///
/// # Examples
///
/// ```
/// use rs_html_extract::tokenizer::{Token, Tokenizer};
///
/// let tokens: Vec<Token> = Tokenizer::new("<p class=x>Hi</p>").collect();
/// assert_eq!(tokens.len(), 3);
/// assert!(matches!(&tokens[1], Token::Text(text) if text == "Hi"));
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a `script`/`style` start tag.
    raw_text_end: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text_end: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn byte_at(&self, at: usize) -> Option<u8> {
        self.bytes().get(at).copied()
    }

    /// Does the `<` at `at` open a construct this tokenizer recognises?
    fn starts_markup(&self, at: usize) -> bool {
        match self.byte_at(at + 1) {
            Some(b) if b.is_ascii_alphabetic() => true,
            Some(b'/') => matches!(self.byte_at(at + 2), Some(b) if b.is_ascii_alphabetic() || b == b'>'),
            Some(b'!' | b'?') => true,
            _ => false,
        }
    }

    /// Text run from the current position up to the next markup.
    fn text(&mut self) -> Token<'a> {
        let input = self.input;
        let start = self.pos;
        let first_len = input[start..].chars().next().map_or(1, char::len_utf8);
        let mut scan = start + first_len;

        let end = loop {
            match input[scan..].find('<') {
                Some(offset) => {
                    let at = scan + offset;
                    if self.starts_markup(at) {
                        break at;
                    }
                    scan = at + 1;
                }
                None => break input.len(),
            }
        };

        self.pos = end;
        Token::Text(entities::decode(&input[start..end]))
    }

    /// Raw text of a `script`/`style` element up to its close tag.
    fn raw_text(&mut self, tag: &str) -> Option<Token<'a>> {
        let input = self.input;
        let rest = &input[self.pos..];
        let mut search = 0;
        let end = loop {
            let Some(offset) = rest[search..].find("</") else {
                break rest.len();
            };
            let at = search + offset;
            let name_start = at + 2;
            let closes = rest
                .get(name_start..name_start + tag.len())
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
                && rest
                    .as_bytes()
                    .get(name_start + tag.len())
                    .is_none_or(|&b| is_space(b) || b == b'/' || b == b'>');
            if closes {
                break at;
            }
            search = at + 2;
        };

        let content = &rest[..end];
        self.pos += end;
        (!content.is_empty()).then_some(Token::Text(Cow::Borrowed(content)))
    }

    /// Consume the markup construct at the current `<`.
    ///
    /// Returns `None` for constructs that produce no token.
    fn markup(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let rest = &input[self.pos..];

        if let Some(body) = rest.strip_prefix("<!--") {
            let (content, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return Some(Token::Comment(content));
        }

        if let Some(body) = rest.strip_prefix("<![CDATA[") {
            let (content, consumed) = match body.find("]]>") {
                Some(end) => (&body[..end], 9 + end + 3),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return (!content.is_empty()).then_some(Token::CData(content));
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            let (content, consumed) = match rest.find('>') {
                Some(end) => (&rest[2..end], end + 1),
                None => (&rest[2..], rest.len()),
            };
            self.pos += consumed;
            let is_doctype = rest.starts_with("<!")
                && content
                    .get(..7)
                    .is_some_and(|head| head.eq_ignore_ascii_case("doctype"));
            return Some(if is_doctype {
                Token::Doctype(content)
            } else {
                Token::Comment(content)
            });
        }

        if rest.starts_with("</") {
            return self.end_tag();
        }

        Some(self.start_tag())
    }

    fn end_tag(&mut self) -> Option<Token<'a>> {
        let name_start = self.pos + 2;
        let name_end = self.scan_name(name_start);
        self.pos = match self.input[name_end..].find('>') {
            Some(offset) => name_end + offset + 1,
            None => self.input.len(),
        };

        if name_end == name_start {
            // `</>`
            return None;
        }
        Some(Token::EndTag {
            name: self.input[name_start..name_end].to_ascii_lowercase(),
        })
    }

    fn start_tag(&mut self) -> Token<'a> {
        let name_start = self.pos + 1;
        let name_end = self.scan_name(name_start);
        let name = self.input[name_start..name_end].to_ascii_lowercase();

        let mut attributes = Attributes::new();
        let mut self_closing = false;
        let mut p = name_end;

        loop {
            p = self.skip_space(p);
            match self.byte_at(p) {
                None => break,
                Some(b'>') => {
                    p += 1;
                    break;
                }
                Some(b'/') => {
                    p += 1;
                    if self.byte_at(p) == Some(b'>') {
                        self_closing = true;
                        p += 1;
                        break;
                    }
                }
                Some(first) => {
                    let attr_start = p;
                    if first == b'=' {
                        p += 1;
                    }
                    while let Some(b) = self.byte_at(p) {
                        if is_space(b) || matches!(b, b'/' | b'>' | b'=') {
                            break;
                        }
                        p += 1;
                    }
                    let attr_name = &self.input[attr_start..p];

                    p = self.skip_space(p);
                    let value = if self.byte_at(p) == Some(b'=') {
                        let (value, next) = self.attribute_value(self.skip_space(p + 1));
                        p = next;
                        value
                    } else {
                        Cow::Borrowed("")
                    };
                    attributes.set(attr_name, value.into_owned());
                }
            }
        }

        self.pos = p;
        if !self_closing {
            self.raw_text_end = match name.as_str() {
                "script" => Some("script"),
                "style" => Some("style"),
                _ => None,
            };
        }

        Token::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    /// Parse an attribute value starting at `p`; returns the decoded value and
    /// the position after it.
    fn attribute_value(&self, p: usize) -> (Cow<'a, str>, usize) {
        let input = self.input;
        match self.byte_at(p) {
            Some(quote @ (b'"' | b'\'')) => {
                let body = &input[p + 1..];
                match body.find(char::from(quote)) {
                    Some(end) => (entities::decode(&body[..end]), p + 1 + end + 1),
                    None => (entities::decode(body), input.len()),
                }
            }
            Some(_) => {
                let mut end = p;
                while let Some(b) = self.byte_at(end) {
                    if is_space(b) || b == b'>' {
                        break;
                    }
                    end += 1;
                }
                (entities::decode(&input[p..end]), end)
            }
            None => (Cow::Borrowed(""), p),
        }
    }

    /// End of a tag name starting at `start`.
    fn scan_name(&self, start: usize) -> usize {
        let mut end = start;
        while let Some(b) = self.byte_at(end) {
            if is_space(b) || b == b'/' || b == b'>' {
                break;
            }
            end += 1;
        }
        end
    }

    fn skip_space(&self, mut p: usize) -> usize {
        while self.byte_at(p).is_some_and(is_space) {
            p += 1;
        }
        p
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            if let Some(tag) = self.raw_text_end.take() {
                if let Some(token) = self.raw_text(tag) {
                    return Some(token);
                }
                continue;
            }

            if self.byte_at(self.pos) == Some(b'<') && self.starts_markup(self.pos) {
                if let Some(token) = self.markup() {
                    return Some(token);
                }
                continue;
            }

            return Some(self.text());
        }
    }
}

/// HTML whitespace: space, tab, LF, CR and form feed.
#[inline]
#[must_use]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}
