//! Selector string parser.

use super::{AttributeFilter, AttributeOp, Combinator, ComplexSelector, Compound, Filter};
use crate::error::{Error, Result};

pub(super) struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn parse(&mut self) -> Result<Vec<ComplexSelector>> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.error(0, self.input.len(), "empty selector"));
        }

        let mut groups = Vec::new();
        loop {
            groups.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.advance();
                }
                Some(_) => return Err(self.error_at_token(self.pos, "unexpected character")),
            }
        }

        Ok(groups)
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        self.skip_whitespace();
        match self.peek() {
            None | Some(',') => {
                return Err(self.error_at_token(self.pos, "empty entry in selector list"));
            }
            Some('>' | '+' | '~') => {
                return Err(self.error(self.pos, self.pos + 1, "selector starts with a combinator"));
            }
            Some(_) => {}
        }

        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some(c @ ('>' | '+' | '~')) => {
                    let at = self.pos;
                    self.advance();
                    self.skip_whitespace();
                    if matches!(self.peek(), None | Some(',' | '>' | '+' | '~')) {
                        return Err(self.error(at, at + 1, "combinator without a selector after it"));
                    }
                    match c {
                        '>' => Combinator::Child,
                        '+' => Combinator::NextSibling,
                        _ => Combinator::SubsequentSibling,
                    }
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.error_at_token(self.pos, "unexpected character")),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let start = self.pos;
        let mut compound = Compound::default();

        loop {
            match self.peek() {
                Some('*') => {
                    if self.pos != start {
                        return Err(self.error(self.pos, self.pos + 1, "'*' must come first in a compound selector"));
                    }
                    self.advance();
                }
                Some('.') => {
                    let at = self.pos;
                    self.advance();
                    let class = self.parse_identifier(at, "expected a class name after '.'")?;
                    compound.filters.push(Filter::Class(class));
                }
                Some('#') => {
                    let at = self.pos;
                    self.advance();
                    let id = self.parse_identifier(at, "expected an id after '#'")?;
                    compound.filters.push(Filter::Id(id));
                }
                Some('[') => {
                    let attribute = self.parse_attribute()?;
                    compound.filters.push(Filter::Attribute(attribute));
                }
                Some(']') => {
                    return Err(self.error(self.pos, self.pos + 1, "unmatched ']'"));
                }
                Some(':') => {
                    return Err(self.error_at_token(self.pos, "pseudo-classes are not supported"));
                }
                Some(c) if is_identifier_char(c) => {
                    if self.pos != start {
                        return Err(self.error_at_token(self.pos, "type selector must come first in a compound selector"));
                    }
                    let tag = self.parse_identifier(self.pos, "expected a tag name")?;
                    compound.tag = Some(tag.to_ascii_lowercase());
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.error_at_token(self.pos, "expected a selector"));
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttributeFilter> {
        let open = self.pos;
        self.advance(); // '['
        self.skip_whitespace();

        if self.at_end() {
            return Err(self.unmatched_bracket(open));
        }
        let name = self
            .parse_identifier(open, "expected an attribute name after '['")?
            .to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            None => return Err(self.unmatched_bracket(open)),
            Some(']') => {
                self.advance();
                return Ok(AttributeFilter {
                    name,
                    op: AttributeOp::Exists,
                    value: String::new(),
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.advance();
                AttributeOp::Equals
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                let at = self.pos;
                self.advance();
                if self.peek() != Some('=') {
                    return Err(self.error(at, self.pos, "invalid attribute operator"));
                }
                self.advance();
                match c {
                    '~' => AttributeOp::Includes,
                    '|' => AttributeOp::DashMatch,
                    '^' => AttributeOp::Prefix,
                    '$' => AttributeOp::Suffix,
                    _ => AttributeOp::Substring,
                }
            }
            Some(_) => return Err(self.error_at_token(self.pos, "unexpected character in attribute selector")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            None => return Err(self.unmatched_bracket(open)),
            Some(quote @ ('"' | '\'')) => self.parse_string(open, quote)?,
            Some(_) => {
                let value_start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || matches!(c, ']' | '[' | '"' | '\'') {
                        break;
                    }
                    self.advance();
                }
                if self.pos == value_start {
                    return Err(self.error_at_token(self.pos, "expected an attribute value"));
                }
                self.input[value_start..self.pos].to_string()
            }
        };

        self.skip_whitespace();
        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.advance();
                self.skip_whitespace();
                true
            }
            Some('s' | 'S') => {
                self.advance();
                self.skip_whitespace();
                false
            }
            _ => false,
        };

        match self.peek() {
            Some(']') => {
                self.advance();
                Ok(AttributeFilter {
                    name,
                    op,
                    value,
                    case_insensitive,
                })
            }
            None => Err(self.unmatched_bracket(open)),
            Some(_) => Err(self.error_at_token(self.pos, "expected ']'")),
        }
    }

    /// Quoted string; backslash escapes the next character.
    fn parse_string(&mut self, open: usize, quote: char) -> Result<String> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(self.unmatched_bracket(open)),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(value);
                }
                Some('\\') => {
                    self.advance();
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.advance();
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_identifier(&mut self, at: usize, reason: &str) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }
        if self.pos == start {
            return Err(self.error_at_token(at, reason));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skip whitespace, reporting whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let before = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.pos > before
    }

    fn unmatched_bracket(&self, open: usize) -> Error {
        self.error(open, self.input.len(), "unmatched '['")
    }

    /// Error covering the token starting at `at` (up to the next whitespace).
    fn error_at_token(&self, at: usize, reason: &str) -> Error {
        let end = self.input[at..]
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_whitespace())
            .map_or(self.input.len(), |(offset, _)| at + offset);
        self.error(at, end, reason)
    }

    fn error(&self, start: usize, end: usize, reason: &str) -> Error {
        let end = end.min(self.input.len());
        Error::InvalidSelector {
            selector: self.input.to_string(),
            fragment: self.input.get(start..end).unwrap_or_default().to_string(),
            position: start,
            reason: reason.to_string(),
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
