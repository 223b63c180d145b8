//! CSS selector subset.
//!
//! Supported:
//! - type `div` and universal `*`
//! - class `.name` and id `#name`
//! - attributes `[attr]`, `[attr=value]`, `[attr~=v]`, `[attr|=v]`,
//!   `[attr^=v]`, `[attr$=v]`, `[attr*=v]`, with an optional `i` flag
//! - compounds such as `div.item#main[data-x]`
//! - combinators: descendant (whitespace), child `>`, next sibling `+`,
//!   subsequent sibling `~`
//! - selector lists `a, b`
//!
//! Pseudo-classes are rejected as invalid.

mod matcher;
mod parser;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use matcher::{matches, select, select_first};

/// A parsed, immutable selector list.
///
/// # Examples
///
/// ```
/// use rs_html_extract::{parse, Selector};
///
/// let doc = parse(r#"<div class="item"><span>a</span><p><span>b</span></p></div>"#);
/// let selector = Selector::parse("div.item > span")?;
/// assert_eq!(doc.select(&selector).len(), 1);
/// # Ok::<(), rs_html_extract::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] naming the offending substring when
    /// the input is structurally unparseable.
    pub fn parse(source: &str) -> Result<Self> {
        let groups = parser::SelectorParser::new(source).parse()?;
        tracing::debug!(selector = source, groups = groups.len(), "parsed selector");
        Ok(Self {
            source: source.to_string(),
            groups,
        })
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Comma-separated alternatives.
    #[must_use]
    pub fn groups(&self) -> &[ComplexSelector] {
        &self.groups
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A chain of compounds joined by combinators.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub(crate) compounds: Vec<Compound>,
    pub(crate) combinators: Vec<Combinator>,
}

impl ComplexSelector {
    #[must_use]
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    #[must_use]
    pub fn combinators(&self) -> &[Combinator] {
        &self.combinators
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor.
    Descendant,
    /// `>`: the parent.
    Child,
    /// `+`: the immediately preceding element sibling.
    NextSibling,
    /// `~`: any preceding element sibling.
    SubsequentSibling,
}

/// Conjunction of filters applied to a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Lowercase tag name; `None` matches any element.
    pub(crate) tag: Option<String>,
    pub(crate) filters: Vec<Filter>,
}

impl Compound {
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Id(String),
    Class(String),
    Attribute(AttributeFilter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Lowercase attribute name.
    pub name: String,
    pub op: AttributeOp,
    /// Empty for [`AttributeOp::Exists`].
    pub value: String,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[attr]`
    Exists,
    /// `[attr=v]`
    Equals,
    /// `[attr~=v]`: one of the whitespace-separated words
    Includes,
    /// `[attr|=v]`: `v` or starts with `v-`
    DashMatch,
    /// `[attr^=v]`
    Prefix,
    /// `[attr$=v]`
    Suffix,
    /// `[attr*=v]`
    Substring,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::parse;

    #[test]
    fn from_str_and_display_round_trip_the_source() {
        let selector: Selector = "ul > li.active".parse().unwrap();
        assert_eq!(selector.to_string(), "ul > li.active");
        assert_eq!(selector.groups().len(), 1);
        assert_eq!(
            selector.groups()[0].combinators(),
            &[Combinator::Child]
        );
    }

    #[test]
    fn select_first_returns_earliest_match() {
        let doc = parse("<p id=a></p><div><p id=b></p></div>");
        let selector = Selector::parse("p").unwrap();
        let first = select_first(&doc, &selector).unwrap();
        assert_eq!(doc.element(first).and_then(|el| el.id()), Some("a"));
    }

    #[test]
    fn select_first_without_match() {
        let doc = parse("<p></p>");
        let selector = Selector::parse("span").unwrap();
        assert!(select_first(&doc, &selector).is_none());
    }
}
