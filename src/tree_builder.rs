//! Tree construction from the token stream.
//!
//! The builder keeps a stack of open elements whose bottom is the document
//! root. Recovery is deliberately minimal:
//!
//! - an end tag closes the nearest open element with the same name and
//!   everything opened after it
//! - an end tag with no open counterpart is ignored
//! - elements still open at end of input are closed silently
//!
//! A text node only grows while text tokens follow each other directly. Any
//! other token, including an ignored end tag, starts a new node; CDATA is
//! always a node of its own.

use tracing::{debug, trace};

use crate::dom::{Document, Element, NodeData, NodeId};
use crate::tokenizer::{is_space, Token, Tokenizer};

/// Elements that never have children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content model admits only elements, so whitespace-only text
/// directly inside them carries nothing.
const ELEMENT_ONLY_CONTENT: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "colgroup"];

#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse markup into a [`Document`]. Never fails.
///
/// # Examples
///
/// ```
/// use rs_html_extract::tree_builder::parse;
///
/// let doc = parse("<div><p>text</div>");
/// let div = doc.elements().find(|(_, el)| el.name() == "div").map(|(id, _)| id);
/// assert_eq!(doc.text_content(div.unwrap()), "text");
/// ```
#[must_use]
pub fn parse(html: &str) -> Document {
    let mut builder = TreeBuilder::new();
    for token in Tokenizer::new(html) {
        builder.process(token);
    }
    builder.finish()
}

/// Incremental tree builder fed one token at a time.
#[derive(Debug)]
pub struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
    /// The previous token was text, so the next text run continues its node.
    /// Any other token, even one that leaves no trace in the tree, ends it.
    continues_text: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            open: vec![NodeId::ROOT],
            continues_text: false,
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    pub fn process(&mut self, token: Token<'_>) {
        let is_text = matches!(token, Token::Text(_));
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let parent = self.current();
                let keep_open = !self_closing && !is_void_element(&name);
                let id = self
                    .doc
                    .append(parent, NodeData::Element(Element::new(&name, attributes)));
                if keep_open {
                    self.open.push(id);
                }
            }
            Token::EndTag { name } => self.close(&name),
            Token::Text(text) => self.text(&text),
            Token::CData(text) => {
                if !text.is_empty() {
                    let parent = self.current();
                    self.doc.append_text_node(parent, text);
                }
            }
            Token::Comment(comment) => {
                let parent = self.current();
                self.doc.append(parent, NodeData::Comment(comment.to_string()));
            }
            Token::Doctype(_) => {}
        }
        self.continues_text = is_text;
    }

    fn close(&mut self, name: &str) {
        // Index 0 is the root and is never popped.
        let found = self.open.iter().enumerate().skip(1).rev().find_map(|(depth, &id)| {
            self.doc
                .element(id)
                .is_some_and(|element| element.name() == name)
                .then_some(depth)
        });

        match found {
            Some(depth) => {
                let implicitly_closed = self.open.len() - depth - 1;
                if implicitly_closed > 0 {
                    trace!(tag = name, implicitly_closed, "end tag closed unclosed descendants");
                }
                self.open.truncate(depth);
            }
            None => trace!(tag = name, "ignored end tag without open element"),
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.current();
        if text.bytes().all(is_space)
            && self
                .doc
                .element(parent)
                .is_some_and(|element| ELEMENT_ONLY_CONTENT.contains(&element.name()))
        {
            return;
        }
        if self.continues_text {
            self.doc.append_text(parent, text);
        } else {
            self.doc.append_text_node(parent, text);
        }
    }

    /// Close whatever is still open and hand over the document.
    #[must_use]
    pub fn finish(self) -> Document {
        debug!(
            nodes = self.doc.len(),
            unclosed = self.open.len() - 1,
            "built document tree"
        );
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_sequence(doc: &Document) -> Vec<&str> {
        doc.elements().map(|(_, element)| element.name()).collect()
    }

    fn find(doc: &Document, name: &str) -> NodeId {
        doc.elements()
            .find(|(_, element)| element.name() == name)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[test]
    fn preorder_reproduces_source_tag_order() {
        let doc = parse("<html><head><title>t</title></head><body><div><p>a</p><ul><li>1</li><li>2</li></ul></div></body></html>");
        assert_eq!(
            tag_sequence(&doc),
            vec!["html", "head", "title", "body", "div", "p", "ul", "li", "li"]
        );
    }

    #[test]
    fn void_and_self_closing_elements_have_no_children() {
        let doc = parse("<p>a<br>b<img src=x>c<span/>d</p>");
        let p = find(&doc, "p");
        let texts: Vec<_> = doc.text_nodes(p).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
        for name in ["br", "img", "span"] {
            assert!(doc.children(find(&doc, name)).is_empty(), "{name} has children");
            assert_eq!(doc.parent(find(&doc, name)), Some(p));
        }
    }

    #[test]
    fn unclosed_child_is_closed_by_parent_end_tag() {
        let doc = parse("<div><p>text</div><span>after</span>");
        let div = find(&doc, "div");
        let p = find(&doc, "p");
        let span = find(&doc, "span");
        assert_eq!(doc.parent(p), Some(div));
        assert_eq!(doc.text_content(div), "text");
        assert_eq!(doc.parent(span), Some(NodeId::ROOT));
    }

    #[test]
    fn stray_end_tag_is_ignored_but_splits_text() {
        let doc = parse("<div>a</span>b</div>");
        let div = find(&doc, "div");
        let texts: Vec<_> = doc.text_nodes(div).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(tag_sequence(&doc), vec!["div"]);
    }

    #[test]
    fn cdata_and_doctype_split_text() {
        let doc = parse("<p>a<![CDATA[b]]>c</p>x<!DOCTYPE html>y");
        let p = find(&doc, "p");
        assert_eq!(doc.text_nodes(p).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(
            doc.text_nodes(doc.root()).collect::<Vec<_>>(),
            vec!["a", "b", "c", "x", "y"]
        );
    }

    #[test]
    fn empty_end_tag_leaves_text_whole() {
        // `</>` produces no token at all.
        let doc = parse("<p>a</>b</p>");
        let p = find(&doc, "p");
        assert_eq!(doc.text_nodes(p).collect::<Vec<_>>(), vec!["ab"]);
    }

    #[test]
    fn unclosed_elements_at_eof() {
        let doc = parse("<ul><li>one<li>two");
        let items: Vec<_> = doc
            .elements()
            .filter(|(_, element)| element.name() == "li")
            .map(|(id, _)| id)
            .collect();
        assert_eq!(items.len(), 2);
        // No implied end tags: the second item nests inside the first.
        assert_eq!(doc.parent(items[1]), Some(items[0]));
    }

    #[test]
    fn whitespace_kept_except_in_table_structure() {
        let doc = parse("<div>\n  <table>\n  <tr>\n <td> </td>\n </tr>\n</table></div>");
        let div = find(&doc, "div");
        let texts: Vec<_> = doc.text_nodes(div).collect();
        assert_eq!(texts, vec!["\n  ", " "]);
    }

    #[test]
    fn comments_are_attached_but_not_text() {
        let doc = parse("<p>a<!-- hidden -->b</p>");
        let p = find(&doc, "p");
        assert_eq!(doc.children(p).len(), 3);
        assert!(matches!(
            doc.get(doc.children(p)[1]).map(crate::dom::Node::data),
            Some(NodeData::Comment(c)) if c == " hidden "
        ));
        assert_eq!(doc.text_nodes(p).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn doctype_is_dropped() {
        let doc = parse("<!doctype html><p>x</p>");
        assert_eq!(doc.children(doc.root()).len(), 1);
    }

    #[test]
    fn parsing_is_deterministic() {
        let html = "<div class=a><p>one<b>two</div><!--c--><a href=/x>three";
        assert_eq!(parse(html), parse(html));
    }

    #[test]
    fn deeply_nested_input() {
        let html = "<div>".repeat(50_000) + "core";
        let doc = parse(&html);
        assert_eq!(doc.len(), 50_002);
        assert_eq!(doc.text_content(doc.root()), "core");
    }
}
