//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` indexed by [`NodeId`]; children are id
//! vectors and the parent link is a plain id, so the tree owns no cycles.
//! The tree builder appends nodes strictly in source order, which makes
//! arena order identical to document pre-order.
//!
//! A [`Document`] exposes no mutation once built. All walks use explicit
//! stacks or parent links, never recursion over tree depth.

use tendril::StrTendril;

use crate::selector::{self, Selector};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The implicit document root.
    pub const ROOT: NodeId = NodeId(0);

    /// Position of this node in the arena (and in document order).
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered attribute list with lowercase, unique names.
///
/// Setting an existing name replaces its value in place, so a repeated
/// declaration keeps the position of the first one and the value of the last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute. The name is lowercased.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of `name`, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// An element: lowercase tag name plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Attributes,
}

impl Element {
    #[must_use]
    pub fn new(name: &str, attrs: Attributes) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs,
        }
    }

    /// Lowercase tag name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    #[inline]
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    #[inline]
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains(name)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|candidate| candidate == class)
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// The implicit root. Never an element, so selectors cannot match it.
    Document,
    Element(Element),
    Text(StrTendril),
    Comment(String),
}

/// A node: payload, parent link and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(&**text),
            _ => None,
        }
    }
}

/// A parsed HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// A document holding only the root.
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// Append a new last child to `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append character data to `parent`, extending its last child when that
    /// is already a text node.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                existing.push_slice(text);
                return;
            }
        }
        self.append_text_node(parent, text);
    }

    /// Append character data to `parent` as a new text node.
    pub(crate) fn append_text_node(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeData::Text(StrTendril::from_slice(text)))
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds nothing but its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    /// `id` followed by all of its descendants, in pre-order.
    #[must_use]
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        let stack = if self.get(id).is_some() { vec![id] } else { Vec::new() };
        Traverse { doc: self, stack }
    }

    /// Descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse(id).skip(1)
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Every element in document order.
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.traverse(self.root())
            .filter_map(|id| self.element(id).map(|element| (id, element)))
    }

    /// Text nodes under `id` (inclusive) in document order, one item per node.
    pub fn text_nodes(&self, id: NodeId) -> impl Iterator<Item = &str> + '_ {
        self.traverse(id)
            .filter_map(|node| self.get(node).and_then(Node::as_text))
    }

    /// Concatenation of [`Document::text_nodes`].
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_nodes(id).collect()
    }

    /// Elements matching `selector`, in document order, without duplicates.
    #[must_use]
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        selector::select(self, selector)
    }
}

/// Pre-order walk driven by an explicit stack.
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Walk up the parent links.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let mut attrs = Attributes::new();
        attrs.set("CLASS", "item lead");
        let div = doc.append(NodeId::ROOT, NodeData::Element(Element::new("DIV", attrs)));
        let p = doc.append(div, NodeData::Element(Element::new("p", Attributes::new())));
        doc.append_text(p, "Hello ");
        doc.append_text(p, "there");
        let b = doc.append(p, NodeData::Element(Element::new("b", Attributes::new())));
        doc.append_text(b, "World");
        (doc, div, p, b)
    }

    #[test]
    fn attributes_keep_first_position_and_last_value() {
        let mut attrs = Attributes::new();
        attrs.set("href", "/a");
        attrs.set("ID", "x");
        attrs.set("HREF", "/b");

        let collected: Vec<_> = attrs.iter().collect();
        assert_eq!(collected, vec![("href", "/b"), ("id", "x")]);
        assert_eq!(attrs.get("Id"), Some("x"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn element_names_and_classes() {
        let (doc, div, _, _) = sample();
        let element = doc.element(div).unwrap();
        assert_eq!(element.name(), "div");
        assert!(element.has_class("item"));
        assert!(element.has_class("lead"));
        assert!(!element.has_class("ite"));
    }

    #[test]
    fn adjacent_text_is_merged() {
        let (doc, _, p, _) = sample();
        let texts: Vec<_> = doc.text_nodes(p).collect();
        assert_eq!(texts, vec!["Hello there", "World"]);
        assert_eq!(doc.text_content(p), "Hello thereWorld");
    }

    #[test]
    fn traversal_is_preorder_and_matches_arena_order() {
        let (doc, div, p, b) = sample();
        let order: Vec<_> = doc.traverse(doc.root()).collect();
        assert_eq!(order.len(), doc.len());
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(&order[1..3], &[div, p]);
        assert!(order.contains(&b));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (doc, div, p, b) = sample();
        let chain: Vec<_> = doc.ancestors(b).collect();
        assert_eq!(chain, vec![p, div, NodeId::ROOT]);
        assert_eq!(doc.ancestors(NodeId::ROOT).count(), 0);
    }

    #[test]
    fn unknown_ids_are_handled() {
        let (doc, ..) = sample();
        let missing = NodeId(999);
        assert!(doc.get(missing).is_none());
        assert!(doc.children(missing).is_empty());
        assert_eq!(doc.traverse(missing).count(), 0);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut doc = Document::new();
        let mut parent = NodeId::ROOT;
        for _ in 0..100_000 {
            parent = doc.append(parent, NodeData::Element(Element::new("div", Attributes::new())));
        }
        doc.append_text(parent, "deep");
        assert_eq!(doc.text_content(NodeId::ROOT), "deep");
        assert_eq!(doc.ancestors(parent).count(), 100_000);
    }
}
