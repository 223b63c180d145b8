//! Selector evaluation against a [`Document`].
//!
//! Each element is tested against the rightmost compound first; only then is
//! the chain verified leftwards through parents, ancestors or siblings.
//! Ancestor and sibling walks follow parent links and child lists, so the
//! only recursion is over the (short) selector chain.
//!
//! Whether a node satisfies the part of a chain left of some compound does
//! not depend on which element the walk started from. Failures are recorded
//! per `(compound, node)` for the lifetime of one [`Matcher`], so descendant
//! and subsequent-sibling backtracking explores each pair at most once.

use super::{AttributeFilter, AttributeOp, Combinator, ComplexSelector, Compound, Filter, Selector};
use crate::dom::{Document, Element, NodeId};

/// Elements matching `selector`, in document order.
///
/// Every element is evaluated exactly once, so the result has no duplicates
/// even when several selector-list entries match the same element.
#[must_use]
pub fn select(doc: &Document, selector: &Selector) -> Vec<NodeId> {
    let mut matcher = Matcher::new(doc, selector);
    let matched: Vec<NodeId> = doc
        .elements()
        .map(|(id, _)| id)
        .filter(|&id| matcher.matches(id))
        .collect();
    tracing::debug!(selector = %selector, matched = matched.len(), "selector evaluated");
    matched
}

/// First element in document order matching `selector`.
#[must_use]
pub fn select_first(doc: &Document, selector: &Selector) -> Option<NodeId> {
    let mut matcher = Matcher::new(doc, selector);
    doc.elements()
        .map(|(id, _)| id)
        .find(|&id| matcher.matches(id))
}

/// Does the element `id` match `selector`? Non-elements never match.
#[must_use]
pub fn matches(doc: &Document, id: NodeId, selector: &Selector) -> bool {
    Matcher::new(doc, selector).matches(id)
}

/// One selector evaluated against one document.
struct Matcher<'a> {
    doc: &'a Document,
    selector: &'a Selector,
    /// Per selector-list entry, a bit for each `(step, node)` known not to
    /// satisfy compounds `0..step`, at `(step - 1) * doc.len() + node`.
    /// Allocated on the first failure.
    failed: Vec<Vec<bool>>,
}

impl<'a> Matcher<'a> {
    fn new(doc: &'a Document, selector: &'a Selector) -> Self {
        Self {
            doc,
            selector,
            failed: vec![Vec::new(); selector.groups.len()],
        }
    }

    fn matches(&mut self, id: NodeId) -> bool {
        let doc = self.doc;
        let Some(element) = doc.element(id) else {
            return false;
        };
        (0..self.selector.groups.len()).any(|group| self.matches_complex(group, id, element))
    }

    fn matches_complex(&mut self, group: usize, id: NodeId, element: &Element) -> bool {
        let complex: &'a ComplexSelector = &self.selector.groups[group];
        let Some(last) = complex.compounds.len().checked_sub(1) else {
            return false;
        };
        matches_compound(element, &complex.compounds[last]) && self.chain_holds(group, id, last)
    }

    /// Does some node related to `id` satisfy compounds `0..step`, given that
    /// `id` matched `compounds[step]`? Failures are recorded.
    fn chain_holds(&mut self, group: usize, id: NodeId, step: usize) -> bool {
        if step == 0 {
            return true;
        }
        if self.known_failure(group, id, step) {
            return false;
        }

        let holds = self.matches_leftwards(group, id, step);
        if !holds {
            self.record_failure(group, id, step);
        }
        holds
    }

    fn matches_leftwards(&mut self, group: usize, id: NodeId, step: usize) -> bool {
        let doc = self.doc;
        let complex: &'a ComplexSelector = &self.selector.groups[group];

        match complex.combinators[step - 1] {
            Combinator::Child => doc
                .parent(id)
                .is_some_and(|parent| self.satisfies(group, parent, step - 1)),
            Combinator::NextSibling => preceding_element_siblings(doc, id)
                .next()
                .is_some_and(|sibling| self.satisfies(group, sibling, step - 1)),
            // A node that already failed this step has had every candidate
            // beyond it explored, so the walk stops there.
            Combinator::Descendant => {
                for ancestor in doc.ancestors(id) {
                    if self.satisfies(group, ancestor, step - 1) {
                        return true;
                    }
                    if self.known_failure(group, ancestor, step) {
                        return false;
                    }
                }
                false
            }
            Combinator::SubsequentSibling => {
                for sibling in preceding_element_siblings(doc, id) {
                    if self.satisfies(group, sibling, step - 1) {
                        return true;
                    }
                    if self.known_failure(group, sibling, step) {
                        return false;
                    }
                }
                false
            }
        }
    }

    /// Does `candidate` match `compounds[step]` and the chain left of it?
    fn satisfies(&mut self, group: usize, candidate: NodeId, step: usize) -> bool {
        let doc = self.doc;
        let compound = &self.selector.groups[group].compounds[step];
        doc.element(candidate)
            .is_some_and(|element| matches_compound(element, compound))
            && self.chain_holds(group, candidate, step)
    }

    fn known_failure(&self, group: usize, id: NodeId, step: usize) -> bool {
        let index = (step - 1) * self.doc.len() + id.index();
        self.failed[group].get(index).copied().unwrap_or(false)
    }

    fn record_failure(&mut self, group: usize, id: NodeId, step: usize) {
        let len = self.doc.len();
        let steps = self.selector.groups[group].compounds.len().saturating_sub(1);
        let bits = &mut self.failed[group];
        if bits.is_empty() {
            bits.resize(steps * len, false);
        }
        if let Some(bit) = bits.get_mut((step - 1) * len + id.index()) {
            *bit = true;
        }
    }
}

/// Element siblings before `id`, nearest first.
fn preceding_element_siblings(doc: &Document, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let siblings = doc.parent(id).map(|parent| doc.children(parent)).unwrap_or_default();
    // Children are appended in arena order, so the list is sorted.
    let position = siblings.binary_search(&id).unwrap_or(0);
    siblings[..position]
        .iter()
        .rev()
        .copied()
        .filter(move |&sibling| doc.element(sibling).is_some())
}

fn matches_compound(element: &Element, compound: &Compound) -> bool {
    if compound.tag.as_deref().is_some_and(|tag| tag != element.name()) {
        return false;
    }
    compound.filters.iter().all(|filter| match filter {
        Filter::Id(id) => element.id() == Some(id.as_str()),
        Filter::Class(class) => element.has_class(class),
        Filter::Attribute(attribute) => matches_attribute(element, attribute),
    })
}

fn matches_attribute(element: &Element, filter: &AttributeFilter) -> bool {
    let Some(actual) = element.attr(&filter.name) else {
        return false;
    };
    if filter.op == AttributeOp::Exists {
        return true;
    }

    let (actual, expected) = if filter.case_insensitive {
        (actual.to_lowercase(), filter.value.to_lowercase())
    } else {
        (actual.to_string(), filter.value.clone())
    };

    match filter.op {
        AttributeOp::Exists => true,
        AttributeOp::Equals => actual == expected,
        AttributeOp::Includes => {
            !expected.is_empty() && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        AttributeOp::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        AttributeOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
        AttributeOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
        AttributeOp::Substring => !expected.is_empty() && actual.contains(&expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_builder::parse;

    fn ids(html: &str, selector: &str) -> Vec<String> {
        let doc = parse(html);
        let selector = Selector::parse(selector).unwrap();
        select(&doc, &selector)
            .into_iter()
            .map(|id| doc.element(id).and_then(Element::id).unwrap_or("?").to_string())
            .collect()
    }

    #[test]
    fn child_combinator_requires_the_immediate_parent() {
        let html = r#"
            <div class="item">
                <span id="direct"></span>
                <p><span id="nested"></span></p>
            </div>
            <div><span id="other"></span></div>
        "#;
        assert_eq!(ids(html, "div.item > span"), vec!["direct"]);
        assert_eq!(ids(html, "div.item span"), vec!["direct", "nested"]);
    }

    #[test]
    fn descendant_backtracks_over_ancestors() {
        // The nearest `div` is not inside `section`, an outer one is.
        let html = r#"<section><div><article><div><p id="x"></p></div></article></div></section>"#;
        assert_eq!(ids(html, "section > div p"), vec!["x"]);
        assert_eq!(ids(html, "section > div > p"), Vec::<String>::new());
    }

    #[test]
    fn recorded_failures_do_not_hide_later_matches() {
        let html = r#"
            <div class="x">
                <div><p id="a"></p><div><p id="b"></p></div></div>
            </div>
            <div><div><p id="c"></p></div></div>
        "#;
        assert_eq!(ids(html, ".x div div p"), vec!["b"]);
        assert_eq!(ids(html, ".x div p"), vec!["a", "b"]);
        assert_eq!(ids(html, "div div p"), vec!["a", "b", "c"]);
    }

    #[test]
    fn failed_descendant_chains_stay_cheap() {
        let depth = 40;
        let html = format!("{}<p id=\"x\"></p>{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let miss = format!("section {}p", "div ".repeat(8));
        assert_eq!(ids(&html, &miss), Vec::<String>::new());
        let hit = format!("{}p", "div ".repeat(depth));
        assert_eq!(ids(&html, &hit), vec!["x"]);
        let too_deep = format!("{}p", "div ".repeat(depth + 1));
        assert_eq!(ids(&html, &too_deep), Vec::<String>::new());
    }

    #[test]
    fn subsequent_sibling_walk_stops_at_a_failed_sibling() {
        let html = r#"<ul><li id="a"></li><li id="b"></li><ol></ol><li id="c"></li>x<li id="d"></li></ul>"#;
        assert_eq!(ids(html, "ol ~ li"), vec!["c", "d"]);
        assert_eq!(ids(html, "ul > ol ~ li"), vec!["c", "d"]);
        assert_eq!(ids(html, "ol + li"), vec!["c"]);
        assert_eq!(ids(html, "li + ol ~ li ~ li"), vec!["d"]);
    }

    #[test]
    fn select_first_shares_work_across_elements() {
        let doc = parse(r#"<p id="a"></p><section><p id="b"></p><p id="c"></p></section>"#);
        let selector = Selector::parse("section p").unwrap();
        let first = select_first(&doc, &selector).unwrap();
        assert_eq!(doc.element(first).and_then(Element::id), Some("b"));
        assert!(matches(&doc, first, &selector));
    }

    #[test]
    fn sibling_combinators() {
        let html = r#"<ul><li id="a"></li>text<li id="b"></li><!--c--><li id="c"></li></ul>"#;
        assert_eq!(ids(html, "li + li"), vec!["b", "c"]);
        assert_eq!(ids(html, "#a ~ li"), vec!["b", "c"]);
        assert_eq!(ids(html, "#b + li"), vec!["c"]);
    }

    #[test]
    fn attribute_operators() {
        let html = r#"
            <a id="1" href="https://example.com/page.pdf" rel="nofollow noopener" lang="en-US"></a>
            <a id="2" href="/local" lang="EN"></a>
            <a id="3"></a>
        "#;
        assert_eq!(ids(html, "a[href]"), vec!["1", "2"]);
        assert_eq!(ids(html, "a[href='/local']"), vec!["2"]);
        assert_eq!(ids(html, "a[rel~=noopener]"), vec!["1"]);
        assert_eq!(ids(html, "a[lang|=en]"), vec!["1"]);
        assert_eq!(ids(html, "a[lang|=en i]"), vec!["1", "2"]);
        assert_eq!(ids(html, "a[href^=https]"), vec!["1"]);
        assert_eq!(ids(html, "a[href$='.pdf']"), vec!["1"]);
        assert_eq!(ids(html, "a[href*=local]"), vec!["2"]);
        assert_eq!(ids(html, "a[href^='']"), Vec::<String>::new());
    }

    #[test]
    fn selector_list_is_in_document_order_without_duplicates() {
        let html = r#"<h2 id="a" class="t"></h2><h1 id="b" class="t"></h1>"#;
        assert_eq!(ids(html, "h1, h2, .t"), vec!["a", "b"]);
    }

    #[test]
    fn tag_names_are_case_insensitive_but_classes_are_not() {
        let html = r#"<DIV id="a" class="Item"></DIV>"#;
        assert_eq!(ids(html, "div"), vec!["a"]);
        assert_eq!(ids(html, "DiV.Item"), vec!["a"]);
        assert_eq!(ids(html, ".item"), Vec::<String>::new());
    }

    #[test]
    fn universal_matches_every_element() {
        let html = r#"<div id="a"><span id="b"></span></div>"#;
        assert_eq!(ids(html, "*"), vec!["a", "b"]);
        assert_eq!(ids(html, "div > *"), vec!["b"]);
    }

    #[test]
    fn matches_rejects_non_elements() {
        let doc = parse("<p>text</p>");
        let selector = Selector::parse("*").unwrap();
        assert!(!matches(&doc, doc.root(), &selector));
        let text = doc.descendants(doc.root()).last().unwrap();
        assert!(!matches(&doc, text, &selector));
    }
}
