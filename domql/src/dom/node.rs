//! The node resolver: DOM contexts and the operation set they support.
//!
//! Every traversable entity (document root or in-page element) is a
//! [`DomNode`]; the [`Node`] trait implements the full operation set as
//! provided methods over it. The shared primitive is selector scoping: an
//! operation with a present, non-empty selector first narrows `self` to its
//! descendant matches (in document order) and then acts on that set; with no
//! selector it acts on `self` directly.

use std::fmt;

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use tracing::trace;

use super::page::PageRef;
use crate::errors::Error;

/// An owned handle to a single node of a parsed page.
///
/// Cheap to clone: a shared page handle plus a stable node id into its
/// tree. Selector scoping produces ordered `Vec<DomNode>` sets transiently.
/// A `DomNode` is read-only for its whole life.
#[derive(Clone)]
pub struct DomNode {
    page: PageRef,
    id: NodeId,
}

impl DomNode {
    fn new(page: PageRef, id: NodeId) -> Self {
        Self { page, id }
    }

    /// Takes the root `<html>` element of a page as a DOM context.
    ///
    /// Fails with a parse error when the tree holds no root element, the
    /// one malformation html5ever's recovery cannot paper over.
    pub fn document_root(page: PageRef) -> Result<Self, Error> {
        let id = page
            .html()
            .tree
            .root()
            .children()
            .find_map(|child| ElementRef::wrap(child).map(|el| el.id()))
            .ok_or_else(|| Error::parse("document has no root element"))?;
        Ok(Self::new(page, id))
    }

    /// The page this node belongs to.
    #[must_use]
    pub fn page(&self) -> &PageRef {
        &self.page
    }

    /// Borrows the underlying element, if the id still resolves to one.
    ///
    /// Ids are only ever taken from elements of the same tree, so this is
    /// effectively infallible; a `None` is treated as no-match downstream
    /// rather than an error, since absence is a normal outcome.
    fn element(&self) -> Option<ElementRef<'_>> {
        self.page.html().tree.get(self.id).and_then(ElementRef::wrap)
    }

    /// Narrows `self` per the selector-scoping rule.
    ///
    /// A present, non-empty selector yields all descendant matches in
    /// document order; an absent or empty selector yields `self` alone.
    fn scoped(&self, selector: Option<&str>) -> Result<Vec<Self>, Error> {
        match selector {
            Some(s) if !s.is_empty() => {
                let parsed = parse_selector(s)?;
                let Some(element) = self.element() else {
                    return Ok(Vec::new());
                };
                let matches: Vec<Self> = element
                    .select(&parsed)
                    .map(|m| Self::new(self.page.clone(), m.id()))
                    .collect();
                trace!(selector = s, matches = matches.len(), "scoped context");
                Ok(matches)
            }
            _ => Ok(vec![self.clone()]),
        }
    }

    /// First match of the scoped set, if any.
    fn first_scoped(&self, selector: Option<&str>) -> Result<Option<Self>, Error> {
        Ok(self.scoped(selector)?.into_iter().next())
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomNode")
            .field("tag", &self.element().map(|el| el.value().name().to_string()))
            .field("url", &self.page.url())
            .finish()
    }
}

/// The abstract capability set shared by documents and elements.
///
/// All operations are provided methods over the implementor's [`DomNode`];
/// implementors only supply the context handle. A selector that matches
/// nothing yields `None` or an empty sequence, never an error.
pub trait Node {
    /// The DOM context the operations act on.
    fn dom(&self) -> &DomNode;

    /// The inner markup of the first match after scoping.
    fn content(&self, selector: Option<&str>) -> Result<Option<String>, Error> {
        Ok(self
            .dom()
            .first_scoped(selector)?
            .and_then(|node| node.element().map(|el| el.inner_html())))
    }

    /// The outer markup of the scoped set, concatenated in document order.
    ///
    /// `None` when the scoped set is empty.
    fn html(&self, selector: Option<&str>) -> Result<Option<String>, Error> {
        let nodes = self.dom().scoped(selector)?;
        if nodes.is_empty() {
            return Ok(None);
        }
        let mut markup = String::new();
        for node in &nodes {
            if let Some(el) = node.element() {
                markup.push_str(&el.html());
            }
        }
        Ok(Some(markup))
    }

    /// The visible text of the first match after scoping, with any embedded
    /// script content stripped.
    ///
    /// The stripping is deliberately scoped to this operation alone;
    /// `html` and `content` keep script markup.
    fn text(&self, selector: Option<&str>) -> Result<Option<String>, Error> {
        Ok(self
            .dom()
            .first_scoped(selector)?
            .and_then(|node| node.element().map(|el| text_without_scripts(el))))
    }

    /// The tag name of the first match after scoping.
    fn tag(&self, selector: Option<&str>) -> Result<Option<String>, Error> {
        Ok(self
            .dom()
            .first_scoped(selector)?
            .and_then(|node| node.element().map(|el| el.value().name().to_string())))
    }

    /// The named attribute of the first match after scoping.
    fn attr(&self, selector: Option<&str>, name: &str) -> Result<Option<String>, Error> {
        Ok(self.dom().first_scoped(selector)?.and_then(|node| {
            node.element()
                .and_then(|el| el.value().attr(name).map(str::to_string))
        }))
    }

    /// Whether `self` itself matches the selector. Does not scope.
    fn is(&self, selector: &str) -> Result<bool, Error> {
        let parsed = parse_selector(selector)?;
        Ok(self
            .dom()
            .element()
            .is_some_and(|el| parsed.matches(&el)))
    }

    /// All descendant matches of the selector, in document order.
    fn query(&self, selector: &str) -> Result<Vec<DomNode>, Error> {
        self.dom().scoped(Some(selector))
    }

    /// The direct element children, optionally filtered by selector.
    fn children(&self, selector: Option<&str>) -> Result<Vec<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(Vec::new());
        };
        Ok(element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id()))
            .collect())
    }

    /// The ancestor chain from nearest to farthest, optionally filtered.
    fn parents(&self, selector: Option<&str>) -> Result<Vec<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(Vec::new());
        };
        Ok(element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id()))
            .collect())
    }

    /// The last entry of the `parents` chain, i.e. the *farthest* ancestor.
    ///
    /// Upstream indexed the nearest-to-farthest parents chain at -1, so a
    /// faithful rendition keeps the farthest-ancestor behavior rather than
    /// returning the immediate parent.
    fn parent(&self) -> Result<Option<DomNode>, Error> {
        Ok(self.parents(None)?.pop())
    }

    /// The sibling elements in document order, optionally filtered.
    fn siblings(&self, selector: Option<&str>) -> Result<Vec<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(Vec::new());
        };
        let mut out: Vec<DomNode> = element
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id()))
            .collect();
        out.reverse();
        out.extend(
            element
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches_filter(filter.as_ref(), el))
                .map(|el| DomNode::new(self.dom().page.clone(), el.id())),
        );
        Ok(out)
    }

    /// The first following sibling matching the filter, if any.
    fn next(&self, selector: Option<&str>) -> Result<Option<DomNode>, Error> {
        Ok(self.next_all(selector)?.into_iter().next())
    }

    /// All following siblings matching the filter, in document order.
    fn next_all(&self, selector: Option<&str>) -> Result<Vec<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(Vec::new());
        };
        Ok(element
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id()))
            .collect())
    }

    /// The nearest preceding sibling matching the filter, if any.
    fn prev(&self, selector: Option<&str>) -> Result<Option<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(None);
        };
        Ok(element
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id())))
    }

    /// All preceding siblings matching the filter, in document order.
    fn prev_all(&self, selector: Option<&str>) -> Result<Vec<DomNode>, Error> {
        let filter = compile_filter(selector)?;
        let Some(element) = self.dom().element() else {
            return Ok(Vec::new());
        };
        // The tree axis yields nearest-first; reverse for document order.
        let mut out: Vec<DomNode> = element
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches_filter(filter.as_ref(), el))
            .map(|el| DomNode::new(self.dom().page.clone(), el.id()))
            .collect();
        out.reverse();
        Ok(out)
    }
}

impl Node for DomNode {
    fn dom(&self) -> &DomNode {
        self
    }
}

fn parse_selector(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector).map_err(|err| Error::selector(selector, err.to_string()))
}

/// Compiles an optional filter selector; absent or empty means no filter.
fn compile_filter(selector: Option<&str>) -> Result<Option<Selector>, Error> {
    match selector {
        Some(s) if !s.is_empty() => parse_selector(s).map(Some),
        _ => Ok(None),
    }
}

fn matches_filter(filter: Option<&Selector>, element: &ElementRef<'_>) -> bool {
    filter.map_or(true, |selector| selector.matches(element))
}

/// Collects the text of a subtree, skipping `<script>` elements entirely.
fn text_without_scripts(element: ElementRef<'_>) -> String {
    fn collect(node: ego_tree::NodeRef<'_, scraper::Node>, out: &mut String) {
        for child in node.children() {
            match child.value() {
                scraper::Node::Text(text) => out.push_str(&text),
                scraper::Node::Element(el) if el.name() == "script" => {}
                scraper::Node::Element(_) => collect(child, out),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    collect(*element, &mut out);
    out
}
