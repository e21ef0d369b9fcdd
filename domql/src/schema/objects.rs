//! The GraphQL object types: `Query`, `Document`, and `Element`.
//!
//! Both entity types expose the full node operation set by delegating
//! field-for-field to the [`Node`] trait; `Document` adds `title` and
//! `Element` adds `visit`. Multi-context fields follow GraphQL's camelCase
//! convention (`nextAll`, `prevAll`).

use juniper::{graphql_object, FieldResult};

use super::QueryContext;
use crate::dom::{DomNode, Node, PageRef};
use crate::errors::Error;

/// The query root.
pub struct Query;

#[graphql_object(context = QueryContext, noasync)]
impl Query {
    /// Visit the specified page.
    fn page(
        context: &QueryContext,
        url: Option<String>,
        source: Option<String>,
    ) -> FieldResult<Document> {
        let page = context.loader().load(url.as_deref(), source.as_deref())?;
        Ok(Document::from_page(page)?)
    }
}

/// A loaded web page; the entry point into its content.
#[derive(Debug, Clone)]
pub struct Document {
    node: DomNode,
}

impl Document {
    /// Wraps a loaded page as a document rooted at its `<html>` element.
    pub fn from_page(page: PageRef) -> Result<Self, Error> {
        DomNode::document_root(page).map(|node| Self { node })
    }
}

impl Node for Document {
    fn dom(&self) -> &DomNode {
        &self.node
    }
}

/// An object in a document.
#[derive(Debug, Clone)]
pub struct Element {
    node: DomNode,
}

impl Element {
    fn new(node: DomNode) -> Self {
        Self { node }
    }
}

impl Node for Element {
    fn dom(&self) -> &DomNode {
        &self.node
    }
}

fn elements(nodes: Vec<DomNode>) -> Vec<Element> {
    nodes.into_iter().map(Element::new).collect()
}

#[graphql_object(context = QueryContext, noasync)]
impl Document {
    /// The title of the document.
    fn title(&self) -> FieldResult<Option<String>> {
        Ok(Node::text(self, Some("title"))?)
    }

    /// The html representation of the subnodes for the selected DOM.
    fn content(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::content(self, selector.as_deref())?)
    }

    /// The html representation of the selected DOM.
    fn html(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::html(self, selector.as_deref())?)
    }

    /// The text for the selected DOM.
    fn text(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::text(self, selector.as_deref())?)
    }

    /// The tag for the selected DOM.
    fn tag(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::tag(self, selector.as_deref())?)
    }

    /// The DOM attr of the node.
    fn attr(&self, selector: Option<String>, name: String) -> FieldResult<Option<String>> {
        Ok(Node::attr(self, selector.as_deref(), &name)?)
    }

    /// Returns true if the DOM matches the selector.
    fn is(&self, selector: String) -> FieldResult<bool> {
        Ok(Node::is(self, &selector)?)
    }

    /// Find elements using the selector, traversing down from self.
    fn query(&self, selector: String) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::query(self, &selector)?))
    }

    /// The list of children elements from self.
    fn children(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::children(self, selector.as_deref())?))
    }

    /// The list of parent elements from self.
    fn parents(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::parents(self, selector.as_deref())?))
    }

    /// The parent element from self.
    fn parent(&self) -> FieldResult<Option<Element>> {
        Ok(Node::parent(self)?.map(Element::new))
    }

    /// The sibling elements from self.
    fn siblings(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::siblings(self, selector.as_deref())?))
    }

    /// The immediately following sibling from self.
    fn next(&self, selector: Option<String>) -> FieldResult<Option<Element>> {
        Ok(Node::next(self, selector.as_deref())?.map(Element::new))
    }

    /// All the following siblings from self.
    fn next_all(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::next_all(self, selector.as_deref())?))
    }

    /// The immediately preceding sibling from self.
    fn prev(&self, selector: Option<String>) -> FieldResult<Option<Element>> {
        Ok(Node::prev(self, selector.as_deref())?.map(Element::new))
    }

    /// All the preceding siblings from self.
    fn prev_all(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::prev_all(self, selector.as_deref())?))
    }
}

#[graphql_object(context = QueryContext, noasync)]
impl Element {
    /// Visit the href of the link and return the corresponding document.
    ///
    /// Null when self is not an anchor or carries no href; no fetch is
    /// performed in that case.
    fn visit(&self, context: &QueryContext) -> FieldResult<Option<Document>> {
        if !Node::is(self, "a")? {
            return Ok(None);
        }
        let Some(href) = Node::attr(self, None, "href")? else {
            return Ok(None);
        };
        let page = context.loader().visit(self.node.page(), &href)?;
        Ok(Some(Document::from_page(page)?))
    }

    /// The html representation of the subnodes for the selected DOM.
    fn content(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::content(self, selector.as_deref())?)
    }

    /// The html representation of the selected DOM.
    fn html(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::html(self, selector.as_deref())?)
    }

    /// The text for the selected DOM.
    fn text(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::text(self, selector.as_deref())?)
    }

    /// The tag for the selected DOM.
    fn tag(&self, selector: Option<String>) -> FieldResult<Option<String>> {
        Ok(Node::tag(self, selector.as_deref())?)
    }

    /// The DOM attr of the node.
    fn attr(&self, selector: Option<String>, name: String) -> FieldResult<Option<String>> {
        Ok(Node::attr(self, selector.as_deref(), &name)?)
    }

    /// Returns true if the DOM matches the selector.
    fn is(&self, selector: String) -> FieldResult<bool> {
        Ok(Node::is(self, &selector)?)
    }

    /// Find elements using the selector, traversing down from self.
    fn query(&self, selector: String) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::query(self, &selector)?))
    }

    /// The list of children elements from self.
    fn children(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::children(self, selector.as_deref())?))
    }

    /// The list of parent elements from self.
    fn parents(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::parents(self, selector.as_deref())?))
    }

    /// The parent element from self.
    fn parent(&self) -> FieldResult<Option<Element>> {
        Ok(Node::parent(self)?.map(Element::new))
    }

    /// The sibling elements from self.
    fn siblings(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::siblings(self, selector.as_deref())?))
    }

    /// The immediately following sibling from self.
    fn next(&self, selector: Option<String>) -> FieldResult<Option<Element>> {
        Ok(Node::next(self, selector.as_deref())?.map(Element::new))
    }

    /// All the following siblings from self.
    fn next_all(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::next_all(self, selector.as_deref())?))
    }

    /// The immediately preceding sibling from self.
    fn prev(&self, selector: Option<String>) -> FieldResult<Option<Element>> {
        Ok(Node::prev(self, selector.as_deref())?.map(Element::new))
    }

    /// All the preceding siblings from self.
    fn prev_all(&self, selector: Option<String>) -> FieldResult<Vec<Element>> {
        Ok(elements(Node::prev_all(self, selector.as_deref())?))
    }
}
