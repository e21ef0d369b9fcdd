//! The parsed-page model.

use std::rc::Rc;

use scraper::Html;

/// A shared handle to a parsed page.
///
/// One query execution is single-threaded by contract; the `Rc` together
/// with the non-`Send` parse tree makes the no-sharing-across-queries rule
/// a compile-time guarantee.
pub type PageRef = Rc<Page>;

/// One parsed document: the HTML tree plus the URL it was loaded from.
///
/// The URL is absent for pages built from raw markup. Pages are read-only
/// for their whole life; every DOM context produced during a query borrows
/// from the same `Page` through a [`PageRef`].
#[derive(Debug)]
pub struct Page {
    html: Html,
    url: Option<String>,
}

impl Page {
    /// Parses markup into a page.
    ///
    /// html5ever recovers from almost any input, so this always yields a
    /// tree; whether the tree contains a usable root element is checked
    /// when the first DOM context is taken from it.
    #[must_use]
    pub fn parse(markup: &str, url: Option<String>) -> PageRef {
        Rc::new(Self {
            html: Html::parse_document(markup),
            url,
        })
    }

    /// The parsed HTML tree.
    #[must_use]
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The URL this page was fetched from, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
