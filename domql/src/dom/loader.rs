//! The document loader: turns a URL or raw markup into a root page.

use tracing::debug;

use super::config::FetchConfig;
use super::page::{Page, PageRef};
use crate::errors::Error;

/// Fetches page bodies over the network.
///
/// The seam between the loader and the HTTP client, so tests can substitute
/// a stub that records requests instead of touching the network.
pub trait PageFetcher {
    /// Fetches the body of the given URL.
    fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// The production fetcher, backed by a blocking HTTP client.
///
/// Sends the fixed identifying user agent from [`FetchConfig`] with every
/// request and honors its timeout and redirect limit.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    fail_on_http_error: bool,
}

impl HttpFetcher {
    /// Builds a fetcher from the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|err| Error::fetch("<client setup>", err.to_string()))?;
        Ok(Self {
            client,
            fail_on_http_error: config.fail_on_http_error,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, Error> {
        debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| Error::fetch(url, err.to_string()))?;
        let response = if self.fail_on_http_error {
            response
                .error_for_status()
                .map_err(|err| Error::fetch(url, err.to_string()))?
        } else {
            response
        };
        response
            .text()
            .map_err(|err| Error::fetch(url, err.to_string()))
    }
}

/// Produces root pages for query entry and for `visit` re-entry.
pub struct PageLoader {
    fetcher: Box<dyn PageFetcher>,
    config: FetchConfig,
}

impl PageLoader {
    /// Creates a loader with the production HTTP fetcher.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self {
            fetcher: Box::new(fetcher),
            config,
        })
    }

    /// Creates a loader with a custom fetcher.
    #[must_use]
    pub fn with_fetcher(fetcher: Box<dyn PageFetcher>, config: FetchConfig) -> Self {
        Self { fetcher, config }
    }

    /// Loads a page from a URL or from raw markup.
    ///
    /// Exactly one of the two is required; when both are present the URL
    /// wins. Both absent is an invalid-argument error, raised before any
    /// fetch is attempted.
    pub fn load(&self, url: Option<&str>, source: Option<&str>) -> Result<PageRef, Error> {
        match (url, source) {
            (Some(url), _) => {
                let body = self.fetcher.fetch(url)?;
                debug!(url, bytes = body.len(), "parsing fetched page");
                Ok(Page::parse(&body, Some(url.to_string())))
            }
            (None, Some(source)) => Ok(Page::parse(source, None)),
            (None, None) => Err(Error::invalid_argument("must provide url or source")),
        }
    }

    /// Follows a hyperlink from `from` to a fresh page.
    ///
    /// The raw href is used as the URL as-is unless the configuration opts
    /// into resolving relative hrefs against the originating document.
    pub fn visit(&self, from: &Page, href: &str) -> Result<PageRef, Error> {
        let target = if self.config.resolve_relative_hrefs {
            resolve_href(from.url(), href)
        } else {
            href.to_string()
        };
        debug!(href, target, "visiting link");
        self.load(Some(&target), None)
    }
}

impl std::fmt::Debug for PageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Joins a relative href onto the originating document's URL.
///
/// Falls back to the raw href when there is no base or the base does not
/// parse; the subsequent fetch then fails with the real diagnostic.
fn resolve_href(base: Option<&str>, href: &str) -> String {
    base.and_then(|base| url::Url::parse(base).ok())
        .and_then(|base| base.join(href).ok())
        .map_or_else(|| href.to_string(), |joined| joined.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every requested URL and answers with a fixed body.
    struct StubFetcher {
        body: String,
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Result<String, Error> {
            self.requests.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    fn stub_loader(body: &str, config: FetchConfig) -> (PageLoader, Rc<RefCell<Vec<String>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetcher = StubFetcher {
            body: body.to_string(),
            requests: Rc::clone(&requests),
        };
        (PageLoader::with_fetcher(Box::new(fetcher), config), requests)
    }

    #[test]
    fn test_load_requires_url_or_source() {
        let (loader, requests) = stub_loader("<p>hi</p>", FetchConfig::default());
        let err = loader.load(None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_load_from_source_does_not_fetch() {
        let (loader, requests) = stub_loader("unused", FetchConfig::default());
        let page = loader.load(None, Some("<p>hi</p>")).unwrap();
        assert_eq!(page.url(), None);
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_load_url_wins_over_source() {
        let (loader, requests) = stub_loader("<p>fetched</p>", FetchConfig::default());
        let page = loader
            .load(Some("http://example.com/"), Some("<p>inline</p>"))
            .unwrap();
        assert_eq!(page.url(), Some("http://example.com/"));
        assert_eq!(requests.borrow().as_slice(), ["http://example.com/"]);
    }

    #[test]
    fn test_visit_passes_relative_href_through_by_default() {
        let (loader, requests) = stub_loader("<p>hi</p>", FetchConfig::default());
        let from = Page::parse("<a href='/next'>n</a>", Some("http://example.com/a".into()));
        loader.visit(&from, "/next").unwrap();
        assert_eq!(requests.borrow().as_slice(), ["/next"]);
    }

    #[test]
    fn test_visit_resolves_relative_href_when_configured() {
        let config = FetchConfig::default().with_resolve_relative_hrefs(true);
        let (loader, requests) = stub_loader("<p>hi</p>", config);
        let from = Page::parse("<a href='/next'>n</a>", Some("http://example.com/a".into()));
        loader.visit(&from, "/next").unwrap();
        assert_eq!(requests.borrow().as_slice(), ["http://example.com/next"]);
    }

    #[test]
    fn test_visit_with_absolute_href_is_untouched() {
        let config = FetchConfig::default().with_resolve_relative_hrefs(true);
        let (loader, requests) = stub_loader("<p>hi</p>", config);
        let from = Page::parse("<a>n</a>", Some("http://example.com/".into()));
        loader.visit(&from, "http://other.test/x").unwrap();
        assert_eq!(requests.borrow().as_slice(), ["http://other.test/x"]);
    }
}
