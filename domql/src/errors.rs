//! Error types for DOM query resolution.
//!
//! Absence is never an error here: a selector that matches nothing yields
//! null or an empty sequence from the resolver. These variants cover the
//! genuine failures — bad client input, unparsable selectors, network
//! failures, and markup that yields no usable document.

use thiserror::Error;

/// The main error type for domql operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument is missing or inconsistent.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// The error message.
        message: String,
    },

    /// A selector string failed to parse as CSS.
    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        /// The offending selector string.
        selector: String,
        /// The parser's diagnostic.
        message: String,
    },

    /// A network-level failure while loading a page, at the query root or
    /// via `visit`.
    #[error("failed to fetch {url:?}: {message}")]
    Fetch {
        /// The URL that was being fetched.
        url: String,
        /// The underlying failure.
        message: String,
    },

    /// Markup could not be parsed into a usable DOM context.
    #[error("failed to parse markup: {message}")]
    Parse {
        /// The parser's diagnostic.
        message: String,
    },

    /// The GraphQL engine rejected or failed the query (syntax, validation,
    /// or the first resolution error of an execution).
    #[error("query failed: {message}")]
    Query {
        /// The engine's diagnostic.
        message: String,
    },
}

impl Error {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a selector error.
    #[must_use]
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates a fetch error.
    #[must_use]
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid_argument("must provide url or source");
        assert_eq!(
            err.to_string(),
            "invalid argument: must provide url or source"
        );
    }

    #[test]
    fn test_selector_display_includes_selector() {
        let err = Error::selector("li:::", "unexpected token");
        assert!(err.to_string().contains("li:::"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_fetch_display_includes_url() {
        let err = Error::fetch("http://example.com", "connection refused");
        assert!(err.to_string().contains("http://example.com"));
    }
}
