//! # domql
//!
//! Parse and scrape any web page using GraphQL queries.
//!
//! domql exposes a retrieved web page's DOM as a queryable graph: a GraphQL
//! query describes which elements to locate, which attributes and text to
//! extract, and how to traverse relationships (children, siblings, parents,
//! links), and the result tree mirrors the query shape field for field.
//!
//! The crate is built from two cooperating layers:
//!
//! - **Node resolver** ([`dom::Node`]): the capability set shared by every
//!   traversable entity — content/html/text/tag/attr extraction,
//!   selector-scoped sub-queries, and structural traversal.
//! - **Document loader** ([`dom::PageLoader`]): turns a URL or raw markup
//!   into a root DOM context, invoked at query entry and again, lazily,
//!   whenever a query follows a hyperlink with `visit`.
//!
//! ## Quick Start
//!
//! ```rust
//! use domql::prelude::*;
//! use juniper::Variables;
//!
//! let schema = build_schema();
//! let loader = PageLoader::new(FetchConfig::default())?;
//! let context = QueryContext::new(loader);
//!
//! let data = execute_query(
//!     &schema,
//!     r#"{ page(source: "<ul><li>a</li><li>b</li></ul>") {
//!         items: query(selector: "li") { text }
//!     } }"#,
//!     &Variables::new(),
//!     &context,
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod dom;
pub mod errors;
pub mod schema;

#[cfg(feature = "console")]
pub mod server;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dom::{
        DomNode, FetchConfig, HttpFetcher, Node, Page, PageFetcher, PageLoader,
        PageRef,
    };
    pub use crate::errors::Error;
    pub use crate::schema::{
        build_schema, execute_query, Document, Element, Query, QueryContext,
        Schema,
    };
}
