//! The DOM query core.
//!
//! This module provides:
//! - The parsed-page model and shared page handle
//! - The node resolver: the capability set every traversable entity supports
//! - The document loader for URL and raw-markup page sources
//! - Configuration for fetching

mod config;
mod loader;
mod node;
mod page;

pub use config::FetchConfig;
pub use loader::{HttpFetcher, PageFetcher, PageLoader};
pub use node::{DomNode, Node};
pub use page::{Page, PageRef};
