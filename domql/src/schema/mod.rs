//! The GraphQL surface over the DOM query core.
//!
//! This module provides:
//! - The `Document` and `Element` object types delegating to the node
//!   resolver, and the `Query` root exposing `page(url, source)`
//! - The execution context carrying the document loader
//! - Schema construction and a synchronous execution helper

mod objects;

mod integration_tests;

pub use objects::{Document, Element, Query};

use juniper::{DefaultScalarValue, EmptyMutation, EmptySubscription, ExecutionError, RootNode, Variables};
use tracing::debug;

use crate::dom::PageLoader;
use crate::errors::Error;

/// The execution context for one query: carries the document loader so
/// `page` and `visit` can fetch.
pub struct QueryContext {
    loader: PageLoader,
}

impl QueryContext {
    /// Creates a context around a loader.
    #[must_use]
    pub fn new(loader: PageLoader) -> Self {
        Self { loader }
    }

    /// The document loader for this execution.
    #[must_use]
    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }
}

impl juniper::Context for QueryContext {}

/// The executable schema type.
pub type Schema = RootNode<
    'static,
    Query,
    EmptyMutation<QueryContext>,
    EmptySubscription<QueryContext>,
>;

/// Builds the schema: the `Query` root and everything reachable from it.
#[must_use]
pub fn build_schema() -> Schema {
    Schema::new(Query, EmptyMutation::new(), EmptySubscription::new())
}

/// Executes a query synchronously and returns its `data` value.
///
/// The first error encountered, whether from query parsing, validation, or
/// field resolution, terminates the execution: no partial results are
/// returned once anything has failed.
pub fn execute_query(
    schema: &Schema,
    query: &str,
    variables: &Variables,
    context: &QueryContext,
) -> Result<serde_json::Value, Error> {
    debug!(query_len = query.len(), "executing query");
    let (data, errors) = juniper::execute_sync(query, None, schema, variables, context)
        .map_err(|err| Error::query(err.to_string()))?;
    if let Some(first) = errors.first() {
        return Err(Error::query(format_execution_error(first)));
    }
    serde_json::to_value(&data).map_err(|err| Error::query(err.to_string()))
}

fn format_execution_error(error: &ExecutionError<DefaultScalarValue>) -> String {
    let path = error.path().join(".");
    if path.is_empty() {
        error.error().message().to_string()
    } else {
        format!("{path}: {}", error.error().message())
    }
}
