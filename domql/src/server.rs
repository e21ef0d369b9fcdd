//! The interactive query console.
//!
//! Serves a GraphiQL page pre-filled with a sample query at `/` and a
//! standard GraphQL endpoint at `/graphql`. Each request executes on a
//! blocking worker: one query is one independent unit of work, and DOM
//! contexts never cross threads mid-query.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use juniper::http::GraphQLRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use crate::dom::{FetchConfig, PageLoader};
use crate::schema::{build_schema, QueryContext};

/// The sample query the console opens with.
const SAMPLE_QUERY: &str = r#"{
  page(url: "http://news.ycombinator.com") {
    items: query(selector: "tr.athing") {
      rank: text(selector: "td span.rank")
      title: text(selector: "td.title a")
      site: text(selector: "span.sitebit a")
      url: attr(selector: "td.title a", name: "href")
      attrs: next {
        score: text(selector: "span.score")
        user: text(selector: "a.hnuser")
      }
    }
  }
}"#;

/// Configuration for the console server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Fetch configuration used by query executions.
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Creates a console configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the bind port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the fetch configuration.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }
}

struct ConsoleState {
    fetch: FetchConfig,
}

/// Runs the console server until interrupted.
pub fn serve(config: ConsoleConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let state = Arc::new(ConsoleState {
            fetch: config.fetch.clone(),
        });
        let app = Router::new()
            .route("/", get(graphiql))
            .route("/graphql", post(graphql))
            .with_state(state);
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("query console listening on http://{addr}/");
        axum::serve(listener, app).await
    })
}

async fn graphiql() -> Html<String> {
    Html(graphiql_html(SAMPLE_QUERY))
}

async fn graphql(
    State(state): State<Arc<ConsoleState>>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        let schema = build_schema();
        let loader = match PageLoader::new(state.fetch.clone()) {
            Ok(loader) => loader,
            Err(err) => return json!({ "errors": [ { "message": err.to_string() } ] }),
        };
        let context = QueryContext::new(loader);
        let response = request.execute_sync(&schema, &context);
        serde_json::to_value(&response)
            .unwrap_or_else(|err| json!({ "errors": [ { "message": err.to_string() } ] }))
    })
    .await;
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Renders the GraphiQL page with the given default query pre-filled.
fn graphiql_html(default_query: &str) -> String {
    let query_json =
        serde_json::to_string(default_query).unwrap_or_else(|_| "\"\"".to_string());
    GRAPHIQL_TEMPLATE.replace("__DEFAULT_QUERY__", &query_json)
}

const GRAPHIQL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>domql console</title>
    <link rel="stylesheet" href="https://unpkg.com/graphiql@3/graphiql.min.css" />
    <style>html, body, #graphiql { height: 100%; margin: 0; }</style>
</head>
<body>
    <div id="graphiql"></div>
    <script src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
    <script src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js"></script>
    <script src="https://unpkg.com/graphiql@3/graphiql.min.js"></script>
    <script>
        const fetcher = GraphiQL.createFetcher({ url: '/graphql' });
        ReactDOM.createRoot(document.getElementById('graphiql')).render(
            React.createElement(GraphiQL, {
                fetcher: fetcher,
                defaultQuery: __DEFAULT_QUERY__,
            })
        );
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_defaults_match_original_port() {
        let config = ConsoleConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_builder_methods() {
        let config = ConsoleConfig::new().with_host("0.0.0.0").with_port(8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_graphiql_page_embeds_default_query() {
        let html = graphiql_html(SAMPLE_QUERY);
        assert!(html.contains("tr.athing"));
        assert!(!html.contains("__DEFAULT_QUERY__"));
    }

    #[test]
    fn test_graphiql_page_escapes_query() {
        let html = graphiql_html("{ page { html } } \"quoted\"");
        assert!(html.contains("\\\"quoted\\\""));
    }
}
