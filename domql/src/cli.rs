//! The command-line surface.
//!
//! Reads a GraphQL query from a file, optionally a page URL and raw markup
//! source, executes it, and writes the pretty-printed result. `--test`
//! starts the interactive query console instead.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use juniper::{InputValue, Variables};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::dom::{FetchConfig, PageLoader};
use crate::schema::{build_schema, execute_query, QueryContext};

/// Parse and scrape any web page using GraphQL queries.
#[derive(Debug, Parser)]
#[command(name = "domql", version)]
#[command(about = "Parse and scrape any web page using GraphQL queries")]
pub struct Cli {
    /// The query file
    #[arg(required_unless_present = "test", conflicts_with = "test")]
    query: Option<PathBuf>,

    /// The page to parse
    #[arg(value_name = "PAGE")]
    page: Option<String>,

    /// Read the page markup from a file (defaults to piped stdin)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Start an interactive query console
    #[arg(long)]
    test: bool,
}

/// Runs the CLI to completion.
///
/// Any unrecoverable resolution error is returned to the caller, which
/// prints it and exits non-zero; no partial results are emitted.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.test {
        return run_console();
    }

    let query_path = cli
        .query
        .context("a query file is required unless --test is given")?;
    let query = fs::read_to_string(&query_path)
        .with_context(|| format!("failed to read query file {}", query_path.display()))?;

    let source = read_source(cli.source.as_ref())?;

    let mut variables = Variables::new();
    if let Some(page) = cli.page {
        variables.insert("page".to_string(), InputValue::scalar(page));
    }
    if let Some(source) = source {
        variables.insert("source".to_string(), InputValue::scalar(source));
    }

    let schema = build_schema();
    let loader = PageLoader::new(FetchConfig::default())?;
    let context = QueryContext::new(loader);
    let data = execute_query(&schema, &query, &variables, &context)?;

    let rendered = render_json(&data)?;
    match cli.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

#[cfg(feature = "console")]
fn run_console() -> Result<()> {
    let config = crate::server::ConsoleConfig::default();
    crate::server::serve(config).context("query console failed")
}

#[cfg(not(feature = "console"))]
fn run_console() -> Result<()> {
    anyhow::bail!("this build does not include the query console (enable the `console` feature)")
}

/// Reads the raw markup source: an explicit file if given, otherwise piped
/// stdin, otherwise nothing.
fn read_source(path: Option<&PathBuf>) -> Result<Option<String>> {
    if let Some(path) = path {
        let markup = fs::read_to_string(path)
            .with_context(|| format!("failed to read source file {}", path.display()))?;
        return Ok(Some(markup));
    }
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    debug!("reading page source from stdin");
    let mut markup = String::new();
    io::stdin().read_to_string(&mut markup)?;
    Ok(Some(markup))
}

/// Renders a result value as 4-space-indented JSON with a trailing newline.
fn render_json(value: &serde_json::Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("failed to serialize result")?;
    buf.push(b'\n');
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_json_uses_four_space_indent_and_trailing_newline() {
        let value = json!({ "page": { "title": "T" } });
        let rendered = render_json(&value).unwrap();
        assert_eq!(
            rendered,
            "{\n    \"page\": {\n        \"title\": \"T\"\n    }\n}\n"
        );
    }

    #[test]
    fn test_render_json_scalar() {
        let rendered = render_json(&json!(null)).unwrap();
        assert_eq!(rendered, "null\n");
    }

    #[test]
    fn test_cli_requires_query_unless_test() {
        use clap::CommandFactory;
        let err = Cli::command()
            .try_get_matches_from(["domql"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_query_conflicts_with_test() {
        use clap::CommandFactory;
        let err = Cli::command()
            .try_get_matches_from(["domql", "q.graphql", "--test"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
