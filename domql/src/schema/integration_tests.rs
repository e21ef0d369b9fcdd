//! End-to-end tests: GraphQL queries executed against loaded pages.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use juniper::Variables;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::dom::{FetchConfig, PageFetcher, PageLoader};
    use crate::errors::Error;
    use crate::schema::{build_schema, execute_query, QueryContext};

    /// Answers every fetch with a fixed body and records the URLs.
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

    fn stub_context(remote_body: &str) -> (QueryContext, Rc<RefCell<Vec<String>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetcher = StubFetcher {
            body: remote_body.to_string(),
            requests: Rc::clone(&requests),
        };
        let loader = PageLoader::with_fetcher(Box::new(fetcher), FetchConfig::default());
        (QueryContext::new(loader), requests)
    }

    fn execute(query: &str, remote_body: &str) -> Result<serde_json::Value, Error> {
        let schema = build_schema();
        let (context, _) = stub_context(remote_body);
        execute_query(&schema, query, &Variables::new(), &context)
    }

    #[test]
    fn test_query_items_in_document_order() {
        let data = execute(
            r#"{ page(source: "<ul><li>a</li><li>b</li></ul>") {
                items: query(selector: "li") { text }
            } }"#,
            "",
        )
        .unwrap();
        assert_eq!(
            data,
            json!({ "page": { "items": [ { "text": "a" }, { "text": "b" } ] } })
        );
    }

    #[test]
    fn test_title_and_visit_through_anchor() {
        let schema = build_schema();
        let (context, requests) =
            stub_context("<html><head><title>Linked</title></head><body></body></html>");
        let data = execute_query(
            &schema,
            r#"{ page(source: "<html><head><title>T</title></head><body><a href='http://x'>go</a></body></html>") {
                title
                links: query(selector: "a") {
                    visited: visit { title }
                }
            } }"#,
            &Variables::new(),
            &context,
        )
        .unwrap();
        assert_eq!(
            data,
            json!({ "page": {
                "title": "T",
                "links": [ { "visited": { "title": "Linked" } } ]
            } })
        );
        assert_eq!(requests.borrow().as_slice(), ["http://x"]);
    }

    #[test]
    fn test_visit_on_non_anchor_is_null_without_fetch() {
        let schema = build_schema();
        let (context, requests) = stub_context("unused");
        let data = execute_query(
            &schema,
            r#"{ page(source: "<p>not a link</p>") {
                paras: query(selector: "p") { visit { title } }
            } }"#,
            &Variables::new(),
            &context,
        )
        .unwrap();
        assert_eq!(
            data,
            json!({ "page": { "paras": [ { "visit": null } ] } })
        );
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_null_without_fetch() {
        let schema = build_schema();
        let (context, requests) = stub_context("unused");
        let data = execute_query(
            &schema,
            r#"{ page(source: "<a>nameless</a>") {
                links: query(selector: "a") { visit { title } }
            } }"#,
            &Variables::new(),
            &context,
        )
        .unwrap();
        assert_eq!(data, json!({ "page": { "links": [ { "visit": null } ] } }));
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_page_without_arguments_is_invalid_argument() {
        let schema = build_schema();
        let (context, requests) = stub_context("unused");
        let err = execute_query(&schema, "{ page { title } }", &Variables::new(), &context)
            .unwrap_err();
        assert!(err.to_string().contains("must provide url or source"));
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_attr_without_match_is_null() {
        let data = execute(
            r#"{ page(source: "<p>plain</p>") {
                href: attr(selector: "a", name: "href")
            } }"#,
            "",
        )
        .unwrap();
        assert_eq!(data, json!({ "page": { "href": null } }));
    }

    #[test]
    fn test_html_round_trips_the_source() {
        let data = execute(
            r#"{ page(source: "<ul><li>a</li><li>b</li></ul>") { html } }"#,
            "",
        )
        .unwrap();
        let html = data["page"]["html"].as_str().unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains("<ul><li>a</li><li>b</li></ul>"));
    }

    #[test]
    fn test_camel_case_traversal_fields() {
        let data = execute(
            r#"{ page(source: "<ul><li>a</li><li>b</li><li>c</li></ul>") {
                first: query(selector: "li") {
                    after: nextAll { text }
                }
            } }"#,
            "",
        )
        .unwrap();
        assert_eq!(
            data["page"]["first"][0]["after"],
            json!([ { "text": "b" }, { "text": "c" } ])
        );
    }

    #[test]
    fn test_variables_carry_page_and_source() {
        let schema = build_schema();
        let (context, _) = stub_context("unused");
        let mut variables = Variables::new();
        variables.insert(
            "source".to_string(),
            juniper::InputValue::scalar("<p>from var</p>".to_string()),
        );
        let data = execute_query(
            &schema,
            r#"query Q($source: String) { page(source: $source) { text(selector: "p") } }"#,
            &variables,
            &context,
        )
        .unwrap();
        assert_eq!(data, json!({ "page": { "text": "from var" } }));
    }

    #[test]
    fn test_nested_traversal_mirrors_query_shape() {
        let data = execute(
            r#"{ page(source: "<div><span class='k'>key</span><b>v</b></div>") {
                spans: query(selector: "span") {
                    tag
                    sibling: next { tag }
                    top: parent { tag }
                }
            } }"#,
            "",
        )
        .unwrap();
        assert_eq!(
            data,
            json!({ "page": { "spans": [ {
                "tag": "span",
                "sibling": { "tag": "b" },
                "top": { "tag": "html" }
            } ] } })
        );
    }

    #[test]
    fn test_invalid_selector_fails_the_whole_execution() {
        let err = execute(
            r#"{ page(source: "<p>x</p>") { items: query(selector: "p:::") { text } } }"#,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert!(err.to_string().contains("p:::"));
    }
}
