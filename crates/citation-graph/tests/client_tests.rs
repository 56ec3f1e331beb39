//! Client behavior and error mapping tests.
//!
//! Status codes the retry middleware does not retry are mapped straight to
//! `ClientError` variants; these tests pin that mapping.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use citation_graph::client::SemanticScholarClient;
use citation_graph::config::ClientConfig;
use citation_graph::error::ClientError;

const FIELDS: &[&str] = &["title", "year"];

fn setup_client(mock_server: &MockServer) -> SemanticScholarClient {
    SemanticScholarClient::new(ClientConfig::for_testing(&mock_server.uri())).unwrap()
}

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_client_reports_api_key_status() {
    let with_key = SemanticScholarClient::new(ClientConfig::new(Some("key".to_string()))).unwrap();
    assert!(with_key.has_api_key());

    let without_key = SemanticScholarClient::new(ClientConfig::new(None)).unwrap();
    assert!(!without_key.has_api_key());
}

#[test]
fn test_debug_output_hides_api_key() {
    let client = SemanticScholarClient::new(ClientConfig::new(Some("secret".to_string()))).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("secret"));
    assert!(debug.contains("has_api_key: true"));
}

// =============================================================================
// Response Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_paper_tree_parses_shallow_lists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paperId": "abc",
            "title": "Deep Learning",
            "year": 2015,
            "authors": null,
            "citations": [{"paperId": "x"}, {"paperId": null}],
            "references": []
        })))
        .mount(&mock_server)
        .await;

    let tree = setup_client(&mock_server).get_paper_tree("abc", FIELDS).await.unwrap();

    assert_eq!(tree.title.as_deref(), Some("Deep Learning"));
    assert!(tree.authors.is_empty());
    assert_eq!(tree.citations.len(), 2);
    assert!(tree.citations.iter().all(|c| c.is_stub()));
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Paper not found"))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).get_paper_tree("missing", FIELDS).await.unwrap_err();
    match err {
        ClientError::NotFound { resource } => assert_eq!(resource, "Paper not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_request_maps_to_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Unrecognized field"))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).get_paper_tree("bad", FIELDS).await.unwrap_err();
    assert!(matches!(err, ClientError::BadRequest { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/weird"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let result = setup_client(&mock_server).get_paper_tree("weird", FIELDS).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_wrong_shape_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paperId": 42})))
        .mount(&mock_server)
        .await;

    let err = setup_client(&mock_server).get_paper_tree("list", FIELDS).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}
