//! Tests for the action protocol and the HTTP transport.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use citation_graph::config::Config;
use citation_graph::server::transport::create_router;
use citation_graph::server::{ActionDispatcher, DiagramServer, stdio};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/papers.json");

fn build_server() -> DiagramServer {
    DiagramServer::from_config(Config::for_testing(FIXTURE)).unwrap()
}

fn build_dispatcher() -> Arc<ActionDispatcher> {
    Arc::clone(build_server().dispatcher())
}

fn build_test_router() -> axum::Router {
    create_router(build_dispatcher(), &Config::for_testing(FIXTURE))
}

async fn dispatch(dispatcher: &ActionDispatcher, message: Value) -> Vec<Value> {
    dispatcher
        .dispatch_text(&message.to_string())
        .await
        .iter()
        .map(|reply| serde_json::from_str(reply).unwrap())
        .collect()
}

fn paper_ids(model: &Value) -> Vec<&str> {
    model["children"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["type"] == "node:paper")
        .map(|c| c["id"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Action dispatch
// =============================================================================

#[tokio::test]
async fn test_request_model_answers_set_model() {
    let dispatcher = build_dispatcher();
    let replies = dispatch(
        &dispatcher,
        json!({"clientId": "sprotty", "action": {"kind": "requestModel", "requestId": "req-1"}}),
    )
    .await;

    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["clientId"], "sprotty");

    let action = &replies[0]["action"];
    assert_eq!(action["kind"], "setModel");
    assert_eq!(action["responseId"], "req-1");
    assert_eq!(paper_ids(&action["newRoot"]).len(), 6);
    assert_eq!(action["newRoot"]["years"], json!([2014, 2017, 2018, 2019, 2020]));
}

#[tokio::test]
async fn test_filter_action_answers_update_and_fit() {
    let dispatcher = build_dispatcher();
    let replies = dispatch(
        &dispatcher,
        json!({
            "clientId": "sprotty",
            "action": {
                "kind": "filterAction",
                "filter": {"paperIds": ["root"], "additionalChildLevels": 1},
                "renderOptions": {"useZoomFactor": true}
            }
        }),
    )
    .await;

    let kinds: Vec<_> = replies.iter().map(|r| r["action"]["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["updateModel", "fit"]);

    let model = &replies[0]["action"]["newRoot"];
    assert_eq!(paper_ids(model), vec!["root", "c1", "c2"]);
    assert_eq!(model["renderOptions"]["useZoomFactor"], true);
    // Metadata still covers the whole dataset.
    assert_eq!(model["authors"].as_array().unwrap().len(), 5);

    let fit = &replies[1]["action"];
    assert_eq!(fit["elementIds"], json!(["root", "c1", "c2"]));
    assert_eq!(fit["maxZoom"], 0.5);
    assert_eq!(fit["padding"], 100.0);
    assert_eq!(fit["animate"], true);
}

#[tokio::test]
async fn test_filter_action_without_filter_shows_everything() {
    let dispatcher = build_dispatcher();
    let replies = dispatch(&dispatcher, json!({"action": {"kind": "filterAction"}})).await;

    assert_eq!(paper_ids(&replies[0]["action"]["newRoot"]).len(), 6);
    assert!(replies[0]["clientId"].is_null());
}

#[tokio::test]
async fn test_unknown_kind_is_ignored() {
    let dispatcher = build_dispatcher();
    let replies = dispatch(&dispatcher, json!({"action": {"kind": "selectAll"}})).await;
    assert!(replies.is_empty());
}

#[tokio::test]
async fn test_malformed_messages_report_errors() {
    let dispatcher = build_dispatcher();

    let replies = dispatcher.dispatch_text("{not json").await;
    assert_eq!(replies.len(), 1);
    let error: Value = serde_json::from_str(&replies[0]).unwrap();
    assert!(error["error"].as_str().unwrap().starts_with("Malformed action"));

    let missing_kind = dispatch(&dispatcher, json!({"action": {"requestId": "x"}})).await;
    assert_eq!(missing_kind[0]["error"], "Action message without kind");

    let bad_payload =
        dispatch(&dispatcher, json!({"action": {"kind": "filterAction", "filter": 42}})).await;
    assert!(bad_payload[0]["error"].is_string());
}

#[test]
fn test_registered_kinds() {
    let dispatcher = build_dispatcher();
    assert_eq!(dispatcher.kinds(), vec!["requestModel", "filterAction"]);
    assert!(dispatcher.get_handler("filterAction").is_some());
    assert!(dispatcher.get_handler("fit").is_none());
}

// =============================================================================
// Stdio transport
// =============================================================================

#[tokio::test]
async fn test_stdio_one_reply_per_line() {
    let dispatcher = build_dispatcher();
    let input = concat!(
        r#"{"clientId": "c", "action": {"kind": "requestModel", "requestId": "1"}}"#,
        "\n\n",
        r#"{"clientId": "c", "action": {"kind": "filterAction", "filter": {"reset": true}}}"#,
        "\n",
        "garbage\n",
    );

    let mut output = Vec::new();
    stdio::serve_lines(&dispatcher, input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["action"]["kind"], "setModel");
    assert_eq!(lines[1]["action"]["kind"], "updateModel");
    assert_eq!(lines[2]["action"]["kind"], "fit");
    assert!(lines[3]["error"].is_string());
}

#[tokio::test]
async fn test_stdio_replies_echo_each_message_client_id() {
    let dispatcher = build_dispatcher();
    let input = concat!(
        r#"{"clientId": "first", "action": {"kind": "requestModel", "requestId": "1"}}"#,
        "\n",
        r#"{"action": {"kind": "requestModel", "requestId": "2"}}"#,
        "\n",
        r#"{"clientId": "second", "action": {"kind": "requestModel", "requestId": "3"}}"#,
        "\n",
    );

    let mut output = Vec::new();
    stdio::serve_lines(&dispatcher, input.as_bytes(), &mut output).await.unwrap();

    let client_ids: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["clientId"].clone())
        .collect();
    // A message without clientId is answered without one.
    assert_eq!(client_ids, vec![json!("first"), Value::Null, json!("second")]);
}

// =============================================================================
// HTTP transport
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = build_test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "citation-graph");
}

#[tokio::test]
async fn test_ready_endpoint_reports_dataset() {
    let response = build_test_router()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ready: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(ready["papers"], 6);
    assert_eq!(ready["rootId"], "root");
}

#[tokio::test]
async fn test_graph_endpoint() {
    let app = build_test_router();

    let response = app
        .clone()
        .oneshot(Request::post("/graph").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let graph: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(paper_ids(&graph).len(), 6);

    let response = app
        .clone()
        .oneshot(
            Request::post("/graph")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"paperIds": ["c3"], "additionalParentLevels": 1}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let graph: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(paper_ids(&graph), vec!["c3", "c1", "c2"]);

    let response = app
        .oneshot(Request::post("/graph").body(Body::from("{\"paperIds\": 3}")).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
