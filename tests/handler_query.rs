mod common;

use axum::{Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use serde_json::json;
use short_url::api::handlers::query_handler;
use short_url::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/admin/query", post(query_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_query_full_short_url() {
    let (state, _) = common::create_test_state();
    common::create_test_link(&state, "https://example.com/page").await;
    let server = server(state);

    let response = server
        .post("/admin/query")
        .json(&json!({ "short_url": "http://sh.url/2bI" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "long_url": "https://example.com/page" }));
}

#[tokio::test]
async fn test_query_bare_token() {
    let (state, _) = common::create_test_state();
    let token = common::create_test_link(&state, "https://example.com/page").await;
    let server = server(state);

    let response = server
        .post("/admin/query")
        .json(&json!({ "short_url": token }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "long_url": "https://example.com/page" }));
}

#[tokio::test]
async fn test_query_unknown_token_returns_empty() {
    let (state, _) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/admin/query")
        .json(&json!({ "short_url": "http://sh.url/zzzzzz" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "long_url": "" }));
}

#[tokio::test]
async fn test_query_rejects_empty_input() {
    let (state, _) = common::create_test_state();
    let server = server(state);

    let response = server
        .post("/admin/query")
        .json(&json!({ "short_url": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_query_store_unavailable() {
    let server = server(common::create_unreachable_state());

    let response = server
        .post("/admin/query")
        .json(&json!({ "short_url": "2bI" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
