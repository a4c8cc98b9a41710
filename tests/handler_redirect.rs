mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use short_url::api::handlers::redirect_handler;
use short_url::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/x/{token}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_found() {
    let (state, _) = common::create_test_state();
    let token = common::create_test_link(&state, "https://example.com/target?q=1").await;
    let server = server(state);

    let response = server.get(&format!("/x/{token}")).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        "https://example.com/target?q=1"
    );
}

#[tokio::test]
async fn test_redirect_unknown_token() {
    let (state, _) = common::create_test_state();
    let server = server(state);

    let response = server.get("/x/nope").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["token"], "nope");
}

#[tokio::test]
async fn test_redirect_is_case_sensitive() {
    let (state, _) = common::create_test_state();
    common::create_test_link(&state, "https://example.com").await;
    let server = server(state);

    server.get("/x/2bI").await.assert_status(StatusCode::FOUND);
    server.get("/x/2BI").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_store_unavailable() {
    let server = server(common::create_unreachable_state());

    let response = server.get("/x/2bI").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_redirect_non_base62_token_skips_store() {
    let server = server(common::create_unreachable_state());

    let response = server.get("/x/not-a-token").await;

    response.assert_status_not_found();
}
