mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use short_url::api::handlers::health_handler;
use short_url::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _) = common::create_test_state();
    let server = server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded() {
    let server = server(common::create_unreachable_state());

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}
