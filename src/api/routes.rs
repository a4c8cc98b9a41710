//! API route configuration.

use crate::api::handlers::{create_handler, query_handler, redirect_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Management routes, nested under `/admin`.
///
/// # Endpoints
///
/// - `POST /create` - Shorten a long URL
/// - `POST /query`  - Resolve a short URL to its long URL
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_handler))
        .route("/query", post(query_handler))
}

/// Public redirect routes, nested under `/x`.
///
/// - `GET /{token}` - 302 to the long URL
pub fn redirect_routes() -> Router<AppState> {
    Router::new().route("/{token}", get(redirect_handler))
}
