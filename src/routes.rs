//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /admin/create` - Shorten a long URL
//! - `POST /admin/query`  - Resolve a short URL
//! - `GET  /x/{token}`    - Short link redirect
//! - `GET  /health`       - Store health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .nest("/admin", api::routes::admin_routes())
        .nest("/x", api::routes::redirect_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
