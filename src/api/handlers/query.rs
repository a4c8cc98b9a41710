//! Handler for the query endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::query::{QueryRequest, QueryResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Looks up the long URL behind a short URL.
///
/// # Endpoint
///
/// `POST /admin/query`
///
/// # Request Body
///
/// ```json
/// { "short_url": "http://sh.url/2bI" }
/// ```
///
/// A bare token (`"2bI"`) is accepted as well.
///
/// # Response
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// An unknown token yields `{"long_url": ""}` with status 200.
///
/// # Errors
///
/// - 400 Bad Request if `short_url` is empty or too long
/// - 503 Service Unavailable if the store cannot be reached
pub async fn query_handler(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    payload.validate()?;

    let token = state.shortener.token_from_input(&payload.short_url);
    let long_url = state.shortener.resolve(token).await?.unwrap_or_default();

    Ok(Json(QueryResponse { long_url }))
}
