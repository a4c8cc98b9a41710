//! Handler for the create endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::create::{CreateRequest, CreateResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a long URL.
///
/// # Endpoint
///
/// `POST /admin/create`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://sh.url/2bI" }
/// ```
///
/// Repeating the request with the same `long_url` returns the same
/// `short_url`.
///
/// # Errors
///
/// - 400 Bad Request if `long_url` is empty or too long
/// - 503 Service Unavailable if the store cannot be reached
pub async fn create_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequest>,
) -> Result<Json<CreateResponse>, AppError> {
    payload.validate()?;

    let short_url = state.shortener.create(&payload.long_url).await?;

    Ok(Json(CreateResponse { short_url }))
}
