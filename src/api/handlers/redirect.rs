//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base62;

/// Redirects a token to its long URL.
///
/// # Endpoint
///
/// `GET /x/{token}`
///
/// # Response Codes
///
/// - **302 Found** with `Location` set to the long URL
/// - **404 Not Found** if the token is unknown or not base62, the latter
///   without a store lookup
/// - **503 Service Unavailable** if the store cannot be reached
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !base62::is_valid_token(&token) {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "token": token }),
        ));
    }

    let long_url = state.shortener.resolve(&token).await?.ok_or_else(|| {
        debug!(%token, "Unknown token");
        AppError::not_found("Short link not found", json!({ "token": token }))
    })?;

    let location = HeaderValue::from_str(&long_url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "token": token }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
