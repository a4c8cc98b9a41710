//! DTOs for the query endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to resolve a short URL.
///
/// `short_url` may be a full short URL or a bare token.
#[derive(Debug, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(min = 1, max = 8192, message = "short_url must be 1-8192 bytes"))]
    pub short_url: String,
}

/// `long_url` is empty when the token is unknown.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub long_url: String,
}
