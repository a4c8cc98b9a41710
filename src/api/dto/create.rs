//! DTOs for the create endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a long URL.
///
/// The URL is stored byte for byte; no scheme check or normalization happens.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 8192, message = "long_url must be 1-8192 bytes"))]
    pub long_url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub short_url: String,
}
