// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here takes `Claims`, whose extractor verifies the bearer token.
// Each handler checks its own scope before touching the store.

pub mod restaurants;
pub mod reviews;

use crate::error::ApiError;

/// Parse a path id segment, rejecting anything that is not a 32-bit integer
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| {
        ApiError::bad_request(format!("Invalid {} id: {}", resource, raw))
    })
}
