pub mod auth;
pub mod response;

pub use response::{json_method_not_allowed, not_found, ApiResponse, ApiResult};
