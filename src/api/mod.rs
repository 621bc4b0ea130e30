pub mod body;

pub use body::{BodyError, RequestBody, DEF_MAX_STR_LEN, MAX_COMMENT_LEN};
