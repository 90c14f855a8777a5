//! Shared HTTP plumbing: error rendering and validated JSON extraction

pub mod error;
pub mod validated_json;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use validated_json::ValidatedJson;
