//! Request and response envelope types

pub mod error;
pub mod json;
pub mod list;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
pub use list::ListResponse;
