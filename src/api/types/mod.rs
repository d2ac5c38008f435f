//! Wire types shared across handlers

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorData, ApiErrorResponse};
pub use json::Json;
