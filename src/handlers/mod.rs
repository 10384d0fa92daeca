// handlers/mod.rs - HTTP handlers, one sub-module per resource
pub mod todos;

use crate::error::ApiError;

/// Fallback for any path or method no route claims
pub async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}
