use uuid::Uuid;

use crate::error::ApiError;

/// Parse the `:id` path segment
pub fn parse_todo_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("Invalid Todo Id"))
}

/// Query parameters that are present but empty count as absent
pub fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|value| !value.is_empty())
}
