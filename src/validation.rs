use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{Category, NewTodo, Priority, Status};

/// First failing check of a candidate todo. The message is returned to clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid Todo Category")]
    InvalidCategory,

    #[error("Invalid Todo Priority")]
    InvalidPriority,

    #[error("Invalid Todo Status")]
    InvalidStatus,

    #[error("Invalid Due Date")]
    InvalidDueDate,

    #[error("Invalid Todo Text")]
    InvalidTodo,
}

impl ValidationError {
    /// Wire name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidCategory => "category",
            ValidationError::InvalidPriority => "priority",
            ValidationError::InvalidStatus => "status",
            ValidationError::InvalidDueDate => "dueDate",
            ValidationError::InvalidTodo => "todo",
        }
    }
}

/// Raw, unchecked todo fields as they arrive in a request body.
///
/// Every field is an arbitrary JSON value so that wrong types surface as
/// validation messages rather than body rejections. Unknown keys (including
/// `id`) are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoCandidate {
    #[serde(default)]
    pub todo: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub priority: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, rename = "dueDate")]
    pub due_date: Option<Value>,
}

impl TodoCandidate {
    /// Check category, priority, status, dueDate and finally the text, stopping at the first failure
    pub fn validate(&self) -> Result<NewTodo, ValidationError> {
        let category = parse_enum::<Category>(self.category.as_ref())
            .ok_or(ValidationError::InvalidCategory)?;
        let priority = parse_enum::<Priority>(self.priority.as_ref())
            .ok_or(ValidationError::InvalidPriority)?;
        let status = parse_enum::<Status>(self.status.as_ref())
            .ok_or(ValidationError::InvalidStatus)?;
        let due_date = self
            .due_date
            .as_ref()
            .and_then(parse_due_date)
            .ok_or(ValidationError::InvalidDueDate)?;
        let todo = match self.todo.as_ref() {
            Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
            _ => return Err(ValidationError::InvalidTodo),
        };

        Ok(NewTodo {
            todo,
            category,
            priority,
            status,
            due_date,
        })
    }
}

fn parse_enum<T: std::str::FromStr>(value: Option<&Value>) -> Option<T> {
    value?.as_str()?.parse().ok()
}

/// Normalize a JSON due date to day granularity. Only strings are accepted.
pub fn parse_due_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_date_str)
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// Minute-precision date-times with a numeric offset, which RFC 3339 requires seconds for
const OFFSET_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date or date-time string and keep only its calendar date.
///
/// Offsets are discarded rather than converted, so `2024-03-01T23:30:00-05:00`
/// stays on the 1st.
pub fn parse_date_str(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.date_naive());
        }
    }
    // A trailing `Z` is UTC; the offset is dropped anyway
    let local = s.strip_suffix(|c: char| c == 'Z' || c == 'z').unwrap_or(s);
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(local, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
