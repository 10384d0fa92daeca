use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::filter::TodoFilter;
use crate::server::AppState;
use crate::types::Todo;
use crate::validation::{parse_date_str, TodoCandidate, ValidationError};

use super::utils::non_empty;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive pattern matched against the todo text
    pub search_q: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> Result<TodoFilter, ValidationError> {
        let due_date = match non_empty(self.due_date) {
            Some(raw) => Some(parse_date_str(&raw).ok_or(ValidationError::InvalidDueDate)?),
            None => None,
        };
        Ok(TodoFilter {
            status: non_empty(self.status),
            priority: non_empty(self.priority),
            category: non_empty(self.category),
            search: non_empty(self.search_q),
            due_date,
        })
    }
}

/// GET /todos - List todos matching the query filters
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("rejected list query: {}", rejection);
        ApiError::invalid_query()
    })?;
    let filter = query.into_filter()?;
    let todos = state.store.list(&filter).await?;
    Ok(Json(todos))
}

/// POST /todos - Validate and create a todo
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<TodoCandidate>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let Json(candidate) = payload.map_err(|rejection| {
        tracing::debug!("rejected create body: {}", rejection);
        ApiError::invalid_json()
    })?;

    let new_todo = candidate.validate()?;
    let todo = state.store.insert(new_todo).await?;
    tracing::info!(id = %todo.id, "todo created");

    Ok((StatusCode::CREATED, "Todo Successfully Added"))
}
