use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::filter::TodoFilter;
use crate::server::AppState;
use crate::types::Todo;
use crate::validation::{parse_date_str, ValidationError};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
}

/// GET /todos/agenda?date=... - Todos due on the given day
pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<AgendaQuery>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("rejected agenda query: {}", rejection);
        ApiError::invalid_query()
    })?;
    let date = query
        .date
        .as_deref()
        .and_then(parse_date_str)
        .ok_or(ValidationError::InvalidDueDate)?;

    let todos = state.store.list(&TodoFilter::due_on(date)).await?;
    Ok(Json(todos))
}
