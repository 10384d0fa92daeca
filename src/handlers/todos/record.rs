use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{NewTodo, Todo, TodoChanges};
use crate::validation::TodoCandidate;

use super::utils::parse_todo_id;

/// GET /todos/:id - Get a single todo by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = parse_todo_id(&id)?;
    let todo = state.store.get(id).await?.ok_or_else(ApiError::todo_not_found)?;
    Ok(Json(todo))
}

/// PUT /todos/:id - Partially update a todo
///
/// The supplied fields are merged over the stored record and the merged
/// result is validated as a whole. Only the supplied fields are written.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<String, ApiError> {
    let id = parse_todo_id(&id)?;
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("rejected update body: {}", rejection);
        ApiError::invalid_json()
    })?;

    let existing = state.store.get(id).await?.ok_or_else(ApiError::todo_not_found)?;

    let updates = match payload {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(ApiError::bad_request("Invalid Update Payload")),
    };

    let merged = merge_fields(&existing, &updates).validate()?;
    let changes = supplied_changes(&updates, merged);

    state
        .store
        .update(id, &changes)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    // Only the first key of the payload is echoed back
    let first_key = updates.keys().next().cloned().unwrap_or_default();
    tracing::info!(%id, field = %first_key, "todo updated");
    Ok(format!("{} Updated", first_key))
}

/// DELETE /todos/:id - Remove a todo
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, ApiError> {
    let id = parse_todo_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(ApiError::todo_not_found());
    }
    tracing::info!(%id, "todo deleted");
    Ok("Todo Deleted")
}

/// Stored values overlaid with the supplied ones
fn merge_fields(existing: &Todo, updates: &Map<String, Value>) -> TodoCandidate {
    let field = |key: &str, current: Value| Some(updates.get(key).cloned().unwrap_or(current));

    TodoCandidate {
        todo: field("todo", Value::from(existing.todo.as_str())),
        category: field("category", Value::from(existing.category.as_str())),
        priority: field("priority", Value::from(existing.priority.as_str())),
        status: field("status", Value::from(existing.status.as_str())),
        due_date: field("dueDate", Value::from(existing.due_date.format("%Y-%m-%d").to_string())),
    }
}

/// Pick the validated values for the keys the client actually sent
fn supplied_changes(updates: &Map<String, Value>, merged: NewTodo) -> TodoChanges {
    let sent = |key: &str| updates.contains_key(key);

    TodoChanges {
        category: sent("category").then_some(merged.category),
        priority: sent("priority").then_some(merged.priority),
        status: sent("status").then_some(merged.status),
        due_date: sent("dueDate").then_some(merged.due_date),
        todo: sent("todo").then_some(merged.todo),
    }
}
