use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;

use crate::database::{MemoryTodoStore, TodoStore};
use crate::handlers::{self, route_not_found, todos};

/// Shared request state: the process-wide record store
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }

    /// State backed by a fresh in-process store
    pub fn memory() -> Self {
        Self::new(MemoryTodoStore::new())
    }
}

/// Router wrapped so that `/todos/` and `/todos/:id/` reach the same handlers
pub type TodoService = NormalizePath<Router>;

/// The full todo service with trailing slashes trimmed
pub fn app(state: AppState) -> TodoService {
    normalize_paths(router(state))
}

/// Trailing slashes are trimmed before routing, so this has to wrap the
/// whole router rather than be added with `Router::layer`
pub fn normalize_paths(router: Router) -> TodoService {
    NormalizePath::trim_trailing_slash(router)
}

/// Todo routes, permissive CORS and the "Route not found" fallback
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(todo_routes())
        .fallback(handlers::route_not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn todo_routes() -> Router<AppState> {
    Router::new()
        // Collection
        .route(
            "/todos",
            get(todos::todos_list)
                .post(todos::todos_create)
                .fallback(route_not_found),
        )
        // Literal segment, matched ahead of /todos/:id
        .route("/todos/agenda", get(todos::agenda_get).fallback(route_not_found))
        // Individual records
        .route(
            "/todos/:id",
            get(todos::todo_get)
                .put(todos::todo_put)
                .delete(todos::todo_delete)
                .fallback(route_not_found),
        )
}
