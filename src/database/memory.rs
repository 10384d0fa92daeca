use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{StoreError, TodoStore};
use crate::filter::TodoFilter;
use crate::types::{NewTodo, Todo, TodoChanges};

/// In-process todo store. Keeps insertion order, which is its store order.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        let search = filter.search_regex()?;
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .filter(|todo| filter.matches(todo, search.as_ref()))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let todo = todo.into_todo(Uuid::new_v4());
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: Uuid, changes: &TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos.iter_mut().find(|todo| todo.id == id).map(|todo| {
            changes.apply_to(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        Ok(todos.len() < before)
    }
}
