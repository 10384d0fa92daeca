use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{FilterError, TodoFilter};
use crate::types::{NewTodo, Todo, TodoChanges, UnknownVariant};

/// Failures of the record store. All of them surface to clients as a generic server error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    Query(String),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Corrupt todo record: {0}")]
    CorruptRecord(#[from] UnknownVariant),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for todo records
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos matching the filter, in store order
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Persist a new todo; the store assigns the id
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Write only the supplied fields. Returns `None` when the id does not exist.
    async fn update(&self, id: Uuid, changes: &TodoChanges) -> Result<Option<Todo>, StoreError>;

    /// Returns `false` when the id does not exist
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
