use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::models::TodoRow;
use super::query_builder::{delete_sql, insert_sql, update_sql, QueryBuilder};
use super::store::{StoreError, TodoStore};
use crate::filter::TodoFilter;
use crate::types::{NewTodo, Todo, TodoChanges};

const TABLE: &str = "todos";

/// Todo store backed by the `todos` table
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, StoreError> {
        debug!(?filter, "listing todos");
        let rows = QueryBuilder::<TodoRow>::new(TABLE)?
            .filter(filter)
            .select_all(&self.pool)
            .await?;
        rows.into_iter()
            .map(|row| Todo::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let row = QueryBuilder::<TodoRow>::new(TABLE)?
            .where_id(id)
            .select_optional(&self.pool)
            .await?;
        Ok(row.map(Todo::try_from).transpose()?)
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let sql = insert_sql(TABLE)?;
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&todo.todo)
            .bind(todo.category.as_str())
            .bind(todo.priority.as_str())
            .bind(todo.status.as_str())
            .bind(todo.due_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(Todo::try_from(row)?)
    }

    async fn update(&self, id: Uuid, changes: &TodoChanges) -> Result<Option<Todo>, StoreError> {
        // Unsupplied fields bind NULL and keep their stored value
        let sql = update_sql(TABLE)?;
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(changes.todo.as_deref())
            .bind(changes.category.map(|c| c.as_str()))
            .bind(changes.priority.map(|p| p.as_str()))
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.due_date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Todo::try_from).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = delete_sql(TABLE)?;
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
