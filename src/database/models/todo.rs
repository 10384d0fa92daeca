use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{Todo, UnknownVariant};

/// Row shape of the `todos` table. Enumerations are stored as their wire strings.
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: Uuid,
    pub todo: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub due_date: NaiveDate,
}

impl TryFrom<TodoRow> for Todo {
    type Error = UnknownVariant;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: row.id,
            todo: row.todo,
            category: row.category.parse()?,
            priority: row.priority.parse()?,
            status: row.status.parse()?,
            due_date: row.due_date,
        })
    }
}
