use sqlx::{self, postgres::PgArguments, FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::StoreError;
use crate::filter::{FilterOp, FilterWhereInfo, SqlParam, SqlResult, TodoFilter};
use crate::filter::filter_where::FilterWhere;

/// Columns of the todos table, in row order
pub const TODO_COLUMNS: &str = "\"id\", \"todo\", \"category\", \"priority\", \"status\", \"due_date\"";

/// SELECT builder over a single table, decoding rows into `T`
pub struct QueryBuilder<T> {
    table_name: String,
    conditions: Vec<FilterWhereInfo>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, StoreError> {
        let name = table_name.into();
        validate_table_name(&name)?;
        Ok(Self {
            table_name: name,
            conditions: vec![],
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter: &TodoFilter) -> Self {
        self.conditions.extend(filter.conditions());
        self
    }

    pub fn where_id(mut self, id: Uuid) -> Self {
        self.conditions.push(FilterWhereInfo { column: "id", operator: FilterOp::Eq, data: SqlParam::Uuid(id) });
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, StoreError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, StoreError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub fn sql_result(&self) -> Result<SqlResult, StoreError> {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let query = format!("SELECT {} FROM \"{}\" WHERE {}", TODO_COLUMNS, self.table_name, where_clause);
        Ok(SqlResult { query, params })
    }
}

/// INSERT of a full row, binding `$1..$6` in column order
pub fn insert_sql(table_name: &str) -> Result<String, StoreError> {
    validate_table_name(table_name)?;
    Ok(format!(
        "INSERT INTO \"{}\" ({}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        table_name, TODO_COLUMNS, TODO_COLUMNS
    ))
}

/// Partial UPDATE by id (`$1`). A NULL in `$2..$6` keeps the stored column.
pub fn update_sql(table_name: &str) -> Result<String, StoreError> {
    validate_table_name(table_name)?;
    let assignments = ["todo", "category", "priority", "status", "due_date"]
        .iter()
        .enumerate()
        .map(|(i, column)| format!("\"{0}\" = COALESCE(${1}, \"{0}\")", column, i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "UPDATE \"{}\" SET {} WHERE \"id\" = $1 RETURNING {}",
        table_name, assignments, TODO_COLUMNS
    ))
}

pub fn delete_sql(table_name: &str) -> Result<String, StoreError> {
    validate_table_name(table_name)?;
    Ok(format!("DELETE FROM \"{}\" WHERE \"id\" = $1", table_name))
}

fn validate_table_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid_start = chars.next().map(|c| c.is_ascii_alphabetic() || c == '_').unwrap_or(false);
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::Query(format!("Invalid table name format: {}", name)));
    }
    Ok(())
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Date(d) => q.bind(*d),
        SqlParam::Uuid(id) => q.bind(*id),
    }
}
