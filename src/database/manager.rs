use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const TODOS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS "todos" (
    "id"       UUID PRIMARY KEY,
    "todo"     TEXT NOT NULL CHECK ("todo" <> ''),
    "category" TEXT NOT NULL CHECK ("category" IN ('WORK', 'HOME', 'LEARNING')),
    "priority" TEXT NOT NULL CHECK ("priority" IN ('HIGH', 'MEDIUM', 'LOW')),
    "status"   TEXT NOT NULL CHECK ("status" IN ('TO DO', 'IN PROGRESS', 'DONE')),
    "due_date" DATE NOT NULL
)
"#;

/// Owner of the process-wide connection pool. The pool is created once at
/// startup and lives until the process exits.
pub struct DatabaseManager;

impl DatabaseManager {
    fn slot() -> &'static OnceLock<PgPool> {
        static POOL: OnceLock<PgPool> = OnceLock::new();
        &POOL
    }

    /// Connect (first call only), make sure the todos table exists and return the shared pool
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if let Some(pool) = Self::slot().get() {
            return Ok(pool.clone());
        }

        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = Self::validate_connection_string(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        Self::ensure_schema(&pool).await?;

        // Another task may have won the race; keep whichever pool landed first
        let pool = Self::slot().get_or_init(|| pool).clone();
        info!("Connected to todo database");
        Ok(pool)
    }

    /// Create the todos table if it is missing
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(TODOS_TABLE_DDL).execute(pool).await?;
        Ok(())
    }

    fn validate_connection_string(raw: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(raw.trim()).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(url.into()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }
}
