//! Query execution boundary
//!
//! The engines render `Statement`s; executors run them and hand back
//! uniform `SqlRow`s. Two execution modes share all policy:
//!
//! - `Executor` - blocking synchronous access (DuckDB)
//! - `AsyncExecutor` - cooperatively-suspending access (sqlx pools); the
//!   only suspension points are the query executions themselves
//!
//! Each implementation exposes its dialect so the pagination engine can
//! resolve capabilities (placeholders, windowed count) without probing the
//! connection.

#[cfg(feature = "duckdb")]
mod duckdb;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::sql::SqlDialect;
use crate::value::{SqlRow, Statement};

/// Blocking query executor.
pub trait Executor {
    /// The dialect this executor speaks.
    fn dialect(&self) -> &dyn SqlDialect;

    /// Execute a statement and return all rows.
    fn fetch_all(&self, stmt: &Statement) -> Result<Vec<SqlRow>, ExecuteError>;
}

/// Asynchronous query executor.
#[async_trait]
pub trait AsyncExecutor: Send + Sync {
    /// The dialect this executor speaks.
    fn dialect(&self) -> &dyn SqlDialect;

    /// Execute a statement and return all rows.
    async fn fetch_all(&self, stmt: &Statement) -> Result<Vec<SqlRow>, ExecuteError>;
}

/// Unified error type for executor backends
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// PostgreSQL database error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// SQLite database error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// DuckDB database error
    #[cfg(feature = "duckdb")]
    #[error("DuckDB error: {0}")]
    Duckdb(#[from] ::duckdb::Error),

    /// A column value could not be decoded into a `SqlValue`
    #[error("Failed to decode column '{column}': {detail}")]
    Decode { column: String, detail: String },

    /// A count query returned no rows
    #[error("Count query returned no rows")]
    MissingCount,
}

impl ExecuteError {
    /// Create a PostgreSQL error with preserved context
    #[cfg(feature = "postgres")]
    pub fn from_postgres(e: sqlx::Error) -> Self {
        Self::Postgres(e)
    }

    /// Create a SQLite error with preserved context
    #[cfg(feature = "sqlite")]
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        Self::Sqlite(e)
    }

    /// Create a decode error for a named column
    pub fn decode(column: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Decode {
            column: column.into(),
            detail: detail.to_string(),
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
            #[cfg(feature = "duckdb")]
            Self::Duckdb(_) => "duckdb",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err = ExecuteError::decode("age", "unexpected type");
        assert_eq!(
            err.to_string(),
            "Failed to decode column 'age': unexpected type"
        );
        assert_eq!(err.backend(), "unknown");
    }
}
