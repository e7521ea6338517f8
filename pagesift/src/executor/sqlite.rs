//! SQLite executor over a sqlx connection pool

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _};

use crate::sql::{SqlDialect, SqliteDialect};
use crate::value::{SqlRow, SqlValue, Statement};

use super::{AsyncExecutor, ExecuteError};

static DIALECT: SqliteDialect = SqliteDialect;

#[async_trait]
impl AsyncExecutor for SqlitePool {
    fn dialect(&self) -> &dyn SqlDialect {
        &DIALECT
    }

    async fn fetch_all(&self, stmt: &Statement) -> Result<Vec<SqlRow>, ExecuteError> {
        let mut query = sqlx::query(&stmt.sql);
        for value in &stmt.binds {
            query = match value {
                SqlValue::Null => query.bind(Option::<String>::None),
                SqlValue::Bool(b) => query.bind(*b),
                SqlValue::Int(i) => query.bind(*i),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Text(s) => query.bind(s.clone()),
                SqlValue::DateTime(dt) => query.bind(*dt),
            };
        }
        let rows = query
            .fetch_all(self)
            .await
            .map_err(ExecuteError::from_sqlite)?;
        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &SqliteRow) -> Result<SqlRow, ExecuteError> {
    let mut names = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let name = column.name().to_string();
        let value = decode_value(row, i, &name, column.type_info().name())?;
        names.push(name);
        values.push(value);
    }
    Ok(SqlRow::new(names, values))
}

fn decode_value(
    row: &SqliteRow,
    index: usize,
    name: &str,
    type_name: &str,
) -> Result<SqlValue, ExecuteError> {
    let value = match type_name {
        "NULL" => SqlValue::Null,
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Bool),
        "INTEGER" | "INT4" | "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Int),
        "REAL" => row
            .try_get::<Option<f64>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Float),
        "DATETIME" | "TIMESTAMP" => {
            // Stored as TEXT; decode through chrono when possible.
            if let Ok(Some(dt)) = row.try_get::<Option<DateTime<Utc>>, _>(index) {
                SqlValue::DateTime(dt)
            } else if let Ok(Some(naive)) = row.try_get::<Option<NaiveDateTime>, _>(index) {
                SqlValue::DateTime(naive.and_utc())
            } else {
                row.try_get::<Option<String>, _>(index)
                    .map_err(|e| ExecuteError::decode(name, e))?
                    .map_or(SqlValue::Null, SqlValue::Text)
            }
        }
        "TEXT" => row
            .try_get::<Option<String>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Text),
        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(v) => v.map_or(SqlValue::Null, SqlValue::Text),
            Err(_) => SqlValue::Null,
        },
    };
    Ok(value)
}
