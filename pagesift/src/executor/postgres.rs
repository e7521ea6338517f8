//! PostgreSQL executor over a sqlx connection pool

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{Column as _, Row as _, TypeInfo as _};

use crate::sql::{PostgresDialect, SqlDialect};
use crate::value::{SqlRow, SqlValue, Statement};

use super::{AsyncExecutor, ExecuteError};

static DIALECT: PostgresDialect = PostgresDialect;

#[async_trait]
impl AsyncExecutor for PgPool {
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
            .map_err(ExecuteError::from_postgres)?;
        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &PgRow) -> Result<SqlRow, ExecuteError> {
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
    row: &PgRow,
    index: usize,
    name: &str,
    type_name: &str,
) -> Result<SqlValue, ExecuteError> {
    let value = match type_name {
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, |v| SqlValue::Int(v as i64)),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, |v| SqlValue::Int(v as i64)),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Int),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, |v| SqlValue::Float(v as f64)),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Float),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => row
            .try_get::<Option<String>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::Text),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, SqlValue::DateTime),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .map_or(SqlValue::Null, |v| SqlValue::DateTime(v.and_utc())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .map_err(|e| ExecuteError::decode(name, e))?
            .and_then(|v| v.and_hms_opt(0, 0, 0))
            .map_or(SqlValue::Null, |v| SqlValue::DateTime(v.and_utc())),
        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(v) => v.map_or(SqlValue::Null, SqlValue::Text),
            Err(_) => SqlValue::Null,
        },
    };
    Ok(value)
}
