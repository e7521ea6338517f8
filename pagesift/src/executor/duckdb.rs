//! DuckDB executor over a blocking connection
//!
//! DuckDB is the synchronous execution mode: calls block on the connection
//! and concurrency is the caller's concern.

use chrono::DateTime;
use duckdb::types::{TimeUnit, ToSql, ToSqlOutput, Value, ValueRef};
use duckdb::{Connection, params_from_iter};

use crate::sql::{DuckdbDialect, SqlDialect};
use crate::value::{SqlRow, SqlValue, Statement};

use super::{ExecuteError, Executor};

static DIALECT: DuckdbDialect = DuckdbDialect;

impl Executor for Connection {
    fn dialect(&self) -> &dyn SqlDialect {
        &DIALECT
    }

    fn fetch_all(&self, stmt: &Statement) -> Result<Vec<SqlRow>, ExecuteError> {
        let mut prepared = self.prepare(&stmt.sql)?;
        let mut rows = prepared.query(params_from_iter(stmt.binds.iter()))?;

        let mut out = Vec::new();
        let mut names: Option<Vec<String>> = None;
        while let Some(row) = rows.next()? {
            let statement: &duckdb::Statement<'_> = row.as_ref();
            let names = names.get_or_insert_with(|| {
                statement
                    .column_names()
                    .into_iter()
                    .map(|n| n.to_string())
                    .collect()
            });
            let mut values = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .map_err(|e| ExecuteError::decode(name.clone(), e))?;
                values.push(decode_value(&value));
            }
            out.push(SqlRow::new(names.clone(), values));
        }
        Ok(out)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Bool(b) => ToSqlOutput::Owned(Value::Boolean(*b)),
            SqlValue::Int(i) => ToSqlOutput::Owned(Value::BigInt(*i)),
            SqlValue::Float(f) => ToSqlOutput::Owned(Value::Double(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::DateTime(dt) => ToSqlOutput::Owned(Value::Text(
                dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            )),
        })
    }
}

fn decode_value(value: &ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Boolean(b) => SqlValue::Bool(*b),
        ValueRef::TinyInt(i) => SqlValue::Int(*i as i64),
        ValueRef::SmallInt(i) => SqlValue::Int(*i as i64),
        ValueRef::Int(i) => SqlValue::Int(*i as i64),
        ValueRef::BigInt(i) => SqlValue::Int(*i),
        ValueRef::HugeInt(i) => SqlValue::Int(*i as i64),
        ValueRef::UTinyInt(i) => SqlValue::Int(*i as i64),
        ValueRef::USmallInt(i) => SqlValue::Int(*i as i64),
        ValueRef::UInt(i) => SqlValue::Int(*i as i64),
        ValueRef::UBigInt(i) => SqlValue::Int(*i as i64),
        ValueRef::Float(f) => SqlValue::Float(*f as f64),
        ValueRef::Double(f) => SqlValue::Float(*f),
        ValueRef::Decimal(d) => match d.to_string().parse::<f64>() {
            Ok(f) => SqlValue::Float(f),
            Err(_) => SqlValue::Text(d.to_string()),
        },
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Timestamp(unit, raw) => {
            let micros = match unit {
                TimeUnit::Second => raw.saturating_mul(1_000_000),
                TimeUnit::Millisecond => raw.saturating_mul(1_000),
                TimeUnit::Microsecond => *raw,
                TimeUnit::Nanosecond => raw / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map_or(SqlValue::Null, SqlValue::DateTime)
        }
        ValueRef::Date32(days) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
            .map_or(SqlValue::Null, SqlValue::DateTime),
        _ => SqlValue::Null,
    }
}
