//! SQL bind values, row records and rendered statements
//!
//! `SqlValue` is the typed bind-parameter model shared by every backend;
//! `SqlRow` is the uniform row record executors return so the pagination
//! engine can work without knowing the backend's native row type.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A typed SQL bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) => serializer.serialize_str(s),
            Self::DateTime(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

/// An ordered record of named values, as returned by an executor.
///
/// Column order and names are preserved exactly as the backend returned
/// them. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    names: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    /// Build a row from parallel name/value lists.
    ///
    /// The shorter list bounds the row if the lengths disagree.
    pub fn new(names: Vec<String>, values: Vec<SqlValue>) -> Self {
        let len = names.len().min(values.len());
        let mut names = names;
        let mut values = values;
        names.truncate(len);
        values.truncate(len);
        Self { names, values }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Value of the first column with the given name.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    /// Value at a positional index.
    pub fn value(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// The single value of a one-column row.
    pub fn single(&self) -> Option<&SqlValue> {
        if self.len() == 1 {
            self.values.first()
        } else {
            None
        }
    }

    /// Remove the first column with the given name, preserving the order of
    /// the remaining columns. Returns the removed value.
    pub fn remove(&mut self, name: &str) -> Option<SqlValue> {
        let i = self.names.iter().position(|n| n == name)?;
        self.names.remove(i);
        Some(self.values.remove(i))
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

impl Serialize for SqlRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.names.iter().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A rendered SQL statement plus its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, binds: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SqlRow {
        SqlRow::new(
            vec!["id".into(), "name".into(), "_total_count".into()],
            vec![
                SqlValue::Int(7),
                SqlValue::Text("Ada".into()),
                SqlValue::Int(42),
            ],
        )
    }

    #[test]
    fn get_and_value() {
        let row = row();
        assert_eq!(row.get("name"), Some(&SqlValue::Text("Ada".into())));
        assert_eq!(row.value(0), Some(&SqlValue::Int(7)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn remove_preserves_order() {
        let mut row = row();
        assert_eq!(row.remove("_total_count"), Some(SqlValue::Int(42)));
        assert_eq!(row.names(), &["id".to_string(), "name".to_string()]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.remove("_total_count"), None);
    }

    #[test]
    fn single_only_for_one_column() {
        let mut row = row();
        assert_eq!(row.single(), None);
        row.remove("name");
        row.remove("_total_count");
        assert_eq!(row.single(), Some(&SqlValue::Int(7)));
    }

    #[test]
    fn serializes_as_object() {
        let mut row = row();
        row.remove("_total_count");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "name": "Ada"}));
    }

    #[test]
    fn mismatched_lengths_are_truncated() {
        let row = SqlRow::new(vec!["a".into()], vec![SqlValue::Int(1), SqlValue::Int(2)]);
        assert_eq!(row.len(), 1);
    }
}
