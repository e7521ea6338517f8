//! Fluent filter construction
//!
//! A programmatic alternative to query-string parsing that produces the
//! same `Filter` values:
//!
//! ```
//! use pagesift::builder::FilterBuilder;
//!
//! let filters = FilterBuilder::new()
//!     .where_field("age").gte(30)
//!     .where_field("city").eq("Chicago")
//!     .where_field("deleted").eq(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(filters.len(), 3);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::types::{Filter, FilterOperator, OrFilterGroup};

/// A value convertible to the string form a query parameter would carry.
pub trait FilterValue {
    fn to_filter_string(&self) -> String;
}

impl FilterValue for &str {
    fn to_filter_string(&self) -> String {
        (*self).to_string()
    }
}

impl FilterValue for String {
    fn to_filter_string(&self) -> String {
        self.clone()
    }
}

impl FilterValue for bool {
    fn to_filter_string(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl FilterValue for i32 {
    fn to_filter_string(&self) -> String {
        self.to_string()
    }
}

impl FilterValue for i64 {
    fn to_filter_string(&self) -> String {
        self.to_string()
    }
}

impl FilterValue for u64 {
    fn to_filter_string(&self) -> String {
        self.to_string()
    }
}

impl FilterValue for f64 {
    fn to_filter_string(&self) -> String {
        self.to_string()
    }
}

impl FilterValue for DateTime<Utc> {
    fn to_filter_string(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl FilterValue for NaiveDateTime {
    fn to_filter_string(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

impl FilterValue for NaiveDate {
    fn to_filter_string(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

/// Builder for a single field's filter condition.
pub struct FieldBuilder {
    builder: FilterBuilder,
    field: String,
}

impl FieldBuilder {
    fn add(mut self, operator: FilterOperator, value: String) -> FilterBuilder {
        self.builder
            .filters
            .push(Filter::new(self.field.clone(), operator, value));
        self.builder
    }

    /// Equal to (=).
    pub fn eq(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Eq, value)
    }

    /// Not equal to (!=).
    pub fn ne(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Ne, value)
    }

    /// Greater than (>).
    pub fn gt(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Gt, value)
    }

    /// Greater than or equal to (>=).
    pub fn gte(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Gte, value)
    }

    /// Less than (<).
    pub fn lt(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Lt, value)
    }

    /// Less than or equal to (<=).
    pub fn lte(self, value: impl FilterValue) -> FilterBuilder {
        let value = value.to_filter_string();
        self.add(FilterOperator::Lte, value)
    }

    /// Case-sensitive LIKE pattern match (use % for wildcards).
    pub fn like(self, pattern: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::Like, pattern.into())
    }

    /// Case-sensitive NOT LIKE pattern match.
    pub fn not_like(self, pattern: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::NotLike, pattern.into())
    }

    /// Case-insensitive LIKE pattern match.
    pub fn ilike(self, pattern: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::Ilike, pattern.into())
    }

    /// Case-insensitive NOT LIKE pattern match.
    pub fn not_ilike(self, pattern: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::NotIlike, pattern.into())
    }

    /// IN list of values.
    pub fn in_list<V: FilterValue>(self, values: &[V]) -> FilterBuilder {
        let joined = values
            .iter()
            .map(FilterValue::to_filter_string)
            .collect::<Vec<_>>()
            .join(",");
        self.add(FilterOperator::In, joined)
    }

    /// NOT IN list of values.
    pub fn not_in_list<V: FilterValue>(self, values: &[V]) -> FilterBuilder {
        let joined = values
            .iter()
            .map(FilterValue::to_filter_string)
            .collect::<Vec<_>>()
            .join(",");
        self.add(FilterOperator::NotIn, joined)
    }

    /// BETWEEN low AND high (inclusive).
    pub fn between(self, low: impl FilterValue, high: impl FilterValue) -> FilterBuilder {
        let value = format!("{},{}", low.to_filter_string(), high.to_filter_string());
        self.add(FilterOperator::Between, value)
    }

    /// IS NULL check.
    pub fn is_null(self) -> FilterBuilder {
        self.add(FilterOperator::IsNull, String::new())
    }

    /// IS NOT NULL check.
    pub fn is_not_null(self) -> FilterBuilder {
        self.add(FilterOperator::IsNotNull, String::new())
    }

    /// Starts with prefix (case-insensitive).
    pub fn starts_with(self, prefix: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::StartsWith, prefix.into())
    }

    /// Ends with suffix (case-insensitive).
    pub fn ends_with(self, suffix: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::EndsWith, suffix.into())
    }

    /// Contains substring (case-insensitive).
    pub fn contains(self, substring: impl Into<String>) -> FilterBuilder {
        self.add(FilterOperator::Contains, substring.into())
    }
}

/// Fluent builder for filter lists.
#[derive(Default)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a filter for a field.
    pub fn where_field(self, field: impl Into<String>) -> FieldBuilder {
        FieldBuilder {
            builder: self,
            field: field.into(),
        }
    }

    /// Add a filter directly.
    pub fn add_filter(
        mut self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    /// Add multiple filters at once.
    pub fn add_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Build the filter list, or `None` when empty.
    pub fn build(self) -> Option<Vec<Filter>> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters)
        }
    }

    /// Build the accumulated filters as one OR group.
    pub fn build_or_group(self) -> Option<OrFilterGroup> {
        if self.filters.is_empty() {
            None
        } else {
            Some(OrFilterGroup::new(self.filters))
        }
    }
}
