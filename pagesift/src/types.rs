//! Request models shared across all engines
//!
//! Filters, OR filter groups, sorting and pagination parameters. These are
//! plain data carriers: a `Filter`'s `value` is always the raw string from
//! the request and is never rewritten; coercion to a typed value happens at
//! predicate-build time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Filter operators
///
/// The closed set of operator tokens accepted in query parameters. Every
/// operator has exactly one default strategy in the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum FilterOperator {
    /// equals (=)
    Eq,
    /// not equals (!=)
    Ne,
    /// greater than (>)
    Gt,
    /// greater than or equal (>=)
    Gte,
    /// less than (<)
    Lt,
    /// less than or equal (<=)
    Lte,
    /// case-sensitive LIKE, value used verbatim as pattern
    Like,
    /// NOT LIKE
    NotLike,
    /// case-insensitive LIKE
    Ilike,
    /// NOT ILIKE
    NotIlike,
    /// IN (comma-separated values)
    In,
    /// NOT IN (comma-separated values)
    NotIn,
    /// BETWEEN low AND high (comma-separated pair)
    Between,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// value% (case-insensitive)
    StartsWith,
    /// %value (case-insensitive)
    EndsWith,
    /// %value% (case-insensitive)
    Contains,
}

impl FilterOperator {
    /// All operators, in declaration order.
    pub const ALL: [FilterOperator; 18] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Like,
        Self::NotLike,
        Self::Ilike,
        Self::NotIlike,
        Self::In,
        Self::NotIn,
        Self::Between,
        Self::IsNull,
        Self::IsNotNull,
        Self::StartsWith,
        Self::EndsWith,
        Self::Contains,
    ];

    /// The query-parameter token for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Like => "like",
            Self::NotLike => "not_like",
            Self::Ilike => "ilike",
            Self::NotIlike => "not_ilike",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Between => "between",
            Self::IsNull => "is_null",
            Self::IsNotNull => "is_not_null",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

/// A single filter condition: field, operator, raw string value.
///
/// Multiple filters in a list combine with AND semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// A group of filters combined with OR logic.
///
/// All filters in the group are OR'd together, and the resulting condition
/// is AND'd with other query conditions. This enables "search across
/// columns" use cases where a single term should match any of several
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct OrFilterGroup {
    pub filters: Vec<Filter>,
}

impl OrFilterGroup {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }
}

/// Sorting order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum SortingOrder {
    #[default]
    Asc,
    Desc,
}

impl SortingOrder {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Sorting parameters: one sort key plus direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SortingQuery {
    pub sort_by: String,
    pub order: SortingOrder,
}

impl SortingQuery {
    pub fn new(sort_by: impl Into<String>, order: SortingOrder) -> Self {
        Self {
            sort_by: sort_by.into(),
            order,
        }
    }
}

/// Pagination parameters.
///
/// `page` and `per_page` are both 1-based and at least 1; bounds are
/// enforced by [`PagerConfig`](crate::config::PagerConfig) at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PaginationQuery {
    pub page: u64,
    pub per_page: u64,
}

impl PaginationQuery {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Row offset for the current page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tokens_round_trip() {
        for op in FilterOperator::ALL {
            assert_eq!(op.as_str().parse::<FilterOperator>(), Ok(op));
        }
    }

    #[test]
    fn operator_unknown_token() {
        assert!("matches".parse::<FilterOperator>().is_err());
        assert!("EQ".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn operator_serde_tokens() {
        let json = serde_json::to_string(&FilterOperator::NotIlike).unwrap();
        assert_eq!(json, "\"not_ilike\"");
        let op: FilterOperator = serde_json::from_str("\"starts_with\"").unwrap();
        assert_eq!(op, FilterOperator::StartsWith);
    }

    #[test]
    fn pagination_offset() {
        assert_eq!(PaginationQuery::new(1, 10).offset(), 0);
        assert_eq!(PaginationQuery::new(3, 5).offset(), 10);
    }

    #[test]
    fn sorting_order_default_is_asc() {
        assert_eq!(SortingOrder::default(), SortingOrder::Asc);
    }
}
