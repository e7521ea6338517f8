//! Unified error type
//!
//! Client-input problems (malformed filter parameters, unknown fields in
//! strict mode) are distinguished from backend execution failures so a web
//! layer can map the former to 400-class responses. Parsing fails fast on
//! the first bad element; it never collects a batch of errors.

use thiserror::Error;

use crate::executor::ExecuteError;

/// Unified error type for parsing and execution
#[derive(Error, Debug)]
pub enum Error {
    /// Simple-form filter parameters with differing lengths
    #[error("Mismatched filter parameters in array format.")]
    MismatchedFilterParams,

    /// Indexed-form filter with a field but no operator or value
    #[error("Incomplete filter at index {index}. Missing operator or value.")]
    IncompleteFilter { index: usize },

    /// Operator token outside the closed operator set
    #[error("Invalid operator '{operator}' at index {index}.")]
    InvalidOperator { operator: String, index: usize },

    /// `search` given without `search_fields`
    #[error(
        "'search_fields' is required when 'search' is provided. \
         Specify comma-separated field names, e.g. search_fields=name,email"
    )]
    SearchFieldsRequired,

    /// `search_fields` present but empty
    #[error("'search_fields' must contain at least one field name.")]
    SearchFieldsEmpty,

    /// Unparseable or out-of-bounds query parameter
    #[error("Invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Filter references a field that is neither stored nor computed
    /// (strict mode only)
    #[error("Unknown field '{field}'. Available fields: {available}")]
    UnknownField { field: String, available: String },

    /// Sort key references a field that is neither stored nor computed
    /// (strict mode only)
    #[error("Unknown sort field '{field}'. Available fields: {available}")]
    UnknownSortField { field: String, available: String },

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid programmatic argument (filter presets, builders)
    #[error("{0}")]
    InvalidArgument(String),

    /// Backend execution failure
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

impl Error {
    pub fn invalid_parameter(
        name: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(field: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
            available: available.into(),
        }
    }

    pub fn unknown_sort_field(field: impl Into<String>, available: impl Into<String>) -> Self {
        Self::UnknownSortField {
            field: field.into(),
            available: available.into(),
        }
    }

    /// True for errors caused by the request itself; a web layer should
    /// map these to a 400-class response rather than a 500.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Execute(_))
    }

    /// Short machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MismatchedFilterParams => "MISMATCHED_FILTER_PARAMS",
            Self::IncompleteFilter { .. } => "INCOMPLETE_FILTER",
            Self::InvalidOperator { .. } => "INVALID_OPERATOR",
            Self::SearchFieldsRequired => "SEARCH_FIELDS_REQUIRED",
            Self::SearchFieldsEmpty => "SEARCH_FIELDS_EMPTY",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::UnknownSortField { .. } => "UNKNOWN_SORT_FIELD",
            Self::Config(_) => "INVALID_CONFIG",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Execute(_) => "EXECUTION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_message_lists_available() {
        let err = Error::unknown_field("citty", "age, city, name");
        assert_eq!(
            err.to_string(),
            "Unknown field 'citty'. Available fields: age, city, name"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn incomplete_filter_message_names_index() {
        let err = Error::IncompleteFilter { index: 2 };
        assert_eq!(
            err.to_string(),
            "Incomplete filter at index 2. Missing operator or value."
        );
    }

    #[test]
    fn invalid_operator_message() {
        let err = Error::InvalidOperator {
            operator: "matches".into(),
            index: 0,
        };
        assert_eq!(err.to_string(), "Invalid operator 'matches' at index 0.");
    }

    #[test]
    fn execute_errors_are_not_client_errors() {
        let err = Error::Execute(ExecuteError::MissingCount);
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "EXECUTION_FAILED");
    }
}
