//! Common filter presets
//!
//! Pre-built filter lists for frequently used query patterns, producing the
//! same `Filter` values a request would. Presets that involve "now" accept
//! an explicit reference time for deterministic use in tests and jobs.

use chrono::{DateTime, Duration, Utc};

use crate::error::Error;
use crate::types::{Filter, FilterOperator};

/// Pre-defined filter presets for common query patterns.
pub struct CommonFilters;

impl CommonFilters {
    /// Records whose boolean `deleted` field is false.
    pub fn active(deleted_field: &str) -> Vec<Filter> {
        vec![Filter::new(deleted_field, FilterOperator::Eq, "false")]
    }

    /// Records whose boolean `deleted` field is true.
    pub fn deleted(deleted_field: &str) -> Vec<Filter> {
        vec![Filter::new(deleted_field, FilterOperator::Eq, "true")]
    }

    /// Records created in the last `days` days.
    pub fn recent(
        date_field: &str,
        days: i64,
        reference_time: Option<DateTime<Utc>>,
    ) -> Vec<Filter> {
        let reference = reference_time.unwrap_or_else(Utc::now);
        let cutoff = (reference - Duration::days(days)).to_rfc3339();
        vec![Filter::new(date_field, FilterOperator::Gte, cutoff)]
    }

    /// Records created more than `days` days ago.
    pub fn older_than(
        date_field: &str,
        days: i64,
        reference_time: Option<DateTime<Utc>>,
    ) -> Vec<Filter> {
        let reference = reference_time.unwrap_or_else(Utc::now);
        let cutoff = (reference - Duration::days(days)).to_rfc3339();
        vec![Filter::new(date_field, FilterOperator::Lt, cutoff)]
    }

    /// Records within an inclusive date range. At least one bound is
    /// required.
    pub fn date_range(
        date_field: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Filter>, Error> {
        if start.is_none() && end.is_none() {
            return Err(Error::InvalidArgument(
                "At least one of start or end must be provided".into(),
            ));
        }
        let mut filters = Vec::new();
        if let Some(start) = start {
            filters.push(Filter::new(
                date_field,
                FilterOperator::Gte,
                start.to_rfc3339(),
            ));
        }
        if let Some(end) = end {
            filters.push(Filter::new(date_field, FilterOperator::Lte, end.to_rfc3339()));
        }
        Ok(filters)
    }

    /// Records created today (relative to the reference time).
    pub fn today(date_field: &str, reference_time: Option<DateTime<Utc>>) -> Vec<Filter> {
        let reference = reference_time.unwrap_or_else(Utc::now);
        let date = reference.date_naive();
        let start = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let end = date
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap_or_default()
            .and_utc();
        vec![Filter::new(
            date_field,
            FilterOperator::Between,
            format!("{},{}", start.to_rfc3339(), end.to_rfc3339()),
        )]
    }

    /// Records where `field` is not null.
    pub fn not_null(field: &str) -> Vec<Filter> {
        vec![Filter::new(field, FilterOperator::IsNotNull, "")]
    }

    /// Records where `field` is null.
    pub fn is_null(field: &str) -> Vec<Filter> {
        vec![Filter::new(field, FilterOperator::IsNull, "")]
    }

    /// Records whose boolean `enabled` field is true.
    pub fn enabled(enabled_field: &str) -> Vec<Filter> {
        vec![Filter::new(enabled_field, FilterOperator::Eq, "true")]
    }

    /// Records whose boolean `enabled` field is false.
    pub fn disabled(enabled_field: &str) -> Vec<Filter> {
        vec![Filter::new(enabled_field, FilterOperator::Eq, "false")]
    }

    /// A text-match filter: `contains`, `starts_with` or `ends_with`.
    pub fn search(field: &str, term: &str, match_type: &str) -> Result<Vec<Filter>, Error> {
        let operator = match match_type {
            "contains" => FilterOperator::Contains,
            "starts_with" => FilterOperator::StartsWith,
            "ends_with" => FilterOperator::EndsWith,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid match_type: {}. Use: contains, starts_with, ends_with",
                    other
                )));
            }
        };
        Ok(vec![Filter::new(field, operator, term)])
    }

    /// Records where `field` is one of `values`.
    pub fn in_values(field: &str, values: &[impl ToString]) -> Vec<Filter> {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        vec![Filter::new(field, FilterOperator::In, joined)]
    }

    /// Records where `field` is none of `values`.
    pub fn not_in_values(field: &str, values: &[impl ToString]) -> Vec<Filter> {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        vec![Filter::new(field, FilterOperator::NotIn, joined)]
    }
}
