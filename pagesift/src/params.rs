//! Query-string parameter parsing
//!
//! Turns decoded `(key, value)` pairs into the request models. Two filter
//! encodings are supported; the indexed form takes priority when both are
//! present:
//!
//! 1. Indexed: `filters[0][field]=age&filters[0][operator]=gte&filters[0][value]=18`
//! 2. Simple: `field=age&operator=gte&value=18` (repeated, positionally zipped)
//!
//! Free-text search (`search` + `search_fields`) derives one OR filter
//! group of `contains` filters carrying the same term. Parsing fails fast
//! on the first malformed element.

use crate::config::PagerConfig;
use crate::error::Error;
use crate::response::PageUrl;
use crate::types::{
    Filter, FilterOperator, OrFilterGroup, PaginationQuery, SortingOrder, SortingQuery,
};

/// Parsed request parameters: everything the engines need for one request.
#[derive(Debug, Clone)]
pub struct PageParams {
    pub filters: Option<Vec<Filter>>,
    pub or_filters: Option<Vec<OrFilterGroup>>,
    pub sorting: Option<SortingQuery>,
    pub pagination: PaginationQuery,
    pub url: PageUrl,
}

impl PageParams {
    /// Parse request parameters from decoded query pairs.
    ///
    /// `url` is the original request URL used for navigation links; `pairs`
    /// are the decoded query parameters in request order.
    pub fn from_pairs(
        url: PageUrl,
        pairs: &[(String, String)],
        config: &PagerConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            filters: parse_filters(pairs)?,
            or_filters: parse_search(pairs)?,
            sorting: parse_sort(pairs)?,
            pagination: parse_pagination(pairs, config)?,
            url,
        })
    }
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn all<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn parse_filter_at(index: usize, field: &str, operator: &str, value: &str) -> Result<Filter, Error> {
    let operator: FilterOperator = operator.parse().map_err(|_| Error::InvalidOperator {
        operator: operator.to_string(),
        index,
    })?;
    Ok(Filter::new(field, operator, value))
}

/// Parse filters from query pairs, trying the indexed form first.
pub fn parse_filters(pairs: &[(String, String)]) -> Result<Option<Vec<Filter>>, Error> {
    let mut filters = Vec::new();

    // Indexed format: filters[0][field], filters[0][operator], ...
    // A missing field at index i terminates the scan.
    let mut index = 0;
    loop {
        let field = first(pairs, &format!("filters[{}][field]", index));
        let Some(field) = field else {
            break;
        };
        let operator = first(pairs, &format!("filters[{}][operator]", index));
        let value = first(pairs, &format!("filters[{}][value]", index));
        let (Some(operator), Some(value)) = (operator, value) else {
            return Err(Error::IncompleteFilter { index });
        };
        filters.push(parse_filter_at(index, field, operator, value)?);
        index += 1;
    }
    if !filters.is_empty() {
        return Ok(Some(filters));
    }

    // Simple format: repeated field/operator/value, positionally zipped.
    let fields = all(pairs, "field");
    let operators = all(pairs, "operator");
    let values = all(pairs, "value");
    if fields.len() != operators.len() || fields.len() != values.len() {
        return Err(Error::MismatchedFilterParams);
    }
    let filters = fields
        .into_iter()
        .zip(operators)
        .zip(values)
        .enumerate()
        .map(|(i, ((field, operator), value))| parse_filter_at(i, field, operator, value))
        .collect::<Result<Vec<_>, _>>()?;

    if filters.is_empty() {
        Ok(None)
    } else {
        Ok(Some(filters))
    }
}

/// Parse `search` + `search_fields` into one OR filter group of `contains`
/// filters, one per field, all carrying the same term.
pub fn parse_search(pairs: &[(String, String)]) -> Result<Option<Vec<OrFilterGroup>>, Error> {
    let search = first(pairs, "search").unwrap_or_default();
    if search.is_empty() {
        return Ok(None);
    }

    let Some(fields_raw) = first(pairs, "search_fields") else {
        return Err(Error::SearchFieldsRequired);
    };
    if fields_raw.is_empty() {
        return Err(Error::SearchFieldsRequired);
    }
    let fields: Vec<&str> = fields_raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if fields.is_empty() {
        return Err(Error::SearchFieldsEmpty);
    }

    let filters = fields
        .into_iter()
        .map(|field| Filter::new(field, FilterOperator::Contains, search))
        .collect();
    Ok(Some(vec![OrFilterGroup::new(filters)]))
}

/// Parse `sort_by` + `order` (default asc).
pub fn parse_sort(pairs: &[(String, String)]) -> Result<Option<SortingQuery>, Error> {
    let sort_by = first(pairs, "sort_by").unwrap_or_default();
    if sort_by.is_empty() {
        return Ok(None);
    }
    let order = match first(pairs, "order") {
        None | Some("") => SortingOrder::Asc,
        Some("asc") => SortingOrder::Asc,
        Some("desc") => SortingOrder::Desc,
        Some(other) => {
            return Err(Error::invalid_parameter(
                "order",
                other,
                "expected 'asc' or 'desc'",
            ));
        }
    };
    Ok(Some(SortingQuery::new(sort_by, order)))
}

/// Parse `page` + `per_page` against the configured bounds.
pub fn parse_pagination(
    pairs: &[(String, String)],
    config: &PagerConfig,
) -> Result<PaginationQuery, Error> {
    let page = match first(pairs, "page") {
        None | Some("") => config.default_page,
        Some(raw) => {
            let page: u64 = raw.parse().map_err(|_| {
                Error::invalid_parameter("page", raw, "expected a positive integer")
            })?;
            if page < 1 {
                return Err(Error::invalid_parameter("page", raw, "must be >= 1"));
            }
            config.validate_page(page)?
        }
    };

    let per_page = match first(pairs, "per_page") {
        None | Some("") => config.default_per_page,
        Some(raw) => {
            let per_page: u64 = raw.parse().map_err(|_| {
                Error::invalid_parameter("per_page", raw, "expected a positive integer")
            })?;
            if per_page < config.min_per_page || per_page > config.max_per_page {
                return Err(Error::invalid_parameter(
                    "per_page",
                    raw,
                    format!(
                        "must be between {} and {}",
                        config.min_per_page, config.max_per_page
                    ),
                ));
            }
            per_page
        }
    };

    Ok(PaginationQuery::new(page, per_page))
}
