//! Paginated response envelope
//!
//! The HATEOAS-style wrapper returned to API clients: page data, a meta
//! block echoing the applied filters and sort, and navigation links
//! computed from the original request URL with only `page`/`per_page`
//! rewritten.

use serde::Serialize;

use crate::types::{Filter, OrFilterGroup, SortingQuery};

/// Pagination metadata in response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Pagination {
    pub total_items: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

/// Meta block echoing what was applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Meta {
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub or_filters: Option<Vec<OrFilterGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortingQuery>,
}

/// Navigation links
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Links {
    #[serde(rename = "self")]
    pub self_: String,
    pub first: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    pub last: String,
}

/// Generic paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: Meta,
    pub links: Links,
}

impl<T> PaginatedResponse<T> {
    /// Convert the row type while keeping meta and links intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }
}

/// The original request URL, retained for link building.
///
/// Query pairs are kept exactly as they appeared on the request (already
/// percent-encoded); link building rewrites only `page` and `per_page` and
/// leaves every other parameter untouched and in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageUrl {
    path: String,
    pairs: Vec<(String, String)>,
}

impl PageUrl {
    /// A URL with no query string.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pairs: Vec::new(),
        }
    }

    /// Parse a path with an optional raw query string (`/heroes?a=1&b=2`).
    pub fn parse(url: &str) -> Self {
        match url.split_once('?') {
            Some((path, query)) => Self::with_query(path, query),
            None => Self::new(url),
        }
    }

    /// A path plus a raw (already-encoded) query string.
    pub fn with_query(path: impl Into<String>, raw_query: &str) -> Self {
        let pairs = raw_query
            .split('&')
            .filter(|piece| !piece.is_empty())
            .map(|piece| match piece.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (piece.to_string(), String::new()),
            })
            .collect();
        Self {
            path: path.into(),
            pairs,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The URL with `page` and `per_page` set, all other parameters
    /// preserved in place.
    pub fn page_link(&self, page: u64, per_page: u64) -> String {
        let mut pairs = self.pairs.clone();
        set_pair(&mut pairs, "page", page.to_string());
        set_pair(&mut pairs, "per_page", per_page.to_string());
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value,
        None => pairs.push((key.to_string(), value)),
    }
}
