//! # pagesift
//!
//! Filtering, sorting and pagination for SQL backends: string-encoded query
//! parameters in, a paginated HATEOAS-style response out.
//!
//! The pipeline turns `(field, operator, value)` triples into typed,
//! backend-correct predicates against an immutable [`SelectQuery`], applies
//! OR-group search and sorting, then executes with offset/limit and a total
//! count. The count is fused into one round trip as `COUNT(*) OVER()` where
//! the backend's dialect supports it, with a portable two-query fallback
//! everywhere else.
//!
//! ## Quick start
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn demo() -> Result<(), pagesift::Error> {
//! use pagesift::{PageParams, PagerConfig, Pager, SelectQuery, ScalarType, PageUrl};
//!
//! let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
//!
//! let pairs = vec![
//!     ("field".to_string(), "age".to_string()),
//!     ("operator".to_string(), "gte".to_string()),
//!     ("value".to_string(), "18".to_string()),
//! ];
//! let params = PageParams::from_pairs(
//!     PageUrl::parse("/heroes"),
//!     &pairs,
//!     &PagerConfig::default(),
//! )?;
//!
//! let query = SelectQuery::from_table("heroes")
//!     .column("id", ScalarType::Int)
//!     .column("name", ScalarType::Text)
//!     .column("age", ScalarType::Int);
//!
//! let response = Pager::new(params)
//!     .generate_response_async(query, &pool)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `types` - Filter/sort/pagination request models
//! - `schema` - Column model with explicit scalar-type tags
//! - `query` - The immutable, composable select query value
//! - `engine` - Filter, sort and pagination engines
//! - `executor` - Backend execution traits and implementations
//! - `sql` - Dialect capability trait and per-backend implementations
//! - `params` - Query-string parameter parsing
//! - `response` - Paginated response envelope and link building
//! - `builder` / `presets` - Programmatic filter construction
//! - `config` - Pagination bounds and strict-mode switch

pub mod builder;
pub mod coerce;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod pager;
pub mod params;
pub mod predicate;
pub mod presets;
pub mod query;
pub mod response;
pub mod schema;
pub mod sql;
pub mod types;
pub mod value;

pub use builder::FilterBuilder;
pub use config::PagerConfig;
pub use engine::{FilterEngine, FilterStrategy, PaginationEngine, SortEngine};
pub use error::Error;
pub use executor::{AsyncExecutor, ExecuteError, Executor};
pub use pager::Pager;
pub use params::PageParams;
pub use predicate::Predicate;
pub use presets::CommonFilters;
pub use query::SelectQuery;
pub use response::{Links, Meta, PageUrl, PaginatedResponse, Pagination};
pub use schema::{Column, ScalarType};
pub use types::{
    Filter, FilterOperator, OrFilterGroup, PaginationQuery, SortingOrder, SortingQuery,
};
pub use value::{SqlRow, SqlValue, Statement};
