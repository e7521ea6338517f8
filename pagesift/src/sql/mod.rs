//! SQL abstraction layer for multi-database support
//!
//! - `dialect` - The `SqlDialect` capability trait
//! - `postgres_dialect` / `sqlite_dialect` / `duckdb_dialect` - Backend
//!   implementations
//! - `escape_like` - LIKE metacharacter escaping for literal patterns

mod dialect;
mod duckdb_dialect;
mod postgres_dialect;
mod sqlite_dialect;

pub use dialect::SqlDialect;
pub use duckdb_dialect::DuckdbDialect;
pub use postgres_dialect::PostgresDialect;
pub use sqlite_dialect::SqliteDialect;

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// The built-in pattern operators (`contains`, `starts_with`, `ends_with`)
/// pass the value through verbatim; use this when a caller-built `like`
/// pattern must match user input literally.
///
/// # Example
///
/// ```
/// use pagesift::sql::escape_like;
///
/// let user_input = "100% match_test";
/// let pattern = format!("%{}%", escape_like(user_input));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
