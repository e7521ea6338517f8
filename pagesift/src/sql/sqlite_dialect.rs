//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
///
/// SQLite's LIKE is already case-insensitive for ASCII, but only for ASCII
/// and only when case_sensitive_like is off, so the portable
/// `LOWER(col) LIKE lower(pattern)` fallback is used instead of claiming
/// native ILIKE support. The windowed count stays off: the two-query
/// fallback is the portable path for embedded deployments.
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_ilike(&self) -> bool {
        false
    }

    fn supports_window_count(&self) -> bool {
        false
    }

    fn cast_to_text(&self, expr: &str) -> String {
        format!("CAST({} AS TEXT)", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(9), "?");
    }

    #[test]
    fn test_capabilities() {
        let dialect = SqliteDialect;
        assert!(!dialect.supports_ilike());
        assert!(!dialect.supports_window_count());
    }

    #[test]
    fn test_cast_to_text() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.cast_to_text("age"), "CAST(age AS TEXT)");
    }
}
