//! SQL dialect trait for multi-database support
//!
//! Capability descriptors and syntax hooks resolved once per backend, so
//! predicate rendering never probes the connection at runtime.

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases differ in:
/// - Parameter placeholders (? vs $1)
/// - Native case-insensitive pattern matching (ILIKE)
/// - Whether a fused windowed count is worth a single round trip
/// - Type casting syntax
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite/DuckDB: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Whether the backend supports ILIKE natively.
    ///
    /// Backends without it fall back to `LOWER(col) LIKE lower(pattern)`.
    fn supports_ilike(&self) -> bool;

    /// Whether `COUNT(*) OVER()` should be fused into the data query to get
    /// page rows and total count in one round trip.
    fn supports_window_count(&self) -> bool;

    /// Cast an expression to a textual type
    ///
    /// - PostgreSQL: `expr::TEXT`
    /// - SQLite: `CAST(expr AS TEXT)`
    /// - DuckDB: `expr::VARCHAR`
    fn cast_to_text(&self, expr: &str) -> String;

    /// Generate LIMIT/OFFSET clause
    ///
    /// Most databases use `LIMIT x OFFSET y`, but syntax may vary.
    fn limit_offset(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }
}
