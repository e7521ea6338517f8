//! DuckDB SQL dialect implementation

use super::SqlDialect;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_ilike(&self) -> bool {
        true
    }

    fn supports_window_count(&self) -> bool {
        true
    }

    fn cast_to_text(&self, expr: &str) -> String {
        format!("{}::VARCHAR", expr)
    }
}
