//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn supports_ilike(&self) -> bool {
        true
    }

    fn supports_window_count(&self) -> bool {
        true
    }

    fn cast_to_text(&self, expr: &str) -> String {
        format!("{}::TEXT", expr)
    }
}
