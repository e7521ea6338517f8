//! Composable select query value
//!
//! A `SelectQuery` is an immutable description of a filtered, sorted
//! select: every combinator consumes the value and returns a new one, so a
//! base query can be shared and specialized per request. Rendering produces
//! a `Statement` for a given dialect; the count and windowed-count variants
//! wrap the same inner select so all three observe identical predicates.

use indexmap::IndexMap;

use crate::predicate::Predicate;
use crate::schema::{Column, ScalarType};
use crate::sql::SqlDialect;
use crate::types::SortingOrder;
use crate::value::{SqlValue, Statement};

/// Label of the synthetic running-count column in windowed statements.
/// Distinct from any real column name; stripped from rows before they are
/// returned.
pub const TOTAL_COUNT_COLUMN: &str = "_total_count";

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Table(String),
    Subquery(String),
}

/// An immutable, further-composable select query.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    source: Source,
    columns: IndexMap<String, Column>,
    computed: IndexMap<String, Column>,
    conditions: Vec<Predicate>,
    order: Option<(Column, SortingOrder)>,
}

impl SelectQuery {
    /// Select from a table (or view) by name.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            source: Source::Table(table.into()),
            columns: IndexMap::new(),
            computed: IndexMap::new(),
            conditions: Vec::new(),
            order: None,
        }
    }

    /// Select from an arbitrary subquery.
    pub fn from_subquery(sql: impl Into<String>) -> Self {
        Self {
            source: Source::Subquery(sql.into()),
            columns: IndexMap::new(),
            computed: IndexMap::new(),
            conditions: Vec::new(),
            order: None,
        }
    }

    /// Add a stored column whose expression is its own name.
    pub fn column(self, name: impl Into<String>, ty: ScalarType) -> Self {
        let name = name.into();
        let col = Column::new(name.clone(), ty);
        self.column_with(name, col)
    }

    /// Add a stored column selected under `name` from an arbitrary
    /// expression.
    pub fn column_expr(
        self,
        name: impl Into<String>,
        expr: impl Into<String>,
        ty: ScalarType,
    ) -> Self {
        let col = Column::new(expr, ty);
        self.column_with(name.into(), col)
    }

    fn column_with(mut self, name: String, col: Column) -> Self {
        self.columns.insert(name, col);
        self
    }

    /// Expose a computed/derived field: not part of the select list, but
    /// resolvable for filtering and sorting by name.
    pub fn computed(
        mut self,
        name: impl Into<String>,
        expr: impl Into<String>,
        ty: ScalarType,
    ) -> Self {
        self.computed.insert(name.into(), Column::new(expr, ty));
        self
    }

    /// The stored-column map, in select order.
    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    /// The computed-field map.
    pub fn computed_fields(&self) -> &IndexMap<String, Column> {
        &self.computed
    }

    /// Resolve a field name: stored columns first, then computed fields.
    pub fn resolve_field(&self, name: &str) -> Option<&Column> {
        self.columns.get(name).or_else(|| self.computed.get(name))
    }

    /// Stored-column names, sorted, for unknown-field error messages.
    pub fn available_fields(&self) -> String {
        let mut names: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// AND a batch of predicates onto the query.
    pub fn and_where(mut self, predicates: Vec<Predicate>) -> Self {
        self.conditions.extend(predicates);
        self
    }

    /// Order by a resolved column. Replaces any previous order key.
    pub fn order_by(mut self, column: Column, order: SortingOrder) -> Self {
        self.order = Some((column, order));
        self
    }

    pub fn has_order(&self) -> bool {
        self.order.is_some()
    }

    fn select_list(&self) -> String {
        if self.columns.is_empty() {
            return "*".to_string();
        }
        self.columns
            .iter()
            .map(|(name, col)| {
                if col.expr() == name {
                    name.clone()
                } else {
                    format!("{} AS {}", col.expr(), name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn from_clause(&self) -> String {
        match &self.source {
            Source::Table(name) => name.clone(),
            Source::Subquery(sql) => format!("({}) AS src", sql),
        }
    }

    fn render_inner(
        &self,
        dialect: &dyn SqlDialect,
        with_order: bool,
        binds: &mut Vec<SqlValue>,
    ) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select_list(), self.from_clause());
        if !self.conditions.is_empty() {
            let rendered: Vec<String> = self
                .conditions
                .iter()
                .map(|p| p.render(dialect, binds))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&rendered.join(" AND "));
        }
        if with_order && let Some((col, order)) = &self.order {
            sql.push_str(&format!(" ORDER BY {} {}", col.expr(), order.sql()));
        }
        sql
    }

    /// The full filtered, sorted select without limit or offset.
    pub fn to_statement(&self, dialect: &dyn SqlDialect) -> Statement {
        let mut binds = Vec::new();
        let sql = self.render_inner(dialect, true, &mut binds);
        Statement::new(sql, binds)
    }

    /// `COUNT(*)` over the filtered query as a subquery. Ordering is
    /// dropped; it cannot change the count.
    pub fn count_statement(&self, dialect: &dyn SqlDialect) -> Statement {
        let mut binds = Vec::new();
        let inner = self.render_inner(dialect, false, &mut binds);
        Statement::new(format!("SELECT COUNT(*) FROM ({}) AS sub", inner), binds)
    }

    /// The data page: filtered, sorted select with limit/offset applied.
    pub fn page_statement(&self, dialect: &dyn SqlDialect, limit: u64, offset: u64) -> Statement {
        let mut binds = Vec::new();
        let mut sql = self.render_inner(dialect, true, &mut binds);
        sql.push(' ');
        sql.push_str(&dialect.limit_offset(limit, offset));
        Statement::new(sql, binds)
    }

    /// The fused page-plus-count statement: selects the page rows together
    /// with a running `COUNT(*) OVER()` labeled [`TOTAL_COUNT_COLUMN`].
    pub fn windowed_statement(
        &self,
        dialect: &dyn SqlDialect,
        limit: u64,
        offset: u64,
    ) -> Statement {
        let mut binds = Vec::new();
        let inner = self.render_inner(dialect, true, &mut binds);
        let sql = format!(
            "SELECT sub.*, COUNT(*) OVER() AS {} FROM ({}) AS sub {}",
            TOTAL_COUNT_COLUMN,
            inner,
            dialect.limit_offset(limit, offset)
        );
        Statement::new(sql, binds)
    }
}
