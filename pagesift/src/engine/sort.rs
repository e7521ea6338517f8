//! Sort engine
//!
//! Resolves the sort key with the same stored-then-computed fallback and
//! strict/lenient policy as filtering. Without a sort key the query keeps
//! its natural order.

use tracing::debug;

use crate::error::Error;
use crate::query::SelectQuery;
use crate::types::SortingQuery;

/// Engine for applying sorting to queries.
pub struct SortEngine {
    pub strict_mode: bool,
}

impl SortEngine {
    pub fn new(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    /// Apply sorting to a query. Ascending unless DESC is requested.
    pub fn apply_sort(
        &self,
        query: SelectQuery,
        sorting: Option<&SortingQuery>,
    ) -> Result<SelectQuery, Error> {
        let Some(sorting) = sorting else {
            return Ok(query);
        };
        if sorting.sort_by.is_empty() {
            return Ok(query);
        }

        let Some(column) = query.resolve_field(&sorting.sort_by).cloned() else {
            if self.strict_mode {
                return Err(Error::unknown_sort_field(
                    &sorting.sort_by,
                    query.available_fields(),
                ));
            }
            debug!(field = %sorting.sort_by, "skipping sort on unknown field");
            return Ok(query);
        };

        Ok(query.order_by(column, sorting.order))
    }
}
