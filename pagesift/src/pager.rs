//! Request orchestrator
//!
//! Bundles the parsed request parameters with one fresh engine instance per
//! concern and runs the full pipeline: AND filters, OR groups, sort, then
//! paginate + count + response. Engines are never shared between requests,
//! so the per-request resolution memo needs no synchronization.

use crate::config::PagerConfig;
use crate::engine::{FilterEngine, FilterStrategy, PaginationEngine, SortEngine};
use crate::error::Error;
use crate::executor::{AsyncExecutor, Executor};
use crate::params::PageParams;
use crate::query::SelectQuery;
use crate::response::PaginatedResponse;
use crate::types::{Filter, FilterOperator, OrFilterGroup, SortingQuery};
use crate::value::SqlRow;

/// Filtering, sorting and pagination for one request.
pub struct Pager {
    pub filters: Option<Vec<Filter>>,
    pub or_filters: Option<Vec<OrFilterGroup>>,
    pub sorting: Option<SortingQuery>,
    filter_engine: FilterEngine,
    sort_engine: SortEngine,
    pagination_engine: PaginationEngine,
}

impl Pager {
    /// Build a pager from parsed request parameters.
    pub fn new(params: PageParams) -> Self {
        Self {
            filters: params.filters,
            or_filters: params.or_filters,
            sorting: params.sorting,
            filter_engine: FilterEngine::new(false),
            sort_engine: SortEngine::new(false),
            pagination_engine: PaginationEngine::new(params.pagination, params.url),
        }
    }

    /// Switch strict mode on all engines.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.set_strict_mode(strict);
        self
    }

    pub fn set_strict_mode(&mut self, strict: bool) {
        self.filter_engine.strict_mode = strict;
        self.sort_engine.strict_mode = strict;
    }

    /// Force the windowed count optimization on or off. `None` defers to
    /// the executor dialect's capability flag.
    pub fn use_window_count(mut self, use_window_count: Option<bool>) -> Self {
        self.pagination_engine = self.pagination_engine.with_window_count(use_window_count);
        self
    }

    /// Replace the strategy for one operator on this pager's filter engine.
    pub fn register_strategy(&mut self, operator: FilterOperator, strategy: FilterStrategy) {
        self.filter_engine.register_strategy(operator, strategy);
    }

    /// Append programmatic filters to the parsed ones.
    pub fn with_filters(mut self, filters: Option<Vec<Filter>>) -> Self {
        if let Some(filters) = filters {
            match &mut self.filters {
                Some(existing) => existing.extend(filters),
                None => self.filters = Some(filters),
            }
        }
        self
    }

    /// Append programmatic OR filter groups to the parsed ones.
    pub fn with_or_filters(mut self, or_filters: Option<Vec<OrFilterGroup>>) -> Self {
        if let Some(or_filters) = or_filters {
            match &mut self.or_filters {
                Some(existing) => existing.extend(or_filters),
                None => self.or_filters = Some(or_filters),
            }
        }
        self
    }

    /// Override the sort key.
    pub fn with_sorting(mut self, sorting: Option<SortingQuery>) -> Self {
        if sorting.is_some() {
            self.sorting = sorting;
        }
        self
    }

    /// Apply a configuration: strict mode plus pagination constraints.
    pub fn apply_config(&mut self, config: &PagerConfig) -> Result<&mut Self, Error> {
        config.validate()?;
        self.set_strict_mode(config.strict_mode);
        let pagination = *self.pagination_engine.pagination();
        let page = config.validate_page(pagination.page)?;
        let per_page = config.validate_per_page(pagination.per_page);
        self.pagination_engine
            .set_pagination(crate::types::PaginationQuery::new(page, per_page));
        Ok(self)
    }

    /// Apply AND filters, OR groups and sorting to a base query, in that
    /// order.
    pub fn compose(&mut self, query: SelectQuery) -> Result<SelectQuery, Error> {
        let query = self
            .filter_engine
            .apply_filters(query, self.filters.as_deref())?;
        let query = self
            .filter_engine
            .apply_or_filter_groups(query, self.or_filters.as_deref())?;
        self.sort_engine.apply_sort(query, self.sorting.as_ref())
    }

    /// Run the full pipeline against a blocking executor.
    pub fn generate_response<E>(
        &mut self,
        query: SelectQuery,
        executor: &E,
    ) -> Result<PaginatedResponse<SqlRow>, Error>
    where
        E: Executor + ?Sized,
    {
        let query = self.compose(query)?;
        let (data, total_items) = self.pagination_engine.paginate_with_count(&query, executor)?;
        Ok(self.pagination_engine.build_response(
            total_items,
            data,
            self.filters.clone(),
            self.or_filters.clone(),
            self.sorting.clone(),
        ))
    }

    /// Run the full pipeline against an async executor.
    pub async fn generate_response_async<E>(
        &mut self,
        query: SelectQuery,
        executor: &E,
    ) -> Result<PaginatedResponse<SqlRow>, Error>
    where
        E: AsyncExecutor + ?Sized,
    {
        let query = self.compose(query)?;
        let (data, total_items) = self
            .pagination_engine
            .paginate_with_count_async(&query, executor)
            .await?;
        Ok(self.pagination_engine.build_response(
            total_items,
            data,
            self.filters.clone(),
            self.or_filters.clone(),
            self.sorting.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PageUrl;
    use crate::schema::ScalarType;
    use crate::sql::SqliteDialect;
    use crate::types::{PaginationQuery, SortingOrder};

    fn params() -> PageParams {
        PageParams {
            filters: Some(vec![Filter::new("age", FilterOperator::Gte, "18")]),
            or_filters: None,
            sorting: Some(SortingQuery::new("name", SortingOrder::Desc)),
            pagination: PaginationQuery::new(2, 5),
            url: PageUrl::parse("/heroes?page=2&per_page=5"),
        }
    }

    fn heroes() -> SelectQuery {
        SelectQuery::from_table("heroes")
            .column("id", ScalarType::Int)
            .column("name", ScalarType::Text)
            .column("age", ScalarType::Int)
    }

    #[test]
    fn compose_applies_filters_then_sort() {
        let mut pager = Pager::new(params());
        let query = pager.compose(heroes()).unwrap();
        let stmt = query.to_statement(&SqliteDialect);
        assert_eq!(
            stmt.sql,
            "SELECT id, name, age FROM heroes WHERE age >= ? ORDER BY name DESC"
        );
    }

    #[test]
    fn with_filters_appends() {
        let pager = Pager::new(params())
            .with_filters(Some(vec![Filter::new("id", FilterOperator::Gt, "0")]));
        assert_eq!(pager.filters.as_ref().unwrap().len(), 2);
        let pager = pager.with_filters(None);
        assert_eq!(pager.filters.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn with_sorting_overrides_only_when_present() {
        let pager = Pager::new(params()).with_sorting(None);
        assert_eq!(pager.sorting.as_ref().unwrap().sort_by, "name");
        let pager = pager.with_sorting(Some(SortingQuery::new("age", SortingOrder::Asc)));
        assert_eq!(pager.sorting.as_ref().unwrap().sort_by, "age");
    }

    #[test]
    fn strict_mode_propagates_to_engines() {
        let mut pager = Pager::new(params()).strict_mode(true);
        pager.filters = Some(vec![Filter::new("power", FilterOperator::Eq, "fly")]);
        assert!(pager.compose(heroes()).is_err());
    }

    #[test]
    fn apply_config_clamps_pagination() {
        let mut pager = Pager::new(PageParams {
            pagination: PaginationQuery::new(3, 500),
            ..params()
        });
        let config = PagerConfig::default();
        pager.apply_config(&config).unwrap();
        assert_eq!(
            *pager.pagination_engine.pagination(),
            PaginationQuery::new(3, 100)
        );
    }

    #[test]
    fn apply_config_rejects_invalid_config() {
        let mut pager = Pager::new(params());
        let config = PagerConfig {
            default_per_page: 0,
            ..PagerConfig::default()
        };
        assert!(pager.apply_config(&config).is_err());
    }
}
