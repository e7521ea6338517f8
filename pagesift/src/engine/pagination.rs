//! Pagination engine
//!
//! Executes a composed query with offset/limit and a total count. On
//! backends whose dialect supports it (or when forced by the explicit
//! override) the count is fused into the data query as a running
//! `COUNT(*) OVER()`; otherwise a separate count query runs first. Both
//! paths return identical `(rows, total)` pairs; only the round-trip count
//! differs.

use tracing::debug;

use crate::error::Error;
use crate::executor::{AsyncExecutor, ExecuteError, Executor};
use crate::query::{SelectQuery, TOTAL_COUNT_COLUMN};
use crate::response::{Links, Meta, PageUrl, PaginatedResponse, Pagination};
use crate::sql::SqlDialect;
use crate::types::{Filter, OrFilterGroup, PaginationQuery, SortingQuery};
use crate::value::{SqlRow, SqlValue};

/// Engine for paginating queries and building paginated responses.
pub struct PaginationEngine {
    pagination: PaginationQuery,
    url: PageUrl,
    use_window_count: Option<bool>,
}

impl PaginationEngine {
    pub fn new(pagination: PaginationQuery, url: PageUrl) -> Self {
        Self {
            pagination,
            url,
            use_window_count: None,
        }
    }

    /// Force the windowed count on or off. `None` defers to the dialect's
    /// capability flag.
    pub fn with_window_count(mut self, use_window_count: Option<bool>) -> Self {
        self.use_window_count = use_window_count;
        self
    }

    pub fn pagination(&self) -> &PaginationQuery {
        &self.pagination
    }

    /// Replace the pagination parameters (after config clamping).
    pub fn set_pagination(&mut self, pagination: PaginationQuery) {
        self.pagination = pagination;
    }

    pub fn url(&self) -> &PageUrl {
        &self.url
    }

    fn should_use_window(&self, dialect: &dyn SqlDialect) -> bool {
        self.use_window_count
            .unwrap_or_else(|| dialect.supports_window_count())
    }

    fn limit(&self) -> u64 {
        self.pagination.per_page
    }

    fn offset(&self) -> u64 {
        self.pagination.offset()
    }

    fn extract_count(rows: &[SqlRow]) -> Result<u64, Error> {
        let value = rows
            .first()
            .and_then(|row| row.value(0))
            .and_then(SqlValue::as_i64)
            .ok_or(ExecuteError::MissingCount)?;
        Ok(value.max(0) as u64)
    }

    fn split_windowed(mut rows: Vec<SqlRow>) -> (Vec<SqlRow>, u64) {
        let total = rows
            .first()
            .and_then(|row| row.get(TOTAL_COUNT_COLUMN))
            .and_then(SqlValue::as_i64)
            .unwrap_or(0)
            .max(0) as u64;
        for row in &mut rows {
            row.remove(TOTAL_COUNT_COLUMN);
        }
        (rows, total)
    }

    // --- Sync methods ---

    /// Execute the offset/limit data query only.
    pub fn paginate<E>(&self, query: &SelectQuery, executor: &E) -> Result<Vec<SqlRow>, Error>
    where
        E: Executor + ?Sized,
    {
        let stmt = query.page_statement(executor.dialect(), self.limit(), self.offset());
        Ok(executor.fetch_all(&stmt)?)
    }

    /// Count total items matching the query.
    pub fn count_total<E>(&self, query: &SelectQuery, executor: &E) -> Result<u64, Error>
    where
        E: Executor + ?Sized,
    {
        let stmt = query.count_statement(executor.dialect());
        let rows = executor.fetch_all(&stmt)?;
        Self::extract_count(&rows)
    }

    /// Fetch one page of data plus the total count.
    pub fn paginate_with_count<E>(
        &self,
        query: &SelectQuery,
        executor: &E,
    ) -> Result<(Vec<SqlRow>, u64), Error>
    where
        E: Executor + ?Sized,
    {
        let dialect = executor.dialect();
        if self.should_use_window(dialect) {
            debug!(dialect = dialect.name(), "using windowed count");
            let stmt = query.windowed_statement(dialect, self.limit(), self.offset());
            let rows = executor.fetch_all(&stmt)?;
            return Ok(Self::split_windowed(rows));
        }

        let total = self.count_total(query, executor)?;
        let data = self.paginate(query, executor)?;
        Ok((data, total))
    }

    // --- Async methods ---

    /// Execute the offset/limit data query only.
    pub async fn paginate_async<E>(
        &self,
        query: &SelectQuery,
        executor: &E,
    ) -> Result<Vec<SqlRow>, Error>
    where
        E: AsyncExecutor + ?Sized,
    {
        let stmt = query.page_statement(executor.dialect(), self.limit(), self.offset());
        Ok(executor.fetch_all(&stmt).await?)
    }

    /// Count total items matching the query.
    pub async fn count_total_async<E>(
        &self,
        query: &SelectQuery,
        executor: &E,
    ) -> Result<u64, Error>
    where
        E: AsyncExecutor + ?Sized,
    {
        let stmt = query.count_statement(executor.dialect());
        let rows = executor.fetch_all(&stmt).await?;
        Self::extract_count(&rows)
    }

    /// Fetch one page of data plus the total count.
    pub async fn paginate_with_count_async<E>(
        &self,
        query: &SelectQuery,
        executor: &E,
    ) -> Result<(Vec<SqlRow>, u64), Error>
    where
        E: AsyncExecutor + ?Sized,
    {
        let dialect = executor.dialect();
        if self.should_use_window(dialect) {
            debug!(dialect = dialect.name(), "using windowed count");
            let stmt = query.windowed_statement(dialect, self.limit(), self.offset());
            let rows = executor.fetch_all(&stmt).await?;
            return Ok(Self::split_windowed(rows));
        }

        let total = self.count_total_async(query, executor).await?;
        let data = self.paginate_async(query, executor).await?;
        Ok((data, total))
    }

    // --- Response building ---

    /// Build the final paginated response with navigation links.
    pub fn build_response<T>(
        &self,
        total_items: u64,
        data: Vec<T>,
        filters: Option<Vec<Filter>>,
        or_filters: Option<Vec<OrFilterGroup>>,
        sort: Option<SortingQuery>,
    ) -> PaginatedResponse<T> {
        let per_page = self.pagination.per_page;
        let current_page = self.pagination.page;
        let total_pages = total_items.div_ceil(per_page).max(1);

        let next = (current_page < total_pages)
            .then(|| self.url.page_link(current_page + 1, per_page));
        let prev = (current_page > 1).then(|| self.url.page_link(current_page - 1, per_page));

        PaginatedResponse {
            data,
            meta: Meta {
                pagination: Pagination {
                    total_items,
                    per_page,
                    current_page,
                    total_pages,
                },
                filters,
                or_filters,
                sort,
            },
            links: Links {
                self_: self.url.page_link(current_page, per_page),
                first: self.url.page_link(1, per_page),
                next,
                prev,
                last: self.url.page_link(total_pages, per_page),
            },
        }
    }
}
