//! Filter engine
//!
//! Applies AND filters and OR filter groups to a query. Field names resolve
//! against the query's stored columns first, then its computed fields, with
//! the result memoized per engine instance (one engine per request). In
//! strict mode an unresolvable field fails the request; in lenient mode the
//! offending filter is dropped and everything else proceeds.

use std::collections::HashMap;

use tracing::debug;

use crate::engine::strategies::{default_strategies, FilterStrategy};
use crate::error::Error;
use crate::predicate::Predicate;
use crate::query::SelectQuery;
use crate::schema::{Column, ScalarType};
use crate::types::{Filter, FilterOperator, OrFilterGroup};

/// Engine for building and applying filter conditions.
///
/// Operator dispatch goes through a per-instance strategy map layered over
/// the shared defaults; registering a custom strategy affects only this
/// engine and only the one operator.
pub struct FilterEngine {
    pub strict_mode: bool,
    strategies: HashMap<FilterOperator, FilterStrategy>,
    resolution_memo: HashMap<String, Option<Column>>,
}

impl FilterEngine {
    pub fn new(strict_mode: bool) -> Self {
        Self {
            strict_mode,
            strategies: default_strategies(),
            resolution_memo: HashMap::new(),
        }
    }

    /// Replace the strategy for one operator, builder style.
    pub fn with_strategy(mut self, operator: FilterOperator, strategy: FilterStrategy) -> Self {
        self.register_strategy(operator, strategy);
        self
    }

    /// Replace the strategy for one operator on this engine instance.
    pub fn register_strategy(&mut self, operator: FilterOperator, strategy: FilterStrategy) {
        self.strategies.insert(operator, strategy);
    }

    /// Number of registered strategies.
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Build a predicate for a filter against a resolved column, or `None`
    /// when the value is unusable for the operator.
    pub fn build_filter_condition(
        &self,
        column: &Column,
        filter: &Filter,
        ty: Option<ScalarType>,
    ) -> Option<Predicate> {
        let strategy = self.strategies.get(&filter.operator)?;
        strategy(column, &filter.value, ty)
    }

    /// Resolve a field name against the query, memoized for the lifetime of
    /// this engine instance.
    fn resolve(&mut self, query: &SelectQuery, field: &str) -> Option<Column> {
        if let Some(cached) = self.resolution_memo.get(field) {
            return cached.clone();
        }
        let resolved = query.resolve_field(field).cloned();
        self.resolution_memo.insert(field.to_string(), resolved.clone());
        resolved
    }

    fn build_for_filter(
        &mut self,
        query: &SelectQuery,
        filter: &Filter,
    ) -> Result<Option<Predicate>, Error> {
        let Some(column) = self.resolve(query, &filter.field) else {
            if self.strict_mode {
                return Err(Error::unknown_field(
                    &filter.field,
                    query.available_fields(),
                ));
            }
            debug!(field = %filter.field, "skipping filter on unknown field");
            return Ok(None);
        };
        let ty = column.scalar_type();
        let condition = self.build_filter_condition(&column, filter, Some(ty));
        if condition.is_none() {
            debug!(
                field = %filter.field,
                operator = %filter.operator,
                "filter value unusable, filter dropped"
            );
        }
        Ok(condition)
    }

    /// Apply AND filters to a query.
    ///
    /// All usable predicates are ANDed onto the query in one batch; the
    /// query is returned unchanged when there is nothing to apply.
    pub fn apply_filters(
        &mut self,
        query: SelectQuery,
        filters: Option<&[Filter]>,
    ) -> Result<SelectQuery, Error> {
        let Some(filters) = filters else {
            return Ok(query);
        };
        if filters.is_empty() {
            return Ok(query);
        }

        let mut conditions = Vec::new();
        for filter in filters {
            if let Some(condition) = self.build_for_filter(&query, filter)? {
                conditions.push(condition);
            }
        }

        if conditions.is_empty() {
            Ok(query)
        } else {
            Ok(query.and_where(conditions))
        }
    }

    /// Apply OR filter groups to a query.
    ///
    /// Each group's usable predicates are ORed together; the group
    /// conditions are then ANDed with everything else. A group with no
    /// usable predicates contributes nothing.
    pub fn apply_or_filter_groups(
        &mut self,
        query: SelectQuery,
        groups: Option<&[OrFilterGroup]>,
    ) -> Result<SelectQuery, Error> {
        let Some(groups) = groups else {
            return Ok(query);
        };
        if groups.is_empty() {
            return Ok(query);
        }

        let mut conditions = Vec::new();
        for group in groups {
            let mut members = Vec::new();
            for filter in &group.filters {
                if let Some(condition) = self.build_for_filter(&query, filter)? {
                    members.push(condition);
                }
            }
            if !members.is_empty() {
                conditions.push(Predicate::Or(members));
            }
        }

        if conditions.is_empty() {
            Ok(query)
        } else {
            Ok(query.and_where(conditions))
        }
    }
}
