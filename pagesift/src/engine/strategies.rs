//! Default operator strategies
//!
//! One predicate-construction function per operator. The default set is
//! built fresh for each filter engine, so a per-engine override never leaks
//! into concurrently running requests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::coerce::{coerce_value, split_values};
use crate::predicate::{CompareOp, Predicate};
use crate::schema::{Column, ScalarType};
use crate::types::FilterOperator;

/// A predicate-construction function for one operator.
///
/// Receives the resolved column, the raw string value and an optional
/// pre-resolved scalar type. Returns `None` when the value is unusable for
/// the operator (the filter is then dropped, not an error).
pub type FilterStrategy =
    Arc<dyn Fn(&Column, &str, Option<ScalarType>) -> Option<Predicate> + Send + Sync>;

fn value_type(column: &Column, ty: Option<ScalarType>) -> ScalarType {
    ty.unwrap_or_else(|| column.scalar_type())
}

fn compare(column: &Column, raw: &str, ty: Option<ScalarType>, op: CompareOp) -> Option<Predicate> {
    Some(Predicate::Compare {
        expr: column.expr().to_string(),
        op,
        value: coerce_value(value_type(column, ty), raw),
    })
}

fn like(column: &Column, pattern: &str, negated: bool) -> Option<Predicate> {
    Some(Predicate::Pattern {
        expr: column.expr().to_string(),
        pattern: pattern.to_string(),
        case_insensitive: false,
        negated,
        cast_to_text: false,
    })
}

fn ilike(column: &Column, pattern: String, negated: bool) -> Option<Predicate> {
    Some(Predicate::Pattern {
        expr: column.expr().to_string(),
        pattern,
        case_insensitive: true,
        negated,
        cast_to_text: !column.is_text(),
    })
}

fn in_list(column: &Column, raw: &str, ty: Option<ScalarType>, negated: bool) -> Option<Predicate> {
    let target = value_type(column, ty);
    let values = split_values(raw)
        .iter()
        .map(|item| coerce_value(target, item))
        .collect();
    Some(Predicate::InList {
        expr: column.expr().to_string(),
        values,
        negated,
    })
}

fn between(column: &Column, raw: &str, ty: Option<ScalarType>) -> Option<Predicate> {
    let parts = split_values(raw);
    match parts.as_slice() {
        [low, high] if !low.is_empty() && !high.is_empty() => {
            let target = value_type(column, ty);
            Some(Predicate::Between {
                expr: column.expr().to_string(),
                low: coerce_value(target, low),
                high: coerce_value(target, high),
            })
        }
        _ => None,
    }
}

fn null_check(column: &Column, negated: bool) -> Option<Predicate> {
    Some(Predicate::NullCheck {
        expr: column.expr().to_string(),
        negated,
    })
}

/// Build the default strategy map: exactly one strategy per operator.
pub(crate) fn default_strategies() -> HashMap<FilterOperator, FilterStrategy> {
    let mut map: HashMap<FilterOperator, FilterStrategy> = HashMap::new();

    map.insert(
        FilterOperator::Eq,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Eq)),
    );
    map.insert(
        FilterOperator::Ne,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Ne)),
    );
    map.insert(
        FilterOperator::Gt,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Gt)),
    );
    map.insert(
        FilterOperator::Gte,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Gte)),
    );
    map.insert(
        FilterOperator::Lt,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Lt)),
    );
    map.insert(
        FilterOperator::Lte,
        Arc::new(|c, raw, ty| compare(c, raw, ty, CompareOp::Lte)),
    );
    map.insert(
        FilterOperator::Like,
        Arc::new(|c, raw, _| like(c, raw, false)),
    );
    map.insert(
        FilterOperator::NotLike,
        Arc::new(|c, raw, _| like(c, raw, true)),
    );
    map.insert(
        FilterOperator::Ilike,
        Arc::new(|c, raw, _| ilike(c, raw.to_string(), false)),
    );
    map.insert(
        FilterOperator::NotIlike,
        Arc::new(|c, raw, _| ilike(c, raw.to_string(), true)),
    );
    map.insert(
        FilterOperator::In,
        Arc::new(|c, raw, ty| in_list(c, raw, ty, false)),
    );
    map.insert(
        FilterOperator::NotIn,
        Arc::new(|c, raw, ty| in_list(c, raw, ty, true)),
    );
    map.insert(FilterOperator::Between, Arc::new(between));
    map.insert(
        FilterOperator::IsNull,
        Arc::new(|c, _, _| null_check(c, false)),
    );
    map.insert(
        FilterOperator::IsNotNull,
        Arc::new(|c, _, _| null_check(c, true)),
    );
    map.insert(
        FilterOperator::StartsWith,
        Arc::new(|c, raw, _| ilike(c, format!("{}%", raw), false)),
    );
    map.insert(
        FilterOperator::EndsWith,
        Arc::new(|c, raw, _| ilike(c, format!("%{}", raw), false)),
    );
    map.insert(
        FilterOperator::Contains,
        Arc::new(|c, raw, _| ilike(c, format!("%{}%", raw), false)),
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    fn text_col() -> Column {
        Column::new("name", ScalarType::Text)
    }

    fn int_col() -> Column {
        Column::new("age", ScalarType::Int)
    }

    #[test]
    fn one_strategy_per_operator() {
        let map = default_strategies();
        assert_eq!(map.len(), FilterOperator::ALL.len());
        for op in FilterOperator::ALL {
            assert!(map.contains_key(&op), "missing strategy for {}", op);
        }
    }

    #[test]
    fn eq_coerces_to_column_type() {
        let map = default_strategies();
        let pred = map[&FilterOperator::Eq](&int_col(), "18", None).unwrap();
        assert_eq!(
            pred,
            Predicate::Compare {
                expr: "age".into(),
                op: CompareOp::Eq,
                value: SqlValue::Int(18),
            }
        );
    }

    #[test]
    fn pre_resolved_type_wins() {
        let map = default_strategies();
        let pred = map[&FilterOperator::Eq](&int_col(), "18", Some(ScalarType::Text)).unwrap();
        assert_eq!(
            pred,
            Predicate::Compare {
                expr: "age".into(),
                op: CompareOp::Eq,
                value: SqlValue::Text("18".into()),
            }
        );
    }

    #[test]
    fn contains_wraps_pattern() {
        let map = default_strategies();
        let pred = map[&FilterOperator::Contains](&text_col(), "jo", None).unwrap();
        assert_eq!(
            pred,
            Predicate::Pattern {
                expr: "name".into(),
                pattern: "%jo%".into(),
                case_insensitive: true,
                negated: false,
                cast_to_text: false,
            }
        );
    }

    #[test]
    fn starts_and_ends_with_patterns() {
        let map = default_strategies();
        let starts = map[&FilterOperator::StartsWith](&text_col(), "Jo", None).unwrap();
        let ends = map[&FilterOperator::EndsWith](&text_col(), "hn", None).unwrap();
        match (starts, ends) {
            (
                Predicate::Pattern { pattern: s, .. },
                Predicate::Pattern { pattern: e, .. },
            ) => {
                assert_eq!(s, "Jo%");
                assert_eq!(e, "%hn");
            }
            other => panic!("unexpected predicates: {:?}", other),
        }
    }

    #[test]
    fn ilike_on_non_text_column_casts() {
        let map = default_strategies();
        let pred = map[&FilterOperator::Contains](&int_col(), "4", None).unwrap();
        match pred {
            Predicate::Pattern { cast_to_text, .. } => assert!(cast_to_text),
            other => panic!("unexpected predicate: {:?}", other),
        }
    }

    #[test]
    fn like_is_verbatim_and_case_sensitive() {
        let map = default_strategies();
        let pred = map[&FilterOperator::Like](&text_col(), "Jo%", None).unwrap();
        assert_eq!(
            pred,
            Predicate::Pattern {
                expr: "name".into(),
                pattern: "Jo%".into(),
                case_insensitive: false,
                negated: false,
                cast_to_text: false,
            }
        );
    }

    #[test]
    fn in_list_coerces_each_element() {
        let map = default_strategies();
        let pred = map[&FilterOperator::In](&int_col(), "1, 2, 3", None).unwrap();
        assert_eq!(
            pred,
            Predicate::InList {
                expr: "age".into(),
                values: vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)],
                negated: false,
            }
        );
    }

    #[test]
    fn between_requires_exactly_two_parts() {
        let map = default_strategies();
        assert!(map[&FilterOperator::Between](&int_col(), "20", None).is_none());
        assert!(map[&FilterOperator::Between](&int_col(), "20,30,40", None).is_none());
        assert!(map[&FilterOperator::Between](&int_col(), "20,", None).is_none());
        let pred = map[&FilterOperator::Between](&int_col(), "20,30", None).unwrap();
        assert_eq!(
            pred,
            Predicate::Between {
                expr: "age".into(),
                low: SqlValue::Int(20),
                high: SqlValue::Int(30),
            }
        );
    }

    #[test]
    fn null_checks_ignore_value() {
        let map = default_strategies();
        let pred = map[&FilterOperator::IsNull](&text_col(), "ignored", None).unwrap();
        assert_eq!(
            pred,
            Predicate::NullCheck {
                expr: "name".into(),
                negated: false,
            }
        );
    }
}
