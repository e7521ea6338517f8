//! Backend-neutral predicate tree
//!
//! Operator strategies build `Predicate` values; rendering walks the tree
//! and emits a SQL fragment with dialect-appropriate placeholders while
//! collecting bind values in placeholder order. Case-insensitive pattern
//! predicates carry the cast decision made at resolution time, so rendering
//! never inspects the schema.

use crate::sql::SqlDialect;
use crate::value::SqlValue;

/// Comparison operators with direct SQL equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A backend-evaluable boolean condition over one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `expr <op> value`
    Compare {
        expr: String,
        op: CompareOp,
        value: SqlValue,
    },
    /// `expr [I]LIKE pattern`, optionally negated. `cast_to_text` marks a
    /// non-textual column that must be cast before matching.
    Pattern {
        expr: String,
        pattern: String,
        case_insensitive: bool,
        negated: bool,
        cast_to_text: bool,
    },
    /// `expr [NOT] IN (values...)`
    InList {
        expr: String,
        values: Vec<SqlValue>,
        negated: bool,
    },
    /// `expr BETWEEN low AND high` (inclusive)
    Between {
        expr: String,
        low: SqlValue,
        high: SqlValue,
    },
    /// `expr IS [NOT] NULL`
    NullCheck { expr: String, negated: bool },
    /// All members must hold.
    And(Vec<Predicate>),
    /// Any member must hold.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Render this predicate as a SQL fragment, pushing bind values onto
    /// `binds` in placeholder order.
    pub fn render(&self, dialect: &dyn SqlDialect, binds: &mut Vec<SqlValue>) -> String {
        match self {
            Self::Compare { expr, op, value } => {
                binds.push(value.clone());
                format!("{} {} {}", expr, op.sql(), dialect.placeholder(binds.len()))
            }
            Self::Pattern {
                expr,
                pattern,
                case_insensitive,
                negated,
                cast_to_text,
            } => {
                let target = if *cast_to_text {
                    dialect.cast_to_text(expr)
                } else {
                    expr.clone()
                };
                let body = if !case_insensitive {
                    binds.push(SqlValue::Text(pattern.clone()));
                    format!("{} LIKE {}", target, dialect.placeholder(binds.len()))
                } else if dialect.supports_ilike() {
                    binds.push(SqlValue::Text(pattern.clone()));
                    format!("{} ILIKE {}", target, dialect.placeholder(binds.len()))
                } else {
                    binds.push(SqlValue::Text(pattern.to_lowercase()));
                    format!("LOWER({}) LIKE {}", target, dialect.placeholder(binds.len()))
                };
                if *negated {
                    format!("NOT ({})", body)
                } else {
                    body
                }
            }
            Self::InList {
                expr,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return "1=1".to_string();
                }
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| {
                        binds.push(v.clone());
                        dialect.placeholder(binds.len())
                    })
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", expr, op, placeholders.join(", "))
            }
            Self::Between { expr, low, high } => {
                binds.push(low.clone());
                let low_ph = dialect.placeholder(binds.len());
                binds.push(high.clone());
                let high_ph = dialect.placeholder(binds.len());
                format!("{} BETWEEN {} AND {}", expr, low_ph, high_ph)
            }
            Self::NullCheck { expr, negated } => {
                if *negated {
                    format!("{} IS NOT NULL", expr)
                } else {
                    format!("{} IS NULL", expr)
                }
            }
            Self::And(members) => Self::render_joined(members, " AND ", dialect, binds),
            Self::Or(members) => Self::render_joined(members, " OR ", dialect, binds),
        }
    }

    fn render_joined(
        members: &[Predicate],
        sep: &str,
        dialect: &dyn SqlDialect,
        binds: &mut Vec<SqlValue>,
    ) -> String {
        match members {
            [] => "1=1".to_string(),
            [single] => single.render(dialect, binds),
            _ => {
                let parts: Vec<String> =
                    members.iter().map(|m| m.render(dialect, binds)).collect();
                format!("({})", parts.join(sep))
            }
        }
    }
}
