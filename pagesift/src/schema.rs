//! Column model
//!
//! Every selectable field carries an explicit scalar-type tag so value
//! coercion and pattern-match casting are decided by a closed match instead
//! of runtime type probing. A column's SQL expression may be a plain column
//! name or any SQL expression (for computed/derived fields).

use serde::{Deserialize, Serialize};

/// Scalar storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    /// Unknown or backend-specific type; values pass through as text.
    Other,
}

impl ScalarType {
    /// True only for genuinely textual storage. Non-text columns are cast
    /// to text before case-insensitive pattern matching.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A resolved column: a SQL expression plus its scalar type.
///
/// For a stored column the expression is the column name itself; for a
/// computed field it is the defining SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    expr: String,
    ty: ScalarType,
}

impl Column {
    pub fn new(expr: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            expr: expr.into(),
            ty,
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.ty
    }

    pub fn is_text(&self) -> bool {
        self.ty.is_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_text_is_text() {
        assert!(ScalarType::Text.is_text());
        for ty in [
            ScalarType::Bool,
            ScalarType::Int,
            ScalarType::Float,
            ScalarType::DateTime,
            ScalarType::Other,
        ] {
            assert!(!ty.is_text());
        }
    }

    #[test]
    fn column_accessors() {
        let col = Column::new("length(name)", ScalarType::Int);
        assert_eq!(col.expr(), "length(name)");
        assert_eq!(col.scalar_type(), ScalarType::Int);
        assert!(!col.is_text());
    }
}
