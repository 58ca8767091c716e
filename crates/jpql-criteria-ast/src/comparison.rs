//! Comparison leaves: one field tested against one operand

use crate::placeholder::first_named;
use crate::{FieldRef, Statement, Value};
use chrono::{NaiveDate, NaiveDateTime};
use jpql_criteria_diagnostics::{CompileError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Distinguished operand values that suppress the operator and the binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    /// Null-equivalent skip marker: emit the bare field where a value would go
    Skip,
    /// No-value marker: the comparison is really a bare projection
    NoValue,
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// A value bound as a parameter
    Scalar(Value),
    /// SQL null, rendered as `IS NULL` / `IS NOT NULL`
    #[default]
    Null,
    /// A nested statement compiled in parentheses
    Nested(Box<Statement>),
    /// Bare field, no operator and no binding
    Sentinel(Sentinel),
}

impl Operand {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel(_))
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            value => Self::Scalar(value),
        }
    }
}

impl From<Statement> for Operand {
    fn from(statement: Statement) -> Self {
        Self::Nested(Box::new(statement))
    }
}

impl From<Sentinel> for Operand {
    fn from(sentinel: Sentinel) -> Self {
        Self::Sentinel(sentinel)
    }
}

macro_rules! operand_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Value::from(value).into()
                }
            }
        )*
    };
}

operand_from_value!(bool, i32, i64, Decimal, &str, String, NaiveDate, NaiveDateTime, Vec<Value>);

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// A field compared to an operand: `<field> <op> <value>`
///
/// The operator defaults to `=` and an explicit parameter name is only used
/// in named mode. Both are discarded for sentinel operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComparisonDoc", into = "ComparisonDoc")]
pub struct Comparison {
    field: FieldRef,
    operator: Option<String>,
    operand: Operand,
    name: Option<String>,
}

impl Comparison {
    /// `<field> = <value>`
    pub fn new(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::build(field.as_ref(), None, value.into(), None)
    }

    /// `<field> <operator> <value>`
    pub fn with_op(
        field: impl AsRef<str>,
        operator: impl AsRef<str>,
        value: impl Into<Operand>,
    ) -> Result<Self> {
        Self::build(field.as_ref(), Some(operator.as_ref()), value.into(), None)
    }

    fn build(
        field: &str,
        operator: Option<&str>,
        operand: Operand,
        name: Option<&str>,
    ) -> Result<Self> {
        let field = FieldRef::new(field)?;
        let operand = match operand {
            Operand::Scalar(Value::Null) => Operand::Null,
            operand => operand,
        };
        if operand.is_sentinel() {
            return Ok(Self {
                field,
                operator: None,
                operand,
                name: None,
            });
        }
        Ok(Self {
            field,
            operator: non_blank(operator),
            operand,
            name: non_blank(name),
        })
    }

    /// Set the parameter name used in named mode
    pub fn named(mut self, name: impl AsRef<str>) -> Self {
        if !self.operand.is_sentinel() {
            self.name = non_blank(Some(name.as_ref()));
        }
        self
    }

    pub fn eq(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, "=", value)
    }

    pub fn ne(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, "!=", value)
    }

    pub fn gt(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, ">", value)
    }

    pub fn ge(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, ">=", value)
    }

    pub fn lt(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, "<", value)
    }

    pub fn le(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, "<=", value)
    }

    pub fn like(field: impl AsRef<str>, pattern: impl Into<Operand>) -> Result<Self> {
        Self::with_op(field, "LIKE", pattern)
    }

    /// `<field> IN <list>`, the list bound as one parameter
    pub fn is_in<T: Into<Value>>(
        field: impl AsRef<str>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<Self> {
        Self::with_op(field, "IN", Value::list(values))
    }

    /// A bare field reference with no operator and no binding
    pub fn bare(field: impl AsRef<str>) -> Result<Self> {
        Self::new(field, Sentinel::Skip)
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// The comparison operator, `=` when none was given
    pub fn operator(&self) -> &str {
        self.operator.as_deref().unwrap_or("=")
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Explicit parameter name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when this leaf binds by name: an explicit name, or a `:name`
    /// placeholder embedded in the field or operator text
    pub fn is_naming(&self) -> bool {
        match &self.operand {
            Operand::Sentinel(_) => false,
            Operand::Nested(statement) => statement.is_naming(),
            Operand::Scalar(_) | Operand::Null => {
                self.name.is_some()
                    || first_named(self.field.as_str()).is_some()
                    || first_named(self.operator()).is_some()
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ComparisonDoc {
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    op: Option<String>,
    #[serde(default)]
    value: Operand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<ComparisonDoc> for Comparison {
    type Error = CompileError;

    fn try_from(doc: ComparisonDoc) -> Result<Self> {
        Self::build(&doc.field, doc.op.as_deref(), doc.value, doc.name.as_deref())
    }
}

impl From<Comparison> for ComparisonDoc {
    fn from(cmp: Comparison) -> Self {
        Self {
            field: cmp.field.into(),
            op: cmp.operator,
            value: cmp.operand,
            name: cmp.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_defaults_lazily() {
        let cmp = Comparison::new("age", 18).unwrap();
        assert_eq!(cmp.operator(), "=");

        let cmp = Comparison::with_op("age", "  ", 18).unwrap();
        assert_eq!(cmp.operator(), "=");
    }

    #[test]
    fn test_null_value_becomes_null_operand() {
        let cmp = Comparison::new("deleted_at", Value::Null).unwrap();
        assert_eq!(cmp.operand(), &Operand::Null);
    }

    #[test]
    fn test_scalar_null_is_null_operand() {
        let cmp = Comparison::with_op("f", "<>", Operand::Scalar(Value::Null)).unwrap();
        assert_eq!(cmp.operand(), &Operand::Null);
        assert_eq!(cmp.operator(), "<>");
    }

    #[test]
    fn test_sentinel_drops_operator_and_name() {
        let cmp = Comparison::with_op("e.active", ">", Sentinel::NoValue)
            .unwrap()
            .named("x");
        assert_eq!(cmp.operator(), "=");
        assert_eq!(cmp.name(), None);
        assert!(!cmp.is_naming());
    }

    #[test]
    fn test_is_naming() {
        assert!(!Comparison::new("a", 1).unwrap().is_naming());
        assert!(Comparison::new("a", 1).unwrap().named("p").is_naming());
        assert!(Comparison::with_op("a", "= :p", 1).unwrap().is_naming());
        assert!(!Comparison::new("a", 1).unwrap().named("   ").is_naming());
    }
}
