//! Update assignments (`SET field = value, ...`)

use crate::{FieldRef, Value};
use jpql_criteria_diagnostics::Result;
use serde::{Deserialize, Serialize};

/// One `field = value` pair of an update clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub field: FieldRef,
    #[serde(default)]
    pub value: Value,
}

/// Ordered update assignments
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignments(Vec<Assignment>);

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field = value`
    pub fn set(mut self, field: impl AsRef<str>, value: impl Into<Value>) -> Result<Self> {
        self.0.push(Assignment {
            field: FieldRef::new(field)?,
            value: value.into(),
        });
        Ok(self)
    }

    /// Build from `(field, value)` pairs
    pub fn from_pairs<S, V>(pairs: impl IntoIterator<Item = (S, V)>) -> Result<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .try_fold(Self::new(), |acc, (field, value)| acc.set(field, value))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
