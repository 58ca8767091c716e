//! Aggregate projections and result selectors

use crate::{FieldList, FieldRef, Value};
use indexmap::IndexMap;
use jpql_criteria_diagnostics::{CompileError, Result};
use serde::{Deserialize, Serialize};

/// GROUP BY fields plus named aggregate expressions
///
/// Doubles as a result-row unmarshaller: a row holds the group fields in
/// order, followed by the aggregate outputs in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    fields: FieldList,
    #[serde(default)]
    with: IndexMap<String, String>,
}

impl Aggregate {
    pub fn new(fields: FieldList) -> Self {
        Self {
            fields,
            with: IndexMap::new(),
        }
    }

    /// Aggregate over a comma-separated field list
    pub fn parse(fields: &str) -> Result<Self> {
        Ok(Self::new(FieldList::parse(fields)?))
    }

    /// Add an aggregate expression under output key `key`
    pub fn with(mut self, key: impl Into<String>, expression: impl Into<String>) -> Self {
        self.with.insert(key.into(), expression.into());
        self
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// Output keys and expressions, in insertion order
    pub fn expressions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.with.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of columns in a result row
    pub fn width(&self) -> usize {
        self.fields.len() + self.with.len()
    }

    /// Map a result row back to its output keys
    pub fn result(&self, row: impl IntoIterator<Item = Value>) -> Result<IndexMap<String, Value>> {
        let row: Vec<Value> = row.into_iter().collect();
        if row.len() != self.width() {
            return Err(CompileError::result_shape(self.width(), row.len()));
        }
        let keys = self
            .fields
            .iter()
            .map(FieldRef::as_str)
            .chain(self.with.keys().map(String::as_str));
        Ok(keys.map(str::to_string).zip(row).collect())
    }
}

/// What a SELECT statement projects
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// The entity itself (`SELECT e`)
    #[default]
    Entity,
    /// Verbatim projection text, e.g. `COUNT(e)`
    Expression(String),
    /// Group fields and aggregates; adds its GROUP BY clause
    Aggregate(Aggregate),
}
