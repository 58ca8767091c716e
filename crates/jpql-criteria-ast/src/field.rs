//! Field references

use jpql_criteria_diagnostics::{CompileError, JPQ0001, JPQ0004, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A column or path reference, possibly already alias-qualified
///
/// The text is trimmed on construction and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldRef(String);

impl FieldRef {
    /// Create a field reference from raw text
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CompileError::malformed(JPQ0001, "field reference is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The field text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default named-parameter key: the path with `.` replaced by `_`
    pub fn param_key(&self) -> String {
        self.0.replace('.', "_")
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldRef {
    type Error = CompileError;

    fn try_from(text: String) -> Result<Self> {
        Self::new(text)
    }
}

impl TryFrom<&str> for FieldRef {
    type Error = CompileError;

    fn try_from(text: &str) -> Result<Self> {
        Self::new(text)
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        field.0
    }
}

/// A non-empty, ordered list of fields (GROUP BY, ORDER BY, aggregates)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldRef>", into = "Vec<FieldRef>")]
pub struct FieldList(SmallVec<[FieldRef; 4]>);

impl FieldList {
    /// Create a field list; at least one field is required
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(FieldRef::new)
            .collect::<Result<SmallVec<[FieldRef; 4]>>>()?;
        Self::from_refs(fields)
    }

    /// Parse a comma-separated field list such as `"dept, role"`
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(text.split(','))
    }

    fn from_refs(fields: SmallVec<[FieldRef; 4]>) -> Result<Self> {
        if fields.is_empty() {
            return Err(CompileError::malformed(JPQ0004, "field list is empty"));
        }
        Ok(Self(fields))
    }

    /// Iterate the fields in order
    pub fn iter(&self) -> impl Iterator<Item = &FieldRef> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<FieldRef>> for FieldList {
    type Error = CompileError;

    fn try_from(fields: Vec<FieldRef>) -> Result<Self> {
        Self::from_refs(SmallVec::from_vec(fields))
    }
}

impl From<FieldList> for Vec<FieldRef> {
    fn from(list: FieldList) -> Self {
        list.0.into_vec()
    }
}
