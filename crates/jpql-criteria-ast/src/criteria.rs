//! Criteria trees: comparison leaves joined by conjunctions

use crate::{Comparison, Fragment};
use jpql_criteria_diagnostics::{CompileError, JPQ0002, JPQ0003, Result};
use serde::{Deserialize, Serialize};

/// A node of a criteria tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criteria {
    /// A single field comparison
    Comparison(Comparison),
    /// Children joined by conjunctions, optionally negated
    Composite(Composite),
    /// Caller-written condition text with its own placeholders
    Sub(Fragment),
    /// Native-language escape, `SQL('...', ...)`
    Native(Fragment),
}

impl Criteria {
    /// True if any node in the tree binds by name
    pub fn is_naming(&self) -> bool {
        match self {
            Self::Comparison(cmp) => cmp.is_naming(),
            Self::Composite(composite) => composite.is_naming(),
            Self::Sub(fragment) | Self::Native(fragment) => fragment.is_naming(),
        }
    }
}

impl From<Comparison> for Criteria {
    fn from(cmp: Comparison) -> Self {
        Self::Comparison(cmp)
    }
}

impl From<Composite> for Criteria {
    fn from(composite: Composite) -> Self {
        Self::Composite(composite)
    }
}

/// Ordered children joined by conjunction texts, with a negation flag
///
/// The first child has no conjunction; every later child has exactly one,
/// and it is never empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "CompositeDoc", into = "CompositeDoc")]
pub struct Composite {
    children: Vec<Criteria>,
    conjunctions: Vec<String>,
    negated: bool,
}

impl Composite {
    /// Create an empty composite
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
            conjunctions: Vec::new(),
            negated: false,
        }
    }

    /// Create a composite holding one child
    pub fn of(child: impl Into<Criteria>) -> Self {
        Self {
            children: vec![child.into()],
            ..Self::new()
        }
    }

    /// Append `child`, joined to the previous one by `conjunction`
    ///
    /// The conjunction of the first child is ignored.
    pub fn append(mut self, conjunction: &str, child: impl Into<Criteria>) -> Result<Self> {
        self.push(conjunction, Some(child.into()))?;
        Ok(self)
    }

    fn push(&mut self, conjunction: &str, child: Option<Criteria>) -> Result<()> {
        let Some(child) = child else {
            return Err(CompileError::malformed(JPQ0003, "criteria child is missing"));
        };
        if !self.children.is_empty() {
            let conjunction = conjunction.trim();
            if conjunction.is_empty() {
                return Err(CompileError::malformed(JPQ0002, "conjunction text is empty"));
            }
            self.conjunctions.push(conjunction.to_string());
        }
        self.children.push(child);
        Ok(())
    }

    fn push_with(mut self, conjunction: &str, child: Criteria) -> Self {
        if !self.children.is_empty() {
            self.conjunctions.push(conjunction.to_string());
        }
        self.children.push(child);
        self
    }

    /// Append `child` joined by `AND`
    pub fn and(self, child: impl Into<Criteria>) -> Self {
        self.push_with("AND", child.into())
    }

    /// Append `child` joined by `OR`
    pub fn or(self, child: impl Into<Criteria>) -> Self {
        self.push_with("OR", child.into())
    }

    /// Negate the whole composite
    pub fn not(self) -> Self {
        self.not_if(true)
    }

    pub fn not_if(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Criteria] {
        &self.children
    }

    /// Conjunctions in order; entry `i` joins child `i` and child `i + 1`
    pub fn conjunctions(&self) -> &[String] {
        &self.conjunctions
    }

    pub fn is_naming(&self) -> bool {
        self.children.iter().any(Criteria::is_naming)
    }
}

#[derive(Serialize, Deserialize)]
struct CompositeItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conjunction: Option<String>,
    criteria: Option<Criteria>,
}

#[derive(Serialize, Deserialize)]
struct CompositeDoc {
    #[serde(default)]
    not: bool,
    #[serde(default)]
    items: Vec<CompositeItem>,
}

impl TryFrom<CompositeDoc> for Composite {
    type Error = CompileError;

    fn try_from(doc: CompositeDoc) -> Result<Self> {
        let mut composite = Composite::new().not_if(doc.not);
        for item in doc.items {
            composite.push(item.conjunction.as_deref().unwrap_or(""), item.criteria)?;
        }
        Ok(composite)
    }
}

impl From<Composite> for CompositeDoc {
    fn from(composite: Composite) -> Self {
        let conjunctions = std::iter::once(None).chain(composite.conjunctions.into_iter().map(Some));
        Self {
            not: composite.negated,
            items: conjunctions
                .zip(composite.children)
                .map(|(conjunction, criteria)| CompositeItem {
                    conjunction,
                    criteria: Some(criteria),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(field: &str) -> Comparison {
        Comparison::new(field, 1).unwrap()
    }

    #[test]
    fn test_first_conjunction_is_ignored() {
        let composite = Composite::new().append("", leaf("a")).unwrap();
        assert_eq!(composite.len(), 1);
        assert!(composite.conjunctions().is_empty());
    }

    #[test]
    fn test_empty_conjunction_rejected() {
        let err = Composite::of(leaf("a")).append(" ", leaf("b")).unwrap_err();
        assert_eq!(err.code(), JPQ0002);
    }

    #[test]
    fn test_missing_child_rejected() {
        let err = Composite::new().push("AND", None).unwrap_err();
        assert_eq!(err.code(), JPQ0003);
    }

    #[test]
    fn test_conjunctions_track_children() {
        let composite = Composite::of(leaf("a")).and(leaf("b")).or(leaf("c"));
        assert_eq!(composite.conjunctions(), ["AND", "OR"]);
        assert_eq!(composite.len(), 3);
    }
}
