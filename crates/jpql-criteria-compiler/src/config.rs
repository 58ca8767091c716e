//! Compiler configuration

use crate::alias::{AliasResolver, DEFAULT_ALIAS};
use jpql_criteria_diagnostics::{CompileError, JPQ0402, Result};
use serde::{Deserialize, Serialize};

fn default_alias() -> String {
    DEFAULT_ALIAS.to_string()
}

/// Settings shared by every compile made with one compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Alias that qualifies unqualified field references
    #[serde(default = "default_alias")]
    pub alias: String,
    /// Regex replacing the standard "already aliased" pattern set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_pattern: Option<String>,
    /// Short entity name used by statement prologues
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            alias: default_alias(),
            alias_pattern: None,
            entity: None,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_alias_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.alias_pattern = Some(pattern.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Validate the alias settings into a resolver
    pub fn resolver(&self) -> Result<AliasResolver> {
        match &self.alias_pattern {
            Some(pattern) => AliasResolver::with_pattern(self.alias.as_str(), pattern),
            None => AliasResolver::new(self.alias.as_str()),
        }
    }

    /// The entity name, required by statement prologues
    pub fn entity(&self) -> Result<&str> {
        self.entity
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| CompileError::config(JPQ0402, "no entity name configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpql_criteria_diagnostics::JPQ0400;

    #[test]
    fn test_defaults() {
        let config: CompilerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.resolver().unwrap().alias(), "e");
        assert_eq!(config.entity().unwrap_err().code(), JPQ0402);
    }

    #[test]
    fn test_builder() {
        let config = CompilerConfig::new().with_alias("p").with_entity("Person");
        assert_eq!(config.entity().unwrap(), "Person");
        assert_eq!(config.resolver().unwrap().qualify("age"), "p.age");
    }

    #[test]
    fn test_invalid_alias() {
        let config = CompilerConfig::new().with_alias("p q");
        assert_eq!(config.resolver().unwrap_err().code(), JPQ0400);
    }
}
