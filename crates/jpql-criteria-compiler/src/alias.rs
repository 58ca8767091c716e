//! Alias qualification of field references

use jpql_criteria_diagnostics::{CompileError, JPQ0400, JPQ0401, Result};
use regex::Regex;
use std::borrow::Cow;

/// Alias used when the configuration names none
pub const DEFAULT_ALIAS: &str = "e";

/// Prefixes field references with the entity alias unless already present
///
/// A field already carries the alias when it is the alias alone, starts with
/// `alias.`, contains `alias.` after a non-word character, or contains the
/// alias inside parentheses (`COUNT(e)`).
#[derive(Debug, Clone)]
pub struct AliasResolver {
    alias: String,
    pattern: Regex,
}

impl AliasResolver {
    /// Create a resolver with the standard alias pattern set
    pub fn new(alias: impl Into<String>) -> Result<Self> {
        let alias = validate_alias(alias.into())?;
        let a = regex::escape(&alias);
        let pattern = format!(r"^ *{a} *$|^ *{a}\.|\W{a}\.|\( *{a} *\)");
        Self::with_pattern(alias, &pattern)
    }

    /// Create a resolver with a caller-supplied "already aliased" pattern
    pub fn with_pattern(alias: impl Into<String>, pattern: &str) -> Result<Self> {
        let alias = validate_alias(alias.into())?;
        let pattern = Regex::new(pattern).map_err(|e| {
            CompileError::config(JPQ0401, format!("invalid alias pattern `{pattern}`: {e}"))
        })?;
        Ok(Self { alias, pattern })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Check whether `field` already carries the alias
    pub fn has_alias(&self, field: &str) -> bool {
        self.pattern.is_match(field)
    }

    /// Qualify `field` with the alias unless it already carries it
    pub fn qualify<'a>(&self, field: &'a str) -> Cow<'a, str> {
        if self.has_alias(field) {
            Cow::Borrowed(field)
        } else {
            Cow::Owned(format!("{}.{}", self.alias, field))
        }
    }
}

fn validate_alias(alias: String) -> Result<String> {
    let alias = alias.trim().to_string();
    let valid = alias
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && alias.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    if !valid {
        return Err(CompileError::config(
            JPQ0400,
            format!("alias `{alias}` is not an identifier"),
        ));
    }
    Ok(alias)
}
