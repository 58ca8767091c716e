//! Parameter sinks: where a compile call collects its bindings

use indexmap::map::Entry;
use jpql_criteria_ast::{NamedBindings, Value};
use jpql_criteria_diagnostics::{CompileError, Result};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter binding style of one compile call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    /// `:name` placeholders bound through a mapping
    Named,
    /// `?N` placeholders bound through an ordered sequence
    Positional,
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => write!(f, "named"),
            Self::Positional => write!(f, "positional"),
        }
    }
}

/// Name to value bindings with conflict detection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedSink {
    bindings: NamedBindings,
}

impl NamedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`
    ///
    /// Rebinding an equal value is a no-op, a null never overwrites an
    /// existing binding, and a non-null value replaces a bound null. Any
    /// other rebinding is a conflict.
    pub fn bind(&mut self, name: &str, value: &Value) -> Result<()> {
        match self.bindings.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                trace!("bind :{name} = {value}");
                slot.insert(value.clone());
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                if value.is_null() || existing == value {
                    return Ok(());
                }
                if !existing.is_null() {
                    return Err(CompileError::conflict(name, &*existing, value));
                }
                trace!("rebind :{name} = {value} (was NULL)");
                *existing = value.clone();
            }
        }
        Ok(())
    }

    /// Bind every entry of `bindings`, in order
    pub fn merge(&mut self, bindings: &NamedBindings) -> Result<()> {
        bindings
            .iter()
            .try_for_each(|(name, value)| self.bind(name, value))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> NamedBindings {
        self.bindings
    }
}

/// Ordered values addressed by 1-based `?N` placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionalSink {
    values: Vec<Value>,
}

impl PositionalSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from values the caller already supplied
    pub fn seeded(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Append `value` and return its 1-based placeholder number
    pub fn push(&mut self, value: Value) -> usize {
        self.values.push(value);
        let index = self.values.len();
        trace!("bind ?{index} = {}", self.values[index - 1]);
        index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// The sink a compile call binds into, fixed for the whole call
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSink {
    Named(NamedSink),
    Positional(PositionalSink),
}

impl ParameterSink {
    pub fn mode(&self) -> BindingMode {
        match self {
            Self::Named(_) => BindingMode::Named,
            Self::Positional(_) => BindingMode::Positional,
        }
    }

    /// Number of bindings collected so far
    pub fn len(&self) -> usize {
        match self {
            Self::Named(sink) => sink.len(),
            Self::Positional(sink) => sink.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<NamedSink> for ParameterSink {
    fn from(sink: NamedSink) -> Self {
        Self::Named(sink)
    }
}

impl From<PositionalSink> for ParameterSink {
    fn from(sink: PositionalSink) -> Self {
        Self::Positional(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpql_criteria_diagnostics::JPQ0100;

    #[test]
    fn test_rebinding_equal_value_is_noop() {
        let mut sink = NamedSink::new();
        sink.bind("x", &Value::from(1)).unwrap();
        sink.bind("x", &Value::from(1)).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_conflicting_rebind() {
        let mut sink = NamedSink::new();
        sink.bind("x", &Value::from(1)).unwrap();
        let err = sink.bind("x", &Value::from(2)).unwrap_err();
        assert_eq!(err.code(), JPQ0100);
        assert_eq!(sink.get("x"), Some(&Value::from(1)));
    }

    #[test]
    fn test_null_rules() {
        let mut sink = NamedSink::new();
        sink.bind("x", &Value::from(1)).unwrap();
        sink.bind("x", &Value::Null).unwrap();
        assert_eq!(sink.get("x"), Some(&Value::from(1)));

        sink.bind("y", &Value::Null).unwrap();
        assert!(sink.is_bound("y"));
        sink.bind("y", &Value::from("set")).unwrap();
        assert_eq!(sink.get("y"), Some(&Value::from("set")));
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut sink = NamedSink::new();
        let mut map = NamedBindings::new();
        map.insert("b".into(), Value::from(2));
        map.insert("a".into(), Value::from(1));
        sink.merge(&map).unwrap();
        let keys: Vec<_> = sink.into_bindings().into_keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_positional_numbering() {
        let mut sink = PositionalSink::seeded(vec![Value::from("seed")]);
        assert_eq!(sink.push(Value::from(18)), 2);
        assert_eq!(sink.push(Value::Null), 3);
        assert_eq!(ParameterSink::from(sink).mode(), BindingMode::Positional);
    }
}
