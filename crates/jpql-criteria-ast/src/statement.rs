//! Statement fragments and compile arguments

use crate::{Aggregate, Criteria, FieldList, NamedBindings, Value};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Anything that compiles into query text and bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// A criteria tree, compiled in place
    Criteria(Criteria),
    /// ` GROUP BY <fields>`
    GroupBy(FieldList),
    /// ` ORDER BY <fields>`
    OrderBy(FieldList),
    /// ` HAVING <condition>`
    Having(Having),
    /// Caller-written sub-expression
    Sub(Fragment),
    /// Native-language escape, `SQL('...', ...)`
    Native(Fragment),
    /// Aggregate selector, contributes its ` GROUP BY` clause
    Aggregate(Aggregate),
}

impl Statement {
    /// True if compiling this statement binds by name
    pub fn is_naming(&self) -> bool {
        match self {
            Self::Criteria(criteria) => criteria.is_naming(),
            Self::Having(having) => having.is_naming(),
            Self::Sub(fragment) | Self::Native(fragment) => fragment.is_naming(),
            Self::GroupBy(_) | Self::OrderBy(_) | Self::Aggregate(_) => false,
        }
    }
}

impl From<Criteria> for Statement {
    fn from(criteria: Criteria) -> Self {
        Self::Criteria(criteria)
    }
}

/// Condition of a `HAVING` clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Having {
    Criteria(Criteria),
    Text(Fragment),
}

impl Having {
    pub fn is_naming(&self) -> bool {
        match self {
            Self::Criteria(criteria) => criteria.is_naming(),
            Self::Text(fragment) => fragment.is_naming(),
        }
    }
}

/// Caller-written text plus the parameters its placeholders refer to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<Argument>,
}

impl Fragment {
    /// A fragment with no parameters, emitted verbatim
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<A: Into<Argument>>(
        text: impl Into<String>,
        args: impl IntoIterator<Item = A>,
    ) -> Self {
        Self {
            text: text.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    /// A fragment carrying a mapping binds by name
    pub fn is_naming(&self) -> bool {
        self.args.iter().any(|arg| match arg {
            Argument::Map(_) => true,
            Argument::Statement(statement) => statement.is_naming(),
            Argument::Value(_) | Argument::Inject(_) => false,
        })
    }
}

/// Executor settings carried next to the bindings, never bound themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Injector {
    /// First result position
    Offset(u64),
    /// Maximum number of results
    Limit(u64),
}

/// A trailing argument of a compile call, or a fragment parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// A single value
    Value(Value),
    /// Named bindings; as the first compile argument it selects named mode
    Map(NamedBindings),
    /// A statement rendered in place
    Statement(Box<Statement>),
    /// Offset/limit for the executor
    Inject(Injector),
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<NamedBindings> for Argument {
    fn from(map: NamedBindings) -> Self {
        Self::Map(map)
    }
}

impl From<Statement> for Argument {
    fn from(statement: Statement) -> Self {
        Self::Statement(Box::new(statement))
    }
}

impl From<Injector> for Argument {
    fn from(injector: Injector) -> Self {
        Self::Inject(injector)
    }
}

macro_rules! argument_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Argument {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

argument_from_value!(bool, i32, i64, Decimal, &str, String, NaiveDate, NaiveDateTime);
