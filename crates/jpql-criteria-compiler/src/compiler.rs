//! Top-level compiler: picks the binding mode and threads one sink through
//! the whole statement

use crate::alias::AliasResolver;
use crate::build::{Build, QueryWriter};
use crate::config::CompilerConfig;
use crate::sink::{BindingMode, NamedSink, ParameterSink, PositionalSink};
use jpql_criteria_ast::{Argument, Assignments, Criteria, Injector, NamedBindings, Statement, Value};
use jpql_criteria_diagnostics::{CompileError, JPQ0101, Result};
use log::debug;
use serde::Serialize;

/// Bindings handed to the executor: a mapping or a sequence, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameters {
    Named {
        bindings: NamedBindings,
        /// Trailing values the caller passed after the mapping
        #[serde(skip_serializing_if = "Vec::is_empty")]
        passthrough: Vec<Value>,
    },
    Positional(Vec<Value>),
}

impl Parameters {
    pub fn mode(&self) -> BindingMode {
        match self {
            Self::Named { .. } => BindingMode::Named,
            Self::Positional(_) => BindingMode::Positional,
        }
    }

    /// Bound values, in binding order
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Self::Named { bindings, .. } => bindings.values().collect(),
            Self::Positional(values) => values.iter().collect(),
        }
    }

    pub fn named(&self) -> Option<&NamedBindings> {
        match self {
            Self::Named { bindings, .. } => Some(bindings),
            Self::Positional(_) => None,
        }
    }

    pub fn positional(&self) -> Option<&[Value]> {
        match self {
            Self::Named { .. } => None,
            Self::Positional(values) => Some(values),
        }
    }
}

/// Result of one compile call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compiled {
    /// `SET` list of an update, before the criteria
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    /// Criteria text
    pub text: String,
    /// Trailing statements (`GROUP BY`, `ORDER BY`, ...), rendered after the
    /// criteria
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tail: String,
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub injectors: Vec<Injector>,
}

impl Compiled {
    /// Criteria text followed by the trailing statements
    pub fn query(&self) -> String {
        format!("{}{}", self.text, self.tail)
    }
}

/// Trailing compile arguments sorted by role
#[derive(Default)]
struct Trailing<'a> {
    seed: Option<&'a NamedBindings>,
    values: Vec<Value>,
    statements: Vec<&'a Statement>,
    injectors: Vec<Injector>,
}

impl<'a> Trailing<'a> {
    fn split(args: &'a [Argument]) -> Result<Self> {
        let (seed, rest) = match args {
            [Argument::Map(map), rest @ ..] => (Some(map), rest),
            _ => (None, args),
        };
        let offset = args.len() - rest.len();
        let mut trailing = Self {
            seed,
            ..Self::default()
        };
        for (i, arg) in rest.iter().enumerate() {
            match arg {
                Argument::Value(value) => trailing.values.push(value.clone()),
                Argument::Statement(statement) => trailing.statements.push(statement),
                Argument::Inject(injector) => trailing.injectors.push(*injector),
                Argument::Map(_) => {
                    return Err(CompileError::invalid_argument(
                        JPQ0101,
                        format!(
                            "argument {} is a mapping; only the first argument may be one",
                            i + offset + 1
                        ),
                    ));
                }
            }
        }
        Ok(trailing)
    }
}

/// Compiles criteria trees and update clauses under one alias
///
/// A compiler holds only its validated configuration; every call builds a
/// fresh sink, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Compiler {
    resolver: AliasResolver,
}

impl Compiler {
    pub fn new(config: &CompilerConfig) -> Result<Self> {
        Ok(Self {
            resolver: config.resolver()?,
        })
    }

    /// Compiler with the standard pattern set for `alias`
    pub fn with_alias(alias: impl Into<String>) -> Result<Self> {
        Ok(Self {
            resolver: AliasResolver::new(alias)?,
        })
    }

    pub fn resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    /// Compile `criteria` with the caller's trailing arguments
    ///
    /// A leading mapping selects named mode and seeds the bindings. Without
    /// one, a tree that names any of its parameters also compiles in named
    /// mode; otherwise trailing values seed the positional sequence and the
    /// tree's bindings follow them.
    pub fn compile(&self, criteria: &Criteria, args: &[Argument]) -> Result<Compiled> {
        self.run(None, Some(criteria), args)
    }

    /// Like [`Compiler::compile`], with the criteria optional
    pub fn compile_where(&self, criteria: Option<&Criteria>, args: &[Argument]) -> Result<Compiled> {
        self.run(None, criteria, args)
    }

    /// Compile a `SET` list and its criteria into one shared sink
    ///
    /// Assignment placeholders are numbered or named before any criteria
    /// placeholder.
    ///
    /// In named mode a `SET` key is the field path with `.` replaced by `_`,
    /// the same default key a criteria comparison on that field uses. Setting
    /// `status` while filtering on a different `status` value is therefore a
    /// [`CompileError::Conflict`]; name the comparison explicitly
    /// (`Comparison::named`) to keep both.
    pub fn compile_update(
        &self,
        assignments: &Assignments,
        criteria: Option<&Criteria>,
        args: &[Argument],
    ) -> Result<Compiled> {
        self.run(Some(assignments), criteria, args)
    }

    fn run(
        &self,
        assignments: Option<&Assignments>,
        criteria: Option<&Criteria>,
        args: &[Argument],
    ) -> Result<Compiled> {
        let Trailing {
            seed,
            values,
            statements,
            injectors,
        } = Trailing::split(args)?;
        let naming = criteria.is_some_and(Criteria::is_naming)
            || statements.iter().any(|s| s.is_naming());

        let (sink, passthrough): (ParameterSink, _) = match seed {
            Some(map) => {
                debug!("named mode: seeded with {} binding(s)", map.len());
                let mut sink = NamedSink::new();
                sink.merge(map)?;
                (sink.into(), values)
            }
            None if naming => {
                debug!("named mode: tree names its parameters");
                (NamedSink::new().into(), values)
            }
            None => {
                debug!("positional mode: {} seed value(s)", values.len());
                (PositionalSink::seeded(values).into(), Vec::new())
            }
        };

        let mut writer = QueryWriter::new(&self.resolver, sink);
        let set = match assignments {
            Some(assignments) => {
                assignments.build(&mut writer)?;
                Some(writer.take_text())
            }
            None => None,
        };
        if let Some(criteria) = criteria {
            criteria.build(&mut writer)?;
        }
        let text = writer.take_text();
        for statement in statements {
            statement.build(&mut writer)?;
        }
        let (tail, sink) = writer.finish();

        let parameters = match sink {
            ParameterSink::Named(sink) => Parameters::Named {
                bindings: sink.into_bindings(),
                passthrough,
            },
            ParameterSink::Positional(sink) => Parameters::Positional(sink.into_values()),
        };
        debug!(
            "compiled {} parameter(s) in {} mode",
            parameters.values().len(),
            parameters.mode()
        );
        Ok(Compiled {
            set,
            text,
            tail,
            parameters,
            injectors,
        })
    }
}

