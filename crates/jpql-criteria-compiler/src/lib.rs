//! JPQL criteria compiler
//!
//! Turns criteria trees from [`jpql_criteria_ast`] into query text plus the
//! parameter bindings that go with it. Every compile call picks exactly one
//! binding style, named (`:name` with a mapping) or positional (`?N` with a
//! sequence), and threads a single sink through the whole statement so
//! names never collide and numbers never drift.
//!
//! # Example
//!
//! ```
//! use jpql_criteria_ast::{Comparison, Composite, Criteria, Value};
//! use jpql_criteria_compiler::{Compiler, Parameters};
//!
//! let criteria = Criteria::from(
//!     Composite::of(Comparison::gt("age", 18)?).and(Comparison::eq("status", "ACTIVE")?),
//! );
//! let compiled = Compiler::with_alias("e")?.compile(&criteria, &[])?;
//! assert_eq!(compiled.text, "(e.age > ?1 AND e.status = ?2)");
//! assert_eq!(
//!     compiled.parameters,
//!     Parameters::Positional(vec![Value::from(18), Value::from("ACTIVE")])
//! );
//! # Ok::<(), jpql_criteria_diagnostics::CompileError>(())
//! ```

mod aggregate;
mod alias;
mod assignment;
mod build;
mod comparison;
mod compiler;
mod config;
mod criteria;
mod fragment;
mod query;
mod sink;
mod statement;

pub use aggregate::Select;
pub use alias::{AliasResolver, DEFAULT_ALIAS};
pub use build::{Build, QueryWriter, field_list};
pub use compiler::{Compiled, Compiler, Parameters};
pub use config::CompilerConfig;
pub use query::{CompiledQuery, EntityQuery};
pub use sink::{BindingMode, NamedSink, ParameterSink, PositionalSink};

pub use jpql_criteria_diagnostics::{CompileError, Result};
