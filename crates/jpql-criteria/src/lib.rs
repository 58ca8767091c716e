//! Criteria trees compiled into parameterized JPQL
//!
//! This crate bundles the workspace:
//! - [`ast`]: values, comparison leaves, composites, statement fragments
//! - [`compiler`]: alias resolution, parameter sinks, the top-level
//!   compiler and whole-statement prologues
//! - [`diagnostics`]: error codes and diagnostics
//!
//! # Example
//!
//! ```
//! use jpql_criteria::{Comparison, CompilerConfig, Criteria, EntityQuery, cri};
//!
//! let config = CompilerConfig::new().with_entity("Employee");
//! let query = EntityQuery::from_config(&config)?;
//! let criteria: Criteria = cri("dept", "Eng")?.and(Comparison::gt("salary", 1000)?).into();
//!
//! let compiled = query.select(Some(&criteria), &[])?;
//! assert_eq!(
//!     compiled.text,
//!     "SELECT e FROM Employee e WHERE (e.dept = ?1 AND e.salary > ?2)"
//! );
//! # Ok::<(), jpql_criteria::CompileError>(())
//! ```

pub use jpql_criteria_ast as ast;
pub use jpql_criteria_compiler as compiler;
pub use jpql_criteria_diagnostics as diagnostics;

// Convenience re-exports
pub use jpql_criteria_ast::{
    Aggregate, Argument, Assignments, Comparison, Composite, Criteria, Injector, NamedBindings,
    Selector, Statement, Value, agg, cri, group, having, having_text, limit, offset, order, sql,
    sub,
};
pub use jpql_criteria_compiler::{
    BindingMode, Compiled, CompiledQuery, Compiler, CompilerConfig, EntityQuery, Parameters,
};
pub use jpql_criteria_diagnostics::{CompileError, Diagnostic, ErrorCode, Result};

/// Compile `criteria` under the default alias `e`
pub fn compile(criteria: &Criteria, args: &[Argument]) -> Result<Compiled> {
    Compiler::new(&CompilerConfig::default())?.compile(criteria, args)
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
