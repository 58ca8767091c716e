//! Criteria tree definitions for the JPQL criteria compiler
//!
//! This crate defines the immutable input of a compile call: comparison
//! leaves, composites joined by conjunctions, raw statement fragments,
//! aggregate selectors, update assignments and the parameter values they
//! carry. Trees are plain data (`Send + Sync`) and can be reused across any
//! number of compiles.
//!
//! # Example
//!
//! ```
//! use jpql_criteria_ast::{Comparison, Composite};
//!
//! let criteria = Composite::of(Comparison::gt("age", 18)?)
//!     .and(Comparison::eq("status", "ACTIVE")?);
//! assert_eq!(criteria.len(), 2);
//! # Ok::<(), jpql_criteria_ast::CompileError>(())
//! ```

mod aggregate;
mod assignment;
mod comparison;
mod criteria;
mod field;
pub mod placeholder;
mod statement;
mod value;

pub use aggregate::*;
pub use assignment::*;
pub use comparison::*;
pub use criteria::*;
pub use field::*;
pub use statement::*;
pub use value::*;

pub use jpql_criteria_diagnostics::{CompileError, Result};

/// Single-comparison composite, ready for `.and(..)` / `.or(..)`
pub fn cri(field: impl AsRef<str>, value: impl Into<Operand>) -> Result<Composite> {
    Ok(Composite::of(Comparison::new(field, value)?))
}

/// ` GROUP BY` over a comma-separated field list
pub fn group(fields: &str) -> Result<Statement> {
    Ok(Statement::GroupBy(FieldList::parse(fields)?))
}

/// ` ORDER BY` over a comma-separated field list (`"name DESC, id"`)
pub fn order(fields: &str) -> Result<Statement> {
    Ok(Statement::OrderBy(FieldList::parse(fields)?))
}

/// Aggregate selector over a comma-separated field list
pub fn agg(fields: &str) -> Result<Aggregate> {
    Aggregate::parse(fields)
}

/// ` HAVING` clause from a criteria tree
pub fn having(criteria: impl Into<Criteria>) -> Statement {
    Statement::Having(Having::Criteria(criteria.into()))
}

/// ` HAVING` clause from text with its own placeholders
pub fn having_text<A: Into<Argument>>(
    text: impl Into<String>,
    args: impl IntoIterator<Item = A>,
) -> Statement {
    Statement::Having(Having::Text(Fragment::with_args(text, args)))
}

/// Sub-expression with its own placeholders
pub fn sub<A: Into<Argument>>(text: impl Into<String>, args: impl IntoIterator<Item = A>) -> Statement {
    Statement::Sub(Fragment::with_args(text, args))
}

/// Native fragment, compiled as `SQL('<text>', p1, p2, ...)`
pub fn sql<A: Into<Argument>>(text: impl Into<String>, args: impl IntoIterator<Item = A>) -> Statement {
    Statement::Native(Fragment::with_args(text, args))
}

/// Executor offset argument
pub fn offset(value: u64) -> Argument {
    Argument::Inject(Injector::Offset(value))
}

/// Executor limit argument
pub fn limit(value: u64) -> Argument {
    Argument::Inject(Injector::Limit(value))
}
