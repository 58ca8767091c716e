//! Statement prologues for one entity: SELECT, COUNT, UPDATE, DELETE

use crate::aggregate::Select;
use crate::build::field_list;
use crate::compiler::{Compiled, Compiler, Parameters};
use crate::config::CompilerConfig;
use jpql_criteria_ast::{Aggregate, Argument, Assignments, Criteria, Injector, Selector};
use jpql_criteria_diagnostics::{CompileError, JPQ0402, Result};
use log::debug;
use serde::Serialize;

/// A complete statement ready for the executor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub text: String,
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub injectors: Vec<Injector>,
}

/// Builds whole statements against one entity type
#[derive(Debug, Clone)]
pub struct EntityQuery {
    entity: String,
    compiler: Compiler,
}

impl EntityQuery {
    pub fn new(entity: impl Into<String>, compiler: Compiler) -> Result<Self> {
        let entity = entity.into().trim().to_string();
        if entity.is_empty() {
            return Err(CompileError::config(JPQ0402, "entity name is empty"));
        }
        Ok(Self { entity, compiler })
    }

    pub fn from_config(config: &CompilerConfig) -> Result<Self> {
        Self::new(config.entity()?, Compiler::new(config)?)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    fn alias(&self) -> &str {
        self.compiler.resolver().alias()
    }

    /// `SELECT e FROM Entity e [WHERE ...]`
    pub fn select(&self, criteria: Option<&Criteria>, args: &[Argument]) -> Result<CompiledQuery> {
        self.select_with(&Selector::Entity, criteria, args)
    }

    /// `SELECT <selector> FROM Entity e [WHERE ...]`
    ///
    /// An aggregate selector also contributes its `GROUP BY` clause, placed
    /// after the criteria and before any trailing statement.
    pub fn select_with(
        &self,
        selector: &Selector,
        criteria: Option<&Criteria>,
        args: &[Argument],
    ) -> Result<CompiledQuery> {
        let compiled = self.compiler.compile_where(criteria, args)?;
        let resolver = self.compiler.resolver();
        let mut text = format!(
            "SELECT {} FROM {} {}",
            selector.selector(resolver),
            self.entity,
            self.alias()
        );
        push_where(&mut text, &compiled.text);
        if let Selector::Aggregate(aggregate) = selector {
            text.push_str(&field_list("GROUP BY", aggregate.fields(), resolver));
        }
        Ok(self.finish(text, compiled))
    }

    /// `SELECT COUNT(e) FROM Entity e [WHERE ...]`
    pub fn count(&self, criteria: Option<&Criteria>, args: &[Argument]) -> Result<CompiledQuery> {
        let selector = Selector::Expression(format!("COUNT({})", self.alias()));
        self.select_with(&selector, criteria, args)
    }

    /// Aggregate used by [`EntityQuery::counts`]: the group fields plus a
    /// `count` output
    pub fn count_aggregate(&self, fields: &str) -> Result<Aggregate> {
        Ok(Aggregate::parse(fields)?.with("count", format!("COUNT({})", self.alias())))
    }

    /// Row counts grouped by `fields`
    pub fn counts(
        &self,
        fields: &str,
        criteria: Option<&Criteria>,
        args: &[Argument],
    ) -> Result<CompiledQuery> {
        let selector = Selector::Aggregate(self.count_aggregate(fields)?);
        self.select_with(&selector, criteria, args)
    }

    /// `UPDATE Entity e SET ... [WHERE ...]`
    ///
    /// See [`Compiler::compile_update`]: in named mode a `SET` field and a
    /// `WHERE` field with the same path share a parameter key, so they must
    /// agree on the value unless the comparison carries its own name.
    pub fn update(
        &self,
        assignments: &Assignments,
        criteria: Option<&Criteria>,
        args: &[Argument],
    ) -> Result<CompiledQuery> {
        let compiled = self.compiler.compile_update(assignments, criteria, args)?;
        let mut text = format!(
            "UPDATE {} {} SET {}",
            self.entity,
            self.alias(),
            compiled.set.as_deref().unwrap_or_default()
        );
        push_where(&mut text, &compiled.text);
        Ok(self.finish(text, compiled))
    }

    /// `DELETE FROM Entity e [WHERE ...]`
    pub fn delete(&self, criteria: Option<&Criteria>, args: &[Argument]) -> Result<CompiledQuery> {
        let compiled = self.compiler.compile_where(criteria, args)?;
        let mut text = format!("DELETE FROM {} {}", self.entity, self.alias());
        push_where(&mut text, &compiled.text);
        Ok(self.finish(text, compiled))
    }

    fn finish(&self, mut text: String, compiled: Compiled) -> CompiledQuery {
        text.push_str(&compiled.tail);
        debug!("{}: {text}", self.entity);
        CompiledQuery {
            text,
            parameters: compiled.parameters,
            injectors: compiled.injectors,
        }
    }
}

fn push_where(text: &mut String, criteria: &str) {
    if !criteria.trim().is_empty() {
        text.push_str(" WHERE ");
        text.push_str(criteria);
    }
}
