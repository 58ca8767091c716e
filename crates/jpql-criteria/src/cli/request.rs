//! Compile requests read from JSON files

use anyhow::{Context, Result, bail};
use jpql_criteria_ast::{Argument, Assignments, Criteria, Selector};
use jpql_criteria_compiler::{CompiledQuery, Compiler, CompilerConfig, EntityQuery};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which statement a request compiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Criteria text only, no prologue
    #[default]
    Criteria,
    Select,
    Count,
    Counts,
    Update,
    Delete,
}

/// A compile request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub config: CompilerConfig,
    pub kind: StatementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criteria>,
    /// `SET` list of an update
    #[serde(skip_serializing_if = "Assignments::is_empty")]
    pub assignments: Assignments,
    /// Group fields of a `counts` request (`"dept, title"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    /// Projection of a `select` request
    pub selector: Selector,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

/// Command-line values that replace request settings
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub alias: Option<String>,
    pub entity: Option<String>,
}

impl Request {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid compile request")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse request file: {}", path.display()))
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(alias) = &overrides.alias {
            self.config.alias = alias.clone();
        }
        if let Some(entity) = &overrides.entity {
            self.config.entity = Some(entity.clone());
        }
    }

    /// Compile the request into a complete statement
    pub fn compile(&self) -> Result<CompiledQuery> {
        let criteria = self.criteria.as_ref();
        let args = self.arguments.as_slice();
        let query = match self.kind {
            StatementKind::Criteria => {
                let compiled = Compiler::new(&self.config)?.compile_where(criteria, args)?;
                CompiledQuery {
                    text: compiled.query(),
                    parameters: compiled.parameters,
                    injectors: compiled.injectors,
                }
            }
            StatementKind::Select => self.entity_query()?.select_with(&self.selector, criteria, args)?,
            StatementKind::Count => self.entity_query()?.count(criteria, args)?,
            StatementKind::Counts => {
                let Some(fields) = self.fields.as_deref() else {
                    bail!("A counts request needs \"fields\"");
                };
                self.entity_query()?.counts(fields, criteria, args)?
            }
            StatementKind::Update => self.entity_query()?.update(&self.assignments, criteria, args)?,
            StatementKind::Delete => self.entity_query()?.delete(criteria, args)?,
        };
        Ok(query)
    }

    fn entity_query(&self) -> Result<EntityQuery> {
        EntityQuery::from_config(&self.config)
            .context("Statement requests need an entity (set \"config.entity\" or --entity)")
    }
}
