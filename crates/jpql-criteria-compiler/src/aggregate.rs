//! Projection text for aggregates and selectors

use crate::alias::AliasResolver;
use crate::build::{Build, QueryWriter};
use jpql_criteria_ast::{Aggregate, Selector};
use jpql_criteria_diagnostics::Result;

/// Something that renders as the projection of a SELECT
pub trait Select {
    fn selector(&self, resolver: &AliasResolver) -> String;
}

impl Select for Aggregate {
    /// Group fields followed by the aggregate expressions, all alias-resolved
    fn selector(&self, resolver: &AliasResolver) -> String {
        let fields = self.fields().iter().map(|f| resolver.qualify(f.as_str()));
        let expressions = self.expressions().map(|(_, expr)| resolver.qualify(expr));
        fields.chain(expressions).collect::<Vec<_>>().join(", ")
    }
}

impl Select for Selector {
    fn selector(&self, resolver: &AliasResolver) -> String {
        match self {
            Self::Entity => resolver.alias().to_string(),
            Self::Expression(text) => text.clone(),
            Self::Aggregate(aggregate) => aggregate.selector(resolver),
        }
    }
}

impl Build for Aggregate {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        writer.push_field_list("GROUP BY", self.fields());
        Ok(())
    }
}
