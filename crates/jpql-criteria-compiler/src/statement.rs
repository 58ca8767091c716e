//! Statement fragments: GROUP BY, ORDER BY, HAVING and friends

use crate::build::{Build, QueryWriter};
use crate::fragment::{build_having_text, build_native, build_sub};
use jpql_criteria_ast::{Having, Statement};
use jpql_criteria_diagnostics::Result;

impl Build for Statement {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        match self {
            Self::Criteria(criteria) => criteria.build(writer),
            Self::GroupBy(fields) => {
                writer.push_field_list("GROUP BY", fields);
                Ok(())
            }
            Self::OrderBy(fields) => {
                writer.push_field_list("ORDER BY", fields);
                Ok(())
            }
            Self::Having(having) => having.build(writer),
            Self::Sub(fragment) => build_sub(fragment, writer),
            Self::Native(fragment) => build_native(fragment, writer),
            Self::Aggregate(aggregate) => aggregate.build(writer),
        }
    }
}

impl Build for Having {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        writer.push_str(" HAVING ");
        match self {
            Self::Criteria(criteria) => criteria.build(writer),
            Self::Text(fragment) => build_having_text(fragment, writer),
        }
    }
}
