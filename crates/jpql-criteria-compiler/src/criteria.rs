//! Composite and criteria nodes

use crate::build::{Build, QueryWriter};
use crate::fragment::{build_native, build_sub};
use jpql_criteria_ast::{Composite, Criteria};
use jpql_criteria_diagnostics::Result;

impl Build for Criteria {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        match self {
            Self::Comparison(cmp) => cmp.build(writer),
            Self::Composite(composite) => composite.build(writer),
            Self::Sub(fragment) => build_sub(fragment, writer),
            Self::Native(fragment) => build_native(fragment, writer),
        }
    }
}

impl Build for Composite {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        if self.is_empty() {
            if self.is_negated() {
                writer.push_str("NOT");
            }
            return Ok(());
        }

        let wrapped = self.is_negated() || self.len() > 1;
        if self.is_negated() {
            writer.push_str("NOT (");
        } else if wrapped {
            writer.push_str("(");
        }

        for (i, child) in self.children().iter().enumerate() {
            if let Some(conjunction) = i.checked_sub(1).and_then(|j| self.conjunctions().get(j)) {
                writer.push_str(" ");
                writer.push_str(conjunction);
                writer.push_str(" ");
            }
            child.build(writer)?;
        }

        if wrapped {
            writer.push_str(")");
        }
        Ok(())
    }
}
