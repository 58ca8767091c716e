//! `SET` clause of update statements

use crate::build::{Build, QueryWriter};
use crate::sink::ParameterSink;
use jpql_criteria_ast::Assignments;
use jpql_criteria_diagnostics::{CompileError, JPQ0004, Result};

impl Build for Assignments {
    /// `f1 = :f1, f2 = :f2` or `f1 = ?1, f2 = ?2`
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        if self.is_empty() {
            return Err(CompileError::malformed(
                JPQ0004,
                "update statement has no assignments",
            ));
        }
        for (i, assignment) in self.iter().enumerate() {
            let placeholder = match writer.sink_mut() {
                ParameterSink::Positional(sink) => format!("?{}", sink.push(assignment.value.clone())),
                ParameterSink::Named(sink) => {
                    let key = assignment.field.param_key();
                    sink.bind(&key, &assignment.value)?;
                    format!(":{key}")
                }
            };
            if i > 0 {
                writer.push_str(", ");
            }
            writer.push_field(assignment.field.as_str());
            writer.push_str(" = ");
            writer.push_str(&placeholder);
        }
        Ok(())
    }
}
