//! Comparison leaves

use crate::build::{Build, QueryWriter};
use crate::sink::ParameterSink;
use jpql_criteria_ast::placeholder::{first_named, has_positional, rewrite};
use jpql_criteria_ast::{Comparison, Operand, Value};
use jpql_criteria_diagnostics::Result;

impl Build for Comparison {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()> {
        let field = self.field().as_str();
        let op = self.operator();
        match self.operand() {
            Operand::Sentinel(_) => {
                writer.push_field(field);
            }
            Operand::Nested(statement) => {
                writer.push_field(field);
                writer.push_str(" ");
                writer.push_str(op);
                writer.push_str(" (");
                statement.build(writer)?;
                writer.push_str(")");
            }
            Operand::Null => {
                let text = match embed(self, &Value::Null, writer)? {
                    Some(text) => text,
                    None => {
                        let field = writer.resolver().qualify(field);
                        match op {
                            "=" => format!("{field} IS NULL"),
                            "!=" | "<>" => format!("{field} IS NOT NULL"),
                            op => format!("{field} {op} NULL"),
                        }
                    }
                };
                writer.push_str(&text);
            }
            Operand::Scalar(value) => {
                let text = match embed(self, value, writer)? {
                    Some(text) => text,
                    None => bind(self, value, writer)?,
                };
                writer.push_str(&text);
            }
        }
        Ok(())
    }
}

/// Bind through a placeholder the caller wrote into the field or operator
///
/// Returns `None` when neither carries a placeholder of the active mode.
fn embed(cmp: &Comparison, value: &Value, writer: &mut QueryWriter<'_>) -> Result<Option<String>> {
    let resolver = writer.resolver();
    let field = cmp.field().as_str();
    let op = cmp.operator();
    match writer.sink_mut() {
        ParameterSink::Positional(sink) => {
            if has_positional(field) {
                let index = sink.push(value.clone());
                return renumber(&resolver.qualify(field), index).map(Some);
            }
            if has_positional(op) {
                let index = sink.push(value.clone());
                let op = renumber(op, index)?;
                return Ok(Some(format!("{} {op}", resolver.qualify(field))));
            }
        }
        ParameterSink::Named(sink) => {
            if let Some(name) = first_named(field) {
                sink.bind(name, value)?;
                return Ok(Some(resolver.qualify(field).into_owned()));
            }
            if let Some(name) = first_named(op) {
                sink.bind(name, value)?;
                return Ok(Some(format!("{} {op}", resolver.qualify(field))));
            }
        }
    }
    Ok(None)
}

/// `<field> <op> :key` or `<field> <op> ?n`
fn bind(cmp: &Comparison, value: &Value, writer: &mut QueryWriter<'_>) -> Result<String> {
    let field = writer.resolver().qualify(cmp.field().as_str());
    let op = cmp.operator();
    let placeholder = match writer.sink_mut() {
        ParameterSink::Positional(sink) => format!("?{}", sink.push(value.clone())),
        ParameterSink::Named(sink) => {
            let key = cmp
                .name()
                .map_or_else(|| cmp.field().param_key(), str::to_string);
            sink.bind(&key, value)?;
            format!(":{key}")
        }
    };
    Ok(format!("{field} {op} {placeholder}"))
}

/// Replace every positional token of `text` with `?index`
pub(crate) fn renumber(text: &str, index: usize) -> Result<String> {
    rewrite(text, |p| Ok(p.is_positional().then(|| format!("?{index}"))))
}
