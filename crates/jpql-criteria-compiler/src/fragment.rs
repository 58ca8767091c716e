//! Caller-written fragments: sub-expressions, HAVING text and native escapes
//!
//! Fragments carry their own placeholders. In positional mode every token is
//! renumbered against the shared sink so the fragment can be spliced in
//! anywhere; in named mode fragment parameters arrive as a mapping.

use crate::build::{Build, QueryWriter};
use crate::sink::{NamedSink, ParameterSink, PositionalSink};
use jpql_criteria_ast::placeholder::{PlaceholderKind, placeholders, rewrite};
use jpql_criteria_ast::{Argument, Fragment, NamedBindings, Value};
use jpql_criteria_diagnostics::{CompileError, JPQ0101, JPQ0102, Result};
use log::debug;

/// The single mapping argument of a named-mode fragment
fn single_map(args: &[Argument]) -> Option<&NamedBindings> {
    match args {
        [Argument::Map(map)] => Some(map),
        _ => None,
    }
}

/// Plain values of a fragment; statements, mappings and injectors are
/// rejected
fn plain_values<'a>(fragment: &'a Fragment, what: &str) -> Result<Vec<&'a Value>> {
    fragment
        .args()
        .iter()
        .map(|arg| match arg {
            Argument::Value(value) => Ok(value),
            other => Err(CompileError::invalid_argument(
                JPQ0101,
                format!("{what} `{}` accepts only plain values, got {}", fragment.text(), kind(other)),
            )),
        })
        .collect()
}

fn kind(arg: &Argument) -> &'static str {
    match arg {
        Argument::Value(_) => "a value",
        Argument::Map(_) => "a mapping",
        Argument::Statement(_) => "a statement",
        Argument::Inject(_) => "an injector",
    }
}

/// Sub-expression: every placeholder consumes one parameter
pub(crate) fn build_sub(fragment: &Fragment, writer: &mut QueryWriter<'_>) -> Result<()> {
    let text = fragment.text();
    if fragment.args().is_empty() {
        writer.push_str(text);
        return Ok(());
    }
    let rendered = match writer.sink_mut() {
        ParameterSink::Named(sink) => {
            let Some(map) = single_map(fragment.args()) else {
                return Err(CompileError::invalid_argument(
                    JPQ0102,
                    format!("sub-expression `{text}` needs a single mapping in named mode"),
                ));
            };
            sink.merge(map)?;
            text.to_string()
        }
        ParameterSink::Positional(sink) => {
            let values = plain_values(fragment, "sub-expression")?;
            let found = placeholders(text).filter(|p| p.is_positional()).count();
            if found != values.len() {
                return Err(CompileError::placeholder_mismatch(text, found, values.len()));
            }
            let mut values = values.into_iter();
            rewrite(text, |p| {
                if !p.is_positional() {
                    return Ok(None);
                }
                let value = values.next().cloned().unwrap_or_default();
                Ok(Some(format!("?{}", sink.push(value))))
            })?
        }
    };
    writer.push_str(&rendered);
    Ok(())
}

/// `HAVING` text whose placeholders may refer to bindings already made
pub(crate) fn build_having_text(fragment: &Fragment, writer: &mut QueryWriter<'_>) -> Result<()> {
    let text = fragment.text();
    if fragment.args().is_empty() {
        writer.push_str(text);
        return Ok(());
    }
    let rendered = match writer.sink_mut() {
        ParameterSink::Named(sink) => match single_map(fragment.args()) {
            Some(map) => {
                sink.merge(map)?;
                text.to_string()
            }
            None => {
                let values = plain_values(fragment, "having clause")?;
                bind_unbound_names(text, &values, sink)?;
                text.to_string()
            }
        },
        ParameterSink::Positional(sink) => {
            let values = plain_values(fragment, "having clause")?;
            number_positional(text, values, sink)?
        }
    };
    writer.push_str(&rendered);
    Ok(())
}

/// Bind each distinct `:name` not yet bound to the next value, in order
fn bind_unbound_names(text: &str, values: &[&Value], sink: &mut NamedSink) -> Result<()> {
    let mut names: Vec<&str> = Vec::new();
    for name in placeholders(text).filter_map(|p| p.name()) {
        if !sink.is_bound(name) && !names.contains(&name) {
            names.push(name);
        }
    }
    if names.len() != values.len() {
        return Err(CompileError::placeholder_mismatch(text, names.len(), values.len()));
    }
    names
        .into_iter()
        .zip(values)
        .try_for_each(|(name, value)| sink.bind(name, value))
}

/// Number the positional tokens of `text` against `sink`
///
/// A bare `?` or the next free `?N` consumes a value, a `?N` at or below
/// the current length refers to an earlier binding. The whole text is
/// checked before anything is bound.
fn number_positional(text: &str, values: Vec<&Value>, sink: &mut PositionalSink) -> Result<String> {
    let base = sink.len();
    let mut consumed = 0;
    let mut fresh = Vec::new();
    for placeholder in placeholders(text) {
        let PlaceholderKind::Positional(number) = placeholder.kind else {
            continue;
        };
        let next = base + consumed + 1;
        match number {
            None => {
                fresh.push(next);
                consumed += 1;
            }
            Some(n) if n == next => consumed += 1,
            Some(n) if (1..next).contains(&n) => {}
            Some(n) => {
                return Err(CompileError::placeholder_out_of_sequence(
                    text,
                    next,
                    n,
                    placeholder.span,
                ));
            }
        }
    }
    if consumed != values.len() {
        return Err(CompileError::placeholder_mismatch(text, consumed, values.len()));
    }

    for value in values {
        sink.push(value.clone());
    }
    let mut fresh = fresh.into_iter();
    rewrite(text, |p| {
        Ok(match p.kind {
            PlaceholderKind::Positional(None) => fresh.next().map(|n| format!("?{n}")),
            _ => None,
        })
    })
}

/// Native escape: `SQL('<text>', p1, p2, ...)`
pub(crate) fn build_native(fragment: &Fragment, writer: &mut QueryWriter<'_>) -> Result<()> {
    writer.push_str("SQL('");
    writer.push_str(&fragment.text().replace('\'', "''"));
    writer.push_str("'");
    for arg in fragment.args() {
        match arg {
            Argument::Statement(statement) => {
                writer.push_str(", ");
                statement.build(writer)?;
            }
            Argument::Value(Value::Null) => writer.push_str(", NULL"),
            Argument::Value(value) => {
                let placeholder = match writer.sink_mut() {
                    ParameterSink::Positional(sink) => format!("?{}", sink.push(value.clone())),
                    ParameterSink::Named(_) => {
                        return Err(CompileError::invalid_argument(
                            JPQ0102,
                            format!("native fragment value {value} has no name; pass a mapping"),
                        ));
                    }
                };
                writer.push_str(", ");
                writer.push_str(&placeholder);
            }
            Argument::Map(map) => {
                let ParameterSink::Named(sink) = writer.sink_mut() else {
                    return Err(CompileError::invalid_argument(
                        JPQ0101,
                        "native fragment mappings require named mode",
                    ));
                };
                sink.merge(map)?;
                for key in map.keys() {
                    writer.push_str(", :");
                    writer.push_str(key);
                }
            }
            Argument::Inject(injector) => {
                return Err(CompileError::invalid_argument(
                    JPQ0101,
                    format!("{injector:?} is not a native fragment parameter"),
                ));
            }
        }
    }
    writer.push_str(")");
    debug!("native fragment with {} argument(s)", fragment.args().len());
    Ok(())
}
