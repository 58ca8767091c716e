//! Shared text buffer and sink threaded through a tree traversal

use crate::alias::AliasResolver;
use crate::sink::{BindingMode, ParameterSink};
use jpql_criteria_ast::FieldList;
use jpql_criteria_diagnostics::Result;
use std::mem;

/// Output of a traversal in progress: the text written so far plus the sink
/// every node binds into
#[derive(Debug)]
pub struct QueryWriter<'r> {
    resolver: &'r AliasResolver,
    text: String,
    sink: ParameterSink,
}

impl<'r> QueryWriter<'r> {
    pub fn new(resolver: &'r AliasResolver, sink: ParameterSink) -> Self {
        Self {
            resolver,
            text: String::with_capacity(64),
            sink,
        }
    }

    pub fn resolver(&self) -> &'r AliasResolver {
        self.resolver
    }

    pub fn mode(&self) -> BindingMode {
        self.sink.mode()
    }

    pub fn sink(&self) -> &ParameterSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut ParameterSink {
        &mut self.sink
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append `field`, alias-qualified
    pub fn push_field(&mut self, field: &str) {
        let qualified = self.resolver.qualify(field);
        self.text.push_str(&qualified);
    }

    /// Append ` <keyword> f1, f2, ...` with every field alias-qualified
    pub fn push_field_list(&mut self, keyword: &str, fields: &FieldList) {
        let clause = field_list(keyword, fields, self.resolver);
        self.text.push_str(&clause);
    }

    /// Take the text written so far, leaving the sink in place
    pub fn take_text(&mut self) -> String {
        mem::take(&mut self.text)
    }

    pub fn finish(self) -> (String, ParameterSink) {
        (self.text, self.sink)
    }
}

/// A node that compiles into query text and bindings
pub trait Build {
    fn build(&self, writer: &mut QueryWriter<'_>) -> Result<()>;
}

/// ` <keyword> f1, f2, ...` with every field alias-qualified
pub fn field_list(keyword: &str, fields: &FieldList, resolver: &AliasResolver) -> String {
    let fields: Vec<_> = fields.iter().map(|f| resolver.qualify(f.as_str())).collect();
    format!(" {keyword} {}", fields.join(", "))
}
