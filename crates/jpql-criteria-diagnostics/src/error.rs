//! Compiler error types

use crate::{ErrorCode, JPQ0100, JPQ0200, JPQ0201, JPQ0300, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A compile error prepared for display, with optional help text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Span inside the offending fragment, when known
    pub span: Option<Span>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic, carrying the code's default help text
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
            help: code.info().help.map(str::to_string),
        }
    }

    /// Set the span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Replace the help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic for a terminal, with colors
    #[cfg(feature = "colored")]
    pub fn render(&self) -> String {
        use colored::Colorize;

        let mut out = format!("{}[{}]: {}", "error".red().bold(), self.code, self.message);
        if let Some(span) = &self.span {
            out.push_str(&format!(" {}", format!("at {span}").cyan()));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}

/// Main compiler error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Criteria tree violates a construction invariant
    #[error("{code}: {message}")]
    MalformedTree { code: ErrorCode, message: String },

    /// Named parameter bound twice to different non-null values
    #[error("{code}: parameter \"{name}\" is bound to {existing}, cannot rebind to {incoming}")]
    Conflict {
        code: ErrorCode,
        name: String,
        existing: String,
        incoming: String,
    },

    /// Fragment placeholders disagree with the supplied parameters
    #[error("{code}: {message} in `{fragment}` (expected {expected}, found {found})")]
    PlaceholderMismatch {
        code: ErrorCode,
        message: String,
        fragment: String,
        expected: usize,
        found: usize,
        span: Option<Span>,
    },

    /// Argument shape not usable in the active binding mode
    #[error("{code}: {message}")]
    InvalidArgument { code: ErrorCode, message: String },

    /// Result row does not fit the selector
    #[error("{code}: result row has {found} columns, selector expects {expected}")]
    ResultShape {
        code: ErrorCode,
        expected: usize,
        found: usize,
    },

    /// Invalid compiler configuration
    #[error("{code}: {message}")]
    Config { code: ErrorCode, message: String },
}

impl CompileError {
    /// Create a malformed tree error
    pub fn malformed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::MalformedTree {
            code,
            message: message.into(),
        }
    }

    /// Create a parameter conflict error
    pub fn conflict(
        name: impl Into<String>,
        existing: impl fmt::Display,
        incoming: impl fmt::Display,
    ) -> Self {
        Self::Conflict {
            code: JPQ0100,
            name: name.into(),
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        }
    }

    /// Create a placeholder count mismatch error
    pub fn placeholder_mismatch(fragment: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::PlaceholderMismatch {
            code: JPQ0200,
            message: "placeholder count does not match parameter count".to_string(),
            fragment: fragment.into(),
            expected,
            found,
            span: None,
        }
    }

    /// Create an error for a numbered placeholder that skips ahead of the sink
    pub fn placeholder_out_of_sequence(
        fragment: impl Into<String>,
        expected: usize,
        found: usize,
        span: Span,
    ) -> Self {
        Self::PlaceholderMismatch {
            code: JPQ0201,
            message: "placeholder number out of sequence".to_string(),
            fragment: fragment.into(),
            expected,
            found,
            span: Some(span),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code,
            message: message.into(),
        }
    }

    /// Create a result shape error
    pub fn result_shape(expected: usize, found: usize) -> Self {
        Self::ResultShape {
            code: JPQ0300,
            expected,
            found,
        }
    }

    /// Create a configuration error
    pub fn config(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedTree { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::PlaceholderMismatch { code, .. } => *code,
            Self::InvalidArgument { code, .. } => *code,
            Self::ResultShape { code, .. } => *code,
            Self::Config { code, .. } => *code,
        }
    }

    /// Get the fragment span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::PlaceholderMismatch { span, .. } => *span,
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::MalformedTree { code, message }
            | Self::InvalidArgument { code, message }
            | Self::Config { code, message } => Diagnostic::error(*code, message.clone()),
            Self::Conflict {
                code,
                name,
                existing,
                incoming,
            } => Diagnostic::error(
                *code,
                format!("parameter \"{name}\" bound to {existing} and {incoming}"),
            )
            .with_help(format!(
                "give one comparison its own name, e.g. .named(\"{name}_2\")"
            )),
            Self::PlaceholderMismatch {
                code,
                message,
                fragment,
                expected,
                span: Some(span),
                ..
            } => Diagnostic::error(
                *code,
                format!("{message}: `{}` in `{fragment}`", span.slice(fragment)),
            )
            .with_span(*span)
            .with_help(sequence_help(*expected)),
            Self::PlaceholderMismatch {
                code,
                message,
                fragment,
                expected,
                found,
                span: None,
            } => Diagnostic::error(
                *code,
                format!("{message} in `{fragment}` (expected {expected}, found {found})"),
            ),
            Self::ResultShape {
                code,
                expected,
                found,
            } => Diagnostic::error(
                *code,
                format!("result row has {found} columns, selector expects {expected}"),
            ),
        }
    }
}

fn sequence_help(expected: usize) -> String {
    match expected {
        0 | 1 => "use `?` or `?1` for the first parameter".to_string(),
        n => format!(
            "use `?` or `?{n}` for the next parameter, or `?1`..`?{}` to reuse a bound one",
            n - 1
        ),
    }
}
