//! Compiler error codes following a structured numbering system
//!
//! Error code ranges:
//! - JPQ0001-JPQ0099: Tree errors (criteria construction)
//! - JPQ0100-JPQ0199: Binding errors (parameter sinks)
//! - JPQ0200-JPQ0299: Placeholder errors (fragment text)
//! - JPQ0300-JPQ0399: Result errors (row unmarshalling)
//! - JPQ0400-JPQ0499: Configuration errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a tree construction error (0001-0099)
    pub const fn is_tree_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a binding error (0100-0199)
    pub const fn is_binding_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a placeholder error (0200-0299)
    pub const fn is_placeholder_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a configuration error (0400-0499)
    pub const fn is_config_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JPQ{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Tree errors (0001-0099)
    map.insert(1, ErrorInfo::new("Empty field reference"));
    map.insert(2, ErrorInfo::new("Empty conjunction")
        .with_help("Every criteria after the first needs a conjunction such as AND or OR"));
    map.insert(3, ErrorInfo::new("Missing child criteria"));
    map.insert(4, ErrorInfo::new("Empty field list"));

    // Binding errors (0100-0199)
    map.insert(100, ErrorInfo::new("Parameter conflict")
        .with_help("Give one of the comparisons an explicit parameter name"));
    map.insert(101, ErrorInfo::new("Argument not valid for binding mode"));
    map.insert(102, ErrorInfo::new("Unnamed value in named mode")
        .with_help("Pass the values as a single mapping"));

    // Placeholder errors (0200-0299)
    map.insert(200, ErrorInfo::new("Placeholder count mismatch"));
    map.insert(201, ErrorInfo::new("Placeholder number out of sequence"));

    // Result errors (0300-0399)
    map.insert(300, ErrorInfo::new("Result row arity mismatch"));

    // Configuration errors (0400-0499)
    map.insert(400, ErrorInfo::new("Invalid alias")
        .with_help("An alias is a non-empty identifier such as 'e'"));
    map.insert(401, ErrorInfo::new("Invalid alias pattern"));
    map.insert(402, ErrorInfo::new("Missing entity name"));

    map
});

// Tree errors
pub const JPQ0001: ErrorCode = ErrorCode::new(1);
pub const JPQ0002: ErrorCode = ErrorCode::new(2);
pub const JPQ0003: ErrorCode = ErrorCode::new(3);
pub const JPQ0004: ErrorCode = ErrorCode::new(4);

// Binding errors
pub const JPQ0100: ErrorCode = ErrorCode::new(100);
pub const JPQ0101: ErrorCode = ErrorCode::new(101);
pub const JPQ0102: ErrorCode = ErrorCode::new(102);

// Placeholder errors
pub const JPQ0200: ErrorCode = ErrorCode::new(200);
pub const JPQ0201: ErrorCode = ErrorCode::new(201);

// Result errors
pub const JPQ0300: ErrorCode = ErrorCode::new(300);

// Configuration errors
pub const JPQ0400: ErrorCode = ErrorCode::new(400);
pub const JPQ0401: ErrorCode = ErrorCode::new(401);
pub const JPQ0402: ErrorCode = ErrorCode::new(402);
