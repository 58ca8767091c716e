//! Criteria compiler diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the AST and
//! compiler crates: structured error codes, the [`CompileError`] type, byte
//! spans into fragment text, and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for criteria operations
pub type Result<T> = std::result::Result<T, CompileError>;
