//! Command-line front end of `jpqlc`
//!
//! Requests are JSON documents holding a compiler configuration, the
//! statement kind, a criteria tree and trailing arguments.

pub mod check;
pub mod compile;
pub mod output;
pub mod request;
