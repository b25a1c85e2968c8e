//! session-core - Core types and parsing for session transcripts
//!
//! This crate provides the data model for session transcripts (the markdown
//! logs written by the session logger) and the parser that turns one
//! transcript into typed, searchable content entries.

pub mod error;
pub mod parser;
pub mod types;

pub use error::*;
pub use parser::*;
pub use types::*;
