//! Error types for the Tx3 syntax core
//!
//! Parsing itself never fails: syntax problems are returned as
//! [`Diagnostic`](crate::Diagnostic) data next to the tree. `Error` covers
//! the API operations around it that can.

use thiserror::Error;

use crate::parser::token::Span;

/// Tx3 core error types
#[derive(Debug, Error)]
pub enum Error {
    /// The source has syntax errors; carries the first one
    #[error("{count} syntax error(s), first at {span}: {message}")]
    Syntax {
        count: usize,
        span: Span,
        message: String,
    },

    /// JSON encoding of a parse result failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A token or node kind name that does not exist
    #[error("Unknown kind '{0}'")]
    UnknownKind(String),
}

/// Result type alias for Tx3 operations
pub type Result<T> = std::result::Result<T, Error>;
