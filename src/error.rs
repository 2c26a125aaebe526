// src/error.rs

//! Error types for message construction and schema validation

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or validating a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A payload failed its schema contract
    #[error("Schema violation at '{path}': {reason}")]
    SchemaViolation { path: String, reason: String },

    /// A build identifier that does not decompose into name, version
    /// and release components
    #[error("Malformed build identifier '{0}': expected name-version-release")]
    MalformedNvr(String),
}
