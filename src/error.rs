//! Error types for oaslint operations.
//!
//! This module defines [`OaslintError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution and fetch failures are recorded as node-attached diagnostics
//!   during indexing and never abort a lint run
//! - Malformed fix input ([`OaslintError::FixInput`]) is a hard error, since it
//!   signals integration misuse rather than document content issues
//! - Use `anyhow::Error` (via `OaslintError::Other`) for unexpected errors at
//!   the CLI boundary

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for oaslint operations.
#[derive(Debug, Error)]
pub enum OaslintError {
    /// Failed to parse a document into a positional tree.
    #[error("Failed to parse document at {location}: {message}")]
    Parse { location: String, message: String },

    /// A reference string could not be understood or its pointer has no target.
    #[error("Malformed reference '{reference}': {message}")]
    MalformedReference { reference: String, message: String },

    /// A reference chain loops back on itself.
    #[error("Reference cycle detected: {chain}")]
    CycleDetected { chain: String },

    /// Fetching an external document failed (network or filesystem).
    #[error("Failed to fetch {location}: {message}")]
    Fetch { location: String, message: String },

    /// Wrong number of responses supplied to an interactive fix.
    #[error("Fix '{fix}' expected {expected} response(s), got {actual}")]
    FixInput {
        fix: String,
        expected: usize,
        actual: usize,
    },

    /// A fix was handed a document model it cannot operate on.
    #[error("Fix cannot apply to this document model: {message}")]
    FixApply { message: String },

    /// Configuration file could not be loaded.
    #[error("Failed to load config at {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for oaslint operations.
pub type Result<T> = std::result::Result<T, OaslintError>;
