//! Error types for `confvar`.
//!
//! Fatal failures surface as `Err` values from the registry and ingestion
//! APIs. Recoverable per-item problems never appear here; they are reported
//! through the issue sink and collected into a [`crate::report::ParseReport`].

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `confvar` operations.
///
/// Aggregates the domain-specific errors so hosts that do not care which
/// stage failed can hold a single error type.
#[derive(Debug, Error)]
pub enum ConfVarError {
    /// Registry operation error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Fatal ingestion error
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors raised by [`crate::registry::VariableRegistry`] operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A get/set/validate named a variable that was never defined.
    #[error("no such variable: '{name}'")]
    NoSuchVariable {
        /// The canonical (folded, de-aliased) name that was looked up
        name: String,
    },

    /// A definition option could not be accepted.
    ///
    /// Raised when a pattern validator does not compile as a regular
    /// expression; the definition is rejected as a whole.
    #[error("invalid option for '{name}': {reason}")]
    InvalidOption {
        /// The variable being defined
        name: String,
        /// Why the option was rejected
        reason: String,
    },
}

// ============================================================================
// Ingestion Errors
// ============================================================================

/// Fatal ingestion errors.
///
/// These are the only failures that abort a `parse` call. Everything else
/// is reported per item and processing continues.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The configuration file stream could not be opened.
    #[error("cannot open {path}: {source}")]
    FileOpen {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration stream could not be read to completion.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `confvar` operations.
pub type Result<T> = std::result::Result<T, ConfVarError>;

// ============================================================================
// Tests
// ============================================================================
