//! Error types for the Tempora record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! The taxonomy separates three failure classes with different handling:
//! - Configuration errors (`MissingColumn`) are fatal and surface before any
//!   query runs.
//! - Validation errors block a single write and carry the offending field so
//!   a form layer can attach the message to it.
//! - Storage errors propagate to the caller unmodified; no layer retries.

use thiserror::Error;

use crate::types::RowId;

/// Result type alias for Tempora operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Tempora record store
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is absent from a table schema.
    ///
    /// Every versioned table must declare `id`, `effdt`, `effstatus` and its
    /// key field. Raised at registration time, before any query runs.
    #[error("required column '{column}' not found in table '{table}'")]
    MissingColumn {
        /// Table being registered
        table: String,
        /// The missing column name
        column: String,
    },

    /// A business-rule validation failed; no row was written.
    ///
    /// The `field` names the form field the message belongs to.
    #[error("validation failed on '{field}': {message}")]
    Validation {
        /// Field the failure is attached to
        field: String,
        /// Human-readable failure message
        message: String,
    },

    /// A table name was used before its schema was registered
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    /// An insert carried a business field the schema does not declare
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table the insert targeted
        table: String,
        /// The undeclared column name
        column: String,
    },

    /// A row id was referenced that does not exist
    #[error("row {0:?} not found")]
    RowNotFound(RowId),

    /// An insert would duplicate an existing `(key, effdt[, prio])` triple
    ///
    /// The store rejects exact temporal duplicates at write time; accepting
    /// them would make as-of resolution ambiguous for that instant.
    #[error("duplicate version for key '{key}' at {effdt_micros}us")]
    DuplicateVersion {
        /// Logical key of the conflicting row
        key: String,
        /// Effective instant, microseconds since epoch
        effdt_micros: u64,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Any other failure from the storage backend
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Shorthand for a validation failure attached to a field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True when this error is a validation failure (write blocked, recoverable)
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}
