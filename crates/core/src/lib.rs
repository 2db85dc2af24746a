//! Core types for the Tempora effective-dated record store
//!
//! This crate defines the foundational types used throughout the system:
//! - Timestamp: microsecond-precision effective dates and as-of instants
//! - RowId: surrogate row identity, minted by the store, never reused
//! - Value: unified value enum for business fields
//! - VersionRow / NewRow: one immutable version of a logical entity
//! - TableSchema: table declaration with required-column enforcement
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod row;
pub mod schema;
pub mod timestamp;
pub mod types;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::{Error, Result};
pub use row::{NewRow, VersionRow};
pub use schema::{TableSchema, REQUIRED_COLUMNS};
pub use timestamp::Timestamp;
pub use types::RowId;
pub use value::Value;
