//! Append-only version store backends for Tempora
//!
//! This crate defines the storage seam of the system:
//! - `VersionStore`: the append-only table trait (insert and read only;
//!   there is no update or delete verb)
//! - `MemoryStore`: the in-memory backend built on `parking_lot::RwLock`
//! - `Filter`: the predicate AST callers use as a base filter

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod filter;
pub mod memory;
pub mod store;

pub use filter::Filter;
pub use memory::MemoryStore;
pub use store::VersionStore;
