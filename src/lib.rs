//! Tempora: an effective-dated versioned record store
//!
//! A logical record's full version history lives as append-only rows; this
//! crate resolves which version is current at any instant, enforces an
//! insert-only mutation protocol so history is never overwritten, and
//! reconstructs per-key timelines with changed-cell diffs.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use temporadb::{
//!     apply_edit, create, resolve, timeline, ActingContext, Filter, MemoryStore,
//!     TableSchema, Timestamp, Value, VersionStore,
//! };
//!
//! # fn main() -> temporadb::Result<()> {
//! let store = MemoryStore::new();
//! store.register(TableSchema::new(
//!     "employee",
//!     "key",
//!     &["id", "key", "effdt", "effstatus", "salary"],
//! )?)?;
//!
//! let t0 = ActingContext::at(Timestamp::from_secs(100));
//! let fields = BTreeMap::from([("salary".to_string(), Value::Int(1000))]);
//! let first = create(&store, "employee", &t0, "emp-1", fields, None)?;
//!
//! let t1 = ActingContext::at(Timestamp::from_secs(200));
//! let changes = BTreeMap::from([("salary".to_string(), Value::Int(1200))]);
//! apply_edit(&store, "employee", &t1, first.id, changes, None)?;
//!
//! // As of an instant between the two versions, the first is effective.
//! let rows = resolve(&store, "employee", Timestamp::from_secs(150), &Filter::All, false)?;
//! assert_eq!(rows[0].field("salary"), Some(&Value::Int(1000)));
//!
//! // The archive sees both versions, newest first.
//! let tl = timeline(&store, "employee", "emp-1", None, None)?;
//! assert_eq!(tl.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub use tempora_core::{
    Error, NewRow, Result, RowId, TableSchema, Timestamp, Value, VersionRow, REQUIRED_COLUMNS,
};
pub use tempora_engine::{
    apply_delete, apply_edit, create, grid_rows, resolve, resolve_one, timeline, timeline_for_row,
    ActingContext, GridRows, PriorityMode, Timeline, TimelineEntry, Validation, ValidationHook,
    ViewMode, KEY_BLANK, KEY_IN_USE,
};
pub use tempora_storage::{Filter, MemoryStore, VersionStore};
