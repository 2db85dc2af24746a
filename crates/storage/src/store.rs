//! The VersionStore trait: the append-only table seam
//!
//! This is the storage collaborator boundary. The trait surface is the
//! versioning protocol's strongest guarantee: there is no update and no
//! delete verb at all, so "history is never overwritten" holds for every
//! conforming backend by construction, not by discipline.
//!
//! Reads come in three shapes: point lookup by id (the mutator's
//! read-current step), full scan (resolution and bare listings), and per-key
//! scan (the archive feed and the create-time uniqueness probe).

use tempora_core::{NewRow, Result, RowId, TableSchema, VersionRow};

/// An append-only store of versioned rows, organized into registered tables
///
/// Implementations must observe, per table:
/// - inserts append; existing rows are never modified or removed
/// - ids are unique and never reused
/// - the uniqueness probe and a subsequent insert in [`insert`] are atomic
///   with respect to other inserts (one logical transaction boundary)
///
/// [`insert`]: VersionStore::insert
pub trait VersionStore: Send + Sync {
    /// Register a table schema
    ///
    /// Idempotent when the identical schema is re-registered; registering a
    /// different schema under an existing name is a storage error.
    fn register(&self, schema: TableSchema) -> Result<()>;

    /// Fetch the schema of a registered table
    fn schema(&self, table: &str) -> Result<TableSchema>;

    /// Append a new version row, minting and returning its identity
    ///
    /// Validates business fields against the schema and rejects an exact
    /// `(key, effdt[, prio])` duplicate — the write-time backstop that keeps
    /// as-of resolution unambiguous.
    fn insert(&self, table: &str, row: NewRow) -> Result<RowId>;

    /// Point lookup by surrogate id
    fn get(&self, table: &str, id: RowId) -> Result<Option<VersionRow>>;

    /// All rows of the table — every version of every key
    fn scan(&self, table: &str) -> Result<Vec<VersionRow>>;

    /// All versions of one logical key, active and tombstoned
    fn scan_key(&self, table: &str, key: &str) -> Result<Vec<VersionRow>>;

    /// Number of rows sharing `key`, in any state
    ///
    /// The create-time uniqueness rule counts tombstones too: a deleted key
    /// still owns its history and cannot be re-created.
    fn count_key(&self, table: &str, key: &str) -> Result<usize> {
        Ok(self.scan_key(table, key)?.len())
    }
}
