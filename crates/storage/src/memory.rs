//! MemoryStore: in-memory VersionStore backend
//!
//! This module implements the VersionStore trait using:
//! - `BTreeMap<RowId, VersionRow>` per table for ordered row storage
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` for monotonically increasing row ids
//!
//! # Design Notes
//!
//! - **Append-only by construction**: nothing in this module ever removes or
//!   replaces an entry in a table's row map.
//! - **Insert atomicity**: field validation, the duplicate-version check and
//!   the append all run under one write lock, so two racing inserts of the
//!   same `(key, effdt[, prio])` cannot both succeed.
//! - **Global id counter**: ids are unique across tables; simpler than
//!   per-table counters and uniqueness is all that is required.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use tempora_core::{Error, NewRow, Result, RowId, TableSchema, VersionRow};

use crate::store::VersionStore;

/// One registered table: its schema plus its rows
#[derive(Debug)]
struct TableState {
    schema: TableSchema,
    rows: BTreeMap<RowId, VersionRow>,
}

/// In-memory append-only version store
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`. Suitable as
/// the in-tree engine for tests and embedding; a relational backend can
/// implement [`VersionStore`] against real tables with the same contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, TableState>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next row id atomically
    ///
    /// fetch_add with SeqCst so ids are unique and monotonically increasing
    /// (1, 2, 3, ...) across all threads.
    fn mint_id(&self) -> RowId {
        RowId::from_u64(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl VersionStore for MemoryStore {
    fn register(&self, schema: TableSchema) -> Result<()> {
        let mut tables = self.tables.write();
        match tables.get(schema.name()) {
            Some(existing) if existing.schema == schema => Ok(()),
            Some(_) => Err(Error::Storage(format!(
                "table '{}' already registered with a different schema",
                schema.name()
            ))),
            None => {
                debug!(table = schema.name(), "registering table");
                tables.insert(
                    schema.name().to_string(),
                    TableState {
                        schema,
                        rows: BTreeMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    fn schema(&self, table: &str) -> Result<TableSchema> {
        let tables = self.tables.read();
        tables
            .get(table)
            .map(|t| t.schema.clone())
            .ok_or_else(|| Error::UnknownTable(table.to_string()))
    }

    fn insert(&self, table: &str, row: NewRow) -> Result<RowId> {
        let mut tables = self.tables.write();
        let state = tables
            .get_mut(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

        state
            .schema
            .check_business_fields(row.fields.keys().map(String::as_str))?;

        // Write-time backstop: an exact (key, effdt[, prio]) duplicate would
        // make as-of resolution ambiguous for that instant.
        let duplicate = state.rows.values().any(|existing| {
            existing.key == row.key
                && existing.effdt == row.effdt
                && (!state.schema.has_prio() || existing.prio == row.prio)
        });
        if duplicate {
            return Err(Error::DuplicateVersion {
                key: row.key,
                effdt_micros: row.effdt.as_micros(),
            });
        }

        let id = self.mint_id();
        debug!(table, %id, key = %row.key, effdt = %row.effdt, "insert version");
        state.rows.insert(id, row.into_row(id));
        Ok(id)
    }

    fn get(&self, table: &str, id: RowId) -> Result<Option<VersionRow>> {
        let tables = self.tables.read();
        let state = tables
            .get(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(state.rows.get(&id).cloned())
    }

    fn scan(&self, table: &str) -> Result<Vec<VersionRow>> {
        let tables = self.tables.read();
        let state = tables
            .get(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(state.rows.values().cloned().collect())
    }

    fn scan_key(&self, table: &str, key: &str) -> Result<Vec<VersionRow>> {
        let tables = self.tables.read();
        let state = tables
            .get(table)
            .ok_or_else(|| Error::UnknownTable(table.to_string()))?;
        Ok(state
            .rows
            .values()
            .filter(|r| r.key == key)
            .cloned()
            .collect())
    }
}
