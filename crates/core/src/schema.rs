//! Table schemas for versioned tables
//!
//! A `TableSchema` declares what columns a versioned table has and which of
//! them is the logical key. Construction is where the configuration contract
//! is enforced: a versioned table without `id`, `effdt`, `effstatus` or its
//! key field cannot express the versioning protocol at all, so registration
//! fails with `Error::MissingColumn` before any query runs.
//!
//! Optional columns change mutator behavior when present:
//! - `prio`: the table participates in priority-tier resolution
//! - `sync_gid`: regenerated on every new version for replication consumers
//! - `last_saved_by` / `last_saved_when`: audit stamps applied on every write

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Columns every versioned table must declare (besides its key field)
pub const REQUIRED_COLUMNS: [&str; 3] = ["id", "effdt", "effstatus"];

/// System columns the store manages; never business fields
const SYSTEM_COLUMNS: [&str; 7] = [
    "id",
    "effdt",
    "effstatus",
    "prio",
    "sync_gid",
    "last_saved_by",
    "last_saved_when",
];

/// Declaration of a versioned table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    key_field: String,
    columns: Vec<String>,
    business: Vec<String>,
    has_prio: bool,
    has_sync_gid: bool,
    has_last_saved_by: bool,
    has_last_saved_when: bool,
}

impl TableSchema {
    /// Declare a table from its column list
    ///
    /// Fails with `Error::MissingColumn` when `id`, `effdt`, `effstatus` or
    /// `key_field` is absent. The key field must be a regular column, not one
    /// of the system columns.
    ///
    /// Columns that are neither system columns nor the key field are the
    /// table's business fields, kept in declaration order.
    pub fn new(
        name: impl Into<String>,
        key_field: impl Into<String>,
        columns: &[&str],
    ) -> Result<Self> {
        let name = name.into();
        let key_field = key_field.into();

        if SYSTEM_COLUMNS.contains(&key_field.as_str()) {
            return Err(Error::Storage(format!(
                "key field '{}' of table '{}' collides with a system column",
                key_field, name
            )));
        }

        for required in REQUIRED_COLUMNS.iter().chain(std::iter::once(&key_field.as_str())) {
            if !columns.contains(required) {
                return Err(Error::MissingColumn {
                    table: name,
                    column: required.to_string(),
                });
            }
        }

        let business = columns
            .iter()
            .filter(|c| !SYSTEM_COLUMNS.contains(*c) && **c != key_field)
            .map(|c| c.to_string())
            .collect();

        Ok(TableSchema {
            name,
            key_field,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            business,
            has_prio: columns.contains(&"prio"),
            has_sync_gid: columns.contains(&"sync_gid"),
            has_last_saved_by: columns.contains(&"last_saved_by"),
            has_last_saved_when: columns.contains(&"last_saved_when"),
        })
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the logical-key column
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// All declared columns, in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Business fields (declared columns minus system columns and key field)
    pub fn business_fields(&self) -> &[String] {
        &self.business
    }

    /// Whether the table declares a `prio` column
    pub fn has_prio(&self) -> bool {
        self.has_prio
    }

    /// Whether the table declares a `sync_gid` column
    pub fn has_sync_gid(&self) -> bool {
        self.has_sync_gid
    }

    /// Whether the table declares a `last_saved_by` column
    pub fn has_last_saved_by(&self) -> bool {
        self.has_last_saved_by
    }

    /// Whether the table declares a `last_saved_when` column
    pub fn has_last_saved_when(&self) -> bool {
        self.has_last_saved_when
    }

    /// Check that every name is a declared business field
    ///
    /// Used by the store on insert: an undeclared business field is a caller
    /// bug surfaced as `Error::UnknownColumn`.
    pub fn check_business_fields<'a, I>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if !self.business.iter().any(|b| b == name) {
                return Err(Error::UnknownColumn {
                    table: self.name.clone(),
                    column: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Default displayed fields for an archive comparison
    ///
    /// When a caller does not say which fields to compare, compare all
    /// business fields with `effdt` and `effstatus` prepended.
    pub fn default_display_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.business.len() + 2);
        fields.push("effdt".to_string());
        fields.push("effstatus".to_string());
        fields.extend(self.business.iter().cloned());
        fields
    }
}
