//! Versioned rows
//!
//! `VersionRow` is one immutable version of a logical entity. A logical
//! entity is the set of rows sharing a `key`; its history is the set ordered
//! by `effdt`. Rows are created once by an insert and never touched again:
//! every logical edit or delete materializes as a NEW row, so the history of
//! a key can always be replayed byte-for-byte.
//!
//! `NewRow` is the insert payload: everything a `VersionRow` has except the
//! surrogate `id`, which the store mints at insert time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::Timestamp;
use crate::types::RowId;
use crate::value::Value;

/// One immutable version of a logical entity
///
/// System columns are typed; arbitrary business fields live in `fields`.
/// Whether the optional columns (`prio`, `sync_gid`, audit stamps) are
/// populated is decided by the table's schema, not by this struct.
///
/// ## Invariants
///
/// - Never updated or deleted after insert; superseded by later rows only.
/// - `id` has no temporal meaning; `effdt` (and `prio`) alone determine
///   which version of a key is current.
/// - `effstatus = false` marks a tombstone: excluded from the live view,
///   retained in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRow {
    /// Surrogate identity, minted by the store, never reused
    pub id: RowId,
    /// Logical identity; many rows share a key (its version history)
    pub key: String,
    /// Instant from which this version is considered current
    pub effdt: Timestamp,
    /// true = active version, false = tombstone (logical deletion)
    pub effstatus: bool,
    /// Priority tier; higher wins among eligible rows of the same key
    pub prio: Option<i64>,
    /// Replication marker, regenerated on every new version
    pub sync_gid: Option<Uuid>,
    /// Acting user of the mutation that produced this version
    pub last_saved_by: Option<String>,
    /// Instant of the mutation that produced this version
    pub last_saved_when: Option<Timestamp>,
    /// Arbitrary business fields
    pub fields: BTreeMap<String, Value>,
}

impl VersionRow {
    /// Look up a business field by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Resolve a column (system or business) to a `Value` for display/diff
    ///
    /// System columns are projected into the value model so the archive diff
    /// and filters can address them uniformly by name. Unknown columns
    /// resolve to `Null`, matching how a grid renders an absent cell.
    pub fn display_value(&self, column: &str) -> Value {
        match column {
            "id" => Value::Int(self.id.as_u64() as i64),
            "key" => Value::String(self.key.clone()),
            "effdt" => Value::Int(self.effdt.as_micros() as i64),
            "effstatus" => Value::Bool(self.effstatus),
            "prio" => self.prio.map(Value::Int).unwrap_or(Value::Null),
            "sync_gid" => self
                .sync_gid
                .map(|g| Value::String(g.to_string()))
                .unwrap_or(Value::Null),
            "last_saved_by" => self
                .last_saved_by
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
            "last_saved_when" => self
                .last_saved_when
                .map(|t| Value::Int(t.as_micros() as i64))
                .unwrap_or(Value::Null),
            other => self.fields.get(other).cloned().unwrap_or(Value::Null),
        }
    }

    /// Copy this row into an insert payload, dropping the identity
    ///
    /// This is the tombstone/edit primitive: take the current version, drop
    /// `id` so a fresh one is minted, and let the mutator overlay changes.
    pub fn to_new(&self) -> NewRow {
        NewRow {
            key: self.key.clone(),
            effdt: self.effdt,
            effstatus: self.effstatus,
            prio: self.prio,
            sync_gid: self.sync_gid,
            last_saved_by: self.last_saved_by.clone(),
            last_saved_when: self.last_saved_when,
            fields: self.fields.clone(),
        }
    }
}

/// Insert payload: a `VersionRow` minus its identity
///
/// Built by the Version Mutator; the store assigns `id` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRow {
    /// Logical key of the entity this version belongs to
    pub key: String,
    /// Effective instant of the new version
    pub effdt: Timestamp,
    /// Active (true) or tombstone (false)
    pub effstatus: bool,
    /// Priority tier, if the table uses priority mode
    pub prio: Option<i64>,
    /// Replication marker
    pub sync_gid: Option<Uuid>,
    /// Audit: acting user
    pub last_saved_by: Option<String>,
    /// Audit: mutation instant
    pub last_saved_when: Option<Timestamp>,
    /// Business fields
    pub fields: BTreeMap<String, Value>,
}

impl NewRow {
    /// Start an active version of `key` effective at `effdt`
    pub fn new(key: impl Into<String>, effdt: Timestamp) -> Self {
        NewRow {
            key: key.into(),
            effdt,
            effstatus: true,
            prio: None,
            sync_gid: None,
            last_saved_by: None,
            last_saved_when: None,
            fields: BTreeMap::new(),
        }
    }

    /// Set a business field, consuming and returning self for chaining
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set the priority tier
    pub fn with_prio(mut self, prio: i64) -> Self {
        self.prio = Some(prio);
        self
    }

    /// Attach the minted identity, producing the stored row
    pub fn into_row(self, id: RowId) -> VersionRow {
        VersionRow {
            id,
            key: self.key,
            effdt: self.effdt,
            effstatus: self.effstatus,
            prio: self.prio,
            sync_gid: self.sync_gid,
            last_saved_by: self.last_saved_by,
            last_saved_when: self.last_saved_when,
            fields: self.fields,
        }
    }
}
