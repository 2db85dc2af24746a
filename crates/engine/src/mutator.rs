//! Version Mutator: create/edit/delete as protocol-preserving inserts
//!
//! Every mutation here is an insert. An edit reads the current row, overlays
//! the caller's changes, drops the identity so a fresh one is minted, and
//! appends. A delete appends a tombstone (`effstatus = false`) with all
//! other fields copied from the current row. The prior row is never touched,
//! which is what makes the archive trustworthy: history can always be
//! replayed exactly as it was written.
//!
//! The only business rule enforced in this layer is key uniqueness on
//! create. Everything else — schema violations, the duplicate-version
//! backstop — propagates from the store uncaught. Caller-level validation
//! hooks run on the candidate row BEFORE the insert; any recorded failure
//! aborts with nothing written.

use std::collections::BTreeMap;

use tracing::debug;
use uuid::Uuid;

use tempora_core::{Error, NewRow, Result, RowId, TableSchema, Value, VersionRow};
use tempora_storage::VersionStore;

use crate::context::{ActingContext, Validation, ValidationHook};

/// Message attached to the key field when a create collides
pub const KEY_IN_USE: &str = "Key is already in use.";

/// Message attached to the key field when a create passes a blank key
pub const KEY_BLANK: &str = "Key must not be blank.";

/// Create the first version of a new logical key
///
/// Fails with a validation error attached to the table's key field when the
/// key is blank or already present anywhere in the table — tombstoned keys
/// included, since a deleted key still owns its history. The uniqueness
/// probe and the insert are atomic at the store level; the storage backstop
/// catches the race two concurrent creates would otherwise win together.
pub fn create(
    store: &dyn VersionStore,
    table: &str,
    ctx: &ActingContext,
    key: &str,
    fields: BTreeMap<String, Value>,
    validate: Option<ValidationHook<'_>>,
) -> Result<VersionRow> {
    let schema = store.schema(table)?;
    let key = key.trim();

    if key.is_empty() {
        return Err(Error::validation(schema.key_field(), KEY_BLANK));
    }
    if store.count_key(table, key)? > 0 {
        return Err(Error::validation(schema.key_field(), KEY_IN_USE));
    }

    let mut row = NewRow::new(key, ctx.now);
    row.fields = fields;
    stamp(&schema, ctx, &mut row)?;

    run_hook(validate, &row)?;

    let id = store.insert(table, row.clone())?;
    debug!(table, key, %id, "created key");
    Ok(row.into_row(id))
}

/// Insert a new version of an existing row with changes overlaid
///
/// Reads the full current row by id, overlays `changes` onto its business
/// fields, discards the original identity, and appends with `effdt` set to
/// the acting instant. When the context acts under a priority tier, the new
/// version is stamped with THAT tier even if the original row carried a
/// different one. The original row is not modified.
pub fn apply_edit(
    store: &dyn VersionStore,
    table: &str,
    ctx: &ActingContext,
    existing_id: RowId,
    changes: BTreeMap<String, Value>,
    validate: Option<ValidationHook<'_>>,
) -> Result<VersionRow> {
    let schema = store.schema(table)?;
    let current = store
        .get(table, existing_id)?
        .ok_or(Error::RowNotFound(existing_id))?;

    let mut row = current.to_new();
    row.fields.extend(changes);
    row.effdt = ctx.now;
    row.effstatus = true;
    stamp(&schema, ctx, &mut row)?;

    run_hook(validate, &row)?;

    let id = store.insert(table, row.clone())?;
    debug!(table, key = %row.key, from = %existing_id, %id, "edit inserted new version");
    Ok(row.into_row(id))
}

/// Insert a tombstone version for an existing row
///
/// Copies the current row unchanged, forces `effstatus = false` and `effdt`
/// to the acting instant. Storage-wise this is indistinguishable from any
/// other version insert; the resolver's `effstatus = true` filter is what
/// makes the key disappear from the live view while the tombstone stays
/// visible in the archive. No validation hook runs on delete.
pub fn apply_delete(
    store: &dyn VersionStore,
    table: &str,
    ctx: &ActingContext,
    existing_id: RowId,
) -> Result<VersionRow> {
    let schema = store.schema(table)?;
    let current = store
        .get(table, existing_id)?
        .ok_or(Error::RowNotFound(existing_id))?;

    let mut row = current.to_new();
    row.effdt = ctx.now;
    row.effstatus = false;
    stamp(&schema, ctx, &mut row)?;

    let id = store.insert(table, row.clone())?;
    debug!(table, key = %row.key, from = %existing_id, %id, "delete inserted tombstone");
    Ok(row.into_row(id))
}

/// Apply schema-dependent stamps to a candidate version
///
/// - `prio`: overwritten with the acting tier when priority mode is on
///   (requires the table to declare the column)
/// - `sync_gid`: regenerated on EVERY new version so replication consumers
///   see a change whenever anything changed — tombstones included
/// - `last_saved_by` / `last_saved_when`: audit stamps
fn stamp(schema: &TableSchema, ctx: &ActingContext, row: &mut NewRow) -> Result<()> {
    if let Some(tier) = ctx.priority.tier() {
        if !schema.has_prio() {
            return Err(Error::MissingColumn {
                table: schema.name().to_string(),
                column: "prio".to_string(),
            });
        }
        row.prio = Some(tier);
    }
    if schema.has_sync_gid() {
        row.sync_gid = Some(Uuid::new_v4());
    }
    if schema.has_last_saved_by() {
        row.last_saved_by = ctx.user.clone();
    }
    if schema.has_last_saved_when() {
        row.last_saved_when = Some(ctx.now);
    }
    Ok(())
}

/// Run the caller validation hook; any recorded failure aborts the mutation
fn run_hook(validate: Option<ValidationHook<'_>>, row: &NewRow) -> Result<()> {
    if let Some(hook) = validate {
        let mut validation = Validation::new();
        hook(row, &mut validation);
        validation.into_result()?;
    }
    Ok(())
}
