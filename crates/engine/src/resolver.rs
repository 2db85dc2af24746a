//! Temporal Resolver: pick the one effective row per key, as of an instant
//!
//! ## Non-priority resolution
//!
//! For each key, the current version as of T is the row with the maximum
//! `effdt <= T` among ALL rows of that key — tombstones included. The
//! `effstatus = true` filter applies only to the final selection: a
//! tombstone that holds the per-key maximum therefore wins the temporal
//! race and is then filtered out, which is exactly how a deleted key
//! disappears from the live view.
//!
//! ## Priority resolution (two-stage)
//!
//! 1. Per key, find the maximum `prio` among ALL rows of the key,
//!    irrespective of effdt (`top_prio`).
//! 2. Within `(key, top_prio)`, find the maximum `effdt <= T`.
//! 3. Select rows matching both maxima, then apply `effstatus = true` and
//!    the base filter.
//!
//! A higher tier wins by existing at all: a key whose winning tier has no
//! row with `effdt <= T` resolves to nothing, even when a lower tier has an
//! eligible row. Recency is the tie-break only inside the winning tier.
//!
//! ## Edge cases
//!
//! A key with no row satisfying `effdt <= T` is excluded entirely, not an
//! error. Duplicate `(key, effdt[, prio])` rows are a data-hygiene hazard
//! the resolver does not deduplicate: all of them are returned, with a
//! warning logged. The in-tree store rejects such duplicates at write time,
//! so this only arises with backends that skip the backstop.

use std::collections::BTreeMap;

use tracing::warn;

use tempora_core::{Error, Result, Timestamp, VersionRow};
use tempora_storage::{Filter, VersionStore};

/// Resolve the live view of a table as of an instant
///
/// Returns the effective rows, at most one per key barring pre-existing
/// duplicates, ordered by key. The base filter narrows the final selection
/// only; it never influences which version of a key is current.
///
/// In priority mode the table must declare a `prio` column; resolving a
/// table without one fails with the missing-column configuration error
/// before any row is examined.
pub fn resolve(
    store: &dyn VersionStore,
    table: &str,
    as_of: Timestamp,
    base: &Filter,
    priority: bool,
) -> Result<Vec<VersionRow>> {
    let schema = store.schema(table)?;
    if priority && !schema.has_prio() {
        return Err(Error::MissingColumn {
            table: table.to_string(),
            column: "prio".to_string(),
        });
    }

    let mut by_key: BTreeMap<String, Vec<VersionRow>> = BTreeMap::new();
    for row in store.scan(table)? {
        by_key.entry(row.key.clone()).or_default().push(row);
    }

    let mut resolved = Vec::new();
    for (key, versions) in by_key {
        let winners: Vec<VersionRow> = effective_of_key(&versions, as_of, priority)
            .into_iter()
            .filter(|row| row.effstatus && base.matches(row))
            .cloned()
            .collect();
        if winners.len() > 1 {
            warn!(
                table,
                key = %key,
                count = winners.len(),
                "ambiguous resolution: duplicate (key, effdt) versions"
            );
        }
        resolved.extend(winners);
    }
    Ok(resolved)
}

/// Resolve a single key as of an instant
///
/// Convenience over [`resolve`] that reads only the key's own history.
/// Returns `None` when the key has no eligible active version. If the
/// backend allowed duplicate temporal coordinates, the duplicate with the
/// greatest id is returned (and a warning logged), so the result stays
/// deterministic.
pub fn resolve_one(
    store: &dyn VersionStore,
    table: &str,
    key: &str,
    as_of: Timestamp,
    priority: bool,
) -> Result<Option<VersionRow>> {
    let schema = store.schema(table)?;
    if priority && !schema.has_prio() {
        return Err(Error::MissingColumn {
            table: table.to_string(),
            column: "prio".to_string(),
        });
    }

    let versions = store.scan_key(table, key)?;
    let mut winners: Vec<&VersionRow> = effective_of_key(&versions, as_of, priority)
        .into_iter()
        .filter(|row| row.effstatus)
        .collect();
    if winners.len() > 1 {
        warn!(table, key, count = winners.len(), "ambiguous resolution");
        winners.sort_by_key(|row| row.id);
    }
    Ok(winners.pop().cloned())
}

/// The temporal winners among the versions of ONE key
///
/// Applies the effdt/prio maxima only; `effstatus` and base filters are the
/// caller's concern. Returns every row at the winning coordinates (more than
/// one only when duplicates exist).
fn effective_of_key(versions: &[VersionRow], as_of: Timestamp, priority: bool) -> Vec<&VersionRow> {
    if priority {
        // Stage 1: the winning tier is the maximum prio over ALL rows,
        // irrespective of effdt. An absent prio sorts below every tier.
        let top_prio = match versions.iter().map(|row| row.prio).max() {
            Some(p) => p,
            None => return Vec::new(),
        };
        // Stage 2: maximum effdt <= as_of within the winning tier.
        let max_effdt = versions
            .iter()
            .filter(|row| row.prio == top_prio && row.effdt <= as_of)
            .map(|row| row.effdt)
            .max();
        match max_effdt {
            Some(effdt) => versions
                .iter()
                .filter(|row| row.prio == top_prio && row.effdt == effdt)
                .collect(),
            // The winning tier has nothing in effect yet: the key resolves
            // to nothing, lower tiers do not get a second chance.
            None => Vec::new(),
        }
    } else {
        let max_effdt = versions
            .iter()
            .filter(|row| row.effdt <= as_of)
            .map(|row| row.effdt)
            .max();
        match max_effdt {
            Some(effdt) => versions.iter().filter(|row| row.effdt == effdt).collect(),
            None => Vec::new(),
        }
    }
}
