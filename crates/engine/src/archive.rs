//! Archive Reconstructor: per-key timelines with changed-cell diffs
//!
//! Given a logical key, reconstructs its full version history — active rows
//! and tombstones alike — ordered newest first, and computes two diffs over
//! a set of displayed fields:
//!
//! - which fields changed AT ALL across the timeline (`changed_fields`);
//!   fields whose value never varies are dropped from a rendered comparison
//!   to cut noise
//! - per entry, which cells differ from the next-older version
//!   (`changed_cells`), so a consumer can highlight "changed since the
//!   previous version"
//!
//! The entry whose row the caller navigated from is flagged `is_viewed`.
//! This component is read-only; it never mutates storage.

use serde::{Deserialize, Serialize};

use tempora_core::{Error, Result, RowId, Value, VersionRow};
use tempora_storage::VersionStore;

/// One version in a reconstructed timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// The version row itself
    pub row: VersionRow,
    /// Displayed fields whose value differs from the next-older version
    ///
    /// Empty for the oldest entry (there is nothing older to compare with).
    pub changed_cells: Vec<String>,
    /// Whether this is the row the caller navigated from
    pub is_viewed: bool,
}

/// The reconstructed version history of one logical key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Logical key the timeline belongs to
    pub key: String,
    /// Entries ordered by `effdt` descending (newest first); id descending
    /// breaks exact-instant ties deterministically
    pub entries: Vec<TimelineEntry>,
    /// The displayed fields the diff was computed over, in caller order
    pub displayed_fields: Vec<String>,
    /// Displayed fields with more than one distinct value across the
    /// timeline, in displayed order — the columns worth rendering
    pub changed_fields: Vec<String>,
}

impl Timeline {
    /// Number of versions in the timeline
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the key has no history at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reconstruct the timeline of a key
///
/// `displayed_fields = None` defaults to the schema's business fields with
/// `effdt` and `effstatus` prepended. `viewed` flags the entry whose row id
/// matches (if it is part of this timeline).
pub fn timeline(
    store: &dyn VersionStore,
    table: &str,
    key: &str,
    displayed_fields: Option<&[String]>,
    viewed: Option<RowId>,
) -> Result<Timeline> {
    let schema = store.schema(table)?;
    let displayed: Vec<String> = match displayed_fields {
        Some(fields) => fields.to_vec(),
        None => schema.default_display_fields(),
    };

    let mut rows = store.scan_key(table, key)?;
    rows.sort_by(|a, b| b.effdt.cmp(&a.effdt).then(b.id.cmp(&a.id)));

    // A field is worth rendering when it takes more than one distinct value
    // over the whole timeline.
    let changed_fields: Vec<String> = displayed
        .iter()
        .filter(|field| {
            let mut seen: Vec<Value> = Vec::new();
            for row in &rows {
                let value = row.display_value(field);
                if !seen.contains(&value) {
                    seen.push(value);
                }
                if seen.len() > 1 {
                    return true;
                }
            }
            false
        })
        .cloned()
        .collect();

    let entries: Vec<TimelineEntry> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let changed_cells = match rows.get(idx + 1) {
                Some(older) => displayed
                    .iter()
                    .filter(|field| row.display_value(field) != older.display_value(field))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            TimelineEntry {
                row: row.clone(),
                changed_cells,
                is_viewed: viewed == Some(row.id),
            }
        })
        .collect();

    Ok(Timeline {
        key: key.to_string(),
        entries,
        displayed_fields: displayed,
        changed_fields,
    })
}

/// Reconstruct the timeline of the key owning a given row
///
/// The grid navigates here from a concrete row; that row becomes the viewed
/// entry. Fails with `RowNotFound` when the id is unknown.
pub fn timeline_for_row(
    store: &dyn VersionStore,
    table: &str,
    of: RowId,
    displayed_fields: Option<&[String]>,
) -> Result<Timeline> {
    let row = store.get(table, of)?.ok_or(Error::RowNotFound(of))?;
    timeline(store, table, &row.key, displayed_fields, Some(of))
}
