//! Grid-facing entry point: one call per navigation mode
//!
//! The grid UI collaborator supplies a [`ViewMode`] and gets back the rows
//! it should render. This is the seam that replaces request-argument
//! sniffing: the mode is an explicit value, and the engine stays ignorant of
//! any web framework's conventions.

use serde::{Deserialize, Serialize};

use tempora_core::{Result, VersionRow};
use tempora_storage::{Filter, VersionStore};

use crate::archive::{timeline_for_row, Timeline};
use crate::context::{ActingContext, ViewMode};
use crate::resolver::resolve;

/// Rows to render for a navigation mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridRows {
    /// The live view: one effective row per key
    Active(Vec<VersionRow>),
    /// Every version of every key, newest first
    Listing(Vec<VersionRow>),
    /// One key's history, diffed and highlighted
    Archive(Timeline),
}

/// Fetch the rows for a grid in the given navigation mode
///
/// - `Active`: as-of resolution at the acting instant, narrowed by the base
///   filter, honoring the context's priority mode.
/// - `Listing`: the bare archive — a full scan ordered newest first. The
///   base filter is NOT applied; the listing always shows everything.
/// - `Archive`: the timeline of the key owning the given row, with default
///   displayed fields and that row flagged as viewed.
pub fn grid_rows(
    store: &dyn VersionStore,
    table: &str,
    ctx: &ActingContext,
    mode: ViewMode,
    base: &Filter,
) -> Result<GridRows> {
    match mode {
        ViewMode::Active => {
            let rows = resolve(store, table, ctx.now, base, ctx.priority.is_enabled())?;
            Ok(GridRows::Active(rows))
        }
        ViewMode::Listing => {
            let mut rows = store.scan(table)?;
            rows.sort_by(|a, b| b.effdt.cmp(&a.effdt).then(b.id.cmp(&a.id)));
            Ok(GridRows::Listing(rows))
        }
        ViewMode::Archive { of } => {
            let tl = timeline_for_row(store, table, of, None)?;
            Ok(GridRows::Archive(tl))
        }
    }
}
