//! Temporal resolution, insert-only mutation and archive reconstruction
//!
//! The three core components of the effective-dated record store:
//! - Temporal Resolver ([`resolve`], [`resolve_one`]): pick the one
//!   effective row per key as of an instant, optionally by priority tier
//! - Version Mutator ([`create`], [`apply_edit`], [`apply_delete`]): turn
//!   edit/delete actions into new immutable rows
//! - Archive Reconstructor ([`timeline`], [`timeline_for_row`]): ordered
//!   version history with changed-cell diffs
//!
//! Plus the request-scoped context types ([`ActingContext`], [`ViewMode`])
//! and the grid-facing entry point ([`grid_rows`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod context;
pub mod grid;
pub mod mutator;
pub mod resolver;

pub use archive::{timeline, timeline_for_row, Timeline, TimelineEntry};
pub use context::{ActingContext, PriorityMode, Validation, ValidationHook, ViewMode};
pub use grid::{grid_rows, GridRows};
pub use mutator::{apply_delete, apply_edit, create, KEY_BLANK, KEY_IN_USE};
pub use resolver::{resolve, resolve_one};
