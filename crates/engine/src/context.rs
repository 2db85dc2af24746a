//! Request-scoped context for engine operations
//!
//! Everything that used to be ambient request state is explicit here: the
//! acting instant, the acting user (from the identity collaborator), the
//! priority tier the caller operates under, and the navigation mode the grid
//! is in. Core operations take these as arguments instead of reading any
//! global, so the engine has no dependency on a particular web framework's
//! request conventions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tempora_core::{Error, NewRow, Result, RowId, Timestamp};

/// Whether mutations and resolution operate in priority mode
///
/// When enabled, the caller acts under a specific tier: resolution prefers
/// the highest tier that has any row for a key, and every edit stamps the
/// acting tier onto the new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityMode {
    /// The table is resolved purely by effective date
    Disabled,
    /// Priority-tier resolution; mutations are performed under `tier`
    Enabled {
        /// The acting priority tier
        tier: i64,
    },
}

impl PriorityMode {
    /// True when priority mode is enabled
    pub fn is_enabled(&self) -> bool {
        matches!(self, PriorityMode::Enabled { .. })
    }

    /// The acting tier, if enabled
    pub fn tier(&self) -> Option<i64> {
        match self {
            PriorityMode::Enabled { tier } => Some(*tier),
            PriorityMode::Disabled => None,
        }
    }
}

/// Who is acting, when, and under which priority tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActingContext {
    /// Acting user identifier, stamped into `last_saved_by` when present
    pub user: Option<String>,
    /// The mutation/resolution instant ("now" for live requests)
    pub now: Timestamp,
    /// Priority mode for this interaction
    pub priority: PriorityMode,
}

impl ActingContext {
    /// Context acting at `now` with no user and priority disabled
    pub fn at(now: Timestamp) -> Self {
        ActingContext {
            user: None,
            now,
            priority: PriorityMode::Disabled,
        }
    }

    /// Context acting at the current wall-clock instant
    pub fn now() -> Self {
        Self::at(Timestamp::now())
    }

    /// Set the acting user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Act under the given priority tier
    pub fn with_priority(mut self, tier: i64) -> Self {
        self.priority = PriorityMode::Enabled { tier };
        self
    }
}

/// Which view of a versioned table the grid is navigating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// The live view: one effective row per key, as of the acting instant
    Active,
    /// Bare archive listing: every version of every key, newest first
    Listing,
    /// Version history of the key owning this row, diffed
    Archive {
        /// The row the caller navigated from (highlighted in the timeline)
        of: RowId,
    },
}

/// Accumulator for caller-level validation hooks
///
/// A hook inspects the candidate row and records failures against fields.
/// Any recorded failure aborts the mutation before the insert; the first
/// failure is surfaced as [`Error::Validation`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Validation {
    errors: BTreeMap<String, String>,
}

impl Validation {
    /// Start with no failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure against a field
    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    /// True when no failures were recorded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded failures, keyed by field
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Convert into an error if any failure was recorded
    pub fn into_result(mut self) -> Result<()> {
        match self.errors.pop_first() {
            Some((field, message)) => Err(Error::Validation { field, message }),
            None => Ok(()),
        }
    }
}

/// Caller-level validation hook, run on the candidate row before insert
pub type ValidationHook<'a> = &'a dyn Fn(&NewRow, &mut Validation);
