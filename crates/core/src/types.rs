//! Identity types for versioned rows
//!
//! `RowId` is a surrogate identity: unique per store, immutable once
//! assigned, never reused. It carries no temporal meaning; only `effdt`
//! (and `prio`) determine which version of a key is current.

use serde::{Deserialize, Serialize};

/// Surrogate row identity
///
/// Minted by the store on insert from a monotonically increasing counter.
/// Two versions of the same logical key always have distinct ids, and an id
/// is never reassigned after the row it names is superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(u64);

impl RowId {
    /// Create a row id from its raw counter value
    #[inline]
    pub const fn from_u64(raw: u64) -> Self {
        RowId(raw)
    }

    /// Get the raw counter value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RowId {
    fn from(raw: u64) -> Self {
        RowId(raw)
    }
}
