//! Microsecond-precision timestamp type
//!
//! The effective date (`effdt`) of every version is a `Timestamp`. Resolution
//! ("which version is current as of T") is a pure comparison over this type,
//! so it must be totally ordered and cheap to copy.
//!
//! ## Precision
//!
//! Timestamps are stored as microseconds since Unix epoch (1970-01-01
//! 00:00:00 UTC). This provides:
//! - Sufficient precision for ordering concurrent mutations
//! - 584,554 years of range (u64::MAX microseconds)
//! - Compatibility with common time libraries

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// Represents a point in time as microseconds since Unix epoch. This is the
/// canonical time representation in the store: every `effdt`, every as-of
/// instant, every audit stamp.
///
/// ## Invariants
///
/// - Timestamps are always non-negative (u64)
/// - Timestamps are always in microseconds
/// - Timestamps are comparable and orderable
/// - The zero timestamp represents Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Maximum representable timestamp
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns epoch (0) if system clock is before Unix
    /// epoch (e.g., clock went backwards due to NTP adjustment).
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from seconds since epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Get microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Get seconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Add a duration to this timestamp
    ///
    /// Saturates at `Timestamp::MAX` on overflow.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_add(duration.as_micros() as u64))
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: Timestamp) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: Timestamp) -> bool {
        self.0 > other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format as "seconds.microseconds" for readability
        let secs = self.0 / 1_000_000;
        let micros = self.0 % 1_000_000;
        write!(f, "{}.{:06}", secs, micros)
    }
}

impl From<u64> for Timestamp {
    /// Create from raw microseconds
    fn from(micros: u64) -> Self {
        Timestamp::from_micros(micros)
    }
}

impl From<Timestamp> for u64 {
    /// Extract raw microseconds
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
