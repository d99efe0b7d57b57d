// narrative-core/src/core/time.rs
// ============================================================================
// Module: Narrative Core Time Model
// Description: Canonical timestamp representation for history entries.
// Purpose: Keep turn processing deterministic and replayable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engine never reads wall-clock time directly (`spec.md` §8,
//! "Re-initialising the engine ... replaying the same user inputs ...
//! yields an identical history"); callers supply a [`Timestamp`] when
//! processing a turn, typically from a small [`Clock`] trait so tests can
//! inject a fixed or logical sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Canonical timestamp used in history entries.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads
///   wall-clock time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Builds a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Supplies the current timestamp to the session controller.
///
/// Implementations backed by `std::time::SystemTime` are the production
/// default; tests use a fixed or incrementing clock for determinism.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// A clock that always returns the same fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
