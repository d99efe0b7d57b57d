// narrative-core/src/core/cancellation.rs
// ============================================================================
// Module: Cancellation Token
// Description: Cooperative stop flag shared across a turn's suspension points.
// Purpose: Let a torn-down session interrupt an in-flight model or TTS call.
// Dependencies: std::sync::atomic
// ============================================================================

//! ## Overview
//! `spec.md` §5 requires two independent uses of the same mechanism: a
//! cancellation token threaded through the provider call so in-flight LLM
//! work can be aborted, and "a per-session stop flag the TTS worker polls
//! between chunks" so a new turn's narrative can interrupt a prior one's
//! speech. [`CancellationToken`] is one cheap, cloneable flag serving both:
//! every clone shares the same underlying flag, so cancelling any clone
//! cancels them all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

// ============================================================================
// SECTION: Cancellation Token
// ============================================================================

/// A cooperative, cloneable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a fresh, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this token (and every clone sharing it) as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`CancellationToken::cancel`] has been called on
    /// this token or any of its clones.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
