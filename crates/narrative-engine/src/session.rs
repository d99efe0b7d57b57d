// narrative-engine/src/session.rs
// ============================================================================
// Module: Session
// Description: The per-connection envelope a transport holds (§3).
// Purpose: Pair a session identity with its engine, activity clock, and token.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! `spec.md` §3's "Session" is deliberately thin: an id, the engine
//! instance doing the work, an optional opaque transport/auth token, and
//! the timestamp of last activity (used by a host process for idle
//! eviction, which is itself out of scope here). A transport owns a
//! collection of these; nothing in this crate reaches across sessions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::SessionId;
use narrative_core::Timestamp;

use crate::facade::GameEngine;

// ============================================================================
// SECTION: Session
// ============================================================================

/// One player's live connection: identity, engine, and activity tracking.
pub struct Session {
    id: SessionId,
    engine: GameEngine,
    transport_token: Option<String>,
    last_activity: Timestamp,
}

impl Session {
    /// Creates a session wrapping an already-constructed [`GameEngine`].
    #[must_use]
    pub fn new(id: SessionId, engine: GameEngine, transport_token: Option<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            engine,
            transport_token,
            last_activity: created_at,
        }
    }

    /// This session's identity.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The opaque transport/auth token this session was created with, if
    /// any.
    #[must_use]
    pub fn transport_token(&self) -> Option<&str> {
        self.transport_token.as_deref()
    }

    /// Timestamp of the most recent turn processed for this session.
    #[must_use]
    pub fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    /// Borrows the underlying engine immutably.
    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Borrows the underlying engine mutably, for driving turns or the
    /// authoring hooks.
    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    /// Records that a turn was just processed at `now`. Callers invoke this
    /// alongside `engine_mut().process_input(...)`; it is not done
    /// automatically since the session does not own a clock.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity = now;
    }
}
