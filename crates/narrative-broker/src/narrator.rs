// narrative-broker/src/narrator.rs
// ============================================================================
// Module: Narrator
// Description: The per-session speech dispatch plug interface (§4.8, §5).
// Purpose: Let the session controller hand off narrative text asynchronously.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! `spec.md` §4.8's per-turn pseudocode ends with `tts.stopCurrent(); spawn
//! tts.speak(narrative)`: the narrative return value must not wait for
//! speech synthesis, and a new turn's speech must interrupt whatever the
//! previous turn was still saying (§5, "the controller MUST interrupt any
//! prior TTS stream before starting a new one"). The text-to-speech engine
//! itself is explicitly out of scope (`spec.md` §1); [`Narrator`] is the
//! seam a host process fills in with one, the same way [`crate::jukebox::
//! Jukebox`] and [`crate::audio_sink::AudioSink`] are seams for a mixer and
//! a byte-chunk writer. An implementation is expected to synthesize speech
//! off-thread and stream it through an [`crate::audio_sink::AudioSink`],
//! checking the supplied [`narrative_core::CancellationToken`] between
//! chunks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::CancellationToken;
use narrative_core::SessionId;

// ============================================================================
// SECTION: Narrator
// ============================================================================

/// A destination for a turn's narrative text, spoken asynchronously.
pub trait Narrator: Send + Sync {
    /// Signals any in-flight speech for `session` to stop as soon as its
    /// worker next polls `cancel`. Does not block waiting for the worker to
    /// actually finish.
    fn stop_current(&self, session: &SessionId);

    /// Begins speaking `text` for `session`. Implementations must not block
    /// the calling turn: dispatch the actual synthesis and playback on a
    /// background task and return immediately. `cancel` is the same token a
    /// subsequent [`Narrator::stop_current`] call cancels.
    fn speak(&self, session: &SessionId, text: &str, cancel: CancellationToken);
}

// ============================================================================
// SECTION: Null Narrator
// ============================================================================

/// A narrator that discards every utterance; used where no TTS backend is
/// wired up (headless sessions, most tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn stop_current(&self, _session: &SessionId) {}

    fn speak(&self, _session: &SessionId, _text: &str, _cancel: CancellationToken) {}
}

impl<T: Narrator + ?Sized> Narrator for std::sync::Arc<T> {
    fn stop_current(&self, session: &SessionId) {
        (**self).stop_current(session);
    }

    fn speak(&self, session: &SessionId, text: &str, cancel: CancellationToken) {
        (**self).speak(session, text, cancel);
    }
}
