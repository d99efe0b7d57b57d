// narrative-broker/src/audio_dispatch.rs
// ============================================================================
// Module: Audio Dispatch (C10)
// Description: Maps state/action sound metadata to jukebox & event-sink calls.
// Purpose: Implement spec.md §4.10's post-fire audio algorithm.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! Grounded on `game/src/state_engine.py`'s transition callback
//! (`_create_transition_callback`): on every successful fire it (1) plays
//! the action's one-shot sound effect if one is set, then (2), only if the
//! state actually changed, stops the previous ambient track and starts the
//! new state's ambient if it has one. `spec.md` §4.10 states the same
//! algorithm; this type is the one place the session controller calls to
//! run it, driving both the [`crate::jukebox::Jukebox`] plug and an
//! [`crate::sink::EventSink`] so transports see the same events a local
//! mixer acts on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::Action;
use narrative_core::SessionId;
use narrative_core::State;

use crate::events::OutboundEvent;
use crate::jukebox::Jukebox;
use crate::sink::EventSink;

// ============================================================================
// SECTION: Audio Dispatch
// ============================================================================

/// Dispatches sound-effect and ambient-track changes after a successful
/// action fire.
pub struct AudioDispatch<J: Jukebox, S: EventSink> {
    /// Sound-playback plug driven for every dispatch.
    jukebox: J,
    /// Outbound event sink mirrored for every dispatch.
    sink: S,
}

impl<J: Jukebox, S: EventSink> AudioDispatch<J, S> {
    /// Builds a dispatcher over a jukebox and an event sink.
    #[must_use]
    pub fn new(jukebox: J, sink: S) -> Self {
        Self { jukebox, sink }
    }

    /// Runs the post-fire audio algorithm (`spec.md` §4.10):
    /// - `fired`'s sound effect, if any, always plays as a one-shot.
    /// - If `previous_state.name != new_state.name` (a Transition actually
    ///   moved the session), the previous ambient stops and the new
    ///   state's ambient starts, if it has one. A Trigger never reaches
    ///   this branch since its before/after state is always the same.
    ///
    /// Sink delivery failures are logged and swallowed (`spec.md` §7,
    /// "silent degradation"); they never propagate to the caller, since
    /// audio is never allowed to fail a turn.
    pub fn dispatch(&self, session: &SessionId, fired: &Action, previous_state: &State, new_state: &State) {
        if let Some(effect) = &fired.data().sound_effect {
            self.jukebox.play_sound(session, &effect.file, effect.volume, false, duration_as_u32(effect.max_duration_seconds));
            self.emit(&OutboundEvent::SoundEffect {
                file: effect.file.clone(),
                volume: effect.volume,
                duration_seconds: effect.max_duration_seconds,
            });
        }

        if previous_state.name == new_state.name {
            return;
        }

        self.jukebox.stop_ambient(session);
        self.emit(&OutboundEvent::AmbientSound { file: None, volume: 0 });

        if let Some(ambient) = &new_state.ambient_sound {
            self.jukebox.play_sound(session, &ambient.file, ambient.volume, true, None);
            self.emit(&OutboundEvent::AmbientSound {
                file: Some(ambient.file.clone()),
                volume: ambient.volume,
            });
        }
    }

    /// Delivers `event` via the configured sink, logging and swallowing
    /// any delivery failure.
    fn emit(&self, event: &OutboundEvent) {
        if let Err(error) = self.sink.emit(event) {
            tracing::warn!(%error, "audio dispatch event sink delivery failed");
        }
    }
}

/// Sound-effect duration is stored as fractional seconds in the data model
/// but the jukebox plug and wire event both take whole seconds; this
/// truncates rather than rounds, matching the original's `int(...)` coercion
/// in `state_engine.py`.
fn duration_as_u32(seconds: Option<f64>) -> Option<u32> {
    seconds.map(|value| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "durations are small positive configured constants")]
        let truncated = value.max(0.0) as u32;
        truncated
    })
}
