// narrative-broker/src/jukebox.rs
// ============================================================================
// Module: Jukebox
// Description: The sound-playback plug interface (§6).
// Purpose: Let `AudioDispatch` trigger playback without owning a mixer.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! Mirrors `game/src/sound/base.py`'s `BaseJukebox` (`play_sound`,
//! `stop_all`, `stop_ambient`), renamed to `spec.md` §6's plug interface:
//! `playSound(session, file, volume, loop, duration?)`, `stopAll(session)`,
//! `stopAmbient(session)`. Concrete mixers (the original's pygame-backed
//! `LocalJukebox`) are out of scope; [`NullJukebox`] and the test-only
//! recording jukebox are the only implementations this workspace ships.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::SessionId;

// ============================================================================
// SECTION: Jukebox
// ============================================================================

/// A destination for sound-effect and ambient-track playback commands.
pub trait Jukebox: Send + Sync {
    /// Plays `file` for `session` at `volume` (0-100); loops indefinitely
    /// if `looping` is true, otherwise plays once and optionally stops
    /// after `duration_seconds`.
    fn play_sound(&self, session: &SessionId, file: &str, volume: u8, looping: bool, duration_seconds: Option<u32>);

    /// Stops all currently playing sounds for `session`.
    fn stop_all(&self, session: &SessionId);

    /// Stops only the looping ambient track for `session`, leaving any
    /// one-shot effect playback untouched.
    fn stop_ambient(&self, session: &SessionId);
}

// ============================================================================
// SECTION: Null Jukebox
// ============================================================================

/// A jukebox that discards every command; used where no audio backend is
/// wired up (headless sessions, most tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullJukebox;

impl Jukebox for NullJukebox {
    fn play_sound(&self, _session: &SessionId, _file: &str, _volume: u8, _looping: bool, _duration_seconds: Option<u32>) {}

    fn stop_all(&self, _session: &SessionId) {}

    fn stop_ambient(&self, _session: &SessionId) {}
}

impl<T: Jukebox + ?Sized> Jukebox for std::sync::Arc<T> {
    fn play_sound(&self, session: &SessionId, file: &str, volume: u8, looping: bool, duration_seconds: Option<u32>) {
        (**self).play_sound(session, file, volume, looping, duration_seconds);
    }

    fn stop_all(&self, session: &SessionId) {
        (**self).stop_all(session);
    }

    fn stop_ambient(&self, session: &SessionId) {
        (**self).stop_ambient(session);
    }
}
