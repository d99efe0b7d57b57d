// narrative-broker/src/audio_sink.rs
// ============================================================================
// Module: Audio Sink
// Description: The TTS playback plug interface (§6).
// Purpose: Let the (out-of-scope) TTS worker stream synthesized speech out.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! Mirrors `game/src/audio/base_sink.py`'s `BaseAudioSink` (`write`,
//! `close`). `spec.md` §1 places TTS synthesis itself out of scope, but the
//! sink interface its worker writes through is part of the external
//! surface named in §6, so it is modeled here alongside the jukebox.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::SessionId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure writing or closing an audio stream.
#[derive(Debug, thiserror::Error)]
pub enum AudioSinkError {
    /// The sink's underlying writer failed.
    #[error("audio sink write failed: {0}")]
    WriteFailed(String),
}

// ============================================================================
// SECTION: Audio Sink
// ============================================================================

/// A per-session destination for streamed, synthesized speech audio.
pub trait AudioSink: Send + Sync {
    /// Writes one chunk of audio for `session`.
    ///
    /// # Errors
    /// Returns [`AudioSinkError`] on write failure. Per `spec.md` §7, a
    /// write failure is logged and the chunk dropped; it never interrupts
    /// the turn that triggered synthesis.
    fn write(&self, session: &SessionId, chunk: &[u8]) -> Result<(), AudioSinkError>;

    /// Closes the stream for `session`, signalling no further chunks will
    /// follow for the current utterance.
    ///
    /// # Errors
    /// Returns [`AudioSinkError`] if the close itself fails.
    fn close(&self, session: &SessionId) -> Result<(), AudioSinkError>;
}

// ============================================================================
// SECTION: Null Audio Sink
// ============================================================================

/// An audio sink that discards every chunk; used where no TTS backend is
/// wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn write(&self, _session: &SessionId, _chunk: &[u8]) -> Result<(), AudioSinkError> {
        Ok(())
    }

    fn close(&self, _session: &SessionId) -> Result<(), AudioSinkError> {
        Ok(())
    }
}

impl<T: AudioSink + ?Sized> AudioSink for std::sync::Arc<T> {
    fn write(&self, session: &SessionId, chunk: &[u8]) -> Result<(), AudioSinkError> {
        (**self).write(session, chunk)
    }

    fn close(&self, session: &SessionId) -> Result<(), AudioSinkError> {
        (**self).close(session)
    }
}
