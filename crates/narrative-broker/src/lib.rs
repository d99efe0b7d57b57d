// narrative-broker/src/lib.rs
// ============================================================================
// Crate: narrative-broker
// Description: Outbound event sinks, audio plugs, and audio dispatch (C10).
// Purpose: Carry session output to transports without coupling to any one.
// Dependencies: narrative-core, serde, serde_json, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! `narrative-broker` owns `spec.md` §6's outbound surface: the typed
//! [`events::OutboundEvent`] set, the [`sink::EventSink`] message-queue
//! abstraction and its reference implementations, the [`jukebox::Jukebox`],
//! [`audio_sink::AudioSink`], and [`narrator::Narrator`] plug interfaces,
//! and [`audio_dispatch::AudioDispatch`], which implements §4.10's
//! post-fire audio algorithm on top of the first two. A sink-only
//! outbound surface: there is no inbound message concept here, only
//! events the session controller hands off.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audio_dispatch;
pub mod audio_sink;
pub mod events;
pub mod jukebox;
pub mod narrator;
pub mod sink;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audio_dispatch::AudioDispatch;
pub use audio_sink::AudioSink;
pub use audio_sink::AudioSinkError;
pub use audio_sink::NullAudioSink;
pub use events::OutboundEvent;
pub use jukebox::Jukebox;
pub use jukebox::NullJukebox;
pub use narrator::NullNarrator;
pub use narrator::Narrator;
pub use sink::CallbackSink;
pub use sink::ChannelSink;
pub use sink::EventSink;
pub use sink::LogSink;
pub use sink::SinkError;
