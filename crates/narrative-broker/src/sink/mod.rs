// narrative-broker/src/sink/mod.rs
// ============================================================================
// Module: Event Sinks
// Description: The outbound message-queue abstraction and its implementations.
// Purpose: Decouple the session controller from any concrete transport.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! One `emit`-style trait method, one error enum, a handful of reference
//! implementations backing it. The payload is [`crate::events::OutboundEvent`],
//! a fixed, typed event set (`spec.md` §6) rather than an arbitrary byte
//! blob, so a sink never has to sniff or deserialize what it's delivering.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod callback;
pub mod channel;
pub mod log;

pub use callback::CallbackSink;
pub use channel::ChannelSink;
pub use log::LogSink;

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::events::OutboundEvent;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure delivering an event to a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The sink's underlying writer or channel failed.
    #[error("event sink delivery failed: {0}")]
    DeliveryFailed(String),
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// A destination for a session's outbound events (`spec.md` §6).
pub trait EventSink: Send + Sync {
    /// Delivers one event. Implementations should not block the calling
    /// turn on slow downstream I/O; `spec.md` §5 only requires audio
    /// dispatch and TTS to be asynchronous, but a well-behaved sink keeps
    /// this path cheap regardless.
    ///
    /// # Errors
    /// Returns [`SinkError`] if delivery fails. A failed delivery is logged
    /// and dropped by callers per `spec.md` §7's "silent degradation"
    /// policy for outbound messaging; it never propagates into the turn's
    /// result.
    fn emit(&self, event: &OutboundEvent) -> Result<(), SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: &OutboundEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}
