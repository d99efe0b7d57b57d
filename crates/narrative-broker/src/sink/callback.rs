// narrative-broker/src/sink/callback.rs
// ============================================================================
// Module: Callback Sink
// Description: Delivers outbound events to a user-supplied function.
// Purpose: Embed the engine in a host process without a channel or writer.
// Dependencies: std
// ============================================================================

//! ## Overview
//! `CallbackSink` wraps a plain closure as an [`crate::sink::EventSink`],
//! for embedding the engine in a host process without a channel or writer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::events::OutboundEvent;
use crate::sink::EventSink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Callback Sink
// ============================================================================

/// A sink that invokes a handler function for each event.
#[derive(Clone)]
pub struct CallbackSink {
    handler: Arc<CallbackHandler>,
}

/// Callback handler signature used by the sink.
type CallbackHandler = dyn Fn(&OutboundEvent) -> Result<(), SinkError> + Send + Sync;

impl CallbackSink {
    /// Creates a callback sink from a handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&OutboundEvent) -> Result<(), SinkError> + Send + Sync + 'static,
    {
        Self { handler: Arc::new(handler) }
    }
}

impl EventSink for CallbackSink {
    fn emit(&self, event: &OutboundEvent) -> Result<(), SinkError> {
        (self.handler)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::PoisonError;

    #[test]
    fn invokes_the_handler_with_the_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_for_handler = Arc::clone(&seen);
        let sink = CallbackSink::new(move |event| {
            seen_for_handler.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
            Ok(())
        });
        sink.emit(&OutboundEvent::Text { narrative: "hi".to_string() }).expect("delivers");
        assert_eq!(seen.lock().unwrap_or_else(PoisonError::into_inner).len(), 1);
    }
}
