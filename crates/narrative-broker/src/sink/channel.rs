// narrative-broker/src/sink/channel.rs
// ============================================================================
// Module: Channel Sink
// Description: Delivers outbound events through a Tokio mpsc channel.
// Purpose: Let a transport task consume events without blocking a turn.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! `ChannelSink` hands each event to a bounded `tokio::sync::mpsc`
//! channel. A non-blocking `try_send` is used deliberately: `spec.md` §5
//! says a sink's delivery must not become a new suspension point inside a
//! turn.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::mpsc::Sender;

use crate::events::OutboundEvent;
use crate::sink::EventSink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Channel Sink
// ============================================================================

/// A sink that forwards events into a `tokio::sync::mpsc` channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    /// Channel half events are forwarded into.
    sender: Sender<OutboundEvent>,
}

impl ChannelSink {
    /// Creates a channel sink over `sender`.
    #[must_use]
    pub fn new(sender: Sender<OutboundEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &OutboundEvent) -> Result<(), SinkError> {
        self.sender.try_send(event.clone()).map_err(|error| SinkError::DeliveryFailed(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_an_event_into_the_channel() {
        let (sender, mut receiver) = tokio::sync::mpsc::channel(4);
        let sink = ChannelSink::new(sender);
        sink.emit(&OutboundEvent::Text { narrative: "hi".to_string() }).expect("delivers");
        let received = receiver.recv().await.expect("event present");
        assert_eq!(received, OutboundEvent::Text { narrative: "hi".to_string() });
    }

    #[tokio::test]
    async fn a_full_channel_reports_delivery_failure() {
        let (sender, _receiver) = tokio::sync::mpsc::channel(1);
        let sink = ChannelSink::new(sender);
        sink.emit(&OutboundEvent::Text { narrative: "first".to_string() }).expect("first delivers");
        let result = sink.emit(&OutboundEvent::Text { narrative: "second".to_string() });
        assert!(result.is_err());
    }
}
