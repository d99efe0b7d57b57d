// narrative-broker/src/sink/log.rs
// ============================================================================
// Module: Log Sink
// Description: Writes each outbound event as a JSON line.
// Purpose: A zero-dependency sink for CLIs and tests.
// Dependencies: serde_json, std
// ============================================================================

//! ## Overview
//! `LogSink<W>` writes one JSON record per delivery to any
//! `Write + Send` destination.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::events::OutboundEvent;
use crate::sink::EventSink;
use crate::sink::SinkError;

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// A sink that writes each event as a JSON line to `W`.
pub struct LogSink<W: Write + Send> {
    /// Destination each event's JSON line is written to.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }
}

impl<W: Write + Send> EventSink for LogSink<W> {
    fn emit(&self, event: &OutboundEvent) -> Result<(), SinkError> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *guard, event).map_err(|error| SinkError::DeliveryFailed(error.to_string()))?;
        guard.write_all(b"\n").map_err(|error| SinkError::DeliveryFailed(error.to_string()))?;
        Ok(())
    }
}
