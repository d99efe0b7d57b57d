// narrative-broker/src/events.rs
// ============================================================================
// Module: Outbound Events
// Description: The event shapes a session emits toward transports (§6).
// Purpose: Give every `EventSink` implementation one serializable wire type.
// Dependencies: narrative-core, serde
// ============================================================================

//! ## Overview
//! Mirrors `game/src/messaging/messages/__init__.py`'s `Message` subclasses
//! (`InventoryMessage`, `StateMessage`, `SoundEffectMessage`,
//! `AmbientSoundMessage`, `TextMessage`, `ErrorMessage`) collapsed into one
//! tagged enum, matching `spec.md` §6's outbound event table exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use narrative_core::ActionName;
use narrative_core::StateName;
use narrative_core::Value;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Outbound Event
// ============================================================================

/// One event a session emits toward its message-queue abstraction
/// (`spec.md` §6). Transport is out of scope; this is the payload shape
/// every [`crate::sink::EventSink`] receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    /// The full current variable map, emitted after every successful
    /// action fire (`spec.md` §4.2, §5 ordering guarantees).
    InventoryUpdate {
        /// Snapshot of every inventory variable at emission time.
        variables: BTreeMap<String, Value>,
    },
    /// A state transition fired, carrying the previous and new state names.
    StateChange {
        /// The state the session was in before this action fired.
        previous: StateName,
        /// The state the session is in after this action fired.
        current: StateName,
        /// The action that caused the transition.
        action: ActionName,
    },
    /// A one-shot sound effect to play (`spec.md` §4.10).
    SoundEffect {
        /// Path to the sound asset.
        file: String,
        /// Playback volume, 0-100.
        volume: u8,
        /// Optional cap on playback duration, in seconds.
        duration_seconds: Option<f64>,
    },
    /// A looping ambient sound to start, or `file: None` to stop the
    /// current ambient track (`spec.md` §4.10, §6).
    AmbientSound {
        /// Path to the ambient asset, or `None` to stop.
        file: Option<String>,
        /// Playback volume, 0-100.
        volume: u8,
    },
    /// Narrative text produced for this turn.
    Text {
        /// The narrative string shown to the player.
        narrative: String,
    },
    /// A structured error surfaced to the transport instead of a crash
    /// (`spec.md` §7, "the engine never throws across its public façade").
    Error {
        /// Short machine-readable error category.
        kind: String,
        /// Human-readable detail.
        details: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_sound_stop_serializes_with_a_null_file() {
        let event = OutboundEvent::AmbientSound { file: None, volume: 100 };
        let json = serde_json::to_value(&event).expect("serializes");
        assert_eq!(json["file"], serde_json::Value::Null);
    }

    #[test]
    fn round_trips_through_json() {
        let event = OutboundEvent::StateChange {
            previous: StateName::new("Cellar"),
            current: StateName::new("Vault"),
            action: ActionName::new("open_door"),
        };
        let json = serde_json::to_string(&event).expect("serializes");
        let back: OutboundEvent = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(event, back);
    }
}
