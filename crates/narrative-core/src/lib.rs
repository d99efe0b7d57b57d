// narrative-core/src/lib.rs
// ============================================================================
// Crate: narrative-core
// Description: Data model, sandbox, inventory, state machine, and templates.
// Purpose: The single source of truth for a narrative session's game logic.
// Dependencies: minijinja, rhai, serde, serde_json, serde_yaml, thiserror, tracing
// ============================================================================

//! ## Overview
//! `narrative-core` holds everything a session needs that does not talk to
//! an LLM provider or an outbound event sink: the static data model
//! ([`core`]), the embedded script sandbox ([`sandbox`]), the inventory
//! built on top of it ([`inventory`]), action legality and firing
//! ([`state_machine`]), template rendering ([`template`]), and the game
//! definition loader ([`loader`]).

pub mod core;
pub mod inventory;
pub mod loader;
pub mod sandbox;
pub mod state_machine;
pub mod template;

pub use core::action::Action;
pub use core::action::ActionData;
pub use core::cancellation::CancellationToken;
pub use core::config::DebugConfig;
pub use core::config::EngineConfig;
pub use core::config::LlmConfig;
pub use core::history::ChatMessage;
pub use core::history::History;
pub use core::history::HistoryEntry;
pub use core::identifiers::ActionName;
pub use core::identifiers::SessionId;
pub use core::identifiers::StateName;
pub use core::identifiers::VarName;
pub use core::state::State;
pub use core::time::Clock;
pub use core::time::Timestamp;
pub use core::value::Value;
pub use inventory::Inventory;
pub use loader::GameDefinitionSource;
pub use loader::LoadError;
pub use loader::LoadedGame;
pub use sandbox::Sandbox;
pub use state_machine::ExecuteOutcome;
pub use state_machine::StateMachine;
pub use state_machine::StateMachineError;
pub use template::Renderer;
