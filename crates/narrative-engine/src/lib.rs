// narrative-engine/src/lib.rs
// ============================================================================
// Crate: narrative-engine
// Description: Per-turn orchestration (C8) and the game engine façade (C9).
// Purpose: Wire the state machine, inventory, and LLM provider into one turn.
// Dependencies: narrative-core, narrative-providers, narrative-broker, tokio, tracing
// ============================================================================

//! ## Overview
//! `narrative-engine` is the seam `spec.md` calls the "Session Controller"
//! (C8) and "Game Engine Façade" (C9): [`controller::SessionController`]
//! runs the one-model-call-per-turn pipeline (§4.8) over a borrowed
//! [`narrative_core::StateMachine`] and [`narrative_core::Inventory`];
//! [`facade::GameEngine`] owns those two plus a controller instance and
//! exposes the external interface §6 names (`processInput`, `startGame`,
//! `setState`, `setInventory`, `status`); [`session::Session`] is the thin
//! per-connection envelope (§3 "Session") a transport holds, carrying a
//! [`facade::GameEngine`] alongside an activity timestamp and optional
//! transport token.

pub mod controller;
pub mod facade;
pub mod session;

pub use controller::SessionController;
pub use controller::TurnOutcome;
pub use facade::GameEngine;
pub use facade::GameEngineError;
pub use facade::StatusSnapshot;
pub use session::Session;
