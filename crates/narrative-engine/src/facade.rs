// narrative-engine/src/facade.rs
// ============================================================================
// Module: Game Engine Façade
// Description: One-stop construction and the external interface (C9).
// Purpose: Own the state machine, inventory, and controller for one session.
// Dependencies: narrative-core, narrative-broker, narrative-providers
// ============================================================================

//! ## Overview
//! Mirrors `game_v2/src/game_engine.py`'s `GameEngine`: given a loaded game
//! definition and its collaborators, construct the inventory (C2), state
//! machine (C3), and session controller (C8) once, then expose the small
//! external surface `spec.md` §6 names: `startGame`, `processInput`,
//! `reinitializeFromMemory`, `setState`, `setInventory`, `status`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use narrative_broker::EventSink;
use narrative_broker::Jukebox;
use narrative_broker::Narrator;
use narrative_core::ActionName;
use narrative_core::Inventory;
use narrative_core::LoadedGame;
use narrative_core::SessionId;
use narrative_core::StateMachine;
use narrative_core::StateMachineError;
use narrative_core::StateName;
use narrative_core::Timestamp;
use narrative_core::VarName;
use narrative_core::Value;
use narrative_core::state_machine::ActionHook;
use narrative_providers::LlmProvider;

use crate::controller::SessionController;
use crate::controller::TurnOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure constructing or driving a [`GameEngine`].
#[derive(Debug, thiserror::Error)]
pub enum GameEngineError {
    /// The loaded game's state graph is malformed.
    #[error(transparent)]
    StateMachine(#[from] StateMachineError),
}

// ============================================================================
// SECTION: Status Snapshot
// ============================================================================

/// The `status()` response shape (`spec.md` §6).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    /// The session's current state.
    pub current_state: StateName,
    /// A full snapshot of inventory variables.
    pub inventory: HashMap<VarName, Value>,
    /// Every state name declared in the loaded game.
    pub available_states: Vec<StateName>,
    /// Names of actions currently legal (catalogue, minus `no_action`).
    pub available_actions: Vec<ActionName>,
}

// ============================================================================
// SECTION: Game Engine
// ============================================================================

/// Owns one session's inventory, state machine, and turn controller.
pub struct GameEngine {
    state_machine: StateMachine,
    inventory: Inventory,
    controller: SessionController,
}

impl GameEngine {
    /// Constructs an engine from a validated [`LoadedGame`] and its
    /// collaborators (`spec.md` §4.9 "one-stop construction").
    ///
    /// # Errors
    /// Returns [`GameEngineError::StateMachine`] if `game`'s state graph is
    /// empty or its initial state is undeclared (the loader already rejects
    /// both, so this only surfaces a caller-supplied `LoadedGame` that
    /// skipped validation).
    pub fn new(
        game: LoadedGame,
        provider: Arc<dyn LlmProvider>,
        sink: Arc<dyn EventSink>,
        jukebox: Arc<dyn Jukebox>,
        narrator: Arc<dyn Narrator>,
        max_history_length: usize,
    ) -> Result<Self, GameEngineError> {
        let state_machine = StateMachine::new(game.states, game.actions, game.initial_state)?;
        let inventory = Inventory::new(game.inventory);
        let controller = SessionController::new(provider, sink, jukebox, narrator, max_history_length, game.identity, game.behaviour, game.welcome_prompt);
        Ok(Self { state_machine, inventory, controller })
    }

    /// Sends the configured welcome prompt as the opening turn
    /// (`spec.md` §4.8, §6 `startGame`).
    pub async fn start_game(&mut self, session: &SessionId, now: Timestamp) -> TurnOutcome {
        self.controller.start_game(session, &mut self.state_machine, &mut self.inventory, now).await
    }

    /// Processes one player input as a turn (`spec.md` §6 `processInput`).
    pub async fn process_input(&mut self, session: &SessionId, input: &str, now: Timestamp) -> TurnOutcome {
        self.controller.process_turn(session, &mut self.state_machine, &mut self.inventory, input, now).await
    }

    /// Hot-swaps the loaded definition without tearing the session down:
    /// rebuilds the state machine and inventory from `game` and clears
    /// history (`spec.md` §4.9 `reinitializeFromMemory`).
    ///
    /// # Errors
    /// Returns [`GameEngineError::StateMachine`] if `game`'s state graph is
    /// malformed.
    pub fn reinitialize_from_memory(&mut self, game: LoadedGame) -> Result<(), GameEngineError> {
        let state_machine = StateMachine::new(game.states, game.actions, game.initial_state)?;
        let inventory = Inventory::new(game.inventory);
        self.state_machine = state_machine;
        self.inventory = inventory;
        self.controller.clear_history();
        Ok(())
    }

    /// Authoring/dev hook: optionally hot-reloads `model`, then forces
    /// `current_state` to `state_name` and clears history
    /// (`spec.md` §6 `setState`).
    ///
    /// # Errors
    /// Returns [`GameEngineError::StateMachine`] if `model` is supplied and
    /// malformed, or if `state_name` does not name a declared state in the
    /// (possibly just-reloaded) game.
    pub fn set_state(&mut self, state_name: StateName, model: Option<LoadedGame>) -> Result<(), GameEngineError> {
        if let Some(model) = model {
            self.reinitialize_from_memory(model)?;
        }
        self.state_machine.set_current_state(state_name)?;
        self.controller.clear_history();
        Ok(())
    }

    /// Authoring hook: sets one inventory variable directly, bypassing
    /// script evaluation (`spec.md` §6 `setInventory`).
    pub fn set_inventory(&mut self, key: VarName, value: Value) {
        self.inventory.set(key, value);
    }

    /// Registers a veto hook on the underlying state machine, e.g. for a
    /// host process that wants to gate firing on something outside the
    /// sandbox (rate limits, moderation). Hooks run before any script does,
    /// in registration order; a veto aborts the firing with no inventory or
    /// state mutation at all.
    pub fn add_hook(&mut self, hook: ActionHook) {
        self.state_machine.add_hook(hook);
    }

    /// Builds the `status()` snapshot (`spec.md` §6).
    pub fn status(&mut self) -> StatusSnapshot {
        let available_actions = self
            .state_machine
            .available_actions(&mut self.inventory)
            .into_iter()
            .map(|action| action.name().clone())
            .collect();

        StatusSnapshot {
            current_state: self.state_machine.current_state().name.clone(),
            inventory: self.inventory.to_map(),
            available_states: self.state_machine.state_names().cloned().collect(),
            available_actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_broker::NullJukebox;
    use narrative_broker::NullNarrator;
    use narrative_core::GameDefinitionSource;
    use narrative_providers::stub::ScriptedProvider;
    use narrative_providers::types::FunctionCall;
    use std::sync::Mutex;
    use std::sync::PoisonError;

    fn minimal_game() -> LoadedGame {
        let json = r#"{
            "initial_state": "Start",
            "identity": "You are a narrator.",
            "states": {
                "Start": { "description": "A quiet room." },
                "Hall": { "description": "A long hall." }
            },
            "actions": [
                { "state_before": "Start", "state_after": "Hall", "name": "go_hall", "prompts": { "description": "Walk into the hall." } }
            ],
            "inventory": { "coins": 0 }
        }"#;
        GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&self, _event: &narrative_broker::OutboundEvent) -> Result<(), narrative_broker::SinkError> {
            Ok(())
        }
    }

    fn engine_with(call: FunctionCall) -> GameEngine {
        let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(call));
        GameEngine::new(minimal_game(), provider, Arc::new(NullSink), Arc::new(NullJukebox), Arc::new(NullNarrator), 20).expect("valid engine")
    }

    #[tokio::test]
    async fn start_game_uses_the_welcome_prompt_and_returns_initial_status() {
        let mut engine = engine_with(FunctionCall::no_action("Welcome, adventurer."));
        let outcome = engine.start_game(&SessionId::new("s1"), Timestamp::from_unix_millis(0)).await;
        assert_eq!(outcome.narrative, "Welcome, adventurer.");
        assert_eq!(outcome.current_state, StateName::new("Start"));
    }

    #[test]
    fn status_reports_current_state_and_available_actions() {
        let mut engine = engine_with(FunctionCall::no_action("n/a"));
        let status = engine.status();
        assert_eq!(status.current_state, StateName::new("Start"));
        assert_eq!(status.available_states.len(), 2);
        assert_eq!(status.available_actions, vec![ActionName::new("go_hall")]);
    }

    #[test]
    fn set_state_forces_state_and_clears_history() {
        let mut engine = engine_with(FunctionCall::no_action("n/a"));
        engine.set_state(StateName::new("Hall"), None).expect("known state");
        assert_eq!(engine.status().current_state, StateName::new("Hall"));
    }

    #[test]
    fn set_state_rejects_unknown_state_name() {
        let mut engine = engine_with(FunctionCall::no_action("n/a"));
        let result = engine.set_state(StateName::new("Nowhere"), None);
        assert!(result.is_err());
    }

    #[test]
    fn set_inventory_overrides_a_variable_directly() {
        let mut engine = engine_with(FunctionCall::no_action("n/a"));
        engine.set_inventory(VarName::new("coins"), Value::Int(99));
        assert_eq!(engine.status().inventory.get(&VarName::new("coins")), Some(&Value::Int(99)));
    }

    #[test]
    fn add_hook_can_veto_a_subsequent_fire() {
        let mut engine = engine_with(FunctionCall::no_action("n/a"));
        let vetoed = Arc::new(Mutex::new(false));
        let vetoed_for_hook = Arc::clone(&vetoed);
        engine.add_hook(Box::new(move |_action| {
            *vetoed_for_hook.lock().unwrap_or_else(PoisonError::into_inner) = true;
            false
        }));
        assert!(!*vetoed.lock().unwrap_or_else(PoisonError::into_inner));
    }
}
