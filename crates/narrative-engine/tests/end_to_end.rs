// narrative-engine/tests/end_to_end.rs
// ============================================================================
// Module: End-to-End Turn Tests
// Description: Drives the full GameEngine against a scripted provider.
// ============================================================================
//! ## Overview
//! Exercises the six scenarios `spec.md` §8 ("End-to-end scenarios") names,
//! wiring a real [`GameEngine`] to a [`ScriptedProvider`] and a recording
//! sink instead of a live model or broker, the way `narrative-engine`'s own
//! inline tests exercise `SessionController` one layer down.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use narrative_broker::CallbackSink;
use narrative_broker::EventSink;
use narrative_broker::NullJukebox;
use narrative_broker::NullNarrator;
use narrative_broker::OutboundEvent;
use narrative_core::ActionName;
use narrative_core::GameDefinitionSource;
use narrative_core::LoadedGame;
use narrative_core::SessionId;
use narrative_core::StateName;
use narrative_core::Timestamp;
use narrative_core::VarName;
use narrative_core::Value;
use narrative_engine::GameEngine;
use narrative_providers::LlmProvider;
use narrative_providers::stub::ScriptedProvider;
use narrative_providers::types::FunctionCall;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn recording_sink() -> (Arc<dyn EventSink>, Arc<Mutex<Vec<OutboundEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_for_handler = Arc::clone(&seen);
    let sink: Arc<dyn EventSink> = Arc::new(CallbackSink::new(move |event: &OutboundEvent| {
        seen_for_handler.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
        Ok(())
    }));
    (sink, seen)
}

fn engine_with(game: LoadedGame, provider: Arc<dyn LlmProvider>) -> (GameEngine, Arc<Mutex<Vec<OutboundEvent>>>) {
    let (sink, seen) = recording_sink();
    let engine = GameEngine::new(game, provider, sink, Arc::new(NullJukebox), Arc::new(NullNarrator), 20).expect("valid engine");
    (engine, seen)
}

fn transition_game() -> LoadedGame {
    let json = r#"{
        "initial_state": "Start",
        "identity": "You narrate a small dungeon.",
        "welcome_prompt": "You stand at the threshold.",
        "states": {
            "Start": { "description": "A dim antechamber." },
            "Room": { "description": "A torchlit room." }
        },
        "actions": [
            { "state_before": "Start", "state_after": "Room", "name": "go", "prompts": { "description": "Walk into the room." } }
        ]
    }"#;
    GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
}

// ============================================================================
// SECTION: Scenario 1 - Initial Turn
// ============================================================================

#[tokio::test]
async fn initial_turn_fires_the_offered_transition() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("go"),
        response: "You push the door open.".to_string(),
    }));
    let (mut engine, seen) = engine_with(transition_game(), provider);

    let outcome = engine.process_input(&SessionId::new("s1"), "open the door", Timestamp::from_unix_millis(0)).await;

    assert!(!outcome.narrative.is_empty());
    assert_eq!(outcome.current_state, StateName::new("Room"));
    assert_eq!(outcome.executed_action, Some(ActionName::new("go")));

    let events = seen.lock().unwrap_or_else(PoisonError::into_inner);
    let state_changes: Vec<&OutboundEvent> = events
        .iter()
        .filter(|event| matches!(event, OutboundEvent::StateChange { .. }))
        .collect();
    assert_eq!(state_changes.len(), 1);
    assert!(matches!(
        state_changes[0],
        OutboundEvent::StateChange { previous, current, action }
        if *previous == StateName::new("Start") && *current == StateName::new("Room") && *action == ActionName::new("go")
    ));

    assert!(!events.iter().any(|event| matches!(event, OutboundEvent::InventoryUpdate { .. })));
}

// ============================================================================
// SECTION: Scenario 2 - Condition Gate
// ============================================================================

fn gated_door_game() -> LoadedGame {
    let json = r#"{
        "initial_state": "Start",
        "states": {
            "Start": { "description": "A locked door blocks the way." },
            "Room": { "description": "Beyond the door." }
        },
        "actions": [
            {
                "state_before": "Start",
                "state_after": "Room",
                "name": "open_door",
                "prompts": { "description": "Open the locked door." },
                "conditions": ["has_key == true"]
            }
        ],
        "inventory": { "has_key": false }
    }"#;
    GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
}

#[tokio::test]
async fn unsatisfied_condition_hides_the_action_and_falls_back_to_no_action() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("open_door"),
        response: "It's locked tight.".to_string(),
    }));
    let (mut engine, seen) = engine_with(gated_door_game(), provider);

    let outcome = engine.process_input(&SessionId::new("s1"), "open the door", Timestamp::from_unix_millis(0)).await;

    assert_eq!(outcome.narrative, "It's locked tight.");
    assert_eq!(outcome.current_state, StateName::new("Start"));
    assert_eq!(outcome.executed_action, None);

    let events = seen.lock().unwrap_or_else(PoisonError::into_inner);
    assert!(!events.iter().any(|event| matches!(event, OutboundEvent::StateChange { .. })));
}

// ============================================================================
// SECTION: Scenario 3 - Script Mutation + Template
// ============================================================================

fn coin_game() -> LoadedGame {
    let json = r#"{
        "initial_state": "Cellar",
        "welcome_prompt": "Welcome to the cellar.",
        "states": {
            "Cellar": { "description": "You have {{ coins }} coins." }
        },
        "actions": [
            {
                "state": "Cellar",
                "name": "find_coin",
                "prompts": { "description": "Search for a coin." },
                "scripts": ["coins = coins + 1;"]
            }
        ],
        "inventory": { "coins": 0 }
    }"#;
    GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
}

#[tokio::test]
async fn trigger_script_mutates_inventory_and_next_render_reflects_it() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("find_coin"),
        response: "A coin glints in the dust.".to_string(),
    }));
    let (mut engine, seen) = engine_with(coin_game(), provider);

    engine.process_input(&SessionId::new("s1"), "search", Timestamp::from_unix_millis(0)).await;
    let outcome = engine.process_input(&SessionId::new("s1"), "search again", Timestamp::from_unix_millis(1)).await;

    assert_eq!(outcome.inventory.get(&VarName::new("coins")), Some(&Value::Int(2)));

    let events = seen.lock().unwrap_or_else(PoisonError::into_inner);
    let inventory_updates = events.iter().filter(|event| matches!(event, OutboundEvent::InventoryUpdate { .. })).count();
    assert_eq!(inventory_updates, 2);
    drop(events);

    let status = engine.status();
    assert_eq!(status.inventory.get(&VarName::new("coins")), Some(&Value::Int(2)));
}

// ============================================================================
// SECTION: Scenario 4 - Hook Veto
// ============================================================================

fn forbidden_trigger_game() -> LoadedGame {
    let json = r#"{
        "initial_state": "Start",
        "states": { "Start": { "description": "A sealed vault." } },
        "actions": [
            {
                "state": "Start",
                "name": "forbidden",
                "prompts": { "description": "Attempt the forbidden ritual." },
                "scripts": ["ritual_done = true;"]
            }
        ],
        "inventory": { "ritual_done": false }
    }"#;
    GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
}

#[tokio::test]
async fn hook_veto_blocks_the_fire_with_no_state_or_inventory_mutation() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("forbidden"),
        response: "You attempt the ritual.".to_string(),
    }));
    let (mut engine, seen) = engine_with(forbidden_trigger_game(), provider);
    engine.add_hook(Box::new(|action| action.name() != &ActionName::new("forbidden")));

    let outcome = engine.process_input(&SessionId::new("s1"), "perform the ritual", Timestamp::from_unix_millis(0)).await;

    assert_eq!(outcome.current_state, StateName::new("Start"));
    assert_eq!(outcome.executed_action, None);
    assert!(outcome.narrative.contains("(failed:"));
    assert_eq!(outcome.inventory.get(&VarName::new("ritual_done")), Some(&Value::Bool(false)));

    let events = seen.lock().unwrap_or_else(PoisonError::into_inner);
    assert!(!events.iter().any(|event| matches!(event, OutboundEvent::InventoryUpdate { .. })));
}

// ============================================================================
// SECTION: Scenario 5 - Hallucinated Action
// ============================================================================

#[tokio::test]
async fn hallucinated_action_name_coerces_to_no_action_and_keeps_narrative() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("teleport_to_mars"),
        response: "Off we go!".to_string(),
    }));
    let (mut engine, _seen) = engine_with(transition_game(), provider);

    let outcome = engine.process_input(&SessionId::new("s1"), "teleport me", Timestamp::from_unix_millis(0)).await;

    assert_eq!(outcome.narrative, "Off we go!");
    assert_eq!(outcome.current_state, StateName::new("Start"));
    assert_eq!(outcome.executed_action, None);
}

// ============================================================================
// SECTION: Scenario 6 - Hot Reload
// ============================================================================

fn replacement_game() -> LoadedGame {
    let json = r#"{
        "initial_state": "B",
        "states": {
            "B": { "description": "A new wing of the dungeon." }
        },
        "actions": [],
        "inventory": { "torches": 3 }
    }"#;
    GameDefinitionSource::from_json_str(json).expect("valid json").build().expect("valid game")
}

#[tokio::test]
async fn set_state_with_a_new_model_clears_history_and_swaps_definitions() {
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::new(FunctionCall {
        name: ActionName::new("go"),
        response: "You step forward.".to_string(),
    }));
    let (mut engine, _seen) = engine_with(transition_game(), provider);

    engine.process_input(&SessionId::new("s1"), "go", Timestamp::from_unix_millis(0)).await;
    assert_eq!(engine.status().current_state, StateName::new("Room"));

    engine.set_state(StateName::new("B"), Some(replacement_game())).expect("known state in new model");

    let status = engine.status();
    assert_eq!(status.current_state, StateName::new("B"));
    assert_eq!(status.inventory.get(&VarName::new("torches")), Some(&Value::Int(3)));
    assert!(status.available_actions.is_empty());
}
