// narrative-core/src/state_machine.rs
// ============================================================================
// Module: State Machine
// Description: Current-state tracking, legal-action enumeration, and firing (C3).
// Purpose: Gate and perform action execution; let hooks veto before it happens.
// Dependencies: crate::core::{action, identifiers, state}, crate::inventory
// ============================================================================

//! ## Overview
//! [`StateMachine`] mirrors `game_v2/src/state_engine/engine.py`'s
//! `StateEngine`: actions are flat, each tagged with the one state it
//! applies in, and `current_state` changes only for [`Action::Transition`]
//! firings. Conditions are evaluated once, at [`StateMachine::available_actions`]
//! time, against the inventory's sandbox; [`StateMachine::execute`]
//! re-checks that the named action is still in that legal set, then runs
//! the registered veto hooks in registration order (`spec.md` §4.3 step 2:
//! "any hook returning false vetoes ... no scripts run"), and only once
//! every hook has passed does it run the action's scripts against the
//! inventory (§4.3 step 3). A vetoed action never reaches script
//! execution; hooks themselves cannot mutate inventory ahead of it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use crate::core::action::Action;
use crate::core::identifiers::ActionName;
use crate::core::identifiers::StateName;
use crate::core::state::State;
use crate::inventory::Inventory;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure building a [`StateMachine`].
#[derive(Debug, thiserror::Error)]
pub enum StateMachineError {
    /// The declared initial state is not among the loaded states.
    #[error("initial state '{0}' is not a defined state")]
    UnknownInitialState(StateName),
    /// No states were provided.
    #[error("no states defined")]
    NoStates,
    /// A runtime request (e.g. `setState`) named a state that is not
    /// defined in the loaded game.
    #[error("'{0}' is not a defined state")]
    UnknownState(StateName),
}

// ============================================================================
// SECTION: Execute Outcome
// ============================================================================

/// Result of attempting to fire an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteOutcome {
    /// Whether the action fired.
    pub success: bool,
    /// Human-readable explanation, mirroring `set_state`'s message string.
    pub message: String,
}

// ============================================================================
// SECTION: Hook
// ============================================================================

/// A veto hook invoked, in registration order, as an action fires. Hooks run
/// before any script executes; returning `false` aborts the firing with no
/// inventory or state mutation at all (`spec.md` §4.3 step 2, §8 "Hook veto
/// ⟹ no inventory mutation, no state mutation, no audio event").
pub type ActionHook = Box<dyn FnMut(&Action) -> bool + Send>;

// ============================================================================
// SECTION: State Machine
// ============================================================================

/// Tracks the current state and performs legality-gated action firing.
pub struct StateMachine {
    states: HashMap<StateName, State>,
    actions: Vec<Action>,
    current_state: StateName,
    hooks: Vec<ActionHook>,
}

impl StateMachine {
    /// Builds a state machine from loaded states, actions, and the declared
    /// initial state.
    ///
    /// # Errors
    /// Returns [`StateMachineError`] if `states` is empty or `initial_state`
    /// does not name one of them.
    pub fn new(
        states: HashMap<StateName, State>,
        actions: Vec<Action>,
        initial_state: StateName,
    ) -> Result<Self, StateMachineError> {
        if states.is_empty() {
            return Err(StateMachineError::NoStates);
        }
        if !states.contains_key(&initial_state) {
            return Err(StateMachineError::UnknownInitialState(initial_state));
        }
        Ok(Self {
            states,
            actions,
            current_state: initial_state,
            hooks: Vec::new(),
        })
    }

    /// Registers a veto hook. Multiple hooks may be registered; all are
    /// consulted in registration order.
    pub fn add_hook(&mut self, hook: ActionHook) {
        self.hooks.push(hook);
    }

    /// Returns the current state.
    #[must_use]
    pub fn current_state(&self) -> &State {
        #[allow(
            clippy::expect_used,
            reason = "current_state is only ever set to a key validated at construction or transition time"
        )]
        self.states.get(&self.current_state).expect("current_state always names a loaded state")
    }

    /// Returns every action applicable in the current state whose
    /// conditions all currently hold, evaluated against `inventory`.
    #[must_use]
    pub fn available_actions(&mut self, inventory: &mut Inventory) -> Vec<&Action> {
        let current_state = self.current_state.clone();
        self.actions
            .iter()
            .filter(|action| action.matches(&current_state))
            .filter(|action| Self::conditions_hold(action, inventory))
            .collect()
    }

    /// Evaluates every condition on `action`; an action with no conditions
    /// is always legal.
    fn conditions_hold(action: &Action, inventory: &mut Inventory) -> bool {
        action.data().conditions.iter().all(|condition| inventory.evaluate_condition(condition))
    }

    /// Looks up an action by name regardless of whether it is legal in the
    /// current state. Used by callers that need the fired [`Action`] itself
    /// (e.g. for its [`crate::core::action::SoundEffect`]) after `execute`
    /// has already moved `current_state` out from under `available_actions`.
    #[must_use]
    pub fn action_named(&self, action_name: &ActionName) -> Option<&Action> {
        self.actions.iter().find(|action| action.name() == action_name)
    }

    /// Every declared state name, in no particular order.
    pub fn state_names(&self) -> impl Iterator<Item = &StateName> {
        self.states.keys()
    }

    /// Forcibly moves `current_state`, bypassing action legality.
    ///
    /// This is the authoring/dev `setState` hook (`spec.md` §6), not a
    /// normal turn mechanism: it clears no history itself (callers own
    /// that) and does not consult hooks or run scripts.
    ///
    /// # Errors
    /// Returns [`StateMachineError::UnknownState`] if `state` is not one of
    /// the loaded states.
    pub fn set_current_state(&mut self, state: StateName) -> Result<(), StateMachineError> {
        if !self.states.contains_key(&state) {
            return Err(StateMachineError::UnknownState(state));
        }
        self.current_state = state;
        Ok(())
    }

    /// Attempts to fire the named action.
    ///
    /// The action must currently be legal (state-matched and
    /// condition-satisfied); every registered hook is then consulted in
    /// registration order and may veto the firing before anything else
    /// happens; only once every hook has passed does the action's scripts
    /// run (best-effort — a failing script is logged by the sandbox and
    /// does not block the firing); and finally, for a
    /// [`Action::Transition`], `current_state` moves.
    pub fn execute(&mut self, action_name: &ActionName, inventory: &mut Inventory) -> ExecuteOutcome {
        let Some(action) = self
            .available_actions(inventory)
            .into_iter()
            .find(|action| action.name() == action_name)
            .cloned()
        else {
            return ExecuteOutcome {
                success: false,
                message: format!("action '{action_name}' is not available in the current state"),
            };
        };

        for hook in &mut self.hooks {
            if !hook(&action) {
                return ExecuteOutcome {
                    success: false,
                    message: format!("action '{action_name}' was blocked by a hook"),
                };
            }
        }

        inventory.execute_scripts(&action.data().scripts);

        let old_state = self.current_state.clone();
        if let Some(state_after) = action.state_after() {
            self.current_state = state_after.clone();
        }

        let message = if old_state == self.current_state {
            format!("action '{action_name}' executed (state remains {})", self.current_state)
        } else {
            format!("state changed from {old_state} to {}", self.current_state)
        };

        ExecuteOutcome { success: true, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::ActionData;
    use crate::core::action::Prompts;
    use std::collections::HashMap;

    fn plain_action(state_before: &str, state_after: &str, name: &str) -> Action {
        Action::Transition {
            state_before: state_before.into(),
            state_after: state_after.into(),
            data: ActionData {
                name: name.into(),
                prompts: Prompts::default(),
                conditions: Vec::new(),
                scripts: Vec::new(),
                sound_effect: None,
            },
        }
    }

    fn gated_trigger(state: &str, name: &str, condition: &str) -> Action {
        Action::Trigger {
            state: state.into(),
            data: ActionData {
                name: name.into(),
                prompts: Prompts::default(),
                conditions: vec![condition.to_string()],
                scripts: Vec::new(),
                sound_effect: None,
            },
        }
    }

    fn scripted_trigger(state: &str, name: &str, script: &str) -> Action {
        Action::Trigger {
            state: state.into(),
            data: ActionData {
                name: name.into(),
                prompts: Prompts::default(),
                conditions: Vec::new(),
                scripts: vec![script.to_string()],
                sound_effect: None,
            },
        }
    }

    fn two_state_machine(actions: Vec<Action>) -> StateMachine {
        let mut states = HashMap::new();
        states.insert(StateName::new("Start"), State::new("Start", "the start"));
        states.insert(StateName::new("Room"), State::new("Room", "a room"));
        StateMachine::new(states, actions, StateName::new("Start")).expect("valid machine")
    }

    #[test]
    fn unknown_initial_state_is_rejected() {
        let mut states = HashMap::new();
        states.insert(StateName::new("Start"), State::new("Start", "desc"));
        let result = StateMachine::new(states, Vec::new(), StateName::new("Nowhere"));
        assert!(matches!(result, Err(StateMachineError::UnknownInitialState(_))));
    }

    #[test]
    fn execute_transition_moves_current_state() {
        let mut machine = two_state_machine(vec![plain_action("Start", "Room", "go")]);
        let mut inventory = Inventory::new(HashMap::new());
        let outcome = machine.execute(&ActionName::new("go"), &mut inventory);
        assert!(outcome.success);
        assert_eq!(machine.current_state().name, StateName::new("Room"));
    }

    #[test]
    fn execute_rejects_action_not_legal_in_current_state() {
        let mut machine = two_state_machine(vec![plain_action("Room", "Start", "go_back")]);
        let mut inventory = Inventory::new(HashMap::new());
        let outcome = machine.execute(&ActionName::new("go_back"), &mut inventory);
        assert!(!outcome.success);
        assert_eq!(machine.current_state().name, StateName::new("Start"));
    }

    #[test]
    fn execute_respects_condition_gate() {
        let mut machine = two_state_machine(vec![gated_trigger("Start", "open", "has_key")]);
        let mut items = HashMap::new();
        items.insert(crate::core::identifiers::VarName::new("has_key"), crate::core::value::Value::Bool(false));
        let mut inventory = Inventory::new(items);
        let outcome = machine.execute(&ActionName::new("open"), &mut inventory);
        assert!(!outcome.success);
    }

    #[test]
    fn hook_can_veto_an_otherwise_legal_action() {
        let mut machine = two_state_machine(vec![plain_action("Start", "Room", "go")]);
        machine.add_hook(Box::new(|_action| false));
        let mut inventory = Inventory::new(HashMap::new());
        let outcome = machine.execute(&ActionName::new("go"), &mut inventory);
        assert!(!outcome.success);
        assert_eq!(machine.current_state().name, StateName::new("Start"));
    }

    #[test]
    fn hook_veto_blocks_scripts_from_running_at_all() {
        let mut machine = two_state_machine(vec![scripted_trigger("Start", "forbidden", "ritual_done = true;")]);
        machine.add_hook(Box::new(|action| action.name().as_str() != "forbidden"));
        let mut items = HashMap::new();
        items.insert(crate::core::identifiers::VarName::new("ritual_done"), crate::core::value::Value::Bool(false));
        let mut inventory = Inventory::new(items);
        let outcome = machine.execute(&ActionName::new("forbidden"), &mut inventory);
        assert!(!outcome.success);
        assert_eq!(inventory.get(&crate::core::identifiers::VarName::new("ritual_done")), Some(&crate::core::value::Value::Bool(false)));
    }

    #[test]
    fn set_current_state_rejects_unknown_state() {
        let mut machine = two_state_machine(Vec::new());
        let result = machine.set_current_state(StateName::new("Nowhere"));
        assert!(matches!(result, Err(StateMachineError::UnknownState(_))));
        assert_eq!(machine.current_state().name, StateName::new("Start"));
    }

    #[test]
    fn set_current_state_forces_a_known_state() {
        let mut machine = two_state_machine(Vec::new());
        machine.set_current_state(StateName::new("Room")).expect("known state");
        assert_eq!(machine.current_state().name, StateName::new("Room"));
    }

    #[test]
    fn trigger_actions_never_move_current_state() {
        let mut machine = two_state_machine(vec![gated_trigger("Start", "look", "")]);
        let mut inventory = Inventory::new(HashMap::new());
        let outcome = machine.execute(&ActionName::new("look"), &mut inventory);
        assert!(outcome.success);
        assert_eq!(machine.current_state().name, StateName::new("Start"));
    }
}
