// narrative-core/src/loader.rs
// ============================================================================
// Module: Game Definition Loader
// Description: Parses and validates a declarative game bundle (C5).
// Purpose: Turn a JSON/YAML game definition into a validated in-memory model.
// Dependencies: serde, serde_json, serde_yaml, crate::core::{action, identifiers, state, value}
// ============================================================================

//! ## Overview
//! Mirrors the JSON shape produced by `convert_yaml_to_json.py`: a flat
//! `states` map, a flat `actions` list where each entry names its
//! `state_before`/`state_after`, and an optional `inventory` map of initial
//! variables. An action whose `state_before` equals its `state_after`
//! becomes an [`Action::Trigger`] (it never changes `current_state`);
//! every other action becomes an [`Action::Transition`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Deserialize;

use crate::core::action::Action;
use crate::core::action::ActionData;
use crate::core::action::Prompts;
use crate::core::action::SoundEffect;
use crate::core::identifiers::ActionName;
use crate::core::identifiers::StateName;
use crate::core::identifiers::VarName;
use crate::core::state::AmbientSound;
use crate::core::state::State;
use crate::core::value::Value;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure parsing or validating a game definition.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The definition is not valid JSON.
    #[error("invalid JSON game definition: {0}")]
    Json(#[from] serde_json::Error),
    /// The definition is not valid YAML.
    #[error("invalid YAML game definition: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// No states were declared.
    #[error("game definition declares no states")]
    NoStates,
    /// `initial_state` does not name a declared state.
    #[error("initial_state '{0}' is not a declared state")]
    UnknownInitialState(String),
    /// An action names a `state_before` or `state_after` that is not
    /// declared.
    #[error("action '{action}' references undeclared state '{state}'")]
    UnknownStateReference {
        /// The offending action's name.
        action: String,
        /// The undeclared state it referenced.
        state: String,
    },
    /// Two or more actions share a name.
    #[error("action name '{0}' is declared more than once")]
    DuplicateActionName(String),
}

// ============================================================================
// SECTION: Raw (wire) Shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawState {
    description: String,
    #[serde(default)]
    ambient_sound: Option<AmbientSound>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPrompts {
    #[serde(default)]
    description: String,
    #[serde(default)]
    after_fire: String,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    state_before: String,
    state_after: String,
    name: String,
    #[serde(default)]
    prompts: RawPrompts,
    #[serde(default)]
    conditions: Vec<String>,
    #[serde(default)]
    scripts: Vec<String>,
    #[serde(default)]
    sound_effect: Option<SoundEffect>,
}

/// The raw, deserializable shape of a game definition bundle.
#[derive(Debug, Deserialize)]
pub struct GameDefinitionSource {
    initial_state: String,
    #[serde(default)]
    identity: String,
    #[serde(default)]
    behaviour: String,
    #[serde(default = "default_welcome_prompt")]
    welcome_prompt: String,
    states: HashMap<String, RawState>,
    #[serde(default)]
    actions: Vec<RawAction>,
    #[serde(default)]
    inventory: HashMap<String, Value>,
}

fn default_welcome_prompt() -> String {
    "The game begins!".to_string()
}

// ============================================================================
// SECTION: Loaded Game
// ============================================================================

/// A validated, in-memory game definition, ready to seed a
/// [`crate::state_machine::StateMachine`] and [`crate::inventory::Inventory`].
#[derive(Debug, Clone)]
pub struct LoadedGame {
    /// Combined identity/behaviour text, forming the non-state part of the
    /// base system prompt.
    pub identity: String,
    /// Behavioural guardrail text appended after identity.
    pub behaviour: String,
    /// Prompt sent as the first user turn when a session starts.
    pub welcome_prompt: String,
    /// All declared states, by name.
    pub states: HashMap<StateName, State>,
    /// All declared actions.
    pub actions: Vec<Action>,
    /// The state a new session starts in.
    pub initial_state: StateName,
    /// Initial inventory variables.
    pub inventory: HashMap<VarName, Value>,
}

impl GameDefinitionSource {
    /// Parses a game definition from a JSON document.
    ///
    /// # Errors
    /// Returns [`LoadError::Json`] if `source` is not valid JSON.
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Parses a game definition from a YAML document.
    ///
    /// # Errors
    /// Returns [`LoadError::Yaml`] if `source` is not valid YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Validates this definition and builds a [`LoadedGame`].
    ///
    /// # Errors
    /// Returns [`LoadError::NoStates`], [`LoadError::UnknownInitialState`],
    /// [`LoadError::UnknownStateReference`], or
    /// [`LoadError::DuplicateActionName`] if validation fails.
    pub fn build(self) -> Result<LoadedGame, LoadError> {
        if self.states.is_empty() {
            return Err(LoadError::NoStates);
        }

        let states: HashMap<StateName, State> = self
            .states
            .into_iter()
            .map(|(name, raw)| {
                let mut state = State::new(name.clone(), raw.description);
                if let Some(ambient_sound) = raw.ambient_sound {
                    state = state.with_ambient_sound(ambient_sound);
                }
                (StateName::new(name), state)
            })
            .collect();

        let initial_state = StateName::new(self.initial_state.clone());
        if !states.contains_key(&initial_state) {
            return Err(LoadError::UnknownInitialState(self.initial_state));
        }

        let mut seen_names: HashSet<String> = HashSet::new();
        let mut actions = Vec::with_capacity(self.actions.len());
        for raw in self.actions {
            if !seen_names.insert(raw.name.clone()) {
                return Err(LoadError::DuplicateActionName(raw.name));
            }
            if !states.contains_key(&StateName::new(raw.state_before.clone())) {
                return Err(LoadError::UnknownStateReference {
                    action: raw.name,
                    state: raw.state_before,
                });
            }
            if !states.contains_key(&StateName::new(raw.state_after.clone())) {
                return Err(LoadError::UnknownStateReference {
                    action: raw.name,
                    state: raw.state_after,
                });
            }

            let data = ActionData {
                name: ActionName::new(raw.name),
                prompts: Prompts {
                    description: raw.prompts.description,
                    after_fire: raw.prompts.after_fire,
                },
                conditions: raw.conditions,
                scripts: raw.scripts,
                sound_effect: raw.sound_effect,
            };

            let action = if raw.state_before == raw.state_after {
                Action::Trigger { state: StateName::new(raw.state_before), data }
            } else {
                Action::Transition {
                    state_before: StateName::new(raw.state_before),
                    state_after: StateName::new(raw.state_after),
                    data,
                }
            };
            actions.push(action);
        }

        let inventory = self.inventory.into_iter().map(|(name, value)| (VarName::new(name), value)).collect();

        Ok(LoadedGame {
            identity: self.identity,
            behaviour: self.behaviour,
            welcome_prompt: self.welcome_prompt,
            states,
            actions,
            initial_state,
            inventory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "initial_state": "Start",
            "identity": "You are a narrator.",
            "states": {
                "Start": { "description": "A quiet room." },
                "Hall": { "description": "A long hall." }
            },
            "actions": [
                {
                    "state_before": "Start",
                    "state_after": "Hall",
                    "name": "go_hall",
                    "prompts": { "description": "Walk into the hall." }
                },
                {
                    "state_before": "Start",
                    "state_after": "Start",
                    "name": "look",
                    "prompts": { "description": "Look around." }
                }
            ],
            "inventory": { "coins": 0 }
        }"#
    }

    #[test]
    fn parses_and_builds_valid_definition() {
        let source = GameDefinitionSource::from_json_str(minimal_json()).expect("valid json");
        let game = source.build().expect("valid definition");
        assert_eq!(game.states.len(), 2);
        assert_eq!(game.actions.len(), 2);
        assert_eq!(game.initial_state, StateName::new("Start"));
    }

    #[test]
    fn same_state_action_becomes_trigger() {
        let game = GameDefinitionSource::from_json_str(minimal_json()).expect("valid json").build().expect("valid");
        let look = game.actions.iter().find(|action| action.name().as_str() == "look").expect("look action");
        assert!(matches!(look, Action::Trigger { .. }));
    }

    #[test]
    fn differing_states_action_becomes_transition() {
        let game = GameDefinitionSource::from_json_str(minimal_json()).expect("valid json").build().expect("valid");
        let go_hall = game.actions.iter().find(|action| action.name().as_str() == "go_hall").expect("go_hall action");
        assert!(matches!(go_hall, Action::Transition { .. }));
    }

    #[test]
    fn rejects_unknown_initial_state() {
        let json = minimal_json().replace("\"Start\",\n            \"identity\"", "\"Nowhere\",\n            \"identity\"");
        let source = GameDefinitionSource::from_json_str(&json).expect("valid json");
        assert!(matches!(source.build(), Err(LoadError::UnknownInitialState(_))));
    }

    #[test]
    fn rejects_duplicate_action_names() {
        let json = minimal_json().replace("\"look\"", "\"go_hall\"");
        let source = GameDefinitionSource::from_json_str(&json).expect("valid json");
        assert!(matches!(source.build(), Err(LoadError::DuplicateActionName(_))));
    }

    #[test]
    fn rejects_action_referencing_undeclared_state() {
        let json = minimal_json().replace("\"Hall\",\n                    \"name\": \"go_hall\"", "\"Nowhere\",\n                    \"name\": \"go_hall\"");
        let source = GameDefinitionSource::from_json_str(&json).expect("valid json");
        assert!(matches!(source.build(), Err(LoadError::UnknownStateReference { .. })));
    }
}
