// narrative-core/src/core/action.rs
// ============================================================================
// Module: Action
// Description: Trigger and Transition action variants and their shared data.
// Purpose: Represent a named, conditional, scripted unit of game play.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! [`Action`] is a tagged sum type (`spec.md` §9, "Action hierarchy"):
//! [`Action::Trigger`] fires without changing `current_state`;
//! [`Action::Transition`] fires and moves `current_state` to a new value.
//! Both variants carry the same [`ActionData`] (name, prompts, conditions,
//! scripts, optional sound effect); only their state-matching and
//! state-mutating behavior differs, via [`Action::matches`] and the state
//! machine's fire sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionName;
use crate::core::identifiers::StateName;

// ============================================================================
// SECTION: Prompts
// ============================================================================

/// Model-facing text describing an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompts {
    /// What the action does, shown to the model when enumerating the
    /// catalogue.
    pub description: String,
    /// Optional context suffix appended to the description when
    /// enumerating, e.g. "the door swings open".
    #[serde(default)]
    pub after_fire: String,
}

// ============================================================================
// SECTION: Sound Effect
// ============================================================================

/// A one-shot sound effect attached to an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEffect {
    /// Sound file name, resolved by the jukebox plug.
    pub file: String,
    /// Playback volume, 0-100.
    pub volume: u8,
    /// Optional maximum playback duration, in seconds.
    #[serde(default)]
    pub max_duration_seconds: Option<f64>,
}

// ============================================================================
// SECTION: Shared Action Data
// ============================================================================

/// Attributes common to both [`Action`] variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    /// Action name, unique among all actions in the game definition.
    pub name: ActionName,
    /// Model-facing prompt text.
    pub prompts: Prompts,
    /// Ordered boolean script expressions; all must evaluate true for the
    /// action to be legal.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Ordered statement strings, executed sequentially when the action
    /// fires.
    #[serde(default)]
    pub scripts: Vec<String>,
    /// Optional one-shot sound effect played when the action fires.
    #[serde(default)]
    pub sound_effect: Option<SoundEffect>,
}

// ============================================================================
// SECTION: Action
// ============================================================================

/// A named, conditional, scripted unit of game play.
///
/// # Invariants
/// - For [`Action::Transition`], `state_before != state_after` (enforced at
///   load time by the game definition loader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    /// Fires without changing `current_state`.
    Trigger {
        /// The single state this trigger is applicable in.
        state: StateName,
        /// Shared action attributes.
        #[serde(flatten)]
        data: ActionData,
    },
    /// Fires and moves `current_state` from `state_before` to `state_after`.
    Transition {
        /// State this transition is applicable in.
        state_before: StateName,
        /// State `current_state` becomes after a successful fire.
        state_after: StateName,
        /// Shared action attributes.
        #[serde(flatten)]
        data: ActionData,
    },
}

impl Action {
    /// Returns the action's name.
    #[must_use]
    pub fn name(&self) -> &ActionName {
        match self {
            Self::Trigger { data, .. } | Self::Transition { data, .. } => &data.name,
        }
    }

    /// Returns the shared action attributes.
    #[must_use]
    pub fn data(&self) -> &ActionData {
        match self {
            Self::Trigger { data, .. } | Self::Transition { data, .. } => data,
        }
    }

    /// Returns true if this action is applicable when `current_state` holds
    /// the given state.
    #[must_use]
    pub fn matches(&self, current_state: &StateName) -> bool {
        match self {
            Self::Trigger { state, .. } => state == current_state,
            Self::Transition { state_before, .. } => state_before == current_state,
        }
    }

    /// Returns the state `current_state` becomes after this action fires, if
    /// it is a [`Action::Transition`].
    #[must_use]
    pub fn state_after(&self) -> Option<&StateName> {
        match self {
            Self::Trigger { .. } => None,
            Self::Transition { state_after, .. } => Some(state_after),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(state: &str, name: &str) -> Action {
        Action::Trigger {
            state: state.into(),
            data: ActionData {
                name: name.into(),
                prompts: Prompts::default(),
                conditions: Vec::new(),
                scripts: Vec::new(),
                sound_effect: None,
            },
        }
    }

    fn transition(before: &str, after: &str, name: &str) -> Action {
        Action::Transition {
            state_before: before.into(),
            state_after: after.into(),
            data: ActionData {
                name: name.into(),
                prompts: Prompts::default(),
                conditions: Vec::new(),
                scripts: Vec::new(),
                sound_effect: None,
            },
        }
    }

    #[test]
    fn trigger_matches_only_its_own_state() {
        let action = trigger("Room", "look");
        assert!(action.matches(&"Room".into()));
        assert!(!action.matches(&"Hall".into()));
        assert!(action.state_after().is_none());
    }

    #[test]
    fn transition_matches_state_before_and_reports_state_after() {
        let action = transition("Start", "Room", "go");
        assert!(action.matches(&"Start".into()));
        assert!(!action.matches(&"Room".into()));
        assert_eq!(action.state_after(), Some(&"Room".into()));
    }

    #[test]
    fn name_and_data_are_shared_across_variants() {
        let action = trigger("Room", "look");
        assert_eq!(action.name().as_str(), "look");
        assert_eq!(action.data().name.as_str(), "look");
    }
}
