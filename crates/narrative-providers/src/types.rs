// narrative-providers/src/types.rs
// ============================================================================
// Module: Provider Types
// Description: Shapes exchanged between the state machine and an LLM provider.
// Purpose: Represent the offered action catalogue and a model's selection.
// Dependencies: narrative-core, serde_json
// ============================================================================

//! ## Overview
//! Mirrors `game/src/llm/base_provider.py`'s `LLMFunction`, `LLMFunctionCall`,
//! and `LLMResponse` dataclasses, renamed to this workspace's vocabulary
//! (`spec.md` §4.6, §6: "a function-call mediator").

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::ActionName;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Function Spec
// ============================================================================

/// One action offered to the model this turn, in the shape a provider's
/// tool-calling or JSON-schema instructions need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// The action's name; doubles as the tool-call / JSON `function` value.
    pub name: ActionName,
    /// Model-facing description, including any `after_fire` suffix.
    pub description: String,
    /// JSON Schema for the (trivial, single-field) call parameters.
    pub parameters: serde_json::Value,
}

impl FunctionSpec {
    /// Builds the schema every offered action shares: a single required
    /// `response` string, the narrative text shown to the player.
    #[must_use]
    pub fn new(name: ActionName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "response": {
                        "type": "string",
                        "description": "Narrative reply shown to the player, in character."
                    }
                },
                "required": ["response"],
            }),
        }
    }

    /// Builds the always-offered `no_action` sentinel function.
    #[must_use]
    pub fn no_action() -> Self {
        Self::new(
            ActionName::no_action(),
            "None of the available actions fit the player's input.",
        )
    }
}

// ============================================================================
// SECTION: Function Call
// ============================================================================

/// The model's selection: one action name plus its narrative text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The selected action's name, or the `no_action` sentinel.
    pub name: ActionName,
    /// Narrative text the model produced alongside the selection.
    pub response: String,
}

impl FunctionCall {
    /// Builds the synthetic fallback used when parsing fails or the model's
    /// selection is missing/unrecognized: `no_action`, raw text preserved.
    #[must_use]
    pub fn no_action(raw_text: impl Into<String>) -> Self {
        Self {
            name: ActionName::no_action(),
            response: raw_text.into(),
        }
    }
}

// ============================================================================
// SECTION: Provider Response
// ============================================================================

/// The result of one model call, before or after selection parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Raw or narrative text content, depending on pipeline stage.
    pub content: String,
    /// The parsed or natively-returned function selection, if any.
    pub function_call: Option<FunctionCall>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_action_spec_names_the_sentinel() {
        assert_eq!(FunctionSpec::no_action().name, ActionName::no_action());
    }

    #[test]
    fn no_action_call_preserves_raw_text() {
        let call = FunctionCall::no_action("huh?");
        assert_eq!(call.name, ActionName::no_action());
        assert_eq!(call.response, "huh?");
    }
}
