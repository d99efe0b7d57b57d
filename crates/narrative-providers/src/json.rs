// narrative-providers/src/json.rs
// ============================================================================
// Module: JSON Fallback
// Description: Prompt-embedded function-calling instructions and response parsing.
// Purpose: Let providers without native tool calling still select an action.
// Dependencies: narrative-core, serde_json
// ============================================================================

//! ## Overview
//! Grounded on `game/src/llm/base_provider.py`'s
//! `_default_response_instructions` (the instructions appended to the system
//! prompt) and `_extract_json`/`_parse_function_call` (the extraction
//! pipeline: normalize doubled/tripled braces used to escape literal braces
//! elsewhere in the prompt, strip a ` ```json ` or plain ` ``` ` code fence,
//! then fall back to a brace-balanced scan for the first top-level `{...}`).
//! `spec.md` §4.6 and §8 both call out this tolerance as a tested property.

// ============================================================================
// SECTION: Imports
// ============================================================================

use narrative_core::ActionName;
use narrative_core::ChatMessage;

use crate::types::FunctionCall;
use crate::types::FunctionSpec;

// ============================================================================
// SECTION: Prompt Construction
// ============================================================================

/// Builds the message list for a provider with no native tool-calling
/// support: the catalogue of legal actions and the required JSON reply
/// shape are spelled out in a system message ahead of `base_prompt`.
#[must_use]
pub fn build_prompt(base_prompt: &str, functions: &[FunctionSpec], messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len() + 2);
    out.push(ChatMessage::system(response_instructions(functions)));
    out.push(ChatMessage::system(base_prompt));
    out.extend(messages.iter().cloned());
    out
}

/// The function-calling instructions embedded in the system prompt, one
/// entry per offered action plus the required reply envelope.
#[must_use]
pub fn response_instructions(functions: &[FunctionSpec]) -> String {
    let mut text = String::from(
        "You must choose exactly one of the following actions and reply with \
         a single JSON object of the shape {\"function\": \"<name>\", \
         \"response\": \"<narrative text>\"}. Do not reply with anything \
         other than that JSON object.\n\nAvailable actions:\n",
    );
    for function in functions {
        text.push_str(&format!("- {}: {}\n", function.name.as_str(), function.description));
    }
    text
}

// ============================================================================
// SECTION: Response Parsing
// ============================================================================

/// Extracts a `{"function": ..., "response": ...}` selection from a model's
/// raw reply. Never fails: an unparseable or missing selection coerces to
/// the `no_action` sentinel with the raw text preserved as the narrative.
#[must_use]
pub fn parse_selection(text: &str) -> FunctionCall {
    match extract_json(text) {
        Some(value) => function_call_from_json(&value, text),
        None => FunctionCall::no_action(text),
    }
}

fn function_call_from_json(value: &serde_json::Value, raw_text: &str) -> FunctionCall {
    let name = value.get("function").and_then(serde_json::Value::as_str);
    let response = value
        .get("response")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(raw_text);

    match name {
        Some(name) => FunctionCall {
            name: ActionName::new(name),
            response: response.to_string(),
        },
        None => FunctionCall::no_action(raw_text),
    }
}

/// Mirrors `_extract_json`: normalize brace-escaping, try a fenced code
/// block first, then fall back to the first balanced `{...}` span.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let normalized = normalize_braces(text);

    if let Some(fenced) = extract_fenced(&normalized) {
        if let Ok(value) = serde_json::from_str(fenced.trim()) {
            return Some(value);
        }
    }

    let span = balanced_brace_span(&normalized)?;
    serde_json::from_str(span).ok()
}

/// Some prompts ask the model to escape literal braces elsewhere in its
/// output with `{{{`/`}}}`; collapse those back to single braces before
/// parsing, same as the original's doubled/tripled-brace normalization.
fn normalize_braces(text: &str) -> String {
    text.replace("{{{", "{").replace("}}}", "}").replace("{{", "{").replace("}}", "}")
}

fn extract_fenced(text: &str) -> Option<&str> {
    let start_marker = text.find("```json").map(|index| index + "```json".len());
    let start = start_marker.or_else(|| text.find("```").map(|index| index + "```".len()))?;
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(&rest[..end])
}

fn balanced_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// SECTION: JSON Fallback Marker
// ============================================================================

/// Marker type naming the JSON-fallback path, for providers that want to
/// select it explicitly rather than relying on trait defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFallback;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_json_object() {
        let call = parse_selection(r#"{"function": "open_door", "response": "It creaks open."}"#);
        assert_eq!(call.name.as_str(), "open_door");
        assert_eq!(call.response, "It creaks open.");
    }

    #[test]
    fn parses_json_wrapped_in_a_fenced_code_block() {
        let text = "Sure thing:\n```json\n{\"function\": \"take_key\", \"response\": \"You pocket it.\"}\n```\nDone.";
        let call = parse_selection(text);
        assert_eq!(call.name.as_str(), "take_key");
    }

    #[test]
    fn parses_json_wrapped_in_a_plain_code_block() {
        let text = "```\n{\"function\": \"wait\", \"response\": \"Time passes.\"}\n```";
        let call = parse_selection(text);
        assert_eq!(call.name.as_str(), "wait");
    }

    #[test]
    fn tolerates_doubled_braces_used_to_escape_literal_braces() {
        let text = r#"{{{"function": "look", "response": "A {dusty} room."}}}"#;
        let call = parse_selection(text);
        assert_eq!(call.name.as_str(), "look");
        assert_eq!(call.response, "A {dusty} room.");
    }

    #[test]
    fn scans_past_prefix_and_suffix_chatter() {
        let text = "Here is my answer! {\"function\": \"flee\", \"response\": \"You run.\"} Hope that helps.";
        let call = parse_selection(text);
        assert_eq!(call.name.as_str(), "flee");
    }

    #[test]
    fn falls_back_to_no_action_when_nothing_parses() {
        let call = parse_selection("I'm not sure what you mean.");
        assert!(call.name.is_no_action());
        assert_eq!(call.response, "I'm not sure what you mean.");
    }

    #[test]
    fn falls_back_to_no_action_when_function_field_is_missing() {
        let call = parse_selection(r#"{"response": "Nothing happens."}"#);
        assert!(call.name.is_no_action());
        assert_eq!(call.response, "Nothing happens.");
    }

    #[test]
    fn falls_back_to_no_action_with_full_raw_text_when_function_field_is_missing_amid_chatter() {
        let text = r#"Well, {"response": "Nothing happens."} anyway"#;
        let call = parse_selection(text);
        assert!(call.name.is_no_action());
        assert_eq!(call.response, text);
    }
}
