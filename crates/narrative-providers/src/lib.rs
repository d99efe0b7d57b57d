// narrative-providers/src/lib.rs
// ============================================================================
// Crate: narrative-providers
// Description: LLM function-call mediator: native tool-calling and JSON fallback (C6).
// Purpose: Build a prompt from the legal action catalogue, call a model, parse its choice.
// Dependencies: narrative-core, async-trait, reqwest, serde_json, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! `narrative-providers` is the one place this workspace talks to an LLM.
//! [`LlmProvider`] exposes the three composable steps `spec.md` §4.6
//! names — `build_prompt`, `call_model`, `parse_selection` — plus the
//! `chat_with_functions` orchestrator that wires them together the same way
//! `game/src/llm/base_provider.py`'s `BaseLLMProvider.chat_with_functions`
//! does. [`json::JsonFallback`] implements the default, provider-agnostic
//! path (embed a JSON schema in the system prompt, parse the model's prose
//! back out); [`http::HttpProvider`] is a concrete OpenAI-compatible
//! transport that can use either path; [`stub::ScriptedProvider`] is a
//! deterministic, networkless stand-in used by tests and the CLI demo.

pub mod http;
pub mod json;
pub mod provider;
pub mod registry;
pub mod stub;
pub mod types;

pub use json::JsonFallback;
pub use provider::LlmProvider;
pub use provider::ProviderError;
pub use registry::ProviderRegistry;
pub use registry::ProviderRegistryError;
pub use types::FunctionCall;
pub use types::FunctionSpec;
pub use types::ProviderResponse;
