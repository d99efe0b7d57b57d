// narrative-providers/src/provider.rs
// ============================================================================
// Module: LLM Provider Trait
// Description: The three-step provider contract plus its convenience orchestrator.
// Purpose: Let native tool-calling and JSON-fallback providers share one pipeline.
// Dependencies: narrative-core, async-trait, tokio, thiserror
// ============================================================================

//! ## Overview
//! `build_prompt → call_model → parse_selection` mirrors
//! `game/src/llm/base_provider.py`'s new 3-step API exactly
//! (`spec.md` §4.6, §9 "Dual function-calling paths"). A provider that
//! natively supports tool calling overrides `build_prompt` (to omit JSON
//! instructions) and `call_model` (to pass `functions` as the tool
//! catalogue and read `function_call` off the response); everything else,
//! including the request timeout and the orchestration in
//! `chat_with_functions`, is shared.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use narrative_core::CancellationToken;
use narrative_core::ChatMessage;

use crate::json;
use crate::types::FunctionSpec;
use crate::types::ProviderResponse;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reaching or using a model provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The call did not complete within the configured timeout
    /// (`spec.md` §6 `llm.request_timeout_seconds`, default 30s).
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    /// The call was aborted via its [`CancellationToken`] (`spec.md` §5).
    #[error("model call was cancelled")]
    Cancelled,
    /// The underlying transport (HTTP, etc.) failed.
    #[error("model provider transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: LLM Provider
// ============================================================================

/// A pluggable LLM function-call mediator (`spec.md` §4.6, §6).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// True if this provider's underlying API natively returns a structured
    /// function selection (tool calling); false if it must be steered with
    /// JSON-schema instructions embedded in the prompt.
    fn supports_native_function_calling(&self) -> bool;

    /// The configured per-call timeout; `chat_with_functions` aborts the
    /// call after this elapses.
    fn request_timeout(&self) -> Duration;

    /// True if `debug.llm` is set for this provider, in which case
    /// `chat_with_functions` logs the full rendered prompt and raw model
    /// response at `tracing::debug!`, mirroring
    /// `game/src/debug_utils.py`'s `print_llm_debug`/`print_llm_response`.
    /// Defaults to false; providers built from an engine's `debug.llm`
    /// setting override this accordingly.
    fn debug_enabled(&self) -> bool {
        false
    }

    /// Builds the full message list sent to the model. The default is the
    /// JSON-fallback path: inline function-calling instructions in the
    /// system message. Native providers override this to leave
    /// `base_prompt` untouched and pass `functions` to `call_model` instead.
    fn build_prompt(&self, base_prompt: &str, functions: &[FunctionSpec], messages: &[ChatMessage]) -> Vec<ChatMessage> {
        json::build_prompt(base_prompt, functions, messages)
    }

    /// Performs the network call. If [`LlmProvider::supports_native_function_calling`]
    /// is true, `functions` is forwarded as the tool catalogue and the
    /// returned [`ProviderResponse::function_call`] should already be
    /// populated when the model chose one; otherwise `functions` is
    /// informational only and `function_call` is left `None` for
    /// `chat_with_functions` to fill in via [`LlmProvider::parse_selection`].
    ///
    /// # Errors
    /// Returns [`ProviderError`] on timeout, cancellation, or transport
    /// failure.
    async fn call_model(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionSpec],
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ProviderError>;

    /// The JSON-fallback parse path: extract `{"response": ..., "function":
    /// ...}` from the model's prose. Tolerates code fences, doubled/tripled
    /// braces, and prefix/suffix chatter; an unparseable or missing
    /// selection coerces to the `no_action` sentinel with the raw text
    /// preserved (`spec.md` §4.6).
    fn parse_selection(&self, text: &str) -> crate::types::FunctionCall {
        json::parse_selection(text)
    }

    /// Orchestrates the three steps, applying the configured timeout and
    /// honoring `cancel`. This is what the session controller calls every
    /// turn (`spec.md` §4.8's `llm.chatWithFunctions`).
    ///
    /// # Errors
    /// Returns [`ProviderError`] if the call times out, is cancelled, or the
    /// transport fails; the JSON-fallback parse step itself never errors
    /// (an unparseable response coerces to `no_action`).
    async fn chat_with_functions(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionSpec],
        base_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        let prompt_messages = self.build_prompt(base_prompt, functions, messages);

        if self.debug_enabled() {
            tracing::debug!(prompt = %render_messages(&prompt_messages), "sending prompt to llm provider");
        }

        let timeout = self.request_timeout();
        let call = self.call_model(&prompt_messages, functions, cancel);
        let mut response = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result?,
            Err(_elapsed) => return Err(ProviderError::Timeout(timeout)),
        };

        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        if self.debug_enabled() {
            tracing::debug!(response = %response.content, "received raw llm response");
        }

        if response.function_call.is_none() {
            let call = self.parse_selection(&response.content);
            response.content = call.response.clone();
            response.function_call = Some(call);
        }

        Ok(response)
    }
}

/// Renders a message list as `role: content` lines for the debug dump.
fn render_messages(messages: &[ChatMessage]) -> String {
    messages.iter().map(|message| format!("{}: {}", message.role, message.content)).collect::<Vec<_>>().join("\n")
}
