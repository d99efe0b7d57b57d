// narrative-providers/src/http.rs
// ============================================================================
// Module: HTTP LLM Provider
// Description: An OpenAI-compatible chat-completions provider.
// Purpose: Talk to a hosted model over HTTP with native tool calling.
// Dependencies: narrative-core, async-trait, reqwest, serde_json, tokio, tracing
// ============================================================================

//! ## Overview
//! A config struct, a built `reqwest::Client`, and bounded timeouts, kept
//! async rather than blocking: `spec.md` §5 requires the provider call to
//! be a genuine suspension point a turn can be cancelled out of, which a
//! blocking client cannot offer. Speaks the OpenAI `/chat/completions`
//! "tools" shape, the de facto standard most hosted and self-hosted model
//! gateways speak natively.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use narrative_core::CancellationToken;
use narrative_core::ChatMessage;
use narrative_core::LlmConfig;
use serde::Deserialize;
use serde::Serialize;

use crate::provider::LlmProvider;
use crate::provider::ProviderError;
use crate::types::FunctionCall;
use crate::types::FunctionSpec;
use crate::types::ProviderResponse;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Endpoint and credential settings for [`HttpProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
    /// Model identifier, e.g. `"gpt-4"`.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens requested per completion.
    pub max_tokens: u32,
    /// Per-call request timeout.
    pub request_timeout: Duration,
    /// Mirrors `debug.llm`: log the full rendered prompt and raw response
    /// at `tracing::debug!` for every call.
    pub debug: bool,
}

impl HttpProviderConfig {
    /// Builds a config from the loaded engine's [`LlmConfig`] plus the
    /// connection details that belong in the environment, not the game
    /// definition (`spec.md` §6 distinguishes API credentials from
    /// gameplay config).
    #[must_use]
    pub fn from_llm_config(config: &LlmConfig, base_url: impl Into<String>, api_key: impl Into<String>, debug: bool) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            debug,
        }
    }
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ToolFunction,
}

#[derive(Debug, Serialize)]
struct ToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<&FunctionSpec> for ToolSpec {
    fn from(spec: &FunctionSpec) -> Self {
        Self {
            kind: "function",
            function: ToolFunction {
                name: spec.name.as_str().to_string(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolCallFunction,
}

#[derive(Debug, Deserialize)]
struct ToolCallFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallArguments {
    response: String,
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// A concrete OpenAI-compatible HTTP provider with native tool calling.
pub struct HttpProvider {
    config: HttpProviderConfig,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Builds a provider from connection config.
    ///
    /// # Errors
    /// Returns [`ProviderError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    fn supports_native_function_calling(&self) -> bool {
        true
    }

    fn request_timeout(&self) -> Duration {
        self.config.request_timeout
    }

    fn debug_enabled(&self) -> bool {
        self.config.debug
    }

    fn build_prompt(&self, base_prompt: &str, _functions: &[FunctionSpec], messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(messages.len() + 1);
        out.push(ChatMessage::system(base_prompt));
        out.extend(messages.iter().cloned());
        out
    }

    async fn call_model(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionSpec],
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: functions.iter().map(ToolSpec::from).collect(),
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let send = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send();

        let response = tokio::select! {
            result = send => result.map_err(|error| ProviderError::Transport(error.to_string()))?,
            () = wait_for_cancel(cancel) => return Err(ProviderError::Cancelled),
        };

        let completion: ChatCompletion = response
            .error_for_status()
            .map_err(|error| ProviderError::Transport(error.to_string()))?
            .json()
            .await
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Transport("model returned no choices".to_string()))?;

        let function_call = choice.message.tool_calls.into_iter().next().map(|call| {
            let response = serde_json::from_str::<ToolCallArguments>(&call.function.arguments)
                .map(|arguments| arguments.response)
                .unwrap_or(call.function.arguments);
            FunctionCall {
                name: narrative_core::ActionName::new(call.function.name),
                response,
            }
        });

        Ok(ProviderResponse {
            content: choice.message.content.unwrap_or_default(),
            function_call,
        })
    }
}

async fn wait_for_cancel(cancel: &CancellationToken) {
    while !cancel.is_cancelled() {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config() -> LlmConfig {
        LlmConfig {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            max_history_length: 20,
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn debug_enabled_mirrors_the_configured_debug_flag() {
        let config = HttpProviderConfig::from_llm_config(&llm_config(), "https://api.openai.com/v1", "key", true);
        let provider = HttpProvider::new(config).expect("valid client");
        assert!(provider.debug_enabled());
    }

    #[test]
    fn debug_disabled_by_default() {
        let config = HttpProviderConfig::from_llm_config(&llm_config(), "https://api.openai.com/v1", "key", false);
        let provider = HttpProvider::new(config).expect("valid client");
        assert!(!provider.debug_enabled());
    }
}
