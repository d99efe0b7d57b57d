// narrative-providers/src/stub.rs
// ============================================================================
// Module: Scripted Provider
// Description: A deterministic, networkless LlmProvider for tests and demos.
// Purpose: Exercise the session controller without a live model dependency.
// Dependencies: narrative-core, async-trait, tokio
// ============================================================================

//! ## Overview
//! A provider that hands back a pre-scripted answer (or cycles through a
//! queue of them) instead of calling out to a network. Used by
//! `narrative-engine`'s integration tests and the `narrative-cli` demo
//! binary, neither of which should depend on a real model (`spec.md` §8
//! lists "hallucinated/unknown action" and "LLM call fails" as properties
//! that must be testable without one).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use async_trait::async_trait;
use narrative_core::CancellationToken;
use narrative_core::ChatMessage;

use crate::provider::LlmProvider;
use crate::provider::ProviderError;
use crate::types::FunctionCall;
use crate::types::FunctionSpec;
use crate::types::ProviderResponse;

// ============================================================================
// SECTION: Scripted Provider
// ============================================================================

/// A provider that returns a fixed queue of [`FunctionCall`]s, one per
/// call, repeating the last entry once the queue is exhausted.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<FunctionCall>>,
    last: Mutex<FunctionCall>,
    timeout: Duration,
}

impl ScriptedProvider {
    /// Builds a provider that always returns `call`.
    #[must_use]
    pub fn new(call: FunctionCall) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            last: Mutex::new(call),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds a provider that returns each queued call in order, then
    /// repeats the final one for any further calls.
    #[must_use]
    pub fn sequence(calls: impl IntoIterator<Item = FunctionCall>) -> Self {
        let mut queue: VecDeque<FunctionCall> = calls.into_iter().collect();
        let last = queue.pop_back().unwrap_or_else(|| FunctionCall::no_action(""));
        queue.push_back(last.clone());
        Self {
            queue: Mutex::new(queue),
            last: Mutex::new(last),
            timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn supports_native_function_calling(&self) -> bool {
        true
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }

    async fn call_model(
        &self,
        _messages: &[ChatMessage],
        _functions: &[FunctionSpec],
        _cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ProviderError> {
        let next = {
            let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
            match queue.len() {
                0 => None,
                1 => queue.front().cloned(),
                _ => queue.pop_front(),
            }
        };
        let call = match next {
            Some(call) => call,
            None => self.last.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        };

        Ok(ProviderResponse {
            content: call.response.clone(),
            function_call: Some(call),
        })
    }
}
