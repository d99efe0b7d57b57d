// narrative-providers/src/registry.rs
// ============================================================================
// Module: Provider Registry
// Description: Resolves an `EngineConfig`'s `llm.provider` string to a provider.
// Purpose: Keep the session controller decoupled from concrete provider types.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! A small lookup from a provider identifier string to a concrete
//! [`crate::LlmProvider`], narrowed to this workspace's
//! single-provider-per-session shape: `spec.md` §6 names one
//! `llm.provider` per game, not a routed set of providers per query.
//! [`ProviderRegistry::resolve`] is the one seam a deployment extends to
//! add a provider identifier without touching
//! `narrative-engine`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use narrative_core::LlmConfig;

use crate::http::HttpProvider;
use crate::http::HttpProviderConfig;
use crate::provider::LlmProvider;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure resolving a configured provider identifier.
#[derive(Debug, thiserror::Error)]
pub enum ProviderRegistryError {
    /// `llm.provider` named an identifier this registry does not know.
    #[error("unknown llm provider: {0}")]
    UnknownProvider(String),
    /// The resolved provider could not be constructed.
    #[error("failed to build llm provider: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Connection Details
// ============================================================================

/// Deployment-supplied connection details kept out of the game definition:
/// API base URL and credential (`spec.md` §6 separates gameplay config from
/// secrets).
#[derive(Debug, Clone)]
pub struct ProviderConnection {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Bearer token for the configured provider.
    pub api_key: String,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Resolves `llm.provider` identifiers to a boxed [`LlmProvider`].
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Builds the provider named by `config.provider`.
    ///
    /// Recognizes `"openai"` and any other identifier that speaks the
    /// OpenAI-compatible chat-completions wire format (`"openai-compatible"`,
    /// `"azure-openai"`) as an [`HttpProvider`]; any other identifier is
    /// rejected so misconfiguration fails fast at startup rather than at the
    /// first turn.
    ///
    /// `debug_llm` mirrors the engine's `debug.llm` setting and is threaded
    /// into the resolved provider so it logs the full rendered prompt and
    /// raw response for every call.
    ///
    /// # Errors
    /// Returns [`ProviderRegistryError::UnknownProvider`] for an
    /// unrecognized identifier, or [`ProviderRegistryError::Build`] if the
    /// resolved provider's client cannot be constructed.
    pub fn resolve(config: &LlmConfig, connection: &ProviderConnection, debug_llm: bool) -> Result<Arc<dyn LlmProvider>, ProviderRegistryError> {
        match config.provider.as_str() {
            "openai" | "openai-compatible" | "azure-openai" => {
                let http_config =
                    HttpProviderConfig::from_llm_config(config, connection.base_url.clone(), connection.api_key.clone(), debug_llm);
                let provider = HttpProvider::new(http_config).map_err(|error| ProviderRegistryError::Build(error.to_string()))?;
                Ok(Arc::new(provider))
            }
            other => Err(ProviderRegistryError::UnknownProvider(other.to_string())),
        }
    }
}
