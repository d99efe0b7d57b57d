// narrative-core/src/core/config.rs
// ============================================================================
// Module: Engine Configuration
// Description: Deserializable engine configuration with documented defaults.
// Purpose: Central configuration surface for LLM, debug, and game settings.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`EngineConfig`] mirrors `spec.md` §6's configuration table. Every field
//! has a documented default so a config file may omit anything it doesn't
//! need to override, matching `config_loader.py`'s `GameConfig` defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: LLM Configuration
// ============================================================================

/// LLM provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider identifier, e.g. `"openai"`.
    pub provider: String,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens requested per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum number of retained history turns.
    #[serde(default = "default_max_history_length")]
    pub max_history_length: usize,
    /// Per-call request timeout, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

const fn default_temperature() -> f64 {
    0.1
}

const fn default_max_tokens() -> u32 {
    2000
}

const fn default_max_history_length() -> usize {
    crate::core::history::DEFAULT_MAX_HISTORY_LENGTH
}

const fn default_request_timeout_seconds() -> u64 {
    30
}

// ============================================================================
// SECTION: Debug Configuration
// ============================================================================

/// Debug/diagnostic toggles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// When true, log the raw request and response exchanged with the LLM
    /// provider (`spec.md`'s supplemented debug dump feature).
    #[serde(default)]
    pub llm: bool,
}

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the loaded game.
    pub game_name: String,
    /// Directory holding ambient/effect sound assets, resolved by the
    /// jukebox plug relative to this path.
    pub maps_directory: String,
    /// LLM provider settings.
    pub llm: LlmConfig,
    /// Debug/diagnostic toggles.
    #[serde(default)]
    pub debug: DebugConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_config_defaults_match_documented_values() {
        let json = serde_json::json!({ "provider": "openai", "model": "gpt-4" });
        let config: LlmConfig = serde_json::from_value(json).expect("valid minimal llm config");
        assert!((config.temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.max_history_length, 20);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn debug_config_defaults_to_disabled() {
        let config = DebugConfig::default();
        assert!(!config.llm);
    }
}
