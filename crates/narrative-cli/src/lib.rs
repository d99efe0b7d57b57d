// narrative-cli/src/lib.rs
// ============================================================================
// Module: Narrative CLI Library
// Description: Shared helpers for the narrative-engine demo CLI.
// Purpose: Resolve a game definition's on-disk location from engine config.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! `game/src/config_loader.py`'s `GameConfig` resolves a game's map file
//! from `maps_directory` + `game_name` rather than taking a raw path; the
//! CLI binary (`src/main.rs`) follows the same convention so a deployment
//! only ever names a game, not a file. The on-disk game definition format
//! itself is out of scope (`spec.md` §1); this module only locates it.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Game definition path resolution from an [`narrative_core::EngineConfig`].
pub mod gamepath;
