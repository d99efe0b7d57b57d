// narrative-cli/src/gamepath.rs
// ============================================================================
// Module: Game Path Resolution
// Description: Locates a game definition file from `maps_directory`/`game_name`.
// Purpose: Keep deployments naming a game, not a file path, per the original.
// Dependencies: narrative-core
// ============================================================================

//! ## Overview
//! Mirrors `game/src/config_loader.py`'s `GameConfig.get_map_file_path`:
//! try each recognized extension under `maps_directory`, in order, and
//! take the first one that exists on disk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use narrative_core::EngineConfig;

/// Extensions tried, in order, when resolving a game definition file.
const CANDIDATE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure locating a game definition file on disk.
#[derive(Debug, thiserror::Error)]
pub enum GamePathError {
    /// None of the candidate extensions exist under `maps_directory`.
    #[error("no game definition found for '{game_name}' under '{maps_directory}' (tried {extensions})")]
    NotFound {
        /// The configured game name.
        game_name: String,
        /// The configured maps directory.
        maps_directory: String,
        /// The extensions that were tried, joined by commas.
        extensions: String,
    },
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves `config.maps_directory/config.game_name.<ext>` to the first
/// extension that exists on disk.
///
/// # Errors
/// Returns [`GamePathError::NotFound`] if no candidate file exists.
pub fn resolve(config: &EngineConfig) -> Result<PathBuf, GamePathError> {
    let directory = Path::new(&config.maps_directory);
    for extension in CANDIDATE_EXTENSIONS {
        let candidate = directory.join(format!("{}.{extension}", config.game_name));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(GamePathError::NotFound {
        game_name: config.game_name.clone(),
        maps_directory: config.maps_directory.clone(),
        extensions: CANDIDATE_EXTENSIONS.join(", "),
    })
}
