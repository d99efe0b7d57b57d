// narrative-cli/tests/play_command.rs
// ============================================================================
// Module: CLI Play Command Tests
// Description: Integration tests for `narrative play` in scripted mode.
// Purpose: Ensure a scripted playthrough prints each turn's narrative in order.
// Dependencies: narrative-cli binary
// ============================================================================

//! ## Overview
//! Drives the compiled `narrative` binary through a scripted playthrough
//! (no `--live`, no network) by spawning the real process rather than
//! calling into the library in-process.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn narrative_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_narrative"))
}

fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock drift").as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("narrative-cli-{label}-{nanos}"));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

fn cleanup(path: &PathBuf) {
    let _ = fs::remove_dir_all(path);
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies a scripted two-turn playthrough prints the welcome prompt's
/// narrative followed by each scripted turn's narrative, in order.
#[test]
fn play_replays_a_scripted_turn_sequence_in_order() {
    let root = temp_root("play-scripted");

    let game = r#"{
        "initial_state": "Start",
        "welcome_prompt": "Begin.",
        "states": {
            "Start": { "description": "A quiet room." },
            "Hall": { "description": "A long hall." }
        },
        "actions": [
            { "state_before": "Start", "state_after": "Hall", "name": "go_hall", "prompts": { "description": "Walk into the hall." } }
        ]
    }"#;
    fs::write(root.join("castle.json"), game).expect("write game definition");

    let config = format!("game_name = \"castle\"\nmaps_directory = \"{}\"\n\n[llm]\nprovider = \"openai\"\nmodel = \"gpt-4\"\n", root.to_string_lossy());
    let config_path = root.join("engine.toml");
    fs::write(&config_path, config).expect("write engine config");

    let turns = r#"{
        "start_narrative": "Begin.",
        "turns": [
            { "input": "look around", "action": "no_action", "narrative": "A dusty room." },
            { "input": "go to the hall", "action": "go_hall", "narrative": "You step into the hall." }
        ]
    }"#;
    let turns_path = root.join("turns.json");
    fs::write(&turns_path, turns).expect("write turns file");

    let output = Command::new(narrative_bin())
        .args([
            "play",
            "--config",
            config_path.to_string_lossy().as_ref(),
            "--turns",
            turns_path.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run play");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Begin.", "A dusty room.", "You step into the hall."]);

    cleanup(&root);
}

/// Verifies `play` without `--live` requires `--turns`.
#[test]
fn play_requires_turns_file_when_not_live() {
    let root = temp_root("play-missing-turns");
    let game = r#"{ "initial_state": "Start", "states": { "Start": { "description": "A quiet room." } } }"#;
    fs::write(root.join("castle.json"), game).expect("write game definition");
    let config = format!("game_name = \"castle\"\nmaps_directory = \"{}\"\n\n[llm]\nprovider = \"openai\"\nmodel = \"gpt-4\"\n", root.to_string_lossy());
    let config_path = root.join("engine.toml");
    fs::write(&config_path, config).expect("write engine config");

    let output = Command::new(narrative_bin())
        .args(["play", "--config", config_path.to_string_lossy().as_ref()])
        .output()
        .expect("run play");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--turns is required"), "unexpected stderr: {stderr}");

    cleanup(&root);
}
