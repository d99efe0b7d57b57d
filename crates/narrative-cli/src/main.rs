#![cfg_attr(
    test,
    allow(
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
    )
)]
// narrative-cli/src/main.rs
// ============================================================================
// Module: Narrative CLI Entry Point
// Description: Command dispatcher for the narrative-engine demo binary.
// Purpose: Validate game definitions and drive interactive/scripted sessions.
// Dependencies: clap, narrative-core, narrative-providers, narrative-broker, narrative-engine, tokio.
// ============================================================================

//! ## Overview
//! The narrative CLI is the small demo binary `spec.md` §6's external
//! interface is exercised through: `validate` loads and builds a game
//! definition without starting a session; `play` builds a
//! [`narrative_engine::GameEngine`] and drives turns either interactively
//! (`--live`, against a real OpenAI-compatible provider resolved by
//! [`narrative_providers::ProviderRegistry`]) or against a scripted
//! playthrough file and [`narrative_providers::stub::ScriptedProvider`],
//! exercising the engine end to end without a live model dependency.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use narrative_broker::CallbackSink;
use narrative_broker::EventSink;
use narrative_broker::NullJukebox;
use narrative_broker::NullNarrator;
use narrative_broker::OutboundEvent;
use narrative_broker::SinkError;
use narrative_core::ActionName;
use narrative_core::EngineConfig;
use narrative_core::GameDefinitionSource;
use narrative_core::LoadedGame;
use narrative_core::SessionId;
use narrative_core::Timestamp;
use narrative_engine::GameEngine;
use narrative_providers::LlmProvider;
use narrative_providers::ProviderRegistry;
use narrative_providers::registry::ProviderConnection;
use narrative_providers::stub::ScriptedProvider;
use narrative_providers::types::FunctionCall;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "narrative", arg_required_else_help = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Loads and validates a game definition named by an engine config.
    Validate(ValidateCommand),
    /// Plays a session, live or scripted, against the loaded game.
    Play(PlayCommand),
}

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to an `EngineConfig` file (TOML or YAML).
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
}

/// Arguments for the `play` command.
#[derive(Args, Debug)]
struct PlayCommand {
    /// Path to an `EngineConfig` file (TOML or YAML).
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    /// Talk to a real OpenAI-compatible provider instead of replaying a
    /// scripted playthrough. Requires `--base-url`/`--api-key` (or their
    /// environment variable equivalents) and reads turns interactively
    /// from stdin.
    #[arg(long, action = ArgAction::SetTrue)]
    live: bool,
    /// Scripted playthrough file (`{"start_narrative", "turns"}`), required
    /// unless `--live` is set.
    #[arg(long, value_name = "PATH")]
    turns: Option<PathBuf>,
    /// Base URL of an OpenAI-compatible API. Falls back to
    /// `NARRATIVE_LLM_BASE_URL`. Required with `--live`.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Bearer token for the configured provider. Falls back to
    /// `NARRATIVE_LLM_API_KEY`. Required with `--live`.
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

// ============================================================================
// SECTION: Scripted Playthrough Shape
// ============================================================================

/// A scripted playthrough file, read by `play` when `--live` is not set.
#[derive(Debug, Deserialize)]
struct ScriptedPlaythrough {
    /// Narrative returned for the opening `startGame` call.
    start_narrative: String,
    /// Each subsequent player turn, replayed in order.
    turns: Vec<ScriptedTurn>,
}

/// One turn of a scripted playthrough file.
#[derive(Debug, Deserialize)]
struct ScriptedTurn {
    /// The player input text for this turn.
    input: String,
    /// The action name the scripted provider claims to have chosen.
    action: String,
    /// The narrative text the scripted provider returns for this turn.
    narrative: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a single display message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a [`CliError`] from any displayable cause.
    fn new(message: impl std::fmt::Display) -> Self {
        Self { message: message.to_string() }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate(command) => command_validate(&command),
        Commands::Play(command) => command_play(command).await,
    }
}

// ============================================================================
// SECTION: Shared Loading
// ============================================================================

/// Loads an [`EngineConfig`] from TOML or YAML, dispatched by extension.
fn load_engine_config(path: &Path) -> CliResult<EngineConfig> {
    let text = fs::read_to_string(path).map_err(|error| CliError::new(format!("reading config '{}': {error}", path.display())))?;
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&text).map_err(|error| CliError::new(format!("parsing config '{}' as yaml: {error}", path.display())))
        }
        _ => toml::from_str(&text).map_err(|error| CliError::new(format!("parsing config '{}' as toml: {error}", path.display()))),
    }
}

/// Resolves and loads the game definition named by `config`.
fn load_game(config: &EngineConfig) -> CliResult<LoadedGame> {
    let path = narrative_cli::gamepath::resolve(config).map_err(|error| CliError::new(error.to_string()))?;
    let text = fs::read_to_string(&path).map_err(|error| CliError::new(format!("reading game definition '{}': {error}", path.display())))?;
    let source = match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml" | "yml") => GameDefinitionSource::from_yaml_str(&text),
        _ => GameDefinitionSource::from_json_str(&text),
    }
    .map_err(|error| CliError::new(format!("parsing game definition '{}': {error}", path.display())))?;
    source.build().map_err(|error| CliError::new(format!("validating game definition '{}': {error}", path.display())))
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes the `validate` command.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_engine_config(&command.config)?;
    let game = load_game(&config)?;

    write_stdout_line(&format!(
        "ok: '{}' loaded ({} states, {} actions, initial state '{}')",
        config.game_name,
        game.states.len(),
        game.actions.len(),
        game.initial_state
    ))
    .map_err(|error| CliError::new(format!("writing to stdout: {error}")))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Play Command
// ============================================================================

/// Executes the `play` command.
async fn command_play(command: PlayCommand) -> CliResult<ExitCode> {
    let config = load_engine_config(&command.config)?;
    let game = load_game(&config)?;

    let sink: Arc<dyn EventSink> = Arc::new(CallbackSink::new(print_text_events));

    if command.live {
        play_live(config, game, &command, sink).await
    } else {
        play_scripted(config, game, &command, sink).await
    }
}

/// Delivers `Text` events to stdout and logs everything else at
/// `tracing::info!`, mirroring the narrator's own fire-and-forget posture.
fn print_text_events(event: &OutboundEvent) -> Result<(), SinkError> {
    match event {
        OutboundEvent::Text { narrative } => {
            write_stdout_line(narrative).map_err(|error| SinkError::DeliveryFailed(error.to_string()))
        }
        OutboundEvent::StateChange { previous, current, action } => {
            tracing::info!(from = %previous, to = %current, action = %action, "state change");
            Ok(())
        }
        OutboundEvent::InventoryUpdate { variables } => {
            tracing::info!(count = variables.len(), "inventory update");
            Ok(())
        }
        OutboundEvent::SoundEffect { file, .. } => {
            tracing::info!(file = %file, "sound effect");
            Ok(())
        }
        OutboundEvent::AmbientSound { file, .. } => {
            tracing::info!(file = file.as_deref().unwrap_or("(stop)"), "ambient sound");
            Ok(())
        }
        OutboundEvent::Error { kind, details } => {
            tracing::warn!(kind = %kind, details = %details, "engine error event");
            Ok(())
        }
    }
}

/// Runs an interactive session against a real provider.
async fn play_live(config: EngineConfig, game: LoadedGame, command: &PlayCommand, sink: Arc<dyn EventSink>) -> CliResult<ExitCode> {
    let base_url = command
        .base_url
        .clone()
        .or_else(|| std::env::var("NARRATIVE_LLM_BASE_URL").ok())
        .ok_or_else(|| CliError::new("--live requires --base-url or NARRATIVE_LLM_BASE_URL"))?;
    let api_key = command
        .api_key
        .clone()
        .or_else(|| std::env::var("NARRATIVE_LLM_API_KEY").ok())
        .ok_or_else(|| CliError::new("--live requires --api-key or NARRATIVE_LLM_API_KEY"))?;

    let connection = ProviderConnection { base_url, api_key };
    let provider =
        ProviderRegistry::resolve(&config.llm, &connection, config.debug.llm).map_err(|error| CliError::new(error.to_string()))?;

    let mut engine = build_engine(game, provider, sink, config.llm.max_history_length)?;
    let session = SessionId::new("cli-session");

    let mut turn_number: i64 = 0;
    let _ = engine.start_game(&session, Timestamp::from_unix_millis(turn_number)).await;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|error| CliError::new(format!("reading stdin: {error}")))?;
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        turn_number += 1;
        let _outcome = engine.process_input(&session, &line, Timestamp::from_unix_millis(turn_number)).await;
    }

    Ok(ExitCode::SUCCESS)
}

/// Replays a scripted playthrough file against [`ScriptedProvider`].
async fn play_scripted(config: EngineConfig, game: LoadedGame, command: &PlayCommand, sink: Arc<dyn EventSink>) -> CliResult<ExitCode> {
    let turns_path = command.turns.as_ref().ok_or_else(|| CliError::new("--turns is required unless --live is set"))?;
    let text = fs::read_to_string(turns_path).map_err(|error| CliError::new(format!("reading turns '{}': {error}", turns_path.display())))?;
    let playthrough: ScriptedPlaythrough =
        serde_json::from_str(&text).map_err(|error| CliError::new(format!("parsing turns '{}': {error}", turns_path.display())))?;

    let start_call = FunctionCall::no_action(playthrough.start_narrative.clone());
    let turn_calls = playthrough.turns.iter().map(|turn| FunctionCall { name: ActionName::new(turn.action.clone()), response: turn.narrative.clone() });
    let provider: Arc<dyn LlmProvider> = Arc::new(ScriptedProvider::sequence(std::iter::once(start_call).chain(turn_calls)));

    let mut engine = build_engine(game, provider, sink, config.llm.max_history_length)?;
    let session = SessionId::new("cli-session");

    let _ = engine.start_game(&session, Timestamp::from_unix_millis(0)).await;
    for (index, turn) in playthrough.turns.iter().enumerate() {
        let turn_number = i64::try_from(index + 1).map_err(|_| CliError::new("too many scripted turns"))?;
        let _outcome = engine.process_input(&session, &turn.input, Timestamp::from_unix_millis(turn_number)).await;
    }

    Ok(ExitCode::SUCCESS)
}

/// Builds a [`GameEngine`] with headless audio/narrator collaborators,
/// since the CLI demo has no mixer or speech backend.
fn build_engine(game: LoadedGame, provider: Arc<dyn LlmProvider>, sink: Arc<dyn EventSink>, max_history_length: usize) -> CliResult<GameEngine> {
    GameEngine::new(game, provider, sink, Arc::new(NullJukebox), Arc::new(NullNarrator), max_history_length)
        .map_err(|error| CliError::new(error.to_string()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
