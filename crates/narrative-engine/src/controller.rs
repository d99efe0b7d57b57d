// narrative-engine/src/controller.rs
// ============================================================================
// Module: Session Controller
// Description: Per-turn orchestration: prompt build, model call, fire, dispatch (C8).
// Purpose: Implement spec.md §4.8's processTurn algorithm exactly once per turn.
// Dependencies: narrative-core, narrative-providers, narrative-broker, tokio, tracing
// ============================================================================

//! ## Overview
//! Mirrors `game_v2/src/game_controller.py`'s `process_turn`/`start_game`:
//! render the base prompt from identity, behaviour, and the current state's
//! description; ask the state machine for the legal action set; hand both
//! to the LLM provider's `chat_with_functions`; validate the selection
//! against the offered catalogue (a name the model invented that was never
//! offered is coerced to `no_action`, §4.6); fire the chosen action;
//! dispatch audio and outbound events; append one history entry; and,
//! without awaiting it, hand the narrative to a [`Narrator`] (§4.8, §5 —
//! "the narrative return value to the caller must not wait for audio
//! synthesis to complete"). Exactly one model call happens per turn (§9,
//! "Open question... preserve the one-call default").

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use narrative_broker::AudioDispatch;
use narrative_broker::EventSink;
use narrative_broker::Jukebox;
use narrative_broker::Narrator;
use narrative_broker::OutboundEvent;
use narrative_core::Action;
use narrative_core::ActionName;
use narrative_core::CancellationToken;
use narrative_core::ChatMessage;
use narrative_core::History;
use narrative_core::HistoryEntry;
use narrative_core::Inventory;
use narrative_core::Renderer;
use narrative_core::SessionId;
use narrative_core::StateMachine;
use narrative_core::StateName;
use narrative_core::Timestamp;
use narrative_core::VarName;
use narrative_core::Value;
use narrative_providers::FunctionSpec;
use narrative_providers::LlmProvider;
use narrative_providers::ProviderError;

// ============================================================================
// SECTION: Turn Outcome
// ============================================================================

/// The result of one `process_turn`/`start_game` call, matching §6's
/// `processInput`/`startGame` return shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Narrative text produced for this turn.
    pub narrative: String,
    /// The action that actually fired, if any (`no_action` selections and
    /// vetoed/unavailable selections leave this `None`).
    pub executed_action: Option<ActionName>,
    /// The state the session is in after this turn.
    pub current_state: StateName,
    /// A full snapshot of inventory variables after this turn.
    pub inventory: HashMap<VarName, Value>,
}

// ============================================================================
// SECTION: Session Controller
// ============================================================================

/// Orchestrates one turn at a time for a single session.
///
/// Does not itself own the [`StateMachine`] or [`Inventory`] — those belong
/// to [`crate::facade::GameEngine`], which borrows them into every call so
/// a hot reload (§4.9 `reinitializeFromMemory`) can swap them out without
/// rebuilding the controller's provider/sink/history wiring.
pub struct SessionController {
    provider: Arc<dyn LlmProvider>,
    sink: Arc<dyn EventSink>,
    audio: AudioDispatch<Arc<dyn Jukebox>, Arc<dyn EventSink>>,
    narrator: Arc<dyn Narrator>,
    renderer: Renderer,
    history: History,
    identity: String,
    behaviour: String,
    welcome_prompt: String,
    next_turn: u64,
    request_cancel: CancellationToken,
}

impl SessionController {
    /// Builds a controller from its collaborators and base-prompt text.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        sink: Arc<dyn EventSink>,
        jukebox: Arc<dyn Jukebox>,
        narrator: Arc<dyn Narrator>,
        max_history_length: usize,
        identity: impl Into<String>,
        behaviour: impl Into<String>,
        welcome_prompt: impl Into<String>,
    ) -> Self {
        Self {
            audio: AudioDispatch::new(Arc::clone(&jukebox), Arc::clone(&sink)),
            provider,
            sink,
            narrator,
            renderer: Renderer::new(),
            history: History::new(max_history_length),
            identity: identity.into(),
            behaviour: behaviour.into(),
            welcome_prompt: welcome_prompt.into(),
            next_turn: 1,
            request_cancel: CancellationToken::new(),
        }
    }

    /// The retained turn history; read by `status()`-style callers and
    /// cleared by a hot reload.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Clears retained history, used by `reinitializeFromMemory`/`setState`
    /// (§4.9, §6) so a hot-swapped definition starts with a clean slate.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.next_turn = 1;
    }

    /// Cancels any in-flight model call for this controller. Used when a
    /// session is torn down mid-turn (§5 "Cancellation").
    pub fn cancel_in_flight(&self) {
        self.request_cancel.cancel();
    }

    /// Processes the configured welcome prompt as the first user turn, so
    /// the opening narrative is model-generated and in character (§4.8
    /// "startGame is a variant that sends the configured welcome prompt").
    pub async fn start_game(&mut self, session: &SessionId, state_machine: &mut StateMachine, inventory: &mut Inventory, now: Timestamp) -> TurnOutcome {
        let welcome_prompt = self.welcome_prompt.clone();
        self.process_turn(session, state_machine, inventory, &welcome_prompt, now).await
    }

    /// Runs one full turn: build prompt, call the model, validate and fire
    /// the selection, dispatch side effects, append history.
    pub async fn process_turn(
        &mut self,
        session: &SessionId,
        state_machine: &mut StateMachine,
        inventory: &mut Inventory,
        user_text: &str,
        now: Timestamp,
    ) -> TurnOutcome {
        let base_prompt = self.render_base_prompt(state_machine, inventory);
        let (offered, catalogue) = self.build_catalogue(state_machine, inventory);

        let mut messages = self.history.to_llm_messages(&base_prompt);
        messages.push(ChatMessage::user(user_text.to_string()));

        let response = self.provider.chat_with_functions(&messages, &catalogue, &base_prompt, &self.request_cancel).await;

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                return self.record_call_failure(session, state_machine, inventory, &error);
            }
        };

        let offered_names: HashSet<ActionName> = offered.iter().map(|spec| spec.name.clone()).collect();

        let (mut narrative, requested) = match response.function_call {
            Some(call) => (call.response, call.name),
            None => (response.content, ActionName::no_action()),
        };

        let chosen = if requested.is_no_action() || !offered_names.contains(&requested) {
            ActionName::no_action()
        } else {
            requested
        };

        let mut executed_action = None;
        let mut success = true;

        if !chosen.is_no_action() {
            let previous_state = state_machine.current_state().clone();
            let outcome = state_machine.execute(&chosen, inventory);
            if outcome.success {
                let fired_action = find_action(state_machine, &chosen);
                let new_state = state_machine.current_state().clone();

                if fired_action.as_ref().is_some_and(|action| !action.data().scripts.is_empty()) {
                    self.emit(&OutboundEvent::InventoryUpdate {
                        variables: inventory.to_map().into_iter().map(|(name, value)| (name.to_string(), value)).collect(),
                    });
                }

                if let Some(action) = &fired_action {
                    self.audio.dispatch(session, action, &previous_state, &new_state);
                    if previous_state.name != new_state.name {
                        self.emit(&OutboundEvent::StateChange {
                            previous: previous_state.name.clone(),
                            current: new_state.name.clone(),
                            action: chosen.clone(),
                        });
                        tracing::info!(from = %previous_state.name, to = %new_state.name, "state transition fired");
                    } else {
                        tracing::info!(action = %chosen, "trigger fired");
                    }
                }

                executed_action = Some(chosen.clone());
            } else {
                success = false;
                narrative = format!("{narrative} (failed: {})", outcome.message);
            }
        }

        self.emit(&OutboundEvent::Text { narrative: narrative.clone() });

        let turn_number = self.next_turn;
        self.next_turn += 1;
        self.history.append(HistoryEntry {
            turn_number,
            timestamp: now,
            user_text: user_text.to_string(),
            base_prompt,
            offered_actions: offered,
            narrative: narrative.clone(),
            chosen_action: chosen,
            success,
        });

        self.narrator.stop_current(session);
        let tts_cancel = CancellationToken::new();
        self.narrator.speak(session, &narrative, tts_cancel);

        TurnOutcome {
            narrative,
            executed_action,
            current_state: state_machine.current_state().name.clone(),
            inventory: inventory.to_map(),
        }
    }

    /// Builds the identity + behaviour + rendered current-state description
    /// base prompt (§4.8 `renderBasePrompt`).
    fn render_base_prompt(&self, state_machine: &StateMachine, inventory: &Inventory) -> String {
        let description = self.renderer.render(&state_machine.current_state().description, &inventory.to_map());
        [self.identity.as_str(), self.behaviour.as_str(), description.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Computes the legal action set and builds the parallel
    /// model-facing catalogue, always including the `no_action` sentinel
    /// (§4.6, §4.8).
    fn build_catalogue(&self, state_machine: &mut StateMachine, inventory: &mut Inventory) -> (Vec<ActionName>, Vec<FunctionSpec>) {
        let mut names = Vec::new();
        let mut specs = Vec::new();
        for action in state_machine.available_actions(inventory) {
            let data = action.data();
            let description = if data.prompts.after_fire.is_empty() {
                data.prompts.description.clone()
            } else {
                format!("{} {}", data.prompts.description, data.prompts.after_fire)
            };
            names.push(data.name.clone());
            specs.push(FunctionSpec::new(data.name.clone(), description));
        }
        names.push(ActionName::no_action());
        specs.push(FunctionSpec::no_action());
        (names, specs)
    }

    /// Handles a model call failure (timeout, cancellation, transport
    /// error): a canned apology narrative is returned, no state mutation
    /// occurs, and — per `spec.md` §7 — no history entry is appended
    /// (`"Model call timeout / network" -> abort turn ... no history
    /// append`).
    fn record_call_failure(&self, session: &SessionId, state_machine: &StateMachine, inventory: &Inventory, error: &ProviderError) -> TurnOutcome {
        tracing::warn!(%error, "model call failed; turn aborted without state mutation");
        let narrative = "Sorry, I'm having trouble understanding right now. Please try again.".to_string();
        self.emit(&OutboundEvent::Error {
            kind: "model_unavailable".to_string(),
            details: error.to_string(),
        });
        self.emit(&OutboundEvent::Text { narrative: narrative.clone() });
        self.narrator.stop_current(session);
        self.narrator.speak(session, &narrative, CancellationToken::new());
        TurnOutcome {
            narrative,
            executed_action: None,
            current_state: state_machine.current_state().name.clone(),
            inventory: inventory.to_map(),
        }
    }

    /// Delivers `event` via the configured sink, logging and swallowing
    /// any delivery failure (§7 "silent degradation").
    fn emit(&self, event: &OutboundEvent) {
        if let Err(error) = self.sink.emit(event) {
            tracing::warn!(%error, "session controller event sink delivery failed");
        }
    }
}

/// Finds the fired [`Action`] by name for audio dispatch, independent of
/// legality in the (now-moved) current state.
fn find_action(state_machine: &StateMachine, name: &ActionName) -> Option<Action> {
    state_machine.action_named(name).cloned()
}
