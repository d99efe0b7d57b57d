// narrative-core/src/core/history.rs
// ============================================================================
// Module: Structured History
// Description: Bounded, ordered log of turns (C7).
// Purpose: Reconstruct LLM chat messages without replaying stale action catalogues.
// Dependencies: crate::core::{action, identifiers, time}, std::collections::VecDeque
// ============================================================================

//! ## Overview
//! [`History`] is a bounded FIFO of [`HistoryEntry`] values (`spec.md` §3,
//! §4.7). Crucially, `to_llm_messages` never replays the offered action
//! catalogue: that is rebuilt fresh from current state every turn
//! (`spec.md` §9, "History without embedded function list is deliberate").

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ActionName;
use crate::core::time::Timestamp;

/// Default history cap, matching `llm.max_history_length`'s documented
/// default (`spec.md` §6).
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 20;

// ============================================================================
// SECTION: Chat Message
// ============================================================================

/// A single role/content message in the shape providers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: `"system"`, `"user"`, or `"assistant"`.
    pub role: String,
    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Builds a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Builds a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Builds an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// ============================================================================
// SECTION: History Entry
// ============================================================================

/// One turn's record: input, prompt snapshot, offered actions, output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Monotonic per-session turn number.
    pub turn_number: u64,
    /// Timestamp the turn was processed at.
    pub timestamp: Timestamp,
    /// Raw user text for this turn.
    pub user_text: String,
    /// Snapshot of the base prompt (identity + behaviour + current state
    /// description), without function-calling instructions.
    pub base_prompt: String,
    /// Names of the actions offered that turn (including `no_action`).
    pub offered_actions: Vec<ActionName>,
    /// Narrative text the model produced.
    pub narrative: String,
    /// The action the model selected, or the `no_action` sentinel.
    pub chosen_action: ActionName,
    /// Whether the chosen action executed successfully.
    pub success: bool,
}

// ============================================================================
// SECTION: History
// ============================================================================

/// A bounded, ordered log of turns.
///
/// # Invariants
/// - `len() <= max_len` always holds; `append` evicts the oldest entry FIFO
///   when the cap would otherwise be exceeded.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_len: usize,
}

impl History {
    /// Creates an empty history with the given cap.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    /// Appends an entry, evicting the oldest entry if the cap is exceeded.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
    }

    /// Returns the number of entries currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured cap.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Returns the retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        self.entries.as_slices().0
    }

    /// Clears all entries, used by [`crate::loader`]-driven hot reloads.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Builds the message list a provider should see: a system message
    /// holding `current_base_prompt`, followed by each retained turn's
    /// user/assistant pair in order. The action catalogue is never replayed
    /// here (`spec.md` §4.7, §9).
    #[must_use]
    pub fn to_llm_messages(&self, current_base_prompt: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.entries.len() * 2 + 1);
        messages.push(ChatMessage::system(current_base_prompt));
        for entry in &self.entries {
            messages.push(ChatMessage::user(entry.user_text.clone()));
            messages.push(ChatMessage::assistant(entry.narrative.clone()));
        }
        messages
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY_LENGTH)
    }
}
