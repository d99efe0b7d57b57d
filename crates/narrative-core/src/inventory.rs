// narrative-core/src/inventory.rs
// ============================================================================
// Module: Inventory
// Description: Master record of game variables, backed by the script sandbox (C2).
// Purpose: Own variable state; re-project it from the sandbox after every mutation.
// Dependencies: crate::sandbox, crate::core::{identifiers, value}
// ============================================================================

//! ## Overview
//! [`Inventory`] is the authoritative source of truth for game variables
//! (`game/src/inventory.py`, "Inventory is master - any new variables
//! created in Lua are synced back"). Conditions and mutation scripts run
//! against the sandbox, but after every [`Inventory::execute_scripts`] call
//! the inventory re-reads every user-defined variable back out of the
//! sandbox, so a script that declares a brand new variable is picked up
//! without the caller having to know its name in advance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use crate::core::identifiers::VarName;
use crate::core::value::Value;
use crate::sandbox::Sandbox;

// ============================================================================
// SECTION: Inventory
// ============================================================================

/// The master record of a session's game variables.
pub struct Inventory {
    sandbox: Sandbox,
    items: HashMap<VarName, Value>,
}

impl Inventory {
    /// Creates an inventory seeded with the game definition's initial
    /// variables.
    #[must_use]
    pub fn new(initial_items: HashMap<VarName, Value>) -> Self {
        let mut sandbox = Sandbox::new();
        for (name, value) in &initial_items {
            sandbox.set_variable(name, value.clone());
        }
        Self {
            sandbox,
            items: initial_items,
        }
    }

    /// Reads a variable's current value.
    #[must_use]
    pub fn get(&self, key: &VarName) -> Option<&Value> {
        self.items.get(key)
    }

    /// Sets a variable directly, bypassing script evaluation.
    pub fn set(&mut self, key: VarName, value: Value) {
        self.sandbox.set_variable(&key, value.clone());
        self.items.insert(key, value);
    }

    /// Evaluates a boolean condition expression against current variables.
    /// An empty or blank condition is always true.
    #[must_use]
    pub fn evaluate_condition(&mut self, condition: &str) -> bool {
        self.sandbox.evaluate_condition(condition)
    }

    /// Executes mutation scripts in order, then re-projects every
    /// user-defined sandbox variable back into `items`. Blank scripts are
    /// skipped; a failing script is logged by the sandbox and otherwise
    /// ignored, so one bad script does not block the rest.
    pub fn execute_scripts(&mut self, scripts: &[String]) {
        for script in scripts {
            if script.trim().is_empty() {
                continue;
            }
            self.sandbox.execute_script(script);
        }
        self.sync_from_sandbox();
    }

    /// Re-reads every user-defined sandbox variable into `items`.
    fn sync_from_sandbox(&mut self) {
        for (name, value) in self.sandbox.enumerate_user_variables() {
            self.items.insert(name, value);
        }
    }

    /// Returns a snapshot of all current variables.
    #[must_use]
    pub fn to_map(&self) -> HashMap<VarName, Value> {
        self.items.clone()
    }
}
