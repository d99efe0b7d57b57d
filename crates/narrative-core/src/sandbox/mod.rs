// narrative-core/src/sandbox/mod.rs
// ============================================================================
// Module: Script Sandbox
// Description: Embedded rhai evaluator backing inventory variables (C1).
// Purpose: Evaluate condition and mutation scripts without crashing a turn.
// Dependencies: rhai, tracing, crate::core::value
// ============================================================================

//! ## Overview
//! [`Sandbox`] wraps a single `rhai::Engine` and `rhai::Scope`, matching
//! `LuaSandbox`'s contract (`game/src/scripting/lua.py`): set a variable,
//! get a variable, evaluate a statement or expression, and enumerate only
//! the variables a game definition actually declared. User-defined
//! variables are found by diffing the scope's variable names against the
//! names captured right after construction, the same technique
//! `get_all_vars` uses against Lua's global table.
//!
//! Evaluation never propagates a script error up as a turn failure: a
//! malformed condition or mutation is logged via [`tracing::warn!`] and
//! treated as falsy/no-op, so one bad script cannot break a whole playthrough.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashSet;

use rhai::Engine;
use rhai::Scope;

use crate::core::identifiers::VarName;
use crate::core::value::Value;

// ============================================================================
// SECTION: Sandbox
// ============================================================================

/// An isolated rhai evaluation context holding inventory variables.
pub struct Sandbox {
    engine: Engine,
    scope: Scope<'static>,
    initial_names: HashSet<String>,
}

impl Sandbox {
    /// Creates an empty sandbox with no user-defined variables.
    #[must_use]
    pub fn new() -> Self {
        let engine = Engine::new();
        let scope = Scope::new();
        let initial_names = scope.iter().map(|(name, _, _)| name.to_string()).collect();
        Self {
            engine,
            scope,
            initial_names,
        }
    }

    /// Sets a variable to the given value, declaring it if not already
    /// present.
    pub fn set_variable(&mut self, name: &VarName, value: Value) {
        self.scope.set_or_push(name.as_str(), rhai::Dynamic::from(value));
    }

    /// Reads a variable's current value, if it has been set.
    #[must_use]
    pub fn get_variable(&self, name: &VarName) -> Option<Value> {
        self.scope.get_value::<rhai::Dynamic>(name.as_str()).map(Value::from)
    }

    /// Returns every user-defined variable currently in scope, i.e. every
    /// name that was not present immediately after construction.
    #[must_use]
    pub fn enumerate_user_variables(&self) -> Vec<(VarName, Value)> {
        self.scope
            .iter()
            .filter(|(name, _, _)| !self.initial_names.contains(*name))
            .map(|(name, _, value)| (VarName::new(name), Value::from(value)))
            .collect()
    }

    /// Evaluates a condition expression. An empty or blank condition is
    /// always true (`spec.md` §4.2, "an empty condition list means the
    /// action is always legal"). A script error logs a warning and
    /// evaluates to false rather than propagating.
    #[must_use]
    pub fn evaluate_condition(&mut self, code: &str) -> bool {
        if code.trim().is_empty() {
            return true;
        }
        match self.engine.eval_with_scope::<rhai::Dynamic>(&mut self.scope, code) {
            Ok(result) => Value::from(result).as_bool_lossy(),
            Err(error) => {
                tracing::warn!(condition = code, %error, "condition script failed to evaluate");
                false
            }
        }
    }

    /// Executes a mutation statement for its side effects on scope
    /// variables. A script error logs a warning and is otherwise ignored.
    pub fn execute_script(&mut self, code: &str) {
        if code.trim().is_empty() {
            return;
        }
        if let Err(error) = self.engine.run_with_scope(&mut self.scope, code) {
            tracing::warn!(script = code, %error, "mutation script failed to execute");
        }
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_condition_is_always_true() {
        let mut sandbox = Sandbox::new();
        assert!(sandbox.evaluate_condition(""));
        assert!(sandbox.evaluate_condition("   "));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut sandbox = Sandbox::new();
        sandbox.set_variable(&VarName::new("coins"), Value::Int(10));
        assert_eq!(sandbox.get_variable(&VarName::new("coins")), Some(Value::Int(10)));
    }

    #[test]
    fn execute_script_mutates_variable() {
        let mut sandbox = Sandbox::new();
        sandbox.set_variable(&VarName::new("coins"), Value::Int(10));
        sandbox.execute_script("coins = coins * 5;");
        assert_eq!(sandbox.get_variable(&VarName::new("coins")), Some(Value::Int(50)));
    }

    #[test]
    fn condition_reads_mutated_variable() {
        let mut sandbox = Sandbox::new();
        sandbox.set_variable(&VarName::new("coins"), Value::Int(10));
        sandbox.execute_script("coins = 5;");
        assert!(!sandbox.evaluate_condition("coins > 5"));
        sandbox.execute_script("coins = 6;");
        assert!(sandbox.evaluate_condition("coins > 5"));
    }

    #[test]
    fn invalid_script_does_not_panic_and_warns() {
        let mut sandbox = Sandbox::new();
        sandbox.execute_script("this is not valid rhai {{{");
        assert!(!sandbox.evaluate_condition("this is not valid rhai either {{{"));
    }

    #[test]
    fn enumerate_only_reports_user_defined_variables() {
        let mut sandbox = Sandbox::new();
        assert!(sandbox.enumerate_user_variables().is_empty());
        sandbox.set_variable(&VarName::new("has_key"), Value::Bool(true));
        let vars = sandbox.enumerate_user_variables();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].0.as_str(), "has_key");
    }
}
