// narrative-core/src/template.rs
// ============================================================================
// Module: Template Renderer
// Description: Jinja-style rendering of state descriptions and prompts (C4).
// Purpose: Expand inventory variables into narrative text without failing a turn.
// Dependencies: minijinja, crate::core::value
// ============================================================================

//! ## Overview
//! Mirrors `state_engine.py`'s use of `jinja2.Template(...).render(...)`
//! against `get_all_vars()`. A template referencing an undefined variable
//! does not abort rendering: missing keys render as empty, and a template
//! syntax error is logged and the original, unrendered text is returned
//! rather than surfacing the failure to the player.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;

use minijinja::Environment;
use minijinja::UndefinedBehavior;

use crate::core::identifiers::VarName;
use crate::core::value::Value;

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders narrative templates against a snapshot of inventory variables.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Creates a renderer with lenient (empty-on-missing) undefined
    /// behaviour.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        Self { env }
    }

    /// Renders `template_source` against `variables`. On a template syntax
    /// or render error, logs a warning and returns `template_source`
    /// unchanged.
    #[must_use]
    pub fn render(&self, template_source: &str, variables: &HashMap<VarName, Value>) -> String {
        let context: HashMap<String, JsonValue> = variables
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), JsonValue(value.clone())))
            .collect();

        match self.env.render_str(template_source, context) {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::warn!(%error, "template render failed, returning source unrendered");
                template_source.to_string()
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps [`Value`] so it implements `minijinja`'s `Serialize`-based value
/// conversion.
struct JsonValue(Value);

impl serde::Serialize for JsonValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_known_variable() {
        let renderer = Renderer::new();
        let mut vars = HashMap::new();
        vars.insert(VarName::new("coins"), Value::Int(5));
        assert_eq!(renderer.render("You have {{ coins }} coins.", &vars), "You have 5 coins.");
    }

    #[test]
    fn missing_variable_renders_empty_not_error() {
        let renderer = Renderer::new();
        let vars = HashMap::new();
        assert_eq!(renderer.render("Value: [{{ missing }}]", &vars), "Value: []");
    }

    #[test]
    fn malformed_template_returns_source_unchanged() {
        let renderer = Renderer::new();
        let vars = HashMap::new();
        let source = "{{ unterminated";
        assert_eq!(renderer.render(source, &vars), source);
    }
}
