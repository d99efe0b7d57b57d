// narrative-core/src/core/value.rs
// ============================================================================
// Module: Inventory Value
// Description: The typed value union stored in the inventory and the sandbox.
// Purpose: Bridge sandbox script values and the game's declarative definition.
// Dependencies: serde, rhai
// ============================================================================

//! ## Overview
//! [`Value`] is the only shape an inventory variable can take: boolean,
//! integer, float, or string. Conversions to and from [`rhai::Dynamic`] are
//! centralized here so the rest of the crate never has to reason about the
//! sandbox's own dynamic type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Value
// ============================================================================

/// A typed inventory value: boolean, integer, float, or string.
///
/// # Invariants
/// - `Float` never holds NaN as produced by this crate's own coercions;
///   values coming back from scripts are not otherwise constrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// UTF-8 string value.
    Str(String),
}

impl Value {
    /// Returns this value coerced to a boolean, following script truthiness:
    /// zero/empty-string values are falsy, everything else is truthy.
    #[must_use]
    pub fn as_bool_lossy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            #[allow(
                clippy::float_cmp,
                reason = "exact zero comparison is the intended truthiness rule"
            )]
            Self::Float(value) => *value != 0.0,
            Self::Str(value) => !value.is_empty(),
        }
    }

    /// Returns a human-readable rendering of this value, used by the
    /// template renderer and narrative-facing diagnostics.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Str(value) => value.clone(),
        }
    }
}

impl From<rhai::Dynamic> for Value {
    fn from(dynamic: rhai::Dynamic) -> Self {
        if let Some(value) = dynamic.clone().try_cast::<bool>() {
            Self::Bool(value)
        } else if let Some(value) = dynamic.clone().try_cast::<i64>() {
            Self::Int(value)
        } else if let Some(value) = dynamic.clone().try_cast::<f64>() {
            Self::Float(value)
        } else {
            Self::Str(dynamic.to_string())
        }
    }
}

impl From<Value> for rhai::Dynamic {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(value) => value.into(),
            Value::Int(value) => value.into(),
            Value::Float(value) => value.into(),
            Value::Str(value) => value.into(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_int_is_falsy() {
        assert!(!Value::Int(0).as_bool_lossy());
        assert!(Value::Int(1).as_bool_lossy());
    }

    #[test]
    fn empty_string_is_falsy() {
        assert!(!Value::Str(String::new()).as_bool_lossy());
        assert!(Value::Str("x".to_string()).as_bool_lossy());
    }

    #[test]
    fn display_renders_plain_text() {
        assert_eq!(Value::Int(2).display(), "2");
        assert_eq!(Value::Bool(true).display(), "true");
    }

    #[test]
    fn dynamic_round_trip_preserves_bool() {
        let original = Value::Bool(true);
        let dynamic: rhai::Dynamic = original.clone().into();
        let restored: Value = dynamic.into();
        assert_eq!(original, restored);
    }

    #[test]
    fn dynamic_round_trip_preserves_int() {
        let original = Value::Int(42);
        let dynamic: rhai::Dynamic = original.clone().into();
        let restored: Value = dynamic.into();
        assert_eq!(original, restored);
    }
}
