use std::{fmt::Display, sync::Arc};

use serde::Serialize;

/// Closed set of numeric kinds a habit can be measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Real,
}

impl ValueKind {
    /// Parses raw user input into a value of this kind. Integers reject
    /// fractional input, reals reject non-finite input.
    pub fn parse(self, raw: &str) -> Option<HabitValue> {
        let raw = raw.trim();
        match self {
            ValueKind::Integer => raw.parse::<i64>().ok().map(HabitValue::Integer),
            ValueKind::Real => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(HabitValue::Real),
        }
    }

    /// Converts an already numeric input into a value of this kind. Used by
    /// surfaces that deal in numbers instead of text.
    pub fn coerce(self, value: f64) -> Option<HabitValue> {
        if !value.is_finite() {
            return None;
        }
        match self {
            ValueKind::Integer if value.fract() == 0.0 => Some(HabitValue::Integer(value as i64)),
            ValueKind::Integer => None,
            ValueKind::Real => Some(HabitValue::Real(value)),
        }
    }
}

/// A single logged measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HabitValue {
    Integer(i64),
    Real(f64),
}

impl HabitValue {
    pub fn as_f64(self) -> f64 {
        match self {
            HabitValue::Integer(v) => v as f64,
            HabitValue::Real(v) => v,
        }
    }
}

impl Display for HabitValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HabitValue::Integer(v) => write!(f, "{v}"),
            HabitValue::Real(v) => write!(f, "{v}"),
        }
    }
}

/// Describes one tracked habit. The key doubles as the CSV column name.
#[derive(Debug, Clone, Serialize)]
pub struct HabitDefinition {
    pub key: Arc<str>,
    pub label: Arc<str>,
    pub target: f64,
    pub kind: ValueKind,
}

impl HabitDefinition {
    pub fn new(key: &str, label: &str, target: f64, kind: ValueKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            target,
            kind,
        }
    }

    /// Step for numeric input widgets. Integer habits with large targets move
    /// in thousands, other integers in ones, reals in tenths.
    pub fn input_step(&self) -> f64 {
        match self.kind {
            ValueKind::Integer if self.target >= 1000.0 => 1000.0,
            ValueKind::Integer => 1.0,
            ValueKind::Real => 0.1,
        }
    }
}

/// Ordered catalog of the habits being tracked. The order of definitions
/// defines the column order of the log file, so it must stay stable for the
/// lifetime of a log.
#[derive(Debug, Clone, Serialize)]
pub struct HabitRegistry {
    habits: Vec<HabitDefinition>,
}

impl HabitRegistry {
    pub fn new(habits: Vec<HabitDefinition>) -> Self {
        Self { habits }
    }

    /// The built-in registry: sleep hours, daily steps, glasses of water.
    pub fn standard() -> Self {
        Self::new(vec![
            HabitDefinition::new("sleep", "Sleep (hours)", 9.0, ValueKind::Real),
            HabitDefinition::new("steps", "Steps", 8000.0, ValueKind::Integer),
            HabitDefinition::new("water", "Water (glasses)", 8.0, ValueKind::Integer),
        ])
    }

    pub fn habits(&self) -> &[HabitDefinition] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.habits.iter().position(|def| def.key.as_ref() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parsing() {
        assert_eq!(
            ValueKind::Integer.parse(" 8000 "),
            Some(HabitValue::Integer(8000))
        );
        assert_eq!(ValueKind::Integer.parse("9.5"), None);
        assert_eq!(ValueKind::Integer.parse("many"), None);
        assert_eq!(ValueKind::Integer.parse(""), None);
    }

    #[test]
    fn test_real_parsing() {
        assert_eq!(ValueKind::Real.parse("7.5"), Some(HabitValue::Real(7.5)));
        assert_eq!(ValueKind::Real.parse("9"), Some(HabitValue::Real(9.0)));
        assert_eq!(ValueKind::Real.parse("NaN"), None);
        assert_eq!(ValueKind::Real.parse("inf"), None);
        assert_eq!(ValueKind::Real.parse("soon"), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(
            ValueKind::Integer.coerce(8000.0),
            Some(HabitValue::Integer(8000))
        );
        assert_eq!(ValueKind::Integer.coerce(7.5), None);
        assert_eq!(ValueKind::Real.coerce(7.5), Some(HabitValue::Real(7.5)));
        assert_eq!(ValueKind::Real.coerce(f64::NAN), None);
    }

    #[test]
    fn test_values_display_without_trailing_zero() {
        assert_eq!(HabitValue::Real(9.0).to_string(), "9");
        assert_eq!(HabitValue::Real(7.5).to_string(), "7.5");
        assert_eq!(HabitValue::Integer(8000).to_string(), "8000");
    }

    #[test]
    fn test_standard_registry_order() {
        let registry = HabitRegistry::standard();
        let keys: Vec<&str> = registry.habits().iter().map(|d| d.key.as_ref()).collect();
        assert_eq!(keys, vec!["sleep", "steps", "water"]);
        assert_eq!(registry.position("water"), Some(2));
        assert_eq!(registry.position("mood"), None);
    }

    #[test]
    fn test_input_steps() {
        let registry = HabitRegistry::standard();
        let steps: Vec<f64> = registry.habits().iter().map(|d| d.input_step()).collect();
        assert_eq!(steps, vec![0.1, 1000.0, 1.0]);
    }
}
