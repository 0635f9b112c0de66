use tracing::debug;

use crate::registry::{HabitRegistry, HabitValue};

/// A fully typed row on its way into the log, one value per habit in
/// registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitEntry {
    pub date: String,
    pub values: Vec<HabitValue>,
}

impl HabitEntry {
    pub fn new(date: impl Into<String>, values: Vec<HabitValue>) -> Self {
        Self {
            date: date.into(),
            values,
        }
    }

    /// Renders the entry as a CSV data row, without the line terminator.
    pub fn to_row(&self) -> String {
        let mut row = self.date.clone();
        for value in &self.values {
            row.push(',');
            row.push_str(&value.to_string());
        }
        row
    }

    /// Natural-language rendering used as the vector log document text.
    pub fn describe(&self, registry: &HabitRegistry) -> String {
        let parts = registry
            .habits()
            .iter()
            .zip(&self.values)
            .map(|(def, value)| format!("{}={}", def.key, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("On {}, habits logged: {}", self.date, parts)
    }
}

/// A row as read back from disk. Fields that are absent or fail numeric
/// parsing are missing rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitRecord {
    pub date: String,
    pub values: Vec<Option<f64>>,
}

impl HabitRecord {
    pub fn new(date: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            date: date.into(),
            values,
        }
    }

    /// Parses one data row positionally against the registry's column order.
    /// Returns [None] for blank lines. Short rows pad with missing values and
    /// surplus fields are ignored.
    pub fn parse_row(line: &str, habit_count: usize) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        let mut fields = line.split(',');
        let date = fields.next()?.trim().to_owned();
        let mut values = Vec::with_capacity(habit_count);
        for _ in 0..habit_count {
            values.push(fields.next().and_then(parse_numeric));
        }
        Some(Self { date, values })
    }

    /// The value stored for the habit at this registry position, if any.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

/// Universal numeric coercion for stored fields. Non-finite numerals count
/// as missing so that aggregates stay finite.
fn parse_numeric(field: &str) -> Option<f64> {
    let parsed = field.trim().parse::<f64>().ok()?;
    if parsed.is_finite() {
        Some(parsed)
    } else {
        debug!("discarding non-finite stored value {field:?}");
        None
    }
}
