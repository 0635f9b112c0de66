use std::sync::Arc;

use serde::Serialize;

use crate::{registry::HabitRegistry, store::entry::HabitRecord};

/// Number of most recent entries feedback and summaries look at.
pub const FEEDBACK_WINDOW: usize = 7;

/// Message shown by every surface when nothing was ever logged.
pub const NO_DATA_MESSAGE: &str = "No data yet. Log at least one day.";

/// Outcome for a single habit over the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HabitVerdict {
    /// Not a single parseable value inside the window.
    NoData,
    /// The mean met or exceeded the target.
    Met { mean: f64 },
    /// The mean fell short of the target by `deficit`.
    Short { mean: f64, deficit: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitFeedback {
    pub key: Arc<str>,
    pub label: Arc<str>,
    pub target: f64,
    pub verdict: HabitVerdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    /// How many entries fed the means, at most [FEEDBACK_WINDOW].
    pub window_len: usize,
    pub habits: Vec<HabitFeedback>,
}

/// The most recent entries of a sorted history, at most [FEEDBACK_WINDOW] of
/// them.
pub fn last_window(records: &[HabitRecord]) -> &[HabitRecord] {
    &records[records.len().saturating_sub(FEEDBACK_WINDOW)..]
}

/// Arithmetic mean of the habit's present values inside the window. [None]
/// when every value is missing, never zero.
pub fn habit_mean(window: &[HabitRecord], index: usize) -> Option<f64> {
    let values: Vec<f64> = window.iter().filter_map(|r| r.value(index)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Builds the feedback report, or [None] when nothing was ever logged.
pub fn assess(registry: &HabitRegistry, records: &[HabitRecord]) -> Option<FeedbackReport> {
    if records.is_empty() {
        return None;
    }
    let window = last_window(records);
    let habits = registry
        .habits()
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let verdict = match habit_mean(window, index) {
                None => HabitVerdict::NoData,
                Some(mean) if mean >= def.target => HabitVerdict::Met { mean },
                Some(mean) => HabitVerdict::Short {
                    mean,
                    deficit: def.target - mean,
                },
            };
            HabitFeedback {
                key: def.key.clone(),
                label: def.label.clone(),
                target: def.target,
                verdict,
            }
        })
        .collect();
    Some(FeedbackReport {
        window_len: window.len(),
        habits,
    })
}

/// Just the status phrase for a verdict, shared by the terminal renderers.
pub fn status_text(verdict: &HabitVerdict) -> String {
    match verdict {
        HabitVerdict::NoData => "no data".to_owned(),
        HabitVerdict::Met { .. } => "Good job!!!".to_owned(),
        HabitVerdict::Short { deficit, .. } => {
            format!("Try adding {deficit:.1} more per day.")
        }
    }
}

/// One human line per habit, `- Sleep (hours): avg 8.3 (target 9) -> ...`.
pub fn verdict_line(feedback: &HabitFeedback) -> String {
    match &feedback.verdict {
        HabitVerdict::NoData => format!("- {}: {}", feedback.label, status_text(&feedback.verdict)),
        HabitVerdict::Met { mean } | HabitVerdict::Short { mean, .. } => format!(
            "- {}: avg {mean:.1} (target {}) -> {}",
            feedback.label,
            feedback.target,
            status_text(&feedback.verdict)
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::{HabitDefinition, HabitRegistry, ValueKind};
    use crate::store::entry::HabitRecord;

    use super::{assess, habit_mean, last_window, status_text, verdict_line, HabitVerdict};

    fn sleep_registry() -> HabitRegistry {
        HabitRegistry::new(vec![HabitDefinition::new(
            "sleep",
            "Sleep (hours)",
            9.0,
            ValueKind::Real,
        )])
    }

    fn records(values: &[Option<f64>]) -> Vec<HabitRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| HabitRecord::new(format!("2025-08-{:02}", i + 1), vec![*v]))
            .collect()
    }

    #[test]
    fn test_empty_history_produces_no_report() {
        assert!(assess(&HabitRegistry::standard(), &[]).is_none());
    }

    #[test]
    fn test_deficit_message_rounds_to_one_decimal() {
        let history = records(&[Some(8.0), Some(8.0), Some(9.0)]);
        let report = assess(&sleep_registry(), &history).unwrap();

        assert_eq!(report.window_len, 3);
        let feedback = &report.habits[0];
        match feedback.verdict {
            HabitVerdict::Short { mean, deficit } => {
                assert!((mean - 25.0 / 3.0).abs() < 1e-9);
                assert!((deficit - (9.0 - 25.0 / 3.0)).abs() < 1e-9);
            }
            ref other => panic!("expected a shortfall, got {other:?}"),
        }
        assert_eq!(
            status_text(&feedback.verdict),
            "Try adding 0.7 more per day."
        );
        assert_eq!(
            verdict_line(feedback),
            "- Sleep (hours): avg 8.3 (target 9) -> Try adding 0.7 more per day."
        );
    }

    #[test]
    fn test_meeting_the_target_is_met() {
        let history = records(&[Some(9.0), Some(9.0)]);
        let report = assess(&sleep_registry(), &history).unwrap();
        assert_eq!(report.habits[0].verdict, HabitVerdict::Met { mean: 9.0 });
        assert_eq!(
            verdict_line(&report.habits[0]),
            "- Sleep (hours): avg 9.0 (target 9) -> Good job!!!"
        );
    }

    #[test]
    fn test_mean_skips_missing_values() {
        let history = records(&[Some(10.0), None, Some(8.0)]);
        assert_eq!(habit_mean(&history, 0), Some(9.0));
    }

    #[test]
    fn test_habit_without_values_reports_no_data() {
        let history = records(&[None, None]);
        let report = assess(&sleep_registry(), &history).unwrap();
        assert_eq!(report.habits[0].verdict, HabitVerdict::NoData);
        assert_eq!(
            verdict_line(&report.habits[0]),
            "- Sleep (hours): no data"
        );
    }

    #[test]
    fn test_window_only_covers_last_seven_entries() {
        let history = records(&[
            Some(0.0),
            Some(1.0),
            Some(2.0),
            Some(3.0),
            Some(4.0),
            Some(5.0),
            Some(6.0),
            Some(7.0),
            Some(8.0),
            Some(9.0),
        ]);
        let window = last_window(&history);
        assert_eq!(window.len(), 7);
        assert_eq!(window[0].date, "2025-08-04");
        // 3..=9 inclusive
        assert_eq!(habit_mean(window, 0), Some(6.0));
    }
}
