use crate::{
    registry::HabitRegistry,
    report::feedback::last_window,
    store::entry::HabitRecord,
};

use super::{ServiceError, TextCompletionProvider};

/// Prompt sent to the coach model. `{habits_text}` is replaced with the
/// rendered window before sending; the model's answer is shown verbatim.
const COACH_PROMPT: &str = "You are a supportive personal habit coach. \n\
Here are my last 7 days of habit logs:\n\
\n\
{habits_text}\n\
\n\
Based on this data:\n\
1. Summarize my performance.\n\
2. Highlight one strong area.\n\
3. Suggest one small challenge for tomorrow.\n\
Keep it motivating and short.";

/// One line per record, `2025-08-20: sleep=8, steps=9000, water=7`. Missing
/// values render as `?`.
pub fn render_window(registry: &HabitRegistry, window: &[HabitRecord]) -> String {
    window
        .iter()
        .map(|record| {
            let values = registry
                .habits()
                .iter()
                .enumerate()
                .map(|(index, def)| match record.value(index) {
                    Some(value) => format!("{}={}", def.key, value),
                    None => format!("{}=?", def.key),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", record.date, values)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fills the coach template with the most recent entries.
pub fn build_prompt(registry: &HabitRegistry, records: &[HabitRecord]) -> String {
    COACH_PROMPT.replace(
        "{habits_text}",
        &render_window(registry, last_window(records)),
    )
}

/// Asks the coach model for feedback over the recent window.
pub async fn coach_feedback(
    provider: &dyn TextCompletionProvider,
    registry: &HabitRegistry,
    records: &[HabitRecord],
) -> Result<String, ServiceError> {
    provider.complete(&build_prompt(registry, records)).await
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::ai::MockTextCompletionProvider;
    use crate::registry::HabitRegistry;
    use crate::store::entry::HabitRecord;

    use super::{build_prompt, coach_feedback, render_window};

    fn history() -> Vec<HabitRecord> {
        vec![
            HabitRecord::new("2025-08-19", vec![Some(8.0), Some(9000.0), Some(7.0)]),
            HabitRecord::new("2025-08-20", vec![Some(7.5), None, Some(6.0)]),
        ]
    }

    #[test]
    fn test_window_rendering_marks_missing_values() {
        let rendered = render_window(&HabitRegistry::standard(), &history());
        assert_eq!(
            rendered,
            "2025-08-19: sleep=8, steps=9000, water=7\n\
             2025-08-20: sleep=7.5, steps=?, water=6"
        );
    }

    #[test]
    fn test_prompt_embeds_the_rendered_window() {
        let prompt = build_prompt(&HabitRegistry::standard(), &history());
        assert!(prompt.starts_with("You are a supportive personal habit coach."));
        assert!(prompt.contains("2025-08-20: sleep=7.5, steps=?, water=6"));
        assert!(prompt.ends_with("Keep it motivating and short."));
        assert!(!prompt.contains("{habits_text}"));
    }

    #[test]
    fn test_prompt_window_is_capped_at_seven_records() {
        let records: Vec<HabitRecord> = (1..=10)
            .map(|day| HabitRecord::new(format!("2025-08-{day:02}"), vec![Some(day as f64)]))
            .collect();
        let prompt = build_prompt(&HabitRegistry::standard(), &records);
        assert!(!prompt.contains("2025-08-03"));
        assert!(prompt.contains("2025-08-04"));
        assert!(prompt.contains("2025-08-10"));
    }

    #[tokio::test]
    async fn test_coach_feedback_returns_provider_text_verbatim() -> Result<()> {
        let mut provider = MockTextCompletionProvider::new();
        provider
            .expect_complete()
            .withf(|prompt| prompt.contains("2025-08-19: sleep=8"))
            .times(1)
            .returning(|_| Ok("Solid week. Walk 500 extra steps tomorrow!".to_owned()));

        let text = coach_feedback(&provider, &HabitRegistry::standard(), &history()).await?;
        assert_eq!(text, "Solid week. Walk 500 extra steps tomorrow!");
        Ok(())
    }
}
