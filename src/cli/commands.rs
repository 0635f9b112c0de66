use std::{io, path::Path};

use ansi_term::{Colour, Style};
use anyhow::Result;

use crate::{
    registry::HabitRegistry,
    report::{
        effective_history,
        feedback::{assess, verdict_line, HabitVerdict, NO_DATA_MESSAGE},
        chart::render_charts,
        DuplicateDates,
    },
    store::{
        csv_store::{CsvRecordStore, RecordStore},
        entry::HabitEntry,
    },
    utils::{clock::Clock, time::date_key},
};

use super::prompt::prompt_values;

/// Prompts for today's values on stdin and appends the row.
pub async fn log_today(
    registry: &HabitRegistry,
    store: &CsvRecordStore,
    clock: &dyn Clock,
) -> Result<()> {
    println!("\nLogging today's habits:\n");

    let stdin = io::stdin();
    let values = prompt_values(&mut stdin.lock(), &mut io::stdout(), registry.habits())?;

    let entry = HabitEntry::new(date_key(clock.today()), values);
    store.append(&entry).await?;
    println!("\nLOG SAVED!\n");
    Ok(())
}

/// Prints the per-habit verdicts over the recent window.
pub async fn show_feedback(
    registry: &HabitRegistry,
    store: &CsvRecordStore,
    duplicates: DuplicateDates,
) -> Result<()> {
    let records = effective_history(store.load_all().await?, duplicates);
    let Some(report) = assess(registry, &records) else {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    };

    println!("Feedback (last {} entries):\n", report.window_len);
    for habit in &report.habits {
        let line = verdict_line(habit);
        let painted = match habit.verdict {
            HabitVerdict::Met { .. } => Colour::Green.paint(line),
            HabitVerdict::Short { .. } => Colour::Yellow.paint(line),
            HabitVerdict::NoData => Style::new().dimmed().paint(line),
        };
        println!("{painted}");
    }
    println!();
    Ok(())
}

/// Renders one PNG per habit next to the base path.
pub async fn plot_progress(
    registry: &HabitRegistry,
    store: &CsvRecordStore,
    duplicates: DuplicateDates,
    charts_base: &Path,
) -> Result<()> {
    let records = effective_history(store.load_all().await?, duplicates);
    if records.is_empty() {
        println!("No data to plot yet.");
        return Ok(());
    }

    for path in render_charts(registry, &records, charts_base)? {
        println!("Saved {}", path.display());
    }
    Ok(())
}
