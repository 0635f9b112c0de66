//! Read-side shaping of the habit log: duplicate-date handling, rolling
//! feedback over the recent window, and chart series building.

pub mod chart;
pub mod feedback;

use std::fmt::Display;

use clap::ValueEnum;

use crate::store::entry::HabitRecord;

/// How readers treat multiple rows that share one date. The store itself
/// always keeps every appended row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DuplicateDates {
    /// Every row participates in feedback windows and charts.
    #[default]
    KeepAll,
    /// Only the latest appended row for a date participates.
    LastWins,
}

impl Display for DuplicateDates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateDates::KeepAll => write!(f, "keep-all"),
            DuplicateDates::LastWins => write!(f, "last-wins"),
        }
    }
}

/// Applies the duplicate policy to a history sorted by date. Relies on the
/// store's stable sort keeping equal dates in append order.
pub fn effective_history(records: Vec<HabitRecord>, policy: DuplicateDates) -> Vec<HabitRecord> {
    match policy {
        DuplicateDates::KeepAll => records,
        DuplicateDates::LastWins => {
            let mut deduped: Vec<HabitRecord> = Vec::with_capacity(records.len());
            for record in records {
                match deduped.last_mut() {
                    Some(last) if last.date == record.date => *last = record,
                    _ => deduped.push(record),
                }
            }
            deduped
        }
    }
}
