use std::collections::BTreeMap;

use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    ai::{summary::coach_feedback, VectorEntry},
    registry::HabitValue,
    report::{
        chart::{build_series, ChartData},
        effective_history,
        feedback::{assess, verdict_line, FeedbackReport, NO_DATA_MESSAGE},
    },
    store::{
        csv_store::RecordStore,
        entry::{HabitEntry, HabitRecord},
    },
    utils::time::date_key,
};

use super::{error::ApiError, state::AppState, ui::render_index};

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    /// Habit key to numeric value, one per registered habit.
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub date: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Set when there is no history at all; everything else is empty then.
    pub message: Option<String>,
    pub heading: Option<String>,
    pub lines: Vec<String>,
    pub report: Option<FeedbackReport>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub message: Option<String>,
    pub text: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.registry))
}

/// Appends today's row, then upserts the vector log entry keyed by the
/// date. The CSV write stays even if the vector store fails afterwards.
pub async fn log(
    State(state): State<AppState>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<LogResponse>, ApiError> {
    let mut values = Vec::with_capacity(state.registry.len());
    for def in state.registry.habits() {
        let raw = *payload
            .values
            .get(def.key.as_ref())
            .ok_or_else(|| ApiError::bad_request(format!("missing value for {}", def.key)))?;
        let value: HabitValue = def.kind.coerce(raw).ok_or_else(|| {
            ApiError::bad_request(format!("{} must be a whole number, got {raw}", def.key))
        })?;
        values.push(value);
    }

    let date = date_key(state.clock.today());
    let entry = HabitEntry::new(date.clone(), values);
    state.store.append(&entry).await?;
    info!("logged habits for {date}");

    state
        .vectors
        .upsert(&date, &entry.describe(&state.registry))
        .await?;

    Ok(Json(LogResponse {
        date,
        message: "Habit logged successfully!".to_owned(),
    }))
}

pub async fn feedback(
    State(state): State<AppState>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let records = load_history(&state).await?;
    let response = match assess(&state.registry, &records) {
        None => FeedbackResponse {
            message: Some(NO_DATA_MESSAGE.to_owned()),
            heading: None,
            lines: Vec::new(),
            report: None,
        },
        Some(report) => FeedbackResponse {
            message: None,
            heading: Some(format!("Feedback (last {} entries):", report.window_len)),
            lines: report.habits.iter().map(verdict_line).collect(),
            report: Some(report),
        },
    };
    Ok(Json(response))
}

pub async fn series(State(state): State<AppState>) -> Result<Json<ChartData>, ApiError> {
    let records = load_history(&state).await?;
    Ok(Json(build_series(&state.registry, &records)))
}

pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let records = load_history(&state).await?;
    if records.is_empty() {
        return Ok(Json(SummaryResponse {
            message: Some(NO_DATA_MESSAGE.to_owned()),
            text: None,
        }));
    }
    let text = coach_feedback(state.completions.as_ref(), &state.registry, &records).await?;
    Ok(Json(SummaryResponse {
        message: None,
        text: Some(text),
    }))
}

pub async fn vectors(State(state): State<AppState>) -> Result<Json<Vec<VectorEntry>>, ApiError> {
    Ok(Json(state.vectors.list_all().await?))
}

async fn load_history(state: &AppState) -> Result<Vec<HabitRecord>, ApiError> {
    let records = state.store.load_all().await?;
    Ok(effective_history(records, state.duplicates))
}
