use std::sync::Arc;

use crate::{
    ai::{TextCompletionProvider, VectorStore},
    registry::HabitRegistry,
    report::DuplicateDates,
    store::csv_store::CsvRecordStore,
    utils::clock::Clock,
};

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<HabitRegistry>,
    pub store: Arc<CsvRecordStore>,
    pub completions: Arc<dyn TextCompletionProvider>,
    pub vectors: Arc<dyn VectorStore>,
    pub clock: Arc<dyn Clock>,
    pub duplicates: DuplicateDates,
}
