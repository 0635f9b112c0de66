use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use habitkeeper::{
    ai::{
        gemini::{GeminiClient, GeminiConfig},
        vector_log::FileVectorStore,
    },
    registry::HabitRegistry,
    report::DuplicateDates,
    store::csv_store::CsvRecordStore,
    utils::{
        clock::DefaultClock,
        logging::{enable_logging, WEB_PREFIX},
        runtime::multi_thread_runtime,
    },
    web::{router, state::AppState},
};

fn main() {
    run().unwrap();
}

fn run() -> Result<()> {
    let log_dir = env::var("HABIT_LOG_DIR").ok().map(PathBuf::from);
    enable_logging(WEB_PREFIX, log_dir.as_deref(), None, true)?;

    // The API key is required up front so AI actions cannot be the first
    // place a missing key shows up.
    let gemini_config = GeminiConfig::from_env()?;

    let registry = HabitRegistry::standard();
    let file = env::var("HABIT_FILE").unwrap_or_else(|_| "habit_logs.csv".into());
    let vector_dir = env::var("HABIT_VECTOR_DIR").unwrap_or_else(|_| "habit_vectors".into());
    let duplicates = match env::var("HABIT_DUPLICATES") {
        Ok(raw) => DuplicateDates::from_str(&raw, true)
            .map_err(|e| anyhow::anyhow!("invalid HABIT_DUPLICATES: {e}"))?,
        Err(_) => DuplicateDates::default(),
    };
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    multi_thread_runtime()?.block_on(async move {
        let gemini = Arc::new(GeminiClient::new(gemini_config)?);
        let state = AppState {
            registry: Arc::new(registry.clone()),
            store: Arc::new(CsvRecordStore::new(PathBuf::from(file), registry)),
            completions: gemini.clone(),
            vectors: Arc::new(FileVectorStore::new(vector_dir, gemini)),
            clock: Arc::new(DefaultClock),
            duplicates,
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        info!("listening on http://{addr}");
        axum::serve(listener, router(state)).await?;
        Ok(())
    })
}
