//! Browser surface: a single page with a sidebar of actions over the same
//! registry/store/provider seams the CLI uses, plus a small JSON API the
//! page's script consumes.

pub mod error;
pub mod handlers;
pub mod state;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/log", post(handlers::log))
        .route("/api/feedback", get(handlers::feedback))
        .route("/api/series", get(handlers::series))
        .route("/api/summary", get(handlers::summary))
        .route("/api/vectors", get(handlers::vectors))
        .with_state(state)
}
