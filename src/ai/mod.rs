//! Hosted collaborators: the coach model, the embedding endpoint, and the
//! vector log built on top of them. Everything behind these traits can fail
//! independently of the local log, so the error type is separate from the
//! application's [anyhow::Error] chain.

pub mod gemini;
pub mod summary;
pub mod vector_log;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures at the hosted-service boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    BadResponse(String),
    #[error("vector index i/o failed: {0}")]
    Index(#[from] std::io::Error),
    #[error("vector index is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A hosted model that completes a free-text prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// A hosted model that embeds text into a vector.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
}

#[async_trait]
impl<T: TextEmbedder + ?Sized> TextEmbedder for std::sync::Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        (**self).embed(text).await
    }
}

/// One browsable entry of the vector log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub text: String,
}

/// Embedding-indexed store of log entries, keyed by date.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts the entry, replacing any previous entry with the same id.
    async fn upsert(&self, id: &str, text: &str) -> Result<(), ServiceError>;

    /// Every stored entry in id order.
    async fn list_all(&self) -> Result<Vec<VectorEntry>, ServiceError>;
}
