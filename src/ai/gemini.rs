use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ServiceError, TextCompletionProvider, TextEmbedder};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";

/// Per-request deadline. Requests that fail transiently are retried once.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [GeminiClient].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub completion_model: String,
    pub embedding_model: String,
    pub api_base: String,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            completion_model: DEFAULT_COMPLETION_MODEL.to_owned(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }

    /// Reads `GEMINI_API_KEY` plus optional model overrides from the
    /// environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key =
            std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set for AI features")?;
        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_COMPLETION_MODEL") {
            config.completion_model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

/// REST client for the hosted coach and embedding models.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    fn model_url(&self, model: &str, action: &str) -> String {
        format!("{}/{}:{}", self.config.api_base, model, action)
    }

    /// Posts a request, retrying once when the failure looks transient
    /// (connect or timeout errors, HTTP 429 and 5xx).
    async fn post_json<T>(&self, url: &str, body: &serde_json::Value) -> Result<T, ServiceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.post_json_once(url, body).await {
            Err(error) if error_is_transient(&error) => {
                warn!("retrying transient failure of {url}: {error}");
                self.post_json_once(url, body).await
            }
            result => result,
        }
    }

    async fn post_json_once<T>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, ServiceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(decoded) => decoded.error.message,
                Err(_) => text,
            };
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

fn error_is_transient(error: &ServiceError) -> bool {
    match error {
        ServiceError::Transport(e) => e.is_timeout() || e.is_connect(),
        ServiceError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[async_trait]
impl TextCompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = self.model_url(&self.config.completion_model, "generateContent");
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response: GenerateResponse = self.post_json(&url, &body).await?;
        let text = response.text();
        if text.is_empty() {
            return Err(ServiceError::BadResponse("no candidate text".to_owned()));
        }
        debug!("received {} characters of coach feedback", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextEmbedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        let url = self.model_url(&self.config.embedding_model, "embedContent");
        let body = json!({
            "model": format!("models/{}", self.config.embedding_model),
            "content": { "parts": [{ "text": text }] }
        });
        let response: EmbedResponse = self.post_json(&url, &body).await?;
        if response.embedding.values.is_empty() {
            return Err(ServiceError::BadResponse("empty embedding".to_owned()));
        }
        Ok(response.embedding.values)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
