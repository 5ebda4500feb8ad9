//! Embedding generation against an OpenAI-compatible backend.
//!
//! The backend is an opaque collaborator: text in, fixed-length `f32`
//! vector out. Everything else in the crate depends only on the
//! [`EmbeddingProvider`] trait, so tests substitute a deterministic stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{config::BackendConfig, error::Result};

/// Turns text into a fixed-length embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Identifier of the model producing the vectors.
    fn model_id(&self) -> &str;

    /// Length of the vectors this provider produces.
    fn dimension(&self) -> usize;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

/// [`EmbeddingProvider`] backed by an OpenAI-compatible `/embeddings`
/// endpoint (llama.cpp engines, Ollama, OpenAI itself).
#[derive(Debug)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            input: text,
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: EmbeddingResponse = response.json().await?;

        let data = body.data.into_iter().next().ok_or_else(|| {
            crate::error::Error::Provider(
                "backend returned no embedding data".into(),
            )
        })?;

        Ok(data.embedding.into_iter().map(|v| v as f32).collect())
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let config = BackendConfig {
            base_url: "http://localhost:12434/v1/".into(),
            ..BackendConfig::default()
        };
        let embedder = HttpEmbedder::new(&config);

        assert_eq!(embedder.base_url, "http://localhost:12434/v1");
    }

    #[test]
    fn reports_model_and_dimension() {
        let embedder = HttpEmbedder::new(&BackendConfig::default());
        assert_eq!(embedder.model_id(), "ai/mxbai-embed-large");
        assert_eq!(embedder.dimension(), 1024);
    }

    #[test]
    fn request_serializes_to_openai_shape() {
        let request = EmbeddingRequest {
            model: "test-model",
            input: "hello",
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "test-model");
        assert_eq!(json["input"], "hello");
    }

    #[test]
    fn response_deserializes_from_openai_shape() {
        let body = r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }
}
