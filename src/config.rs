//! Embedding backend settings.
//!
//! Resolution priority mirrors [`crate::data_dir::DataDir`]: explicit CLI
//! flags first, then `TEXTVAULT_*` environment variables, then defaults.
//! The defaults target a local Docker Model Runner endpoint serving the
//! `ai/mxbai-embed-large` model, which produces 1024-dimensional vectors.

/// Default OpenAI-compatible endpoint base URL.
pub const DEFAULT_BASE_URL: &str =
    "http://localhost:12434/engines/llama.cpp/v1";

/// Default embedding model identifier.
pub const DEFAULT_MODEL: &str = "ai/mxbai-embed-large";

/// Default embedding vector length.
pub const DEFAULT_DIMENSION: usize = 1024;

/// Connection settings for the embedding backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the OpenAI-compatible API (without `/embeddings`).
    pub base_url: String,
    /// Bearer token; empty for local endpoints that accept any key.
    pub api_key: String,
    /// Model identifier sent with every embedding request.
    pub model: String,
    /// Output vector length, also used as the chunk size limit.
    pub dimension: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl BackendConfig {
    /// Resolve settings from explicit overrides, falling back to
    /// environment variables, then defaults. `dimension` must parse as a
    /// positive integer when given.
    pub fn resolve(
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
        dimension: Option<usize>,
    ) -> crate::error::Result<Self> {
        let defaults = Self::default();

        let dimension = match dimension {
            Some(dim) => dim,
            None => match std::env::var("TEXTVAULT_EMBED_DIMENSION") {
                Ok(raw) => raw.parse().map_err(|_| {
                    crate::error::Error::Config(format!(
                        "TEXTVAULT_EMBED_DIMENSION is not a valid integer: {raw}"
                    ))
                })?,
                Err(_) => defaults.dimension,
            },
        };
        if dimension == 0 {
            return Err(crate::error::Error::Config(
                "embedding dimension must be greater than zero".into(),
            ));
        }

        Ok(Self {
            base_url: base_url
                .or_else(|| std::env::var("TEXTVAULT_EMBED_URL").ok())
                .unwrap_or(defaults.base_url),
            api_key: api_key
                .or_else(|| std::env::var("TEXTVAULT_EMBED_API_KEY").ok())
                .unwrap_or(defaults.api_key),
            model: model
                .or_else(|| std::env::var("TEXTVAULT_EMBED_MODEL").ok())
                .unwrap_or(defaults.model),
            dimension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_model_runner() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.dimension, 1024);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn explicit_overrides_win() {
        let config = BackendConfig::resolve(
            Some("http://example:9000/v1".into()),
            Some("secret".into()),
            Some("custom-model".into()),
            Some(384),
        )
        .unwrap();

        assert_eq!(config.base_url, "http://example:9000/v1");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.dimension, 384);
    }

    #[test]
    fn zero_dimension_rejected() {
        let result = BackendConfig::resolve(None, None, None, Some(0));
        assert!(result.is_err());
    }
}
