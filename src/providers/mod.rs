// Provider module
// HTTP clients for the embedding and chat model providers.

pub mod google;
pub mod openai;

use anyhow::{Context, Result};

use crate::config::{Config, Provider};
use google::GoogleClient;
use openai::OpenAiClient;

/// Embedding provider selected by configuration, one variant per provider.
///
/// Ingestion and retrieval must resolve to the same variant: vectors stored
/// by one provider are meaningless as search keys for another, and a
/// dimension mismatch will fail outright in the store.
#[derive(Debug, Clone)]
pub enum EmbeddingClient {
    OpenAi(OpenAiClient),
    Google(GoogleClient),
}

impl EmbeddingClient {
    /// Build the client for the configured provider. Fails on a missing API
    /// key; no network call is made here.
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.provider {
            Provider::OpenAi => Self::OpenAi(OpenAiClient::from_config(config)?),
            Provider::Google => Self::Google(GoogleClient::from_config(config)?),
        })
    }

    /// Embed a batch of texts, one fixed-dimension vector per input, in
    /// input order.
    #[inline]
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::OpenAi(client) => client.embed_batch(texts),
            Self::Google(client) => client.embed_batch(texts),
        }
    }

    /// Embed a single text.
    #[inline]
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()])?;
        vectors.pop().context("Embedding response was empty")
    }
}

/// Chat model selected by configuration, one variant per provider.
#[derive(Debug, Clone)]
pub enum ChatClient {
    OpenAi(OpenAiClient),
    Google(GoogleClient),
}

impl ChatClient {
    /// Build the client for the configured provider. Fails on a missing API
    /// key; no network call is made here.
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.provider {
            Provider::OpenAi => Self::OpenAi(OpenAiClient::from_config(config)?),
            Provider::Google => Self::Google(GoogleClient::from_config(config)?),
        })
    }

    /// Send a prompt to the model at temperature 0 and return the plain
    /// response text.
    #[inline]
    pub fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            Self::OpenAi(client) => client.generate(prompt),
            Self::Google(client) => client.generate(prompt),
        }
    }
}
