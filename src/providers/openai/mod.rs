
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Client for the OpenAI embeddings and chat completions APIs.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: Url,
    api_key: String,
    embeddings_model: String,
    chat_model: String,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiClient {
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .openai
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY is not set")?;

        Self::new(
            api_key,
            config.openai.embeddings_model.clone(),
            config.openai.chat_model.clone(),
        )
    }

    #[inline]
    pub fn new(api_key: String, embeddings_model: String, chat_model: String) -> Result<Self> {
        let base_url = Url::parse(OPENAI_BASE_URL).context("Failed to parse OpenAI base URL")?;

        Ok(Self {
            base_url,
            api_key,
            embeddings_model,
            chat_model,
            agent: ureq::Agent::config_builder().build().into(),
        })
    }

    /// Embed a batch of texts in a single request, returning one vector per
    /// input in input order.
    #[inline]
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Requesting OpenAI embeddings for {} texts (model {})",
            texts.len(),
            self.embeddings_model
        );

        let request = EmbeddingsRequest {
            model: &self.embeddings_model,
            input: texts,
        };
        let url = self
            .base_url
            .join("embeddings")
            .context("Failed to build embeddings URL")?;

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize embeddings request")?;
        let response_text = self.post_json(&url, &request_json)?;

        parse_embeddings_response(&response_text, texts.len())
    }

    /// Send a prompt to the chat completions API at temperature 0 and
    /// return the plain text of the first choice.
    #[inline]
    pub fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Requesting OpenAI chat completion (model {})",
            self.chat_model
        );

        let request = ChatRequest {
            model: &self.chat_model,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let url = self
            .base_url
            .join("chat/completions")
            .context("Failed to build chat completions URL")?;

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize chat request")?;
        let response_text = self.post_json(&url, &request_json)?;

        parse_chat_response(&response_text)
    }

    fn post_json(&self, url: &Url, body: &str) -> Result<String> {
        self.agent
            .post(url.as_str())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(body)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .with_context(|| format!("OpenAI request to {} failed", url.path()))
    }
}

fn parse_embeddings_response(body: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
    let mut response: EmbeddingsResponse =
        serde_json::from_str(body).context("Failed to parse OpenAI embeddings response")?;

    if response.data.len() != expected {
        bail!(
            "Mismatch between request and response counts: {} vs {}",
            expected,
            response.data.len()
        );
    }

    response.data.sort_by_key(|entry| entry.index);
    Ok(response
        .data
        .into_iter()
        .map(|entry| entry.embedding)
        .collect())
}

fn parse_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).context("Failed to parse OpenAI chat response")?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .context("OpenAI chat response contained no choices")
}
