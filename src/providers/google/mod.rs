
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::Config;

const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Client for the Google Generative Language embeddings and generation APIs.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    base_url: Url,
    api_key: String,
    embeddings_model: String,
    chat_model: String,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: TextContent<'a>,
}

#[derive(Debug, Serialize)]
struct TextContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<TextContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

impl GoogleClient {
    #[inline]
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .google
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("GOOGLE_API_KEY is not set")?;

        Self::new(
            api_key,
            config.google.embeddings_model.clone(),
            config.google.chat_model.clone(),
        )
    }

    #[inline]
    pub fn new(api_key: String, embeddings_model: String, chat_model: String) -> Result<Self> {
        let base_url = Url::parse(GOOGLE_BASE_URL).context("Failed to parse Google base URL")?;

        Ok(Self {
            base_url,
            api_key,
            embeddings_model: qualify_model(&embeddings_model),
            chat_model: qualify_model(&chat_model),
            agent: ureq::Agent::config_builder().build().into(),
        })
    }

    /// Embed a batch of texts with `batchEmbedContents`, returning one
    /// vector per input in input order.
    #[inline]
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Requesting Google embeddings for {} texts (model {})",
            texts.len(),
            self.embeddings_model
        );

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: &self.embeddings_model,
                    content: TextContent {
                        parts: vec![TextPart { text }],
                    },
                })
                .collect(),
        };
        let url = self.endpoint(&self.embeddings_model, "batchEmbedContents")?;

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize embeddings request")?;
        let response_text = self.post_json(&url, &request_json)?;

        parse_embeddings_response(&response_text, texts.len())
    }

    /// Send a prompt to `generateContent` at temperature 0 and return the
    /// concatenated text of the first candidate.
    #[inline]
    pub fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            "Requesting Google content generation (model {})",
            self.chat_model
        );

        let request = GenerateRequest {
            contents: vec![TextContent {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        let url = self.endpoint(&self.chat_model, "generateContent")?;

        let request_json =
            serde_json::to_string(&request).context("Failed to serialize generation request")?;
        let response_text = self.post_json(&url, &request_json)?;

        parse_generate_response(&response_text)
    }

    fn endpoint(&self, model: &str, method: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{model}:{method}"))
            .with_context(|| format!("Failed to build {method} URL"))
    }

    fn post_json(&self, url: &Url, body: &str) -> Result<String> {
        // The key goes in a header rather than the query string so it never
        // shows up in error messages carrying the URL.
        self.agent
            .post(url.as_str())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .send(body)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .with_context(|| format!("Google request to {} failed", url.path()))
    }
}

/// The API addresses models as `models/<name>`; accept both forms in
/// configuration.
fn qualify_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn parse_embeddings_response(body: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
    let response: BatchEmbedResponse =
        serde_json::from_str(body).context("Failed to parse Google embeddings response")?;

    if response.embeddings.len() != expected {
        bail!(
            "Mismatch between request and response counts: {} vs {}",
            expected,
            response.embeddings.len()
        );
    }

    Ok(response
        .embeddings
        .into_iter()
        .map(|entry| entry.values)
        .collect())
}

fn parse_generate_response(body: &str) -> Result<String> {
    let response: GenerateResponse =
        serde_json::from_str(body).context("Failed to parse Google generation response")?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .context("Google generation response contained no candidates")?;

    Ok(candidate
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect())
}
