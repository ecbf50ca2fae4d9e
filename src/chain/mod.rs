
use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{COLLECTION_NAME, Config};
use crate::database::Database;
use crate::database::vector_store::{SearchResult, VectorStore};
use crate::providers::{ChatClient, EmbeddingClient};

/// Fixed response when the retrieved context cannot answer the question.
pub const REFUSAL_SENTENCE: &str =
    "Não tenho informações necessárias para responder sua pergunta.";

/// Instruction template rendered for every question. The rules restrict the
/// model to the retrieved context and the few-shot examples demonstrate the
/// refusal sentence for out-of-context questions.
pub const PROMPT_TEMPLATE: &str = "\
CONTEXTO:
{contexto}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  \"Não tenho informações necessárias para responder sua pergunta.\"
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: \"Qual é a capital da França?\"
Resposta: \"Não tenho informações necessárias para responder sua pergunta.\"

Pergunta: \"Quantos clientes temos em 2024?\"
Resposta: \"Não tenho informações necessárias para responder sua pergunta.\"

Pergunta: \"Você acha isso bom ou ruim?\"
Resposta: \"Não tenho informações necessárias para responder sua pergunta.\"

PERGUNTA DO USUÁRIO:
{pergunta}

RESPONDA A \"PERGUNTA DO USUÁRIO\"
";

/// Why chain construction failed. Callers can tell a misconfiguration apart
/// from a store that is simply not reachable.
#[derive(Debug, Error)]
pub enum ChainBuildError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vector store connection failed: {0}")]
    Store(String),
}

/// The fixed instruction template with its two placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: &'static str,
}

impl Default for PromptTemplate {
    #[inline]
    fn default() -> Self {
        Self {
            template: PROMPT_TEMPLATE,
        }
    }
}

impl PromptTemplate {
    /// Render the template with the assembled context and the verbatim user
    /// question.
    #[inline]
    pub fn render(&self, context: &str, question: &str) -> String {
        self.template
            .replace("{contexto}", context)
            .replace("{pergunta}", question)
    }
}

/// Concatenate retrieved chunk texts with a blank-line separator, keeping
/// the store's rank order.
#[inline]
pub fn format_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|result| result.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Similarity-search stage: embeds the question and asks the store for the
/// top-k most similar chunks.
#[derive(Debug, Clone)]
pub struct Retriever {
    store: VectorStore,
    embeddings: EmbeddingClient,
    k: usize,
}

impl Retriever {
    #[inline]
    pub fn new(store: VectorStore, embeddings: EmbeddingClient, k: usize) -> Self {
        Self {
            store,
            embeddings,
            k,
        }
    }

    #[inline]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        let query_vector = self
            .embeddings
            .embed(question)
            .context("Failed to embed question")?;
        self.store.search_similar(&query_vector, self.k).await
    }
}

/// The composed pipeline from question to answer: retrieval, context
/// formatting, prompt templating, model call, text extraction.
#[derive(Debug, Clone)]
pub struct RagChain {
    retriever: Retriever,
    prompt: PromptTemplate,
    llm: ChatClient,
}

impl RagChain {
    #[inline]
    pub fn new(retriever: Retriever, llm: ChatClient) -> Self {
        Self {
            retriever,
            prompt: PromptTemplate::default(),
            llm,
        }
    }

    /// Run the stages in order for one question.
    #[inline]
    pub async fn invoke(&self, question: &str) -> Result<String> {
        let results = self.retriever.retrieve(question).await?;
        debug!("Retrieved {} chunks for question", results.len());

        let context = format_context(&results);
        let prompt = self.prompt.render(&context, question);
        let answer = self.llm.generate(&prompt).context("Model call failed")?;

        Ok(answer.trim().to_string())
    }
}

/// Build the retrieval chain for the configured provider. Both clients are
/// constructed before the store connection so that configuration errors
/// surface without any network traffic.
#[inline]
pub async fn build_chain(config: &Config) -> std::result::Result<RagChain, ChainBuildError> {
    let embeddings = EmbeddingClient::from_config(config)
        .map_err(|e| ChainBuildError::Config(format!("{e:#}")))?;
    let llm = ChatClient::from_config(config)
        .map_err(|e| ChainBuildError::Config(format!("{e:#}")))?;

    let database = Database::connect(&config.postgres_url).await.map_err(|e| {
        error!("Failed to connect to the vector store: {e:#}");
        ChainBuildError::Store(format!("{e:#}"))
    })?;

    let store = VectorStore::new(database.pool().clone(), COLLECTION_NAME);
    let retriever = Retriever::new(store, embeddings, config.retrieval_k);

    info!(
        "Retrieval chain ready (provider {}, k={})",
        config.provider, config.retrieval_k
    );
    Ok(RagChain::new(retriever, llm))
}
