#[cfg(test)]
mod tests;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::config::{COLLECTION_NAME, Config};
use crate::database::Database;
use crate::database::vector_store::{EmbeddingRecord, VectorStore};
use crate::document::load_pdf;
use crate::providers::EmbeddingClient;
use crate::splitter::split_text;
use crate::{RagError, Result};

/// Embedding requests are issued in groups of this size to keep individual
/// payloads bounded.
const EMBED_BATCH_SIZE: usize = 100;

/// Counts reported after a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub pages: usize,
    pub chunks: usize,
}

/// Load, split, embed, and store the configured PDF.
///
/// Aborts before any network or database call when the file is missing or
/// the provider is misconfigured. There is no rollback: a failure mid-batch
/// can leave a partially ingested document behind, and re-running appends
/// duplicate records rather than replacing them.
#[inline]
pub async fn ingest_pdf(config: &Config) -> Result<IngestReport> {
    if !config.pdf_path.exists() {
        return Err(RagError::PdfNotFound(config.pdf_path.clone()));
    }

    println!("Loading PDF from {}...", config.pdf_path.display());
    let pages = load_pdf(&config.pdf_path)?;

    println!("Splitting documents into chunks...");
    let mut texts = Vec::new();
    let mut metadata = Vec::new();
    for page in &pages {
        for chunk in split_text(&page.content, &config.splitter) {
            metadata.push(json!({
                "source": config.pdf_path.display().to_string(),
                "page": page.page_number,
            }));
            texts.push(chunk);
        }
    }
    info!("Split {} pages into {} chunks", pages.len(), texts.len());

    let embeddings_client = EmbeddingClient::from_config(config)
        .map_err(|e| RagError::Config(format!("{e:#}")))?;

    println!(
        "Connecting to PostgreSQL and storing vectors (Provider: {})...",
        config.provider
    );

    let mut vectors = Vec::with_capacity(texts.len());
    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        let batch_vectors = embeddings_client
            .embed_batch(batch)
            .map_err(|e| RagError::Embedding(format!("{e:#}")))?;
        vectors.extend(batch_vectors);
    }

    let dimension = vectors.first().map(Vec::len).unwrap_or_default();
    if dimension == 0 {
        return Err(RagError::Embedding(
            "The document produced no embeddable chunks".to_string(),
        ));
    }

    let database = Database::connect(&config.postgres_url)
        .await
        .map_err(|e| RagError::Database(format!("{e:#}")))?;
    let store = VectorStore::new(database.pool().clone(), COLLECTION_NAME);

    store
        .ensure_collection(dimension)
        .await
        .map_err(|e| RagError::Database(format!("{e:#}")))?;

    let records: Vec<EmbeddingRecord> = texts
        .into_iter()
        .zip(vectors)
        .zip(metadata)
        .map(|((content, embedding), metadata)| EmbeddingRecord {
            id: Uuid::new_v4(),
            content,
            embedding,
            metadata,
            created_at: Utc::now(),
        })
        .collect();

    let chunks = records.len();
    store
        .store_batch(records)
        .await
        .map_err(|e| RagError::Database(format!("{e:#}")))?;

    info!(
        "Ingested {} chunks from {} pages into collection {}",
        chunks,
        pages.len(),
        COLLECTION_NAME
    );

    Ok(IngestReport {
        pages: pages.len(),
        chunks,
    })
}
