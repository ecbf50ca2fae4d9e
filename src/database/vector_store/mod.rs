
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::DbPool;

/// One (chunk text, embedding, metadata) triple persisted in a collection.
/// Records are created during ingestion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    pub id: Uuid,
    pub content: String,
    pub embedding: Vec<f32>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// A record returned by similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub content: String,
    pub metadata: Value,
    /// Cosine similarity to the query vector; results arrive in descending
    /// similarity order.
    pub similarity: f32,
}

/// pgvector-backed store over a named collection (one table per collection).
#[derive(Debug, Clone)]
pub struct VectorStore {
    pool: DbPool,
    collection: String,
}

impl VectorStore {
    #[inline]
    pub fn new(pool: DbPool, collection: &str) -> Self {
        Self {
            pool,
            collection: collection.to_string(),
        }
    }

    /// Create the pgvector extension and the collection table if absent.
    /// The vector dimension is fixed when the table is first created.
    #[inline]
    pub async fn ensure_collection(&self, dimension: usize) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .context("Failed to create vector extension")?;

        let create = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                content TEXT NOT NULL,
                embedding vector({}) NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
            self.collection, dimension
        );
        sqlx::query(&create)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create collection table {}", self.collection))?;

        debug!(
            "Collection {} ready (dimension {})",
            self.collection, dimension
        );
        Ok(())
    }

    /// Insert a batch of records. Existing rows are never touched, so
    /// re-ingesting the same document appends duplicate records.
    #[inline]
    pub async fn store_batch(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        if records.is_empty() {
            debug!("No records to store");
            return Ok(());
        }

        let count = records.len();
        let insert = format!(
            "INSERT INTO {} (id, content, embedding, metadata, created_at)
             VALUES ($1, $2, $3::vector, $4, $5)",
            self.collection
        );

        for record in records {
            sqlx::query(&insert)
                .bind(record.id)
                .bind(&record.content)
                .bind(embedding_to_pgvector(&record.embedding))
                .bind(&record.metadata)
                .bind(record.created_at)
                .execute(&self.pool)
                .await
                .with_context(|| {
                    format!("Failed to insert record into collection {}", self.collection)
                })?;
        }

        info!("Stored {} records in collection {}", count, self.collection);
        Ok(())
    }

    /// Top-k records by cosine distance to the query vector, most similar
    /// first.
    #[inline]
    pub async fn search_similar(
        &self,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let embedding = embedding_to_pgvector(query_vector);
        let query = format!(
            "SELECT content, metadata, 1 - (embedding <=> $1::vector) AS similarity
             FROM {}
             ORDER BY embedding <=> $1::vector
             LIMIT $2",
            self.collection
        );

        let rows = sqlx::query(&query)
            .bind(&embedding)
            .bind(i64::try_from(k).context("Retrieval limit out of range")?)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Similarity search in {} failed", self.collection))?;

        let results: Vec<SearchResult> = rows
            .iter()
            .map(|row| SearchResult {
                content: row.get("content"),
                metadata: row.get("metadata"),
                similarity: row.get::<f64, _>("similarity") as f32,
            })
            .collect();

        debug!("Similarity search returned {} results", results.len());
        Ok(results)
    }
}

/// pgvector's input syntax: `[v1,v2,...]`.
pub(crate) fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(ToString::to_string).collect();
    format!("[{}]", values.join(","))
}
