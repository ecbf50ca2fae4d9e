use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::debug;

pub mod vector_store;

pub type DbPool = Pool<Postgres>;

/// Connection to the PostgreSQL instance holding the vector store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect using the configured connection string.
    #[inline]
    pub async fn connect(postgres_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(postgres_url)
            .await
            .context("Failed to create database connection pool")?;

        debug!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
