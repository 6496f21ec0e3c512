//! Process-wide service state with an explicit lifecycle.
//!
//! [`ResumeService`] bundles the embedding provider and both store handles.
//! It is built once at startup, shared by every request handler or CLI
//! command (the HTTP layer wraps it in an `Arc`), and torn down with
//! [`ResumeService::close`].

use anyhow::Result;

use crate::config::{Config, EmbeddingConfig};
use crate::embedding::{self, EmbeddingProvider};
use crate::index::VectorIndex;
use crate::ingest::{self, IngestError};
use crate::models::{ResumeFields, ResumeRecord, SearchFilter};
use crate::search;
use crate::store::MetadataStore;

pub struct ResumeService {
    embedding: EmbeddingConfig,
    provider: Box<dyn EmbeddingProvider>,
    index: VectorIndex,
    store: MetadataStore,
}

impl ResumeService {
    /// Opens both stores (creating their schemas if absent) and
    /// instantiates the configured embedding provider.
    pub async fn init(config: &Config) -> Result<Self> {
        if !config.embedding.is_enabled() {
            tracing::warn!("embedding provider is disabled; ingestion requests will fail");
        }

        let provider = embedding::create_provider(&config.embedding)?;
        let index = VectorIndex::open(&config.vector_db.path).await?;
        let store = MetadataStore::open(&config.meta_db.path).await?;

        tracing::info!(
            model = provider.model_name(),
            dims = provider.dims(),
            meta_db = %config.meta_db.path.display(),
            vector_db = %config.vector_db.path.display(),
            "resume service initialized"
        );

        Ok(Self {
            embedding: config.embedding.clone(),
            provider,
            index,
            store,
        })
    }

    /// Runs one upload through the ingestion pipeline.
    pub async fn ingest(
        &self,
        filename: &str,
        bytes: &[u8],
        fields: &ResumeFields,
    ) -> Result<ResumeRecord, IngestError> {
        ingest::ingest_resume(
            self.provider.as_ref(),
            &self.embedding,
            &self.index,
            &self.store,
            filename,
            bytes,
            fields,
        )
        .await
    }

    /// Runs the search policy against the metadata store.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<ResumeRecord>> {
        search::search_resumes(&self.store, filter).await
    }

    /// Shuts down both store pools.
    pub async fn close(self) {
        self.index.close().await;
        self.store.close().await;
    }
}
