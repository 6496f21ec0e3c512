//! Ingestion pipeline orchestration.
//!
//! Coordinates the full upload flow: text extraction → embedding →
//! correlation-id minting → vector index write → metadata store write.
//! Any stage failure aborts the operation and propagates a stage-tagged
//! error; there is no retry at this layer. The vector write always
//! precedes the metadata write, and a metadata failure triggers a
//! compensating delete of the just-written vector record so neither store
//! keeps an unpaired row.

use uuid::Uuid;

use crate::config::EmbeddingConfig;
use crate::embedding::{self, EmbeddingProvider};
use crate::extract::{self, ExtractError};
use crate::index::{IndexError, VectorIndex};
use crate::models::{NewResume, ResumeFields, ResumeRecord, VectorRecord};
use crate::store::MetadataStore;

/// Number of characters of extracted text kept on the metadata row for
/// display without refetching the full document.
pub const SNIPPET_CHARS: usize = 300;

/// Ingestion failure, tagged by the pipeline stage that produced it.
#[derive(Debug)]
pub enum IngestError {
    Extraction(ExtractError),
    Encoding(String),
    IndexWrite(IndexError),
    StoreWrite(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Extraction(e) => write!(f, "text extraction failed: {}", e),
            IngestError::Encoding(e) => write!(f, "embedding failed: {}", e),
            IngestError::IndexWrite(e) => write!(f, "vector index write failed: {}", e),
            IngestError::StoreWrite(e) => write!(f, "metadata store write failed: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Extraction(e) => Some(e),
            IngestError::IndexWrite(e) => Some(e),
            _ => None,
        }
    }
}

/// Runs one upload through the pipeline and returns the persisted
/// metadata record.
///
/// The correlation identifier is minted fresh per attempt; a caller
/// resubmitting after a failure gets a new id and a clean slate.
pub async fn ingest_resume(
    provider: &dyn EmbeddingProvider,
    embedding_cfg: &EmbeddingConfig,
    index: &VectorIndex,
    store: &MetadataStore,
    filename: &str,
    bytes: &[u8],
    fields: &ResumeFields,
) -> Result<ResumeRecord, IngestError> {
    tracing::info!(filename, size = bytes.len(), "ingesting resume");

    let text = extract::extract_text(filename, bytes).map_err(IngestError::Extraction)?;
    tracing::debug!(chars = text.chars().count(), "extracted text");

    let vector = embedding::embed_text(provider, embedding_cfg, &text)
        .await
        .map_err(|e| IngestError::Encoding(e.to_string()))?;
    tracing::debug!(dims = vector.len(), "computed embedding");

    let vector_id = Uuid::new_v4().to_string();

    let record = VectorRecord {
        id: vector_id.clone(),
        text: text.clone(),
        embedding: vector,
        name: fields.name.clone(),
        resume_type: fields.resume_type.clone(),
        occupation: fields.occupation.clone(),
        filename: filename.to_string(),
    };
    index.add(&record).await.map_err(IngestError::IndexWrite)?;

    let new = NewResume {
        name: fields.name.clone(),
        resume_type: fields.resume_type.clone(),
        occupation: fields.occupation.clone(),
        filename: filename.to_string(),
        vector_id: vector_id.clone(),
        snippet: snippet_of(&text),
    };

    match store.create(new).await {
        Ok(stored) => {
            tracing::info!(id = stored.id, vector_id = %vector_id, "resume ingested");
            Ok(stored)
        }
        Err(e) => {
            // The vector write already landed; drop the orphan so the
            // stores stay paired. The original store error still wins.
            match index.remove(&vector_id).await {
                Ok(_) => {
                    tracing::warn!(vector_id = %vector_id, "removed orphaned vector record after store failure")
                }
                Err(cleanup) => {
                    tracing::warn!(vector_id = %vector_id, error = %cleanup, "failed to remove orphaned vector record")
                }
            }
            Err(IngestError::StoreWrite(e.to_string()))
        }
    }
}

/// First [`SNIPPET_CHARS`] characters of the extracted text,
/// char-boundary safe.
pub fn snippet_of(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
