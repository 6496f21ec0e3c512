//! Vector index adapter.
//!
//! An append-only collection of [`VectorRecord`]s keyed by the correlation
//! identifier, held in its own SQLite database file, separate from the
//! metadata store. The current product never runs similarity queries
//! against it; records are written at ingestion and only ever read back by
//! id for audit.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::db;
use crate::embedding::{blob_to_vec, vec_to_blob};
use crate::models::VectorRecord;

/// Vector index write failure.
///
/// Duplicate ids get their own variant so a correlation-id collision
/// surfaces immediately instead of silently shadowing an earlier record.
#[derive(Debug)]
pub enum IndexError {
    DuplicateId(String),
    Write(String),
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexError::DuplicateId(id) => {
                write!(f, "vector record with id {} already exists", id)
            }
            IndexError::Write(e) => write!(f, "vector index write failed: {}", e),
        }
    }
}

impl std::error::Error for IndexError {}

/// Handle on the vector index database.
pub struct VectorIndex {
    pool: SqlitePool,
}

impl VectorIndex {
    /// Opens the index at `path`, creating the database file and the
    /// backing table if they do not exist yet. Idempotent; called once at
    /// startup.
    pub async fn open(path: &Path) -> Result<Self> {
        let pool = db::connect(path).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vector_records (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                embedding BLOB NOT NULL,
                dims INTEGER NOT NULL,
                name TEXT,
                resume_type TEXT,
                occupation TEXT,
                filename TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Appends one record. Re-adding an existing id is rejected with
    /// [`IndexError::DuplicateId`]; nothing is overwritten.
    pub async fn add(&self, record: &VectorRecord) -> Result<(), IndexError> {
        let blob = vec_to_blob(&record.embedding);

        let result = sqlx::query(
            r#"
            INSERT INTO vector_records (id, text, embedding, dims, name, resume_type, occupation, filename)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.text)
        .bind(&blob)
        .bind(record.embedding.len() as i64)
        .bind(&record.name)
        .bind(&record.resume_type)
        .bind(&record.occupation)
        .bind(&record.filename)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(IndexError::DuplicateId(record.id.clone()))
            }
            Err(e) => Err(IndexError::Write(e.to_string())),
        }
    }

    /// Deletes a record by id. Returns whether a record was removed.
    ///
    /// Only used by the ingestion coordinator's compensation path; there is
    /// no caller-facing delete operation.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vector_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetches a record by correlation id.
    pub async fn get(&self, id: &str) -> Result<Option<VectorRecord>> {
        let row = sqlx::query(
            "SELECT id, text, embedding, name, resume_type, occupation, filename \
             FROM vector_records WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let blob: Vec<u8> = row.get("embedding");
            VectorRecord {
                id: row.get("id"),
                text: row.get("text"),
                embedding: blob_to_vec(&blob),
                name: row.get("name"),
                resume_type: row.get("resume_type"),
                occupation: row.get("occupation"),
                filename: row.get("filename"),
            }
        }))
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vector_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
