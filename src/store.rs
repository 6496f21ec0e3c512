//! Metadata store adapter.
//!
//! The relational half of the dual store: one row per ingested resume,
//! queryable by case-insensitive substring match on the descriptive
//! fields. Rows are created at ingestion and never updated or deleted.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::db;
use crate::models::{populated, NewResume, ResumeRecord, SearchFilter};

/// Handle on the metadata database.
pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    /// Opens the store at `path`, creating the database file and running
    /// the idempotent migration.
    pub async fn open(path: &Path) -> Result<Self> {
        let pool = db::connect(path).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                resume_type TEXT,
                occupation TEXT,
                filename TEXT NOT NULL,
                vector_id TEXT NOT NULL UNIQUE,
                snippet TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resumes_name ON resumes(name)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Inserts a row, assigning `id` and `created_at`, and returns the
    /// persisted record.
    pub async fn create(&self, new: NewResume) -> Result<ResumeRecord> {
        let created_at = Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO resumes (name, resume_type, occupation, filename, vector_id, snippet, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.resume_type)
        .bind(&new.occupation)
        .bind(&new.filename)
        .bind(&new.vector_id)
        .bind(&new.snippet)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(ResumeRecord {
            id: result.last_insert_rowid(),
            name: new.name,
            resume_type: new.resume_type,
            occupation: new.occupation,
            filename: new.filename,
            vector_id: new.vector_id,
            snippet: new.snippet,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
        })
    }

    /// Runs a case-insensitive substring match per populated filter field,
    /// AND-combined. No filters at all returns every row. Rows come back
    /// in insertion (id) order.
    ///
    /// `instr` rather than `LIKE` keeps `%`/`_` in user input literal.
    pub async fn query(&self, filter: &SearchFilter) -> Result<Vec<ResumeRecord>> {
        let mut sql = String::from(
            "SELECT id, name, resume_type, occupation, filename, vector_id, snippet, created_at \
             FROM resumes",
        );

        let mut clauses: Vec<&str> = Vec::new();
        let mut binds: Vec<&str> = Vec::new();

        if let Some(name) = populated(&filter.name) {
            clauses.push("instr(lower(name), lower(?)) > 0");
            binds.push(name);
        }
        if let Some(resume_type) = populated(&filter.resume_type) {
            clauses.push("instr(lower(resume_type), lower(?)) > 0");
            binds.push(resume_type);
        }
        if let Some(occupation) = populated(&filter.occupation) {
            clauses.push("instr(lower(occupation), lower(?)) > 0");
            binds.push(occupation);
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn row_to_record(row: &SqliteRow) -> ResumeRecord {
    let created_at: i64 = row.get("created_at");
    ResumeRecord {
        id: row.get("id"),
        name: row.get("name"),
        resume_type: row.get("resume_type"),
        occupation: row.get("occupation"),
        filename: row.get("filename"),
        vector_id: row.get("vector_id"),
        snippet: row.get("snippet"),
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store(dir: &tempfile::TempDir) -> MetadataStore {
        MetadataStore::open(&dir.path().join("resumes.sqlite"))
            .await
            .unwrap()
    }

    fn new_resume(name: &str, resume_type: &str, occupation: &str, vector_id: &str) -> NewResume {
        NewResume {
            name: Some(name.to_string()),
            resume_type: Some(resume_type.to_string()),
            occupation: Some(occupation.to_string()),
            filename: "r.txt".to_string(),
            vector_id: vector_id.to_string(),
            snippet: "snippet".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let first = store
            .create(new_resume("Jane Doe", "Engineering", "Software Engineer", "v1"))
            .await
            .unwrap();
        let second = store
            .create(new_resume("Jane Smith", "Sales", "Account Manager", "v2"))
            .await
            .unwrap();

        assert!(first.id > 0);
        assert_eq!(second.id, first.id + 1);
        assert!(first.created_at.timestamp() > 0);
        store.close().await;
    }

    #[tokio::test]
    async fn duplicate_vector_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .create(new_resume("Jane Doe", "Engineering", "Software Engineer", "same"))
            .await
            .unwrap();
        let err = store
            .create(new_resume("Jane Smith", "Sales", "Account Manager", "same"))
            .await;
        assert!(err.is_err());
        store.close().await;
    }

    #[tokio::test]
    async fn query_matches_substring_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .create(new_resume("jane doe", "Engineering", "Software Engineer", "v1"))
            .await
            .unwrap();

        let hits = store
            .query(&SearchFilter {
                name: Some("Jane".to_string()),
                ..SearchFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name.as_deref(), Some("jane doe"));
        store.close().await;
    }

    #[tokio::test]
    async fn query_combines_fields_with_and() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .create(new_resume("Jane Doe", "Engineering", "Software Engineer", "v1"))
            .await
            .unwrap();
        store
            .create(new_resume("Jane Smith", "Engineering", "Data Scientist", "v2"))
            .await
            .unwrap();

        let hits = store
            .query(&SearchFilter {
                resume_type: Some("engineering".to_string()),
                occupation: Some("software".to_string()),
                ..SearchFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].occupation.as_deref(), Some("Software Engineer"));
        store.close().await;
    }

    #[tokio::test]
    async fn empty_filter_returns_all_rows_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .create(new_resume("A", "T", "O", "v1"))
            .await
            .unwrap();
        store
            .create(new_resume("B", "T", "O", "v2"))
            .await
            .unwrap();

        let hits = store.query(&SearchFilter::default()).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].id < hits[1].id);
        store.close().await;
    }

    #[tokio::test]
    async fn wildcard_characters_in_input_are_literal() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        store
            .create(new_resume("Jane Doe", "Engineering", "Software Engineer", "v1"))
            .await
            .unwrap();

        let hits = store
            .query(&SearchFilter {
                name: Some("%".to_string()),
                ..SearchFilter::default()
            })
            .await
            .unwrap();
        assert!(hits.is_empty());
        store.close().await;
    }
}
