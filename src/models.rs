//! Core data models for the dual-store resume pipeline.
//!
//! These types represent the records that flow through ingestion and
//! retrieval: the relational metadata row, its paired vector-index entry,
//! and the caller-supplied descriptive fields and search filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional descriptive fields supplied alongside an upload.
///
/// All fields are free text with no uniqueness constraint. An empty string
/// is treated the same as an absent field throughout the pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeFields {
    pub name: Option<String>,
    pub resume_type: Option<String>,
    pub occupation: Option<String>,
}

/// Metadata row awaiting insertion (before the store assigns `id` and
/// `created_at`).
#[derive(Debug, Clone)]
pub struct NewResume {
    pub name: Option<String>,
    pub resume_type: Option<String>,
    pub occupation: Option<String>,
    pub filename: String,
    /// Correlation identifier shared with the paired [`VectorRecord`].
    pub vector_id: String,
    pub snippet: String,
}

/// Persisted metadata record for one ingested resume.
///
/// `vector_id` links this row to exactly one [`VectorRecord`]; both are
/// created in the same ingestion and never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub id: i64,
    pub name: Option<String>,
    pub resume_type: Option<String>,
    pub occupation: Option<String>,
    pub filename: String,
    pub vector_id: String,
    pub snippet: String,
    pub created_at: DateTime<Utc>,
}

/// Entry stored in the vector index, keyed by the correlation identifier.
///
/// Holds the full extracted text (the metadata row only keeps a snippet)
/// and a copy of the descriptive fields as they were at ingestion time.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub name: Option<String>,
    pub resume_type: Option<String>,
    pub occupation: Option<String>,
    pub filename: String,
}

/// Filters accepted by the search operation. All optional; see
/// [`crate::search`] for how `name` interacts with the other fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub resume_type: Option<String>,
    pub occupation: Option<String>,
}

/// Returns the field value only if it is present and non-empty.
pub fn populated(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_rejects_empty_strings() {
        assert_eq!(populated(&None), None);
        assert_eq!(populated(&Some(String::new())), None);
        assert_eq!(populated(&Some("Jane".to_string())), Some("Jane"));
    }
}
