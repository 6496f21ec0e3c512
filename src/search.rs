//! Search policy over the metadata store.
//!
//! Two branches, decided per query:
//!
//! - **Strict** — a non-empty `name` filter binds the search to that name
//!   alone; `resume_type` and `occupation` are ignored even if supplied.
//!   A caller asking about a specific person must never be handed another
//!   person's records because a looser filter happened to match.
//! - **Flexible** — without a name, whichever of `resume_type` and
//!   `occupation` are present are AND-combined; absent fields impose no
//!   constraint.
//!
//! Both branches are case-insensitive substring matches against the
//! metadata store only; the vector index is never consulted at read time.
//! No matches is an empty result, never an error.

use anyhow::Result;

use crate::models::{populated, ResumeRecord, SearchFilter};
use crate::store::MetadataStore;

/// Reduces a caller-supplied filter to the one actually executed.
///
/// Pure; the policy lives here so it can be tested without a store.
pub fn effective_filter(filter: &SearchFilter) -> SearchFilter {
    if let Some(name) = populated(&filter.name) {
        return SearchFilter {
            name: Some(name.to_string()),
            resume_type: None,
            occupation: None,
        };
    }

    SearchFilter {
        name: None,
        resume_type: populated(&filter.resume_type).map(str::to_string),
        occupation: populated(&filter.occupation).map(str::to_string),
    }
}

/// Runs the search policy against the metadata store.
pub async fn search_resumes(
    store: &MetadataStore,
    filter: &SearchFilter,
) -> Result<Vec<ResumeRecord>> {
    let effective = effective_filter(filter);

    if effective.name.is_some() {
        tracing::debug!(name = effective.name.as_deref(), "strict name search");
    } else {
        tracing::debug!(
            resume_type = effective.resume_type.as_deref(),
            occupation = effective.occupation.as_deref(),
            "flexible filter search"
        );
    }

    store.query(&effective).await
}
